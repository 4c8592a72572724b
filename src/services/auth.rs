// src/services/auth.rs

use bcrypt::verify;

use crate::{
    common::error::AppError,
    db::{TokenRepository, UserRepository},
    models::auth::Claims,
    services::token_codec::TokenCodec,
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    token_repo: TokenRepository,
    codec: TokenCodec,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, token_repo: TokenRepository, codec: TokenCodec) -> Self {
        Self { user_repo, token_repo, codec }
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<String, AppError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::BadRequest("Username and password are required".to_string()));
        }

        // Usuário inexistente e senha errada dão a mesma resposta
        let user = self.user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))?
        ?;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let issued = self.codec.issue(user.user_id, &user.role)?;
        self.token_repo
            .store(user.user_id, &issued.token, issued.expires_at)
            .await?;

        tracing::info!(user_id = user.user_id, "🔑 Login efetuado");
        Ok(issued.token)
    }

    /// Assinatura + expiração (codec) e depois whitelist (banco).
    /// O codec roda primeiro: token forjado nunca chega a consultar o banco.
    pub async fn authenticate_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.codec.verify(token)?;

        if !self.token_repo.is_active(token).await? {
            tracing::debug!(user_id = claims.user_id, "Token fora da whitelist");
            return Err(AppError::InvalidToken);
        }

        Ok(claims)
    }

    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        let removed = self.token_repo.revoke(token).await?;
        tracing::info!(removed, "🚪 Logout");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sqlx::PgPool;

    async fn service_with_user(pool: &PgPool, username: &str, password: &str) -> AuthService {
        let hash = bcrypt::hash(password, 4).unwrap();
        sqlx::query("INSERT INTO users (username, password, role) VALUES ($1, $2, 'admin')")
            .bind(username)
            .bind(hash)
            .execute(pool)
            .await
            .unwrap();

        AuthService::new(
            UserRepository::new(pool.clone()),
            TokenRepository::new(pool.clone()),
            TokenCodec::new("segredo-de-teste", Duration::hours(1)),
        )
    }

    #[sqlx::test]
    #[ignore]
    async fn login_logout_cycle_revokes_the_token(pool: PgPool) {
        let auth = service_with_user(&pool, "admin", "rahasia").await;

        let token = auth.login_user(" admin ", "rahasia").await.unwrap();
        let claims = auth.authenticate_token(&token).await.unwrap();
        assert_eq!(claims.role, "admin");

        auth.logout(&token).await.unwrap();
        assert!(matches!(auth.authenticate_token(&token).await, Err(AppError::InvalidToken)));

        // Revogar de novo, ou algo que nunca existiu, não é erro
        auth.logout(&token).await.unwrap();
        auth.logout("nunca.existiu.aqui").await.unwrap();
    }

    #[sqlx::test]
    #[ignore]
    async fn sessions_are_independent(pool: PgPool) {
        let auth = service_with_user(&pool, "kasir", "rahasia").await;

        // Dois logins seguidos, no mesmo segundo
        let phone = auth.login_user("kasir", "rahasia").await.unwrap();
        let tablet = auth.login_user("kasir", "rahasia").await.unwrap();
        assert_ne!(phone, tablet);

        auth.logout(&phone).await.unwrap();
        assert!(matches!(auth.authenticate_token(&phone).await, Err(AppError::InvalidToken)));
        assert!(auth.authenticate_token(&tablet).await.is_ok());
    }

    #[sqlx::test]
    #[ignore]
    async fn unknown_user_and_wrong_password_look_the_same(pool: PgPool) {
        let auth = service_with_user(&pool, "admin", "rahasia").await;

        assert!(matches!(auth.login_user("admin", "salah").await, Err(AppError::InvalidCredentials)));
        assert!(matches!(auth.login_user("ghost", "rahasia").await, Err(AppError::InvalidCredentials)));
        assert!(matches!(auth.login_user("  ", "rahasia").await, Err(AppError::BadRequest(_))));
    }
}
