// src/db/token_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::error::AppError;

/// Whitelist de tokens emitidos.
///
/// O JWT sozinho não permite logout; cada token válido também precisa existir
/// aqui com `expires_at` no futuro. Linhas expiradas não são apagadas por
/// nenhum job: a consulta simplesmente as ignora.
#[derive(Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Vários tokens por usuário são permitidos (multi-dispositivo)
    pub async fn store(
        &self,
        user_id: i32,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<i32, AppError> {
        let token_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO tokens (user_id, token, expires_at)
            VALUES ($1, $2, $3)
            RETURNING token_id
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(token_id)
    }

    // Segunda checagem de expiração, independente do `exp` do JWT
    pub async fn is_active(&self, token: &str) -> Result<bool, AppError> {
        let found = sqlx::query_scalar::<_, i32>(
            "SELECT token_id FROM tokens WHERE token = $1 AND expires_at > NOW() LIMIT 1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found.is_some())
    }

    /// Remove o token. Idempotente: revogar algo inexistente não é erro.
    pub async fn revoke(&self, token: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM tokens WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
