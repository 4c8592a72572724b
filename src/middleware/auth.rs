// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{common::error::AppError, config::AppState};

// Identidade autenticada, disponível para os handlers protegidos.
// O token bruto vai junto porque o logout precisa revogá-lo.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub role: String,
    pub token: String,
}

/// Extrai o token de `Bearer <token>`. O esquema é case-insensitive e
/// aceita qualquer quantidade de espaço antes do token.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, AppError> {
    let header = header.ok_or(AppError::MissingAuthHeader)?.trim_start();

    let scheme = header.get(..6).ok_or(AppError::InvalidAuthFormat)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::InvalidAuthFormat);
    }

    let rest = &header[6..];
    if !rest.starts_with(char::is_whitespace) {
        return Err(AppError::InvalidAuthFormat);
    }

    let token = rest.trim();
    if token.is_empty() {
        return Err(AppError::InvalidAuthFormat);
    }
    Ok(token)
}

// O middleware em si: nenhuma linha do handler roda se falhar.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| AppError::InvalidAuthFormat))
        .transpose()?;

    let token = parse_bearer(header)?.to_string();
    let claims = app_state.auth_service.authenticate_token(&token).await?;

    // Insere o usuário nos "extensions" da requisição
    request.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.user_id,
        role: claims.role,
        token,
    });

    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bearer_in_any_case_with_extra_spaces() {
        assert_eq!(parse_bearer(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(parse_bearer(Some("bearer abc")).unwrap(), "abc");
        assert_eq!(parse_bearer(Some("BEARER    abc  ")).unwrap(), "abc");
        assert_eq!(parse_bearer(Some("Bearer\tabc")).unwrap(), "abc");
    }

    #[test]
    fn missing_header_is_distinguished_from_bad_format() {
        assert!(matches!(parse_bearer(None), Err(AppError::MissingAuthHeader)));

        for raw in ["Basic dXNlcjpwYXNz", "Bearer", "Bearer   ", "Bearerabc", "", "Béarer x"] {
            assert!(
                matches!(parse_bearer(Some(raw)), Err(AppError::InvalidAuthFormat)),
                "{raw:?}"
            );
        }
    }
}
