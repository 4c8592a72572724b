// src/handlers/auth.rs

use axum::extract::State;

use crate::{
    common::{error::AppError, extract::JsonBody, response::ApiResponse},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, LoginUserPayload},
};

// Handler de login (público)
pub async fn login(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<LoginUserPayload>,
) -> Result<ApiResponse<AuthResponse>, AppError> {
    let token = app_state
        .auth_service
        .login_user(&payload.username, &payload.password)
        .await?;

    Ok(ApiResponse::success("Login successful", AuthResponse { token }))
}

// Handler de logout: revoga exatamente o token que autenticou esta requisição
pub async fn logout(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<ApiResponse<()>, AppError> {
    tracing::debug!(user_id = user.user_id, role = %user.role, "Logout solicitado");
    app_state.auth_service.logout(&user.token).await?;
    Ok(ApiResponse::empty("Logout successful"))
}
