// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub user_id: i32,
    pub username: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password: String,

    pub role: String,
    pub created_at: DateTime<Utc>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginUserPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username and password are required"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Username and password are required"))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT.
// Os nomes batem com os tokens emitidos pelo backend PHP antigo,
// que só mandava {user_id, role, exp}: `iat` e `jti` são opcionais.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub role: String,

    #[serde(default)]
    pub iat: i64, // Issued At (0 nos tokens antigos)

    pub exp: i64, // Expiration time

    // Único por emissão: dois logins no mesmo segundo não geram o mesmo token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}
