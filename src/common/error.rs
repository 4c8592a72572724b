// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::common::response::ApiResponse;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Toda falha vira o envelope {status: "error", message, data: null}.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Corpo ausente, JSON malformado, query inválida
    #[error("{0}")]
    BadRequest(String),

    // --- Autenticação ---
    #[error("Authorization header missing")]
    MissingAuthHeader,

    #[error("Invalid authorization format")]
    InvalidAuthFormat,

    // Assinatura, expiração e whitelist colapsam aqui (sem oráculo)
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // --- Não encontrados ---
    #[error("Merk not found")]
    MerkNotFound,

    #[error("Produk not found")]
    ProdukNotFound,

    #[error("Penjualan not found")]
    PenjualanNotFound,

    // --- Regras de negócio ---
    #[error("Insufficient stock for produk {0}")]
    InsufficientStock(i32),

    #[error("Merk masih digunakan oleh produk")]
    MerkInUse,

    #[error("Produk masih memiliki penjualan")]
    ProdukInUse,

    // --- Roteamento ---
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Endpoint not found")]
    RouteNotFound,

    #[error("Request timeout")]
    RequestTimeout,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::BadRequest(_)
            | AppError::InsufficientStock(_)
            | AppError::MerkInUse
            | AppError::ProdukInUse => StatusCode::BAD_REQUEST,

            AppError::MissingAuthHeader
            | AppError::InvalidAuthFormat
            | AppError::InvalidToken
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,

            AppError::MerkNotFound
            | AppError::ProdukNotFound
            | AppError::PenjualanNotFound
            | AppError::RouteNotFound => StatusCode::NOT_FOUND,

            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,

            AppError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,

            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Mensagem segura para o cliente.
    pub fn client_message(&self) -> String {
        match self {
            // Devolve a primeira mensagem de campo, ex.: "Valid jumlah (>0) is required"
            AppError::ValidationError(errors) => {
                let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
                fields.sort_by(|a, b| a.0.cmp(&b.0));
                fields
                    .iter()
                    .flat_map(|(_, errs)| errs.iter())
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "Invalid input".to_string())
            }
            e if e.status_code() == StatusCode::INTERNAL_SERVER_ERROR => {
                "Internal server error".to_string()
            }
            e => e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // O `tracing` loga o detalhe; o cliente só vê a mensagem genérica.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        (status, ApiResponse::<()>::error(self.client_message())).into_response()
    }
}
