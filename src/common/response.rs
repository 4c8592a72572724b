// src/common/response.rs

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

// O envelope que o app Android espera em toda resposta.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self { status: "success", message: message.into(), data: Some(data) }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { status: "error", message: message.into(), data: None }
    }
}

impl ApiResponse<()> {
    // Sucesso sem payload (logout, delete): `data: null`
    pub fn empty(message: impl Into<String>) -> Self {
        Self { status: "success", message: message.into(), data: None }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
