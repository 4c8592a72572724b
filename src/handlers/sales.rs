// src/handlers/sales.rs

use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::{IdParam, JsonBody},
        response::ApiResponse,
    },
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::sales::{Penjualan, PenjualanDetail, PenjualanSummary},
};

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePenjualanPayload {
    #[validate(range(min = 1, message = "Valid produk_id and jumlah (>0) are required"))]
    pub produk_id: i32,

    pub nama_pembeli: Option<String>,

    #[validate(range(min = 1, message = "Valid produk_id and jumlah (>0) are required"))]
    pub jumlah: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePenjualanPayload {
    #[validate(range(min = 1, message = "Valid IDs and jumlah (>0) are required"))]
    pub penjualan_id: i32,

    #[validate(range(min = 1, message = "Valid IDs and jumlah (>0) are required"))]
    pub produk_id: i32,

    pub nama_pembeli: Option<String>,

    #[validate(range(min = 1, message = "Valid IDs and jumlah (>0) are required"))]
    pub jumlah: i32,
}

// ---
// Handlers
// ---

// O kasir da venda é sempre quem está autenticado, nunca o corpo da requisição
pub async fn create_penjualan(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(payload): JsonBody<CreatePenjualanPayload>,
) -> Result<(StatusCode, ApiResponse<Penjualan>), AppError> {
    let sale = app_state
        .sales_service
        .create_sale(user.user_id, payload.produk_id, payload.nama_pembeli, payload.jumlah)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success("Penjualan created successfully", sale)))
}

pub async fn update_penjualan(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<UpdatePenjualanPayload>,
) -> Result<ApiResponse<PenjualanSummary>, AppError> {
    let summary = app_state
        .sales_service
        .update_sale(
            payload.penjualan_id,
            payload.produk_id,
            payload.nama_pembeli,
            payload.jumlah,
        )
        .await?;

    Ok(ApiResponse::success(
        "Penjualan updated and stock synchronized successfully",
        summary,
    ))
}

pub async fn delete_penjualan(
    State(app_state): State<AppState>,
    IdParam(penjualan_id): IdParam,
) -> Result<ApiResponse<()>, AppError> {
    app_state.sales_service.delete_sale(penjualan_id).await?;
    Ok(ApiResponse::empty("Catatan penjualan berhasil dihapus"))
}

pub async fn get_all_penjualan(
    State(app_state): State<AppState>,
) -> Result<ApiResponse<Vec<PenjualanDetail>>, AppError> {
    let sales = app_state.sales_service.get_all_sales().await?;
    Ok(ApiResponse::success("Penjualan retrieved successfully", sales))
}

pub async fn get_penjualan_detail(
    State(app_state): State<AppState>,
    IdParam(penjualan_id): IdParam,
) -> Result<ApiResponse<PenjualanDetail>, AppError> {
    let sale = app_state.sales_service.get_sale(penjualan_id).await?;
    Ok(ApiResponse::success("Penjualan detail retrieved successfully", sale))
}
