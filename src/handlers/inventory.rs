// src/handlers/inventory.rs

use axum::{extract::State, http::StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::{
    common::{
        error::AppError,
        extract::{IdParam, JsonBody},
        response::ApiResponse,
    },
    config::AppState,
    models::inventory::{Merk, Produk, ProdukDetail, StockLevel},
    services::inventory_service::{ProdukChanges, StockAdjustment},
};

// ---
// Validação customizada
// ---
fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("Valid nama_produk, stok (>=0), harga (>0), and merk_id are required".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payloads: Merk
// ---
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMerkPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "Nama merk is required"))]
    pub nama_merk: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMerkPayload {
    #[validate(range(min = 1, message = "Valid merk_id and nama_merk are required"))]
    pub merk_id: i32,

    #[serde(default)]
    #[validate(length(min = 1, message = "Valid merk_id and nama_merk are required"))]
    pub nama_merk: String,
}

// ---
// Payloads: Produk
// ---
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProdukPayload {
    #[validate(range(min = 1, message = "Valid nama_produk, stok (>=0), harga (>0), and merk_id are required"))]
    pub merk_id: i32,

    #[validate(length(min = 1, message = "Valid nama_produk, stok (>=0), harga (>0), and merk_id are required"))]
    pub nama_produk: String,

    pub deskripsi: Option<String>,

    #[validate(custom(function = "validate_positive"))]
    pub harga: Decimal,

    #[validate(range(min = 0, message = "Valid nama_produk, stok (>=0), harga (>0), and merk_id are required"))]
    pub stok: i32,
}

// O app manda o modelo inteiro; só o que vier preenchido é aplicado
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProdukPayload {
    #[validate(range(min = 1, message = "Valid produk_id is required"))]
    pub produk_id: i32,
    pub nama_produk: Option<String>,
    pub deskripsi: Option<String>,
    pub stok: Option<i32>,
    pub harga: Option<Decimal>,
    pub merk_id: Option<i32>,
}

impl From<UpdateProdukPayload> for ProdukChanges {
    fn from(payload: UpdateProdukPayload) -> Self {
        ProdukChanges {
            nama_produk: payload.nama_produk,
            deskripsi: payload.deskripsi,
            stok: payload.stok,
            harga: payload.harga,
            merk_id: payload.merk_id,
        }
    }
}

// `stok` = valor absoluto (app Android), `jumlah` = delta (cliente antigo)
#[derive(Debug, Deserialize, Validate)]
pub struct StockPayload {
    #[validate(range(min = 1, message = "Valid produk_id is required"))]
    pub produk_id: i32,
    pub stok: Option<i32>,
    pub jumlah: Option<i32>,
}

impl StockPayload {
    pub fn adjustment(&self) -> Result<StockAdjustment, AppError> {
        match (self.stok, self.jumlah) {
            (Some(stok), None) => Ok(StockAdjustment::SetLevel(stok)),
            (None, Some(jumlah)) => Ok(StockAdjustment::Delta(jumlah)),
            _ => Err(AppError::BadRequest(
                "Provide either stok (absolute) or jumlah (delta)".to_string(),
            )),
        }
    }
}

// ---
// Handlers: Merk
// ---
pub async fn get_all_merk(
    State(app_state): State<AppState>,
) -> Result<ApiResponse<Vec<Merk>>, AppError> {
    let merk = app_state.inventory_service.get_all_merk().await?;
    Ok(ApiResponse::success("Merk retrieved successfully", merk))
}

pub async fn create_merk(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<CreateMerkPayload>,
) -> Result<(StatusCode, ApiResponse<Merk>), AppError> {
    let merk = app_state.inventory_service.create_merk(&payload.nama_merk).await?;
    Ok((StatusCode::CREATED, ApiResponse::success("Merk created successfully", merk)))
}

pub async fn update_merk(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<UpdateMerkPayload>,
) -> Result<ApiResponse<Merk>, AppError> {
    let merk = app_state
        .inventory_service
        .update_merk(payload.merk_id, &payload.nama_merk)
        .await?;
    Ok(ApiResponse::success("Merk updated successfully", merk))
}

pub async fn delete_merk(
    State(app_state): State<AppState>,
    IdParam(merk_id): IdParam,
) -> Result<ApiResponse<()>, AppError> {
    app_state.inventory_service.delete_merk(merk_id).await?;
    Ok(ApiResponse::empty("Merk berhasil dihapus"))
}

// ---
// Handlers: Produk
// ---
pub async fn get_all_produk(
    State(app_state): State<AppState>,
) -> Result<ApiResponse<Vec<ProdukDetail>>, AppError> {
    let produk = app_state.inventory_service.get_all_produk().await?;
    Ok(ApiResponse::success("Produk retrieved successfully", produk))
}

pub async fn get_produk_detail(
    State(app_state): State<AppState>,
    IdParam(produk_id): IdParam,
) -> Result<ApiResponse<ProdukDetail>, AppError> {
    let produk = app_state.inventory_service.get_produk(produk_id).await?;
    Ok(ApiResponse::success("Produk detail retrieved successfully", produk))
}

pub async fn create_produk(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<CreateProdukPayload>,
) -> Result<(StatusCode, ApiResponse<Produk>), AppError> {
    let produk = app_state
        .inventory_service
        .create_produk(
            payload.merk_id,
            &payload.nama_produk,
            payload.deskripsi.as_deref(),
            payload.harga,
            payload.stok,
        )
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::success("Produk created successfully", produk)))
}

pub async fn update_produk(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<UpdateProdukPayload>,
) -> Result<ApiResponse<ProdukDetail>, AppError> {
    let produk_id = payload.produk_id;
    let produk = app_state
        .inventory_service
        .update_produk(produk_id, payload.into())
        .await?;
    Ok(ApiResponse::success("Produk updated successfully", produk))
}

pub async fn delete_produk(
    State(app_state): State<AppState>,
    IdParam(produk_id): IdParam,
) -> Result<ApiResponse<()>, AppError> {
    app_state.inventory_service.delete_produk(produk_id).await?;
    Ok(ApiResponse::empty("Produk berhasil dihapus"))
}

pub async fn adjust_stock(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<StockPayload>,
) -> Result<ApiResponse<StockLevel>, AppError> {
    let adjustment = payload.adjustment()?;
    let level = app_state
        .inventory_service
        .adjust_stock(payload.produk_id, adjustment)
        .await?;
    Ok(ApiResponse::success("Stock adjusted successfully", level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stock(body: serde_json::Value) -> StockPayload {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn stock_payload_needs_exactly_one_mode() {
        assert_eq!(
            stock(json!({"produk_id": 1, "stok": 4})).adjustment().unwrap(),
            StockAdjustment::SetLevel(4)
        );
        assert_eq!(
            stock(json!({"produk_id": 1, "jumlah": -2})).adjustment().unwrap(),
            StockAdjustment::Delta(-2)
        );
        assert!(stock(json!({"produk_id": 1})).adjustment().is_err());
        assert!(stock(json!({"produk_id": 1, "stok": 4, "jumlah": 1})).adjustment().is_err());
    }

    #[test]
    fn create_produk_rejects_non_positive_price() {
        let payload: CreateProdukPayload = serde_json::from_value(json!({
            "merk_id": 1, "nama_produk": "Xtrada 5", "harga": 0, "stok": 3
        }))
        .unwrap();
        assert!(payload.validate().is_err());

        let payload: CreateProdukPayload = serde_json::from_value(json!({
            "merk_id": 1, "nama_produk": "Xtrada 5", "harga": 2500000, "stok": 0
        }))
        .unwrap();
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn update_payload_ignores_extra_fields_from_the_app() {
        let payload: UpdateProdukPayload = serde_json::from_value(json!({
            "produk_id": 3, "merk_id": 1, "nama_merk": "Polygon", "nama_produk": "Siskiu",
            "harga": 100, "stok": 2, "created_at": "2024-01-01"
        }))
        .unwrap();
        assert!(payload.validate().is_ok());

        let changes: ProdukChanges = payload.into();
        assert_eq!(changes.stok, Some(2));
        assert_eq!(changes.nama_produk.as_deref(), Some("Siskiu"));
        assert!(changes.deskripsi.is_none());
    }
}
