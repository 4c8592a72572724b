// src/models/inventory.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

// --- 1. Merk (marca) ---
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Merk {
    pub merk_id: i32,
    pub nama_merk: String,
}

// --- 2. Produk ---
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Produk {
    pub produk_id: i32,
    pub merk_id: i32,
    pub nama_produk: String,
    pub deskripsi: Option<String>,
    pub harga: Decimal, // Preço unitário, NUMERIC(14,2)
    pub stok: i32,
}

// Produk com o nome da merk (JOIN), usado em read/detail
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProdukDetail {
    pub produk_id: i32,
    pub nama_produk: String,
    pub deskripsi: Option<String>,
    pub stok: i32,
    pub harga: Decimal,
    pub merk_id: i32,
    pub nama_merk: String,
}

// Resposta do endpoint de estoque
#[derive(Debug, Clone, Serialize)]
pub struct StockLevel {
    pub produk_id: i32,
    pub stok_baru: i32,
}
