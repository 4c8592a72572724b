// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

// A linha da tabela `penjualan`
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Penjualan {
    pub penjualan_id: i32,
    pub produk_id: i32,
    pub user_id: i32, // Kasir que registrou
    pub nama_pembeli: Option<String>,
    pub jumlah: i32,
    pub total_harga: Decimal, // jumlah * harga no momento da escrita
    pub tanggal: DateTime<Utc>,
}

// Penjualan + nome do produto + username do kasir (read/detail)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PenjualanDetail {
    pub penjualan_id: i32,
    pub produk_id: i32,
    pub nama_produk: String,
    pub user_id: i32,
    pub username: String,
    pub nama_pembeli: Option<String>,
    pub jumlah: i32,
    pub total_harga: Decimal,
    pub tanggal: DateTime<Utc>,
}

// Resposta do update
#[derive(Debug, Clone, Serialize)]
pub struct PenjualanSummary {
    pub penjualan_id: i32,
    pub produk_id: i32,
    pub jumlah: i32,
    pub total_harga: Decimal,
}
