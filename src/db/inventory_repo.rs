// src/db/inventory_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::inventory::{Merk, Produk, ProdukDetail},
};

#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Merk
    // ---

    pub async fn create_merk(&self, nama_merk: &str) -> Result<Merk, AppError> {
        let merk = sqlx::query_as::<_, Merk>(
            "INSERT INTO merk (nama_merk) VALUES ($1) RETURNING merk_id, nama_merk",
        )
        .bind(nama_merk)
        .fetch_one(&self.pool)
        .await?;
        Ok(merk)
    }

    pub async fn get_all_merk(&self) -> Result<Vec<Merk>, AppError> {
        let merk = sqlx::query_as::<_, Merk>(
            "SELECT merk_id, nama_merk FROM merk ORDER BY nama_merk ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(merk)
    }

    pub async fn update_merk(&self, merk_id: i32, nama_merk: &str) -> Result<Option<Merk>, AppError> {
        let merk = sqlx::query_as::<_, Merk>(
            "UPDATE merk SET nama_merk = $2 WHERE merk_id = $1 RETURNING merk_id, nama_merk",
        )
        .bind(merk_id)
        .bind(nama_merk)
        .fetch_optional(&self.pool)
        .await?;
        Ok(merk)
    }

    /// `false` se a merk não existia.
    pub async fn delete_merk(&self, merk_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM merk WHERE merk_id = $1")
            .bind(merk_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::MerkInUse;
                    }
                }
                e.into()
            })?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Produk
    // ---

    pub async fn create_produk(
        &self,
        merk_id: i32,
        nama_produk: &str,
        deskripsi: Option<&str>,
        harga: Decimal,
        stok: i32,
    ) -> Result<Produk, AppError> {
        sqlx::query_as::<_, Produk>(
            r#"
            INSERT INTO produk (merk_id, nama_produk, deskripsi, harga, stok)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING produk_id, merk_id, nama_produk, deskripsi, harga, stok
            "#,
        )
        .bind(merk_id)
        .bind(nama_produk)
        .bind(deskripsi)
        .bind(harga)
        .bind(stok)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return AppError::MerkNotFound;
                }
            }
            e.into()
        })
    }

    pub async fn get_all_produk(&self) -> Result<Vec<ProdukDetail>, AppError> {
        let produk = sqlx::query_as::<_, ProdukDetail>(
            r#"
            SELECT p.produk_id, p.nama_produk, p.deskripsi, p.stok, p.harga, p.merk_id, m.nama_merk
            FROM produk p
            JOIN merk m ON p.merk_id = m.merk_id
            ORDER BY p.produk_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(produk)
    }

    pub async fn find_produk_detail<'e, E>(
        &self,
        executor: E,
        produk_id: i32,
    ) -> Result<Option<ProdukDetail>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let produk = sqlx::query_as::<_, ProdukDetail>(
            r#"
            SELECT p.produk_id, p.nama_produk, p.deskripsi, p.stok, p.harga, p.merk_id, m.nama_merk
            FROM produk p
            JOIN merk m ON p.merk_id = m.merk_id
            WHERE p.produk_id = $1
            "#,
        )
        .bind(produk_id)
        .fetch_optional(executor)
        .await?;
        Ok(produk)
    }

    /// Atualiza só os campos informados (COALESCE mantém o resto).
    /// O `stok` NÃO passa por aqui: ele é responsabilidade do StockLedger.
    pub async fn update_produk_fields<'e, E>(
        &self,
        executor: E,
        produk_id: i32,
        nama_produk: Option<&str>,
        deskripsi: Option<&str>,
        harga: Option<Decimal>,
        merk_id: Option<i32>,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE produk
            SET nama_produk = COALESCE($2, nama_produk),
                deskripsi   = COALESCE($3, deskripsi),
                harga       = COALESCE($4, harga),
                merk_id     = COALESCE($5, merk_id),
                updated_at  = NOW()
            WHERE produk_id = $1
            "#,
        )
        .bind(produk_id)
        .bind(nama_produk)
        .bind(deskripsi)
        .bind(harga)
        .bind(merk_id)
        .execute(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return AppError::MerkNotFound;
                }
            }
            e.into()
        })?;
        Ok(result.rows_affected() > 0)
    }

    /// `false` se o produto não existia.
    pub async fn delete_produk(&self, produk_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM produk WHERE produk_id = $1")
            .bind(produk_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::ProdukInUse;
                    }
                }
                e.into()
            })?;
        Ok(result.rows_affected() > 0)
    }
}
