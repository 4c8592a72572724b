// src/db/sales_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::sales::{Penjualan, PenjualanDetail},
};

// Repositório da tabela `penjualan`. As escritas recebem o executor
// da transação aberta pelo SalesService.
#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn get_all_details(&self) -> Result<Vec<PenjualanDetail>, AppError> {
        let rows = sqlx::query_as::<_, PenjualanDetail>(
            r#"
            SELECT p.penjualan_id, p.produk_id, pr.nama_produk, p.user_id, u.username,
                   p.nama_pembeli, p.jumlah, p.total_harga, p.tanggal
            FROM penjualan p
            JOIN produk pr ON p.produk_id = pr.produk_id
            JOIN users u ON p.user_id = u.user_id
            ORDER BY p.tanggal DESC, p.penjualan_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_detail(&self, penjualan_id: i32) -> Result<Option<PenjualanDetail>, AppError> {
        let row = sqlx::query_as::<_, PenjualanDetail>(
            r#"
            SELECT p.penjualan_id, p.produk_id, pr.nama_produk, p.user_id, u.username,
                   p.nama_pembeli, p.jumlah, p.total_harga, p.tanggal
            FROM penjualan p
            JOIN produk pr ON p.produk_id = pr.produk_id
            JOIN users u ON p.user_id = u.user_id
            WHERE p.penjualan_id = $1
            "#,
        )
        .bind(penjualan_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    // ---
    // Escrita (transacional)
    // ---

    /// Trava a venda até o fim da transação: dois updates simultâneos da mesma
    /// venda não podem ler o mesmo (produk_id, jumlah) antigo.
    pub async fn find_for_update<'e, E>(
        &self,
        executor: E,
        penjualan_id: i32,
    ) -> Result<Option<Penjualan>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Penjualan>(
            r#"
            SELECT penjualan_id, produk_id, user_id, nama_pembeli, jumlah, total_harga, tanggal
            FROM penjualan
            WHERE penjualan_id = $1
            FOR UPDATE
            "#,
        )
        .bind(penjualan_id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        produk_id: i32,
        user_id: i32,
        nama_pembeli: Option<&str>,
        jumlah: i32,
        total_harga: Decimal,
    ) -> Result<Penjualan, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Penjualan>(
            r#"
            INSERT INTO penjualan (produk_id, user_id, nama_pembeli, jumlah, total_harga, tanggal)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING penjualan_id, produk_id, user_id, nama_pembeli, jumlah, total_harga, tanggal
            "#,
        )
        .bind(produk_id)
        .bind(user_id)
        .bind(nama_pembeli)
        .bind(jumlah)
        .bind(total_harga)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        penjualan_id: i32,
        produk_id: i32,
        nama_pembeli: Option<&str>,
        jumlah: i32,
        total_harga: Decimal,
    ) -> Result<Penjualan, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Penjualan>(
            r#"
            UPDATE penjualan
            SET produk_id = $2, nama_pembeli = $3, jumlah = $4, total_harga = $5
            WHERE penjualan_id = $1
            RETURNING penjualan_id, produk_id, user_id, nama_pembeli, jumlah, total_harga, tanggal
            "#,
        )
        .bind(penjualan_id)
        .bind(produk_id)
        .bind(nama_pembeli)
        .bind(jumlah)
        .bind(total_harga)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::PenjualanNotFound)
    }

    /// Remove e devolve a linha removida (`None` se não existia).
    pub async fn delete<'e, E>(
        &self,
        executor: E,
        penjualan_id: i32,
    ) -> Result<Option<Penjualan>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Penjualan>(
            r#"
            DELETE FROM penjualan
            WHERE penjualan_id = $1
            RETURNING penjualan_id, produk_id, user_id, nama_pembeli, jumlah, total_harga, tanggal
            "#,
        )
        .bind(penjualan_id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }
}
