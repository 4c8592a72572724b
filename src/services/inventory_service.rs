// src/services/inventory_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{db_utils::with_transaction, error::AppError},
    db::{InventoryRepository, StockLedger},
    models::inventory::{Merk, Produk, ProdukDetail, StockLevel},
};

/// Campos opcionais de uma edição de produto. `None` = manter.
#[derive(Debug, Clone, Default)]
pub struct ProdukChanges {
    pub nama_produk: Option<String>,
    pub deskripsi: Option<String>,
    pub stok: Option<i32>,
    pub harga: Option<Decimal>,
    pub merk_id: Option<i32>,
}

impl ProdukChanges {
    pub fn is_empty(&self) -> bool {
        self.nama_produk.is_none()
            && self.deskripsi.is_none()
            && self.stok.is_none()
            && self.harga.is_none()
            && self.merk_id.is_none()
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.is_empty() {
            return Err(AppError::BadRequest("No valid fields to update".to_string()));
        }
        if matches!(&self.nama_produk, Some(nama) if nama.trim().is_empty()) {
            return Err(AppError::BadRequest("nama_produk cannot be empty".to_string()));
        }
        if matches!(self.stok, Some(stok) if stok < 0) {
            return Err(AppError::BadRequest("Valid stok (>=0) is required".to_string()));
        }
        if matches!(self.harga, Some(harga) if harga <= Decimal::ZERO) {
            return Err(AppError::BadRequest("Valid harga (>0) is required".to_string()));
        }
        if matches!(self.merk_id, Some(merk_id) if merk_id <= 0) {
            return Err(AppError::BadRequest("Valid merk_id is required".to_string()));
        }
        Ok(())
    }
}

/// Como o endpoint de estoque quer mexer no saldo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAdjustment {
    /// Valor absoluto (tela de estoque do app).
    SetLevel(i32),
    /// Soma/subtrai do saldo atual.
    Delta(i32),
}

#[derive(Clone)]
pub struct InventoryService {
    pool: PgPool,
    inventory_repo: InventoryRepository,
    ledger: StockLedger,
}

impl InventoryService {
    pub fn new(pool: PgPool, inventory_repo: InventoryRepository, ledger: StockLedger) -> Self {
        Self { pool, inventory_repo, ledger }
    }

    // ---
    // Merk
    // ---

    pub async fn create_merk(&self, nama_merk: &str) -> Result<Merk, AppError> {
        let nama_merk = nama_merk.trim();
        if nama_merk.is_empty() {
            return Err(AppError::BadRequest("Nama merk is required".to_string()));
        }

        let merk = self.inventory_repo.create_merk(nama_merk).await?;
        tracing::info!(merk_id = merk.merk_id, "🏷️ Merk criada");
        Ok(merk)
    }

    pub async fn get_all_merk(&self) -> Result<Vec<Merk>, AppError> {
        self.inventory_repo.get_all_merk().await
    }

    pub async fn update_merk(&self, merk_id: i32, nama_merk: &str) -> Result<Merk, AppError> {
        let nama_merk = nama_merk.trim();
        if merk_id <= 0 || nama_merk.is_empty() {
            return Err(AppError::BadRequest("Valid merk_id and nama_merk are required".to_string()));
        }

        self.inventory_repo
            .update_merk(merk_id, nama_merk)
            .await?
            .ok_or(AppError::MerkNotFound)
    }

    pub async fn delete_merk(&self, merk_id: i32) -> Result<(), AppError> {
        if !self.inventory_repo.delete_merk(merk_id).await? {
            return Err(AppError::MerkNotFound);
        }
        tracing::info!(merk_id, "🗑️ Merk removida");
        Ok(())
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
        let nama_produk = nama_produk.trim();
        if nama_produk.is_empty() || stok < 0 || harga <= Decimal::ZERO || merk_id <= 0 {
            return Err(AppError::BadRequest(
                "Valid nama_produk, stok (>=0), harga (>0), and merk_id are required".to_string(),
            ));
        }

        let produk = self
            .inventory_repo
            .create_produk(merk_id, nama_produk, deskripsi, harga, stok)
            .await?;

        tracing::info!(produk_id = produk.produk_id, stok, "🚲 Produk criado");
        Ok(produk)
    }

    pub async fn get_all_produk(&self) -> Result<Vec<ProdukDetail>, AppError> {
        self.inventory_repo.get_all_produk().await
    }

    pub async fn get_produk(&self, produk_id: i32) -> Result<ProdukDetail, AppError> {
        self.inventory_repo
            .find_produk_detail(&self.pool, produk_id)
            .await?
            .ok_or(AppError::ProdukNotFound)
    }

    /// Edição parcial. Os campos cadastrais e o estoque mudam na mesma
    /// transação; o estoque passa pelo ledger como qualquer venda.
    pub async fn update_produk(
        &self,
        produk_id: i32,
        changes: ProdukChanges,
    ) -> Result<ProdukDetail, AppError> {
        if produk_id <= 0 {
            return Err(AppError::BadRequest("Valid produk_id is required".to_string()));
        }
        changes.validate()?;

        let repo = self.inventory_repo.clone();
        let ledger = self.ledger.clone();

        with_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                // 1. Cadastro (COALESCE mantém o que não veio)
                let exists = repo
                    .update_produk_fields(
                        &mut *conn,
                        produk_id,
                        changes.nama_produk.as_deref().map(str::trim),
                        changes.deskripsi.as_deref(),
                        changes.harga,
                        changes.merk_id,
                    )
                    .await?;
                if !exists {
                    return Err(AppError::ProdukNotFound);
                }

                // 2. Estoque absoluto -> delta no ledger
                if let Some(stok) = changes.stok {
                    ledger.set_level(&mut *conn, produk_id, stok).await?;
                }

                // 3. Estado final, lido dentro da transação
                repo.find_produk_detail(&mut *conn, produk_id)
                    .await?
                    .ok_or(AppError::ProdukNotFound)
            })
        })
        .await
    }

    pub async fn delete_produk(&self, produk_id: i32) -> Result<(), AppError> {
        if !self.inventory_repo.delete_produk(produk_id).await? {
            return Err(AppError::ProdukNotFound);
        }
        tracing::info!(produk_id, "🗑️ Produk removido");
        Ok(())
    }

    // ---
    // Estoque
    // ---

    pub async fn adjust_stock(
        &self,
        produk_id: i32,
        adjustment: StockAdjustment,
    ) -> Result<StockLevel, AppError> {
        if produk_id <= 0 {
            return Err(AppError::BadRequest("Valid produk_id is required".to_string()));
        }

        let ledger = self.ledger.clone();

        let entry = with_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                match adjustment {
                    StockAdjustment::SetLevel(stok) => ledger.set_level(&mut *conn, produk_id, stok).await,
                    StockAdjustment::Delta(delta) => ledger.adjust_by(&mut *conn, produk_id, delta).await,
                }
            })
        })
        .await?;

        Ok(StockLevel { produk_id: entry.produk_id, stok_baru: entry.stok })
    }
}
