// src/services/sales_service.rs

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{db_utils::with_transaction, error::AppError},
    db::{SalesRepository, StockLedger},
    models::sales::{Penjualan, PenjualanDetail, PenjualanSummary},
};

// ---
// Regras puras (sem banco)
// ---

/// Uma movimentação de estoque a aplicar pelo ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockChange {
    pub produk_id: i32,
    pub delta: i32,
}

/// Calcula o que o ledger precisa fazer ao editar uma venda de
/// `(old_produk_id, old_jumlah)` para `(new_produk_id, new_jumlah)`.
///
/// Mesmo produto: só a diferença (vazio se nada mudou).
/// Produto trocado: devolve tudo ao antigo e depois tira do novo, nessa ordem.
pub fn plan_stock_changes(
    old_produk_id: i32,
    old_jumlah: i32,
    new_produk_id: i32,
    new_jumlah: i32,
) -> Vec<StockChange> {
    if old_produk_id == new_produk_id {
        let delta = old_jumlah - new_jumlah;
        if delta == 0 {
            return Vec::new();
        }
        return vec![StockChange { produk_id: new_produk_id, delta }];
    }

    vec![
        StockChange { produk_id: old_produk_id, delta: old_jumlah },
        StockChange { produk_id: new_produk_id, delta: -new_jumlah },
    ]
}

pub fn sale_total(jumlah: i32, harga: Decimal) -> Decimal {
    Decimal::from(jumlah) * harga
}

pub fn validate_sale_input(produk_id: i32, jumlah: i32) -> Result<(), AppError> {
    if produk_id <= 0 || jumlah <= 0 {
        return Err(AppError::BadRequest(
            "Valid produk_id and jumlah (>0) are required".to_string(),
        ));
    }
    Ok(())
}

// Nome do comprador: trim, e string vazia vira NULL
fn normalize_buyer(nama_pembeli: Option<String>) -> Option<String> {
    nama_pembeli
        .map(|nama| nama.trim().to_string())
        .filter(|nama| !nama.is_empty())
}

/// O que acontece com o estoque quando uma venda é apagada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaleDeletePolicy {
    /// Devolve `jumlah` ao produto na mesma transação.
    #[default]
    RestoreStock,
    /// Histórico imutável: a correção de estoque fica manual.
    KeepStock,
}

impl FromStr for SaleDeletePolicy {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "restore" => Ok(SaleDeletePolicy::RestoreStock),
            "keep" => Ok(SaleDeletePolicy::KeepStock),
            other => Err(anyhow::anyhow!(
                "SALE_DELETE_POLICY inválida: '{}' (use 'restore' ou 'keep')",
                other
            )),
        }
    }
}

// ---
// Sales Transaction Engine
// ---
// Cada operação roda inteira dentro de `with_transaction`:
// estoque e linha de venda são gravados juntos ou nada é gravado.
#[derive(Clone)]
pub struct SalesService {
    pool: PgPool,
    sales_repo: SalesRepository,
    ledger: StockLedger,
    delete_policy: SaleDeletePolicy,
}

impl SalesService {
    pub fn new(
        pool: PgPool,
        sales_repo: SalesRepository,
        ledger: StockLedger,
        delete_policy: SaleDeletePolicy,
    ) -> Self {
        Self { pool, sales_repo, ledger, delete_policy }
    }

    // --- CREATE ---
    pub async fn create_sale(
        &self,
        user_id: i32,
        produk_id: i32,
        nama_pembeli: Option<String>,
        jumlah: i32,
    ) -> Result<Penjualan, AppError> {
        // 1. Valida antes de qualquer leitura de estoque
        validate_sale_input(produk_id, jumlah)?;

        let sales_repo = self.sales_repo.clone();
        let ledger = self.ledger.clone();
        let nama_pembeli = normalize_buyer(nama_pembeli);

        let sale = with_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                // 2. Baixa condicional; devolve também o preço atual
                let entry = ledger.adjust_by(&mut *conn, produk_id, -jumlah).await?;

                // 3. Total capturado no momento da venda
                let total_harga = sale_total(jumlah, entry.harga);

                // 4. Linha da venda, na mesma transação
                sales_repo
                    .insert(&mut *conn, produk_id, user_id, nama_pembeli.as_deref(), jumlah, total_harga)
                    .await
            })
        })
        .await?;

        tracing::info!(
            penjualan_id = sale.penjualan_id,
            produk_id,
            jumlah,
            "🧾 Penjualan criada"
        );
        Ok(sale)
    }

    // --- UPDATE ---
    pub async fn update_sale(
        &self,
        penjualan_id: i32,
        produk_id: i32,
        nama_pembeli: Option<String>,
        jumlah: i32,
    ) -> Result<PenjualanSummary, AppError> {
        if penjualan_id <= 0 {
            return Err(AppError::BadRequest("Valid IDs and jumlah (>0) are required".to_string()));
        }
        validate_sale_input(produk_id, jumlah)?;

        let sales_repo = self.sales_repo.clone();
        let ledger = self.ledger.clone();
        let nama_pembeli = normalize_buyer(nama_pembeli);

        let updated = with_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                // 1. Venda antiga, travada
                let previous = sales_repo
                    .find_for_update(&mut *conn, penjualan_id)
                    .await?
                    .ok_or(AppError::PenjualanNotFound)?;

                // 2. Produto alvo, travado (preço e existência)
                let target = ledger
                    .lock(&mut *conn, produk_id)
                    .await?
                    .ok_or(AppError::ProdukNotFound)?;

                // 3. Reconciliação de estoque
                let changes = plan_stock_changes(previous.produk_id, previous.jumlah, produk_id, jumlah);
                for change in changes {
                    ledger.adjust_by(&mut *conn, change.produk_id, change.delta).await?;
                }

                // 4. Reprecificado pelo preço ATUAL do produto alvo
                let total_harga = sale_total(jumlah, target.harga);

                // 5. Grava a linha
                sales_repo
                    .update(&mut *conn, penjualan_id, produk_id, nama_pembeli.as_deref(), jumlah, total_harga)
                    .await
            })
        })
        .await?;

        tracing::info!(penjualan_id, produk_id, jumlah, "✏️ Penjualan atualizada");

        Ok(PenjualanSummary {
            penjualan_id: updated.penjualan_id,
            produk_id: updated.produk_id,
            jumlah: updated.jumlah,
            total_harga: updated.total_harga,
        })
    }

    // --- DELETE ---
    pub async fn delete_sale(&self, penjualan_id: i32) -> Result<Penjualan, AppError> {
        let sales_repo = self.sales_repo.clone();
        let ledger = self.ledger.clone();
        let policy = self.delete_policy;

        let removed = with_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                let removed = sales_repo
                    .delete(&mut *conn, penjualan_id)
                    .await?
                    .ok_or(AppError::PenjualanNotFound)?;

                if policy == SaleDeletePolicy::RestoreStock {
                    ledger.adjust_by(&mut *conn, removed.produk_id, removed.jumlah).await?;
                }

                Ok(removed)
            })
        })
        .await?;

        tracing::info!(penjualan_id, ?policy, "🗑️ Penjualan removida");
        Ok(removed)
    }

    // --- LEITURA ---
    pub async fn get_all_sales(&self) -> Result<Vec<PenjualanDetail>, AppError> {
        self.sales_repo.get_all_details().await
    }

    pub async fn get_sale(&self, penjualan_id: i32) -> Result<PenjualanDetail, AppError> {
        self.sales_repo
            .find_detail(penjualan_id)
            .await?
            .ok_or(AppError::PenjualanNotFound)
    }
}
