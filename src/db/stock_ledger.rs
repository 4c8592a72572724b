// src/db/stock_ledger.rs

use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection};

use crate::common::error::AppError;

/// Estado de um produto logo após passar pelo ledger.
#[derive(Debug, Clone, Copy, PartialEq, FromRow)]
pub struct LedgerEntry {
    pub produk_id: i32,
    pub stok: i32,
    pub harga: Decimal,
}

/// A mesma regra do UPDATE condicional, em memória: `None` se o estoque
/// ficaria negativo (ou estouraria o i32).
pub fn checked_stock(current: i32, delta: i32) -> Option<i32> {
    current.checked_add(delta).filter(|stok| *stok >= 0)
}

// ---
// Stock Ledger: único caminho pelo qual `produk.stok` muda
// ---
// Vendas e administração de produto passam por `adjust_by`.
// Sempre recebe a conexão de uma transação aberta pelo chamador.
#[derive(Clone, Default)]
pub struct StockLedger;

impl StockLedger {
    pub fn new() -> Self {
        Self
    }

    /// Soma `delta` ao estoque numa única instrução condicional.
    ///
    /// Não existe janela entre ler e escrever: dois caixas vendendo o mesmo
    /// produto serializam no lock de linha do UPDATE e o segundo só passa
    /// se ainda houver saldo.
    pub async fn adjust_by(
        &self,
        conn: &mut PgConnection,
        produk_id: i32,
        delta: i32,
    ) -> Result<LedgerEntry, AppError> {
        let updated = sqlx::query_as::<_, LedgerEntry>(
            r#"
            UPDATE produk
            SET stok = stok + $2, updated_at = NOW()
            WHERE produk_id = $1 AND stok + $2 >= 0
            RETURNING produk_id, stok, harga
            "#,
        )
        .bind(produk_id)
        .bind(delta)
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(entry) = updated {
            tracing::info!(produk_id, delta, stok = entry.stok, "📦 Estoque ajustado");
            return Ok(entry);
        }

        // Nenhuma linha: ou o produto não existe, ou faltou saldo
        let exists = sqlx::query_scalar::<_, i32>("SELECT produk_id FROM produk WHERE produk_id = $1")
            .bind(produk_id)
            .fetch_optional(&mut *conn)
            .await?;

        match exists {
            Some(_) => Err(AppError::InsufficientStock(produk_id)),
            None => Err(AppError::ProdukNotFound),
        }
    }

    /// Trava a linha do produto até o fim da transação e devolve estoque e preço.
    pub async fn lock(
        &self,
        conn: &mut PgConnection,
        produk_id: i32,
    ) -> Result<Option<LedgerEntry>, AppError> {
        let entry = sqlx::query_as::<_, LedgerEntry>(
            "SELECT produk_id, stok, harga FROM produk WHERE produk_id = $1 FOR UPDATE",
        )
        .bind(produk_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(entry)
    }

    /// Correção absoluta (tela de estoque do app). Vira um delta e passa por `adjust_by`.
    pub async fn set_level(
        &self,
        conn: &mut PgConnection,
        produk_id: i32,
        target: i32,
    ) -> Result<LedgerEntry, AppError> {
        if target < 0 {
            return Err(AppError::BadRequest("Valid stok (>=0) is required".to_string()));
        }

        let current = self
            .lock(&mut *conn, produk_id)
            .await?
            .ok_or(AppError::ProdukNotFound)?;

        let delta = target
            .checked_sub(current.stok)
            .ok_or_else(|| AppError::BadRequest("Valid stok (>=0) is required".to_string()))?;

        self.adjust_by(conn, produk_id, delta).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn checked_stock_allows_exact_depletion() {
        assert_eq!(checked_stock(7, -7), Some(0));
        assert_eq!(checked_stock(7, 3), Some(10));
    }

    #[test]
    fn checked_stock_refuses_negative_and_overflow() {
        assert_eq!(checked_stock(7, -8), None);
        assert_eq!(checked_stock(i32::MAX, 1), None);
    }

    proptest! {
        #[test]
        fn checked_stock_never_goes_negative(current in 0..10_000i32, delta in -20_000..20_000i32) {
            match checked_stock(current, delta) {
                Some(stok) => {
                    prop_assert!(stok >= 0);
                    prop_assert_eq!(stok, current + delta);
                }
                None => prop_assert!(current + delta < 0),
            }
        }
    }
}
