// src/common/db_utils.rs

use futures_util::future::BoxFuture;
use sqlx::{PgConnection, PgPool};

use crate::common::error::AppError;

// ---
// Helper de Transação: "roda este bloco; commit no Ok, rollback no Err"
// ---
/// Executa `work` dentro de uma única transação.
///
/// O closure recebe a conexão da transação e devolve um future boxeado.
/// Qualquer `Err` desfaz tudo; se o future for abortado (timeout, cancelamento),
/// o `Drop` da `Transaction` do sqlx faz o rollback.
pub async fn with_transaction<T, F>(pool: &PgPool, work: F) -> Result<T, AppError>
where
    T: Send,
    F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, AppError>> + Send,
{
    let mut tx = pool.begin().await?;

    match work(&mut *tx).await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            // Falha no rollback não pode mascarar o erro original
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!("Falha no rollback: {}", rollback_err);
            }
            Err(err)
        }
    }
}
