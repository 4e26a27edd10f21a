use libsql::Connection;
use std::future::Future;
use std::pin::Pin;

use crate::database::Db;

/// Execute a function within a database transaction, returning handler-compatible errors
///
/// The closure must return a boxed future to handle lifetime issues with async closures.
/// The write lock is held for the whole transaction, so no other statement can
/// interleave between BEGIN and COMMIT.
pub async fn with_transaction<F, T, E>(db: &Db, f: F) -> Result<T, E>
where
    F: for<'a> FnOnce(&'a Connection) -> Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>,
    E: From<TransactionError>,
{
    let conn = db.write().await;

    conn.execute("BEGIN TRANSACTION", ())
        .await
        .map_err(TransactionError::Begin)?;

    match f(&*conn).await {
        Ok(result) => {
            conn.execute("COMMIT", ())
                .await
                .map_err(TransactionError::Commit)?;
            Ok(result)
        }
        Err(e) => {
            if let Err(rollback_error) = conn.execute("ROLLBACK", ()).await {
                tracing::warn!(error = %rollback_error, "rollback failed");
            }
            Err(e)
        }
    }
}

/// Errors that can occur during transaction management
#[derive(Debug)]
pub enum TransactionError {
    Begin(libsql::Error),
    Commit(libsql::Error),
}
