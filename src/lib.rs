pub mod aggregate;
pub mod auth;
pub mod categories;
pub mod charts;
pub mod client;
pub mod config;
pub mod constants;
pub mod database;
pub mod db_transaction;
pub mod expenses;
pub mod format;
pub mod incomes;
pub mod insights;
pub mod models;
pub mod piggy_banks;
pub mod reports;
pub mod router;
pub mod utils;

// Re-export types at crate root for convenient importing
pub use crate::database::Db;
pub use crate::db_transaction::{TransactionError, with_transaction};
pub use crate::router::build_router;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    pub main_db: Db,
    /// Lifetime of newly issued bearer tokens
    pub token_expiry_days: i64,
}
