use anyhow::Result;
use libsql::{Builder, Connection};
use std::{path::Path, sync::Arc};
use tokio::sync::RwLock;

use crate::constants::DATABASE_FILE;

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    email          TEXT    UNIQUE NOT NULL,
    full_name      TEXT    NOT NULL,
    password_hash  TEXT    NOT NULL
);
"#;

const CREATE_AUTH_TOKENS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS auth_tokens (
    token       TEXT    PRIMARY KEY,
    user_id     INTEGER NOT NULL,
    created_at  INTEGER NOT NULL,
    expires_at  INTEGER NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users(id)
);
"#;

const CREATE_INCOMES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS incomes (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_user_id  INTEGER NOT NULL,
    name           TEXT    NOT NULL,
    amount         REAL    NOT NULL,
    recurrence     TEXT    NOT NULL,
    receive_date   INTEGER NOT NULL
);
"#;

const CREATE_CATEGORIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_user_id  INTEGER NOT NULL,
    name           TEXT    NOT NULL,
    color          TEXT    NOT NULL,
    icon           TEXT    NOT NULL
);
"#;

// category_id is a weak reference: deleting a category leaves it dangling
const CREATE_EXPENSES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS expenses (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_user_id  INTEGER NOT NULL,
    category_id    INTEGER NOT NULL,
    amount         REAL    NOT NULL,
    description    TEXT    NOT NULL,
    date           TEXT    NOT NULL,
    notes          TEXT
);
"#;

const CREATE_PIGGY_BANKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS piggy_banks (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_user_id  INTEGER NOT NULL,
    name           TEXT    NOT NULL,
    goal           TEXT    NOT NULL,
    bank           TEXT    NOT NULL,
    balance        REAL    NOT NULL DEFAULT 0
);
"#;

const CREATE_PIGGY_TRANSACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS piggy_transactions (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_user_id  INTEGER NOT NULL,
    piggy_bank_id  INTEGER NOT NULL,
    amount         REAL    NOT NULL,
    type           TEXT    NOT NULL,
    date           TEXT    NOT NULL,
    description    TEXT
);
"#;

const CREATE_INDEXES: [&str; 5] = [
    "CREATE INDEX IF NOT EXISTS idx_incomes_owner ON incomes(owner_user_id);",
    "CREATE INDEX IF NOT EXISTS idx_categories_owner ON categories(owner_user_id);",
    "CREATE INDEX IF NOT EXISTS idx_expenses_owner_date ON expenses(owner_user_id, date);",
    "CREATE INDEX IF NOT EXISTS idx_piggy_banks_owner ON piggy_banks(owner_user_id);",
    "CREATE INDEX IF NOT EXISTS idx_piggy_transactions_bank ON piggy_transactions(piggy_bank_id);",
];

pub type Db = Arc<RwLock<Connection>>;

/// Opens (creating if needed) `cofrinho.db` under `data_dir` and applies the schema.
pub async fn init_main_db(data_dir: &str) -> Result<Db> {
    tokio::fs::create_dir_all(data_dir).await?;
    let path = Path::new(data_dir).join(DATABASE_FILE);
    let db = Builder::new_local(path).build().await?;
    let conn = db.connect()?;

    for statement in [
        CREATE_USERS_TABLE,
        CREATE_AUTH_TOKENS_TABLE,
        CREATE_INCOMES_TABLE,
        CREATE_CATEGORIES_TABLE,
        CREATE_EXPENSES_TABLE,
        CREATE_PIGGY_BANKS_TABLE,
        CREATE_PIGGY_TRANSACTIONS_TABLE,
    ] {
        conn.execute(statement, ()).await?;
    }
    for statement in CREATE_INDEXES {
        conn.execute(statement, ()).await?;
    }

    tracing::debug!(data_dir, "database schema ready");
    Ok(Arc::new(RwLock::new(conn)))
}
