use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};

use crate::aggregate::{from_cents, to_cents};
use crate::auth::get_current_user;
use crate::constants::*;
use crate::models::{
    PiggyBank, PiggyBankPayload, PiggyTransaction, PiggyTransactionPayload, TransactionType,
};
use crate::utils::{
    HandlerError, bad_request, db_error, db_error_with_context, normalize_optional, not_found,
    validate_date, validate_max_length, validate_positive_amount, validate_string_length,
    today_iso,
};
use crate::{AppState, Db, TransactionError, with_transaction};

pub fn validate_piggy_bank_payload(payload: &PiggyBankPayload) -> Result<(), HandlerError> {
    validate_string_length(&payload.name, "Piggy bank name", MAX_NAME_LENGTH)?;
    validate_max_length(&payload.goal, "Goal", MAX_DESCRIPTION_LENGTH)?;
    validate_max_length(&payload.bank, "Bank", MAX_NAME_LENGTH)
}

pub fn extract_piggy_bank_from_row(row: libsql::Row) -> Result<PiggyBank, HandlerError> {
    let invalid = |e: libsql::Error| db_error_with_context("invalid piggy bank data", e);

    Ok(PiggyBank {
        id: row.get(0).map_err(invalid)?,
        name: row.get(1).map_err(invalid)?,
        goal: row.get(2).map_err(invalid)?,
        bank: row.get(3).map_err(invalid)?,
        balance: row.get(4).map_err(invalid)?,
    })
}

pub fn extract_transaction_from_row(row: libsql::Row) -> Result<PiggyTransaction, HandlerError> {
    let invalid = |e: libsql::Error| db_error_with_context("invalid piggy transaction data", e);
    let kind: String = row.get(3).map_err(invalid)?;

    Ok(PiggyTransaction {
        id: row.get(0).map_err(invalid)?,
        piggy_bank_id: row.get(1).map_err(invalid)?,
        amount: row.get(2).map_err(invalid)?,
        kind: kind
            .parse::<TransactionType>()
            .map_err(|e| db_error_with_context("invalid piggy transaction type", e))?,
        date: row.get(4).map_err(invalid)?,
        description: row.get(5).map_err(invalid)?,
    })
}

async fn piggy_bank_by_id(db: &Db, user_id: i64, piggy_bank_id: i64) -> Result<PiggyBank, HandlerError> {
    let conn = db.read().await;
    let mut rows = conn
        .query(
            "SELECT id, name, goal, bank, balance FROM piggy_banks WHERE id = ? AND owner_user_id = ?",
            (piggy_bank_id, user_id),
        )
        .await
        .map_err(|e| db_error_with_context("failed to query piggy bank", e))?;

    match rows.next().await.map_err(db_error)? {
        Some(row) => extract_piggy_bank_from_row(row),
        None => Err(not_found("Piggy bank")),
    }
}

pub async fn list_piggy_banks(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Vec<PiggyBank>>), HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;
    let conn = app_state.main_db.read().await;

    let mut rows = conn
        .query(
            "SELECT id, name, goal, bank, balance FROM piggy_banks WHERE owner_user_id = ? ORDER BY id ASC",
            [user.id],
        )
        .await
        .map_err(|e| db_error_with_context("failed to query piggy banks", e))?;

    let mut piggy_banks = Vec::new();
    while let Some(row) = rows.next().await.map_err(db_error)? {
        piggy_banks.push(extract_piggy_bank_from_row(row)?);
    }

    Ok((StatusCode::OK, Json(piggy_banks)))
}

pub async fn create_piggy_bank(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PiggyBankPayload>,
) -> Result<(StatusCode, Json<PiggyBank>), HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;
    validate_piggy_bank_payload(&payload)?;
    let name = payload.name.trim().to_string();
    let goal = payload.goal.trim().to_string();
    let bank = payload.bank.trim().to_string();

    let conn = app_state.main_db.write().await;
    conn.execute(
        "INSERT INTO piggy_banks (owner_user_id, name, goal, bank, balance) VALUES (?, ?, ?, ?, 0.0)",
        (user.id, name.as_str(), goal.as_str(), bank.as_str()),
    )
    .await
    .map_err(|e| db_error_with_context("piggy bank creation failed", e))?;
    let id = conn.last_insert_rowid();

    tracing::debug!(user_id = user.id, piggy_bank_id = id, "piggy bank created");
    Ok((
        StatusCode::CREATED,
        Json(PiggyBank {
            id,
            name,
            goal,
            bank,
            balance: 0.0,
        }),
    ))
}

/// Renames or re-describes a piggy bank. The balance only moves through
/// transactions.
pub async fn update_piggy_bank(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Path(piggy_bank_id): Path<i64>,
    Json(payload): Json<PiggyBankPayload>,
) -> Result<(StatusCode, Json<PiggyBank>), HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;
    validate_piggy_bank_payload(&payload)?;

    {
        let conn = app_state.main_db.write().await;
        let affected_rows = conn
            .execute(
                "UPDATE piggy_banks SET name = ?, goal = ?, bank = ? WHERE id = ? AND owner_user_id = ?",
                (
                    payload.name.trim(),
                    payload.goal.trim(),
                    payload.bank.trim(),
                    piggy_bank_id,
                    user.id,
                ),
            )
            .await
            .map_err(|e| db_error_with_context("failed to update piggy bank", e))?;

        if affected_rows == 0 {
            return Err(not_found("Piggy bank"));
        }
    }

    let piggy_bank = piggy_bank_by_id(&app_state.main_db, user.id, piggy_bank_id).await?;
    Ok((StatusCode::OK, Json(piggy_bank)))
}

enum PiggyWriteError {
    Transaction(TransactionError),
    NotFound,
    InsufficientBalance { balance: f64 },
    Db(&'static str, libsql::Error),
}

impl From<TransactionError> for PiggyWriteError {
    fn from(e: TransactionError) -> Self {
        PiggyWriteError::Transaction(e)
    }
}

impl From<PiggyWriteError> for HandlerError {
    fn from(e: PiggyWriteError) -> Self {
        match e {
            PiggyWriteError::Transaction(TransactionError::Begin(e)) => {
                db_error_with_context("failed to begin transaction", e)
            }
            PiggyWriteError::Transaction(TransactionError::Commit(e)) => {
                db_error_with_context("failed to commit transaction", e)
            }
            PiggyWriteError::NotFound => not_found("Piggy bank"),
            PiggyWriteError::InsufficientBalance { balance } => (
                StatusCode::BAD_REQUEST,
                format!("Withdrawal exceeds the current balance of {:.2}", balance),
            ),
            PiggyWriteError::Db(context, e) => db_error_with_context(context, e),
        }
    }
}

/// Deletes a piggy bank together with its transaction history.
pub async fn delete_piggy_bank(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Path(piggy_bank_id): Path<i64>,
) -> Result<StatusCode, HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;
    let owner_user_id = user.id;

    with_transaction(&app_state.main_db, |conn| {
        Box::pin(async move {
            let affected_rows = conn
                .execute(
                    "DELETE FROM piggy_banks WHERE id = ? AND owner_user_id = ?",
                    (piggy_bank_id, owner_user_id),
                )
                .await
                .map_err(|e| PiggyWriteError::Db("failed to delete piggy bank", e))?;
            if affected_rows == 0 {
                return Err(PiggyWriteError::NotFound);
            }

            conn.execute(
                "DELETE FROM piggy_transactions WHERE piggy_bank_id = ? AND owner_user_id = ?",
                (piggy_bank_id, owner_user_id),
            )
            .await
            .map_err(|e| PiggyWriteError::Db("failed to delete piggy transactions", e))?;
            Ok(())
        })
    })
    .await
    .map_err(|e: PiggyWriteError| -> HandlerError { e.into() })?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_transactions(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Path(piggy_bank_id): Path<i64>,
) -> Result<(StatusCode, Json<Vec<PiggyTransaction>>), HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;
    piggy_bank_by_id(&app_state.main_db, user.id, piggy_bank_id).await?;

    let conn = app_state.main_db.read().await;
    let mut rows = conn
        .query(
            "SELECT id, piggy_bank_id, amount, type, date, description FROM piggy_transactions \
             WHERE piggy_bank_id = ? AND owner_user_id = ? ORDER BY date DESC, id DESC",
            (piggy_bank_id, user.id),
        )
        .await
        .map_err(|e| db_error_with_context("failed to query piggy transactions", e))?;

    let mut transactions = Vec::new();
    while let Some(row) = rows.next().await.map_err(db_error)? {
        transactions.push(extract_transaction_from_row(row)?);
    }

    Ok((StatusCode::OK, Json(transactions)))
}

/// Records a deposit or withdrawal and moves the balance in one
/// transaction. Withdrawals larger than the balance are rejected.
pub async fn create_transaction(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PiggyTransactionPayload>,
) -> Result<(StatusCode, Json<PiggyTransaction>), HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;
    validate_positive_amount(payload.amount)?;
    let description = normalize_optional(payload.description);
    if let Some(description) = &description {
        validate_max_length(description, "Description", MAX_DESCRIPTION_LENGTH)?;
    }
    let date = match normalize_optional(payload.date) {
        Some(date) => {
            validate_date(&date)?;
            date
        }
        None => today_iso(),
    };

    let amount_cents = to_cents(payload.amount);
    if amount_cents <= 0 {
        return Err(bad_request("Amount must be at least 0.01"));
    }

    let owner_user_id = user.id;
    let piggy_bank_id = payload.piggy_bank_id;
    let amount = from_cents(amount_cents);
    let kind = payload.kind;

    let transaction = with_transaction(&app_state.main_db, |conn| {
        Box::pin(async move {
            let mut rows = conn
                .query(
                    "SELECT balance FROM piggy_banks WHERE id = ? AND owner_user_id = ?",
                    (piggy_bank_id, owner_user_id),
                )
                .await
                .map_err(|e| PiggyWriteError::Db("failed to query piggy bank", e))?;
            let balance: f64 = match rows
                .next()
                .await
                .map_err(|e| PiggyWriteError::Db("failed to query piggy bank", e))?
            {
                Some(row) => row
                    .get(0)
                    .map_err(|e| PiggyWriteError::Db("invalid piggy bank data", e))?,
                None => return Err(PiggyWriteError::NotFound),
            };

            // Balances move in whole cents.
            let balance_cents = to_cents(balance);
            let new_balance = match kind {
                TransactionType::Deposit => from_cents(balance_cents + amount_cents),
                TransactionType::Withdrawal if amount_cents > balance_cents => {
                    return Err(PiggyWriteError::InsufficientBalance {
                        balance: from_cents(balance_cents),
                    });
                }
                TransactionType::Withdrawal => from_cents(balance_cents - amount_cents),
            };

            conn.execute(
                "UPDATE piggy_banks SET balance = ? WHERE id = ? AND owner_user_id = ?",
                (new_balance, piggy_bank_id, owner_user_id),
            )
            .await
            .map_err(|e| PiggyWriteError::Db("failed to update balance", e))?;

            conn.execute(
                "INSERT INTO piggy_transactions (owner_user_id, piggy_bank_id, amount, type, date, description) \
                 VALUES (?, ?, ?, ?, ?, ?)",
                (
                    owner_user_id,
                    piggy_bank_id,
                    amount,
                    kind.as_str(),
                    date.as_str(),
                    description.as_deref(),
                ),
            )
            .await
            .map_err(|e| PiggyWriteError::Db("piggy transaction creation failed", e))?;

            Ok(PiggyTransaction {
                id: conn.last_insert_rowid(),
                piggy_bank_id,
                amount,
                kind,
                date,
                description,
            })
        })
    })
    .await
    .map_err(|e: PiggyWriteError| -> HandlerError { e.into() })?;

    tracing::info!(
        user_id = owner_user_id,
        piggy_bank_id,
        kind = kind.as_str(),
        amount,
        "piggy bank transaction recorded"
    );
    Ok((StatusCode::CREATED, Json(transaction)))
}
