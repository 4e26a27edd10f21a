use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};

use crate::auth::get_current_user;
use crate::categories::validate_category_exists;
use crate::constants::*;
use crate::models::{Expense, ExpensePayload};
use crate::utils::{
    HandlerError, db_error, db_error_with_context, normalize_optional, not_found,
    validate_amount, validate_date, validate_max_length, validate_string_length,
};
use crate::{AppState, Db};

const SELECT_EXPENSES: &str = "SELECT e.id, e.category_id, c.name, c.color, c.icon, \
     e.amount, e.description, e.date, e.notes \
     FROM expenses e \
     LEFT JOIN categories c ON c.id = e.category_id AND c.owner_user_id = e.owner_user_id \
     WHERE e.owner_user_id = ?";

pub fn validate_expense_payload(payload: &ExpensePayload) -> Result<(), HandlerError> {
    validate_amount(payload.amount)?;
    validate_string_length(&payload.description, "Description", MAX_DESCRIPTION_LENGTH)?;
    validate_date(&payload.date)?;
    if let Some(notes) = &payload.notes {
        validate_max_length(notes, "Notes", MAX_NOTES_LENGTH)?;
    }
    Ok(())
}

pub fn extract_expense_from_row(row: libsql::Row) -> Result<Expense, HandlerError> {
    let invalid = |e: libsql::Error| db_error_with_context("invalid expense data", e);

    Ok(Expense {
        id: row.get(0).map_err(invalid)?,
        category_id: row.get(1).map_err(invalid)?,
        category_name: row.get(2).map_err(invalid)?,
        category_color: row.get(3).map_err(invalid)?,
        category_icon: row.get(4).map_err(invalid)?,
        amount: row.get(5).map_err(invalid)?,
        description: row.get(6).map_err(invalid)?,
        date: row.get(7).map_err(invalid)?,
        notes: row.get(8).map_err(invalid)?,
    })
}

/// Expenses of a user, newest first, optionally limited to an inclusive
/// ISO date range.
pub async fn expenses_for_user(
    db: &Db,
    user_id: i64,
    range: Option<(&str, &str)>,
) -> Result<Vec<Expense>, HandlerError> {
    let conn = db.read().await;
    let mut rows = match range {
        Some((start, end)) => conn
            .query(
                &format!(
                    "{} AND e.date >= ? AND e.date <= ? ORDER BY e.date DESC, e.id DESC",
                    SELECT_EXPENSES
                ),
                (user_id, start, end),
            )
            .await,
        None => conn
            .query(
                &format!("{} ORDER BY e.date DESC, e.id DESC", SELECT_EXPENSES),
                [user_id],
            )
            .await,
    }
    .map_err(|e| db_error_with_context("failed to query expenses", e))?;

    let mut expenses = Vec::new();
    while let Some(row) = rows.next().await.map_err(db_error)? {
        expenses.push(extract_expense_from_row(row)?);
    }
    Ok(expenses)
}

async fn expense_by_id(db: &Db, user_id: i64, expense_id: i64) -> Result<Expense, HandlerError> {
    let conn = db.read().await;
    let mut rows = conn
        .query(
            &format!("{} AND e.id = ?", SELECT_EXPENSES),
            (user_id, expense_id),
        )
        .await
        .map_err(|e| db_error_with_context("failed to query expense", e))?;

    match rows.next().await.map_err(db_error)? {
        Some(row) => extract_expense_from_row(row),
        None => Err(not_found("Expense")),
    }
}

pub async fn list_expenses(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Vec<Expense>>), HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;
    let expenses = expenses_for_user(&app_state.main_db, user.id, None).await?;
    Ok((StatusCode::OK, Json(expenses)))
}

pub async fn create_expense(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ExpensePayload>,
) -> Result<(StatusCode, Json<Expense>), HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;
    validate_expense_payload(&payload)?;
    validate_category_exists(&app_state.main_db, user.id, payload.category_id).await?;

    let description = payload.description.trim().to_string();
    let notes = normalize_optional(payload.notes);

    let expense_id = {
        let conn = app_state.main_db.write().await;
        conn.execute(
            "INSERT INTO expenses (owner_user_id, category_id, amount, description, date, notes) \
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                user.id,
                payload.category_id,
                payload.amount,
                description.as_str(),
                payload.date.trim(),
                notes.as_deref(),
            ),
        )
        .await
        .map_err(|e| db_error_with_context("expense creation failed", e))?;
        conn.last_insert_rowid()
    };

    tracing::debug!(user_id = user.id, expense_id, "expense created");
    let expense = expense_by_id(&app_state.main_db, user.id, expense_id).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn update_expense(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Path(expense_id): Path<i64>,
    Json(payload): Json<ExpensePayload>,
) -> Result<(StatusCode, Json<Expense>), HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;
    validate_expense_payload(&payload)?;
    validate_category_exists(&app_state.main_db, user.id, payload.category_id).await?;

    let description = payload.description.trim().to_string();
    let notes = normalize_optional(payload.notes);

    {
        let conn = app_state.main_db.write().await;
        let affected_rows = conn
            .execute(
                "UPDATE expenses SET category_id = ?, amount = ?, description = ?, date = ?, notes = ? \
                 WHERE id = ? AND owner_user_id = ?",
                (
                    payload.category_id,
                    payload.amount,
                    description.as_str(),
                    payload.date.trim(),
                    notes.as_deref(),
                    expense_id,
                    user.id,
                ),
            )
            .await
            .map_err(|e| db_error_with_context("failed to update expense", e))?;

        if affected_rows == 0 {
            return Err(not_found("Expense"));
        }
    }

    let expense = expense_by_id(&app_state.main_db, user.id, expense_id).await?;
    Ok((StatusCode::OK, Json(expense)))
}

pub async fn delete_expense(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Path(expense_id): Path<i64>,
) -> Result<StatusCode, HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;

    let conn = app_state.main_db.write().await;
    let affected_rows = conn
        .execute(
            "DELETE FROM expenses WHERE id = ? AND owner_user_id = ?",
            (expense_id, user.id),
        )
        .await
        .map_err(|e| db_error_with_context("failed to delete expense", e))?;

    if affected_rows == 0 {
        return Err(not_found("Expense"));
    }

    Ok(StatusCode::NO_CONTENT)
}
