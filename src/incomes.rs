use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};

use crate::AppState;
use crate::auth::get_current_user;
use crate::constants::*;
use crate::models::{Income, IncomePayload, Recurrence};
use crate::utils::{
    HandlerError, db_error, db_error_with_context, not_found, validate_amount,
    validate_receive_date, validate_string_length,
};

pub fn validate_income_payload(payload: &IncomePayload) -> Result<(), HandlerError> {
    validate_string_length(&payload.name, "Income name", MAX_NAME_LENGTH)?;
    validate_amount(payload.amount)?;
    validate_receive_date(payload.receive_date)
}

pub fn extract_income_from_row(row: libsql::Row) -> Result<Income, HandlerError> {
    let id: i64 = row
        .get(0)
        .map_err(|e| db_error_with_context("invalid income data", e))?;
    let name: String = row
        .get(1)
        .map_err(|e| db_error_with_context("invalid income data", e))?;
    let amount: f64 = row
        .get(2)
        .map_err(|e| db_error_with_context("invalid income data", e))?;
    let recurrence: String = row
        .get(3)
        .map_err(|e| db_error_with_context("invalid income data", e))?;
    let receive_date: i64 = row
        .get(4)
        .map_err(|e| db_error_with_context("invalid income data", e))?;

    Ok(Income {
        id,
        name,
        amount,
        recurrence: recurrence.parse::<Recurrence>().unwrap_or_default(),
        receive_date,
    })
}

pub async fn list_incomes(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Vec<Income>>), HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;
    let conn = app_state.main_db.read().await;

    let mut rows = conn
        .query(
            "SELECT id, name, amount, recurrence, receive_date FROM incomes \
             WHERE owner_user_id = ? ORDER BY id ASC",
            [user.id],
        )
        .await
        .map_err(|e| db_error_with_context("failed to query incomes", e))?;

    let mut incomes = Vec::new();
    while let Some(row) = rows.next().await.map_err(db_error)? {
        incomes.push(extract_income_from_row(row)?);
    }

    Ok((StatusCode::OK, Json(incomes)))
}

pub async fn create_income(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<IncomePayload>,
) -> Result<(StatusCode, Json<Income>), HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;
    validate_income_payload(&payload)?;
    let name = payload.name.trim().to_string();

    let conn = app_state.main_db.write().await;
    conn.execute(
        "INSERT INTO incomes (owner_user_id, name, amount, recurrence, receive_date) \
         VALUES (?, ?, ?, ?, ?)",
        (
            user.id,
            name.as_str(),
            payload.amount,
            payload.recurrence.as_str(),
            payload.receive_date,
        ),
    )
    .await
    .map_err(|e| db_error_with_context("income creation failed", e))?;
    let id = conn.last_insert_rowid();

    tracing::debug!(user_id = user.id, income_id = id, "income created");
    Ok((
        StatusCode::CREATED,
        Json(Income {
            id,
            name,
            amount: payload.amount,
            recurrence: payload.recurrence,
            receive_date: payload.receive_date,
        }),
    ))
}

pub async fn update_income(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Path(income_id): Path<i64>,
    Json(payload): Json<IncomePayload>,
) -> Result<(StatusCode, Json<Income>), HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;
    validate_income_payload(&payload)?;
    let name = payload.name.trim().to_string();

    let conn = app_state.main_db.write().await;
    let affected_rows = conn
        .execute(
            "UPDATE incomes SET name = ?, amount = ?, recurrence = ?, receive_date = ? \
             WHERE id = ? AND owner_user_id = ?",
            (
                name.as_str(),
                payload.amount,
                payload.recurrence.as_str(),
                payload.receive_date,
                income_id,
                user.id,
            ),
        )
        .await
        .map_err(|e| db_error_with_context("failed to update income", e))?;

    if affected_rows == 0 {
        return Err(not_found("Income"));
    }

    Ok((
        StatusCode::OK,
        Json(Income {
            id: income_id,
            name,
            amount: payload.amount,
            recurrence: payload.recurrence,
            receive_date: payload.receive_date,
        }),
    ))
}

pub async fn delete_income(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Path(income_id): Path<i64>,
) -> Result<StatusCode, HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;

    let conn = app_state.main_db.write().await;
    let affected_rows = conn
        .execute(
            "DELETE FROM incomes WHERE id = ? AND owner_user_id = ?",
            (income_id, user.id),
        )
        .await
        .map_err(|e| db_error_with_context("failed to delete income", e))?;

    if affected_rows == 0 {
        return Err(not_found("Income"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Sum of every income amount of a user; the constant monthly income used
/// by reports.
pub async fn total_income_for_user(app_state: &AppState, user_id: i64) -> Result<f64, HandlerError> {
    let conn = app_state.main_db.read().await;
    let mut rows = conn
        .query(
            "SELECT COALESCE(SUM(amount), 0.0) FROM incomes WHERE owner_user_id = ?",
            [user_id],
        )
        .await
        .map_err(|e| db_error_with_context("failed to sum incomes", e))?;

    match rows.next().await.map_err(db_error)? {
        Some(row) => row.get::<f64>(0).map_err(db_error),
        None => Ok(0.0),
    }
}
