use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};

use crate::auth::get_current_user;
use crate::constants::*;
use crate::models::{CategoryPayload, ExpenseCategory};
use crate::utils::{
    HandlerError, db_error, db_error_with_context, not_found, validate_color,
    validate_string_length,
};
use crate::{AppState, Db};

pub fn validate_category_payload(payload: &CategoryPayload) -> Result<(), HandlerError> {
    validate_string_length(&payload.name, "Category name", MAX_NAME_LENGTH)?;
    validate_color(&payload.color)?;
    validate_string_length(&payload.icon, "Category icon", MAX_ICON_LENGTH)
}

pub fn extract_category_from_row(row: libsql::Row) -> Result<ExpenseCategory, HandlerError> {
    let id: i64 = row
        .get(0)
        .map_err(|e| db_error_with_context("invalid category data", e))?;
    let name: String = row
        .get(1)
        .map_err(|e| db_error_with_context("invalid category data", e))?;
    let color: String = row
        .get(2)
        .map_err(|e| db_error_with_context("invalid category data", e))?;
    let icon: String = row
        .get(3)
        .map_err(|e| db_error_with_context("invalid category data", e))?;

    Ok(ExpenseCategory {
        id,
        name,
        color,
        icon,
    })
}

/// All categories of a user, oldest first.
pub async fn categories_for_user(db: &Db, user_id: i64) -> Result<Vec<ExpenseCategory>, HandlerError> {
    let conn = db.read().await;
    let mut rows = conn
        .query(
            "SELECT id, name, color, icon FROM categories WHERE owner_user_id = ? ORDER BY id ASC",
            [user_id],
        )
        .await
        .map_err(|e| db_error_with_context("failed to query categories", e))?;

    let mut categories = Vec::new();
    while let Some(row) = rows.next().await.map_err(db_error)? {
        categories.push(extract_category_from_row(row)?);
    }
    Ok(categories)
}

/// Rejects a category id the user does not own.
pub async fn validate_category_exists(
    db: &Db,
    user_id: i64,
    category_id: i64,
) -> Result<(), HandlerError> {
    let conn = db.read().await;
    let mut rows = conn
        .query(
            "SELECT id FROM categories WHERE id = ? AND owner_user_id = ?",
            (category_id, user_id),
        )
        .await
        .map_err(|e| db_error_with_context("failed to check category", e))?;

    if rows.next().await.map_err(db_error)?.is_none() {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Category {} does not exist", category_id),
        ));
    }
    Ok(())
}

pub async fn list_categories(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Vec<ExpenseCategory>>), HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;
    let categories = categories_for_user(&app_state.main_db, user.id).await?;
    Ok((StatusCode::OK, Json(categories)))
}

pub async fn create_category(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<ExpenseCategory>), HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;
    validate_category_payload(&payload)?;
    let name = payload.name.trim().to_string();
    let color = payload.color.trim().to_string();
    let icon = payload.icon.trim().to_string();

    let conn = app_state.main_db.write().await;
    conn.execute(
        "INSERT INTO categories (owner_user_id, name, color, icon) VALUES (?, ?, ?, ?)",
        (user.id, name.as_str(), color.as_str(), icon.as_str()),
    )
    .await
    .map_err(|e| db_error_with_context("category creation failed", e))?;
    let id = conn.last_insert_rowid();

    tracing::debug!(user_id = user.id, category_id = id, "category created");
    Ok((
        StatusCode::CREATED,
        Json(ExpenseCategory {
            id,
            name,
            color,
            icon,
        }),
    ))
}

pub async fn update_category(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Path(category_id): Path<i64>,
    Json(payload): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<ExpenseCategory>), HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;
    validate_category_payload(&payload)?;
    let name = payload.name.trim().to_string();
    let color = payload.color.trim().to_string();
    let icon = payload.icon.trim().to_string();

    let conn = app_state.main_db.write().await;
    let affected_rows = conn
        .execute(
            "UPDATE categories SET name = ?, color = ?, icon = ? WHERE id = ? AND owner_user_id = ?",
            (
                name.as_str(),
                color.as_str(),
                icon.as_str(),
                category_id,
                user.id,
            ),
        )
        .await
        .map_err(|e| db_error_with_context("failed to update category", e))?;

    if affected_rows == 0 {
        return Err(not_found("Category"));
    }

    Ok((
        StatusCode::OK,
        Json(ExpenseCategory {
            id: category_id,
            name,
            color,
            icon,
        }),
    ))
}

/// Expenses that referenced the category are kept and left dangling.
pub async fn delete_category(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Path(category_id): Path<i64>,
) -> Result<StatusCode, HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;

    let conn = app_state.main_db.write().await;
    let affected_rows = conn
        .execute(
            "DELETE FROM categories WHERE id = ? AND owner_user_id = ?",
            (category_id, user.id),
        )
        .await
        .map_err(|e| db_error_with_context("failed to delete category", e))?;

    if affected_rows == 0 {
        return Err(not_found("Category"));
    }

    Ok(StatusCode::NO_CONTENT)
}
