use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
};

use crate::AppState;
use crate::aggregate::{monthly_buckets, sum_by_category, top_categories};
use crate::auth::get_current_user;
use crate::categories::categories_for_user;
use crate::expenses::expenses_for_user;
use crate::incomes::total_income_for_user;
use crate::models::{
    CategoryTotal, ExpensesByCategoryQuery, YearlyComparisonEntry, YearlyComparisonQuery,
};
use crate::utils::{HandlerError, bad_request, validate_date};

/// Twelve `{month, incomes, expenses}` entries for `year`. Incomes carry no
/// date, so every month reports the caller's total income.
pub async fn yearly_comparison(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<YearlyComparisonQuery>,
) -> Result<(StatusCode, Json<Vec<YearlyComparisonEntry>>), HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;
    if !(1..=9999).contains(&query.year) {
        return Err(bad_request("Year must be between 1 and 9999"));
    }

    let monthly_income = total_income_for_user(&app_state, user.id).await?;
    let start = format!("{:04}-01-01", query.year);
    let end = format!("{:04}-12-31", query.year);
    let expenses = expenses_for_user(&app_state.main_db, user.id, Some((&start, &end))).await?;

    let entries = monthly_buckets(&expenses, query.year, monthly_income)
        .into_iter()
        .zip(1u8..)
        .map(|(bucket, month)| YearlyComparisonEntry {
            month,
            incomes: bucket.income,
            expenses: bucket.expenses,
        })
        .collect();

    Ok((StatusCode::OK, Json(entries)))
}

/// Per-category totals of expenses dated within `[startDate, endDate]`,
/// highest first, zero totals left out.
pub async fn expenses_by_category(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ExpensesByCategoryQuery>,
) -> Result<(StatusCode, Json<Vec<CategoryTotal>>), HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;
    validate_date(&query.start_date)?;
    validate_date(&query.end_date)?;
    let start = query.start_date.trim();
    let end = query.end_date.trim();
    if start > end {
        return Err(bad_request("startDate must not be after endDate"));
    }

    let expenses =
        expenses_for_user(&app_state.main_db, user.id, Some((start, end))).await?;
    let categories = categories_for_user(&app_state.main_db, user.id).await?;
    let totals = sum_by_category(&expenses, &categories);
    let ranked = top_categories(&totals, totals.len());

    Ok((StatusCode::OK, Json(ranked)))
}
