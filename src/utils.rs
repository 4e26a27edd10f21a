use std::fmt::Display;

use axum::http::StatusCode;
use time::OffsetDateTime;

use crate::aggregate::parse_iso_date;
use crate::constants::*;

pub type HandlerError = (StatusCode, String);

/// Logs the underlying failure and returns a generic 500.
pub fn db_error(error: impl Display) -> HandlerError {
    tracing::error!(error = %error, "database error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ERR_DATABASE_OPERATION.to_string(),
    )
}

/// Logs the underlying failure and returns a generic 500 naming the context.
pub fn db_error_with_context(context: &str, error: impl Display) -> HandlerError {
    tracing::error!(context, error = %error, "database error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Database error: {}", context),
    )
}

pub fn bad_request(message: impl Into<String>) -> HandlerError {
    (StatusCode::BAD_REQUEST, message.into())
}

pub fn not_found(what: &str) -> HandlerError {
    (StatusCode::NOT_FOUND, format!("{} not found", what))
}

pub fn validate_string_length(
    value: &str,
    field_name: &str,
    max_length: usize,
) -> Result<(), HandlerError> {
    if value.trim().is_empty() {
        return Err(bad_request(format!("{} cannot be empty", field_name)));
    }
    validate_max_length(value, field_name, max_length)
}

pub fn validate_max_length(
    value: &str,
    field_name: &str,
    max_length: usize,
) -> Result<(), HandlerError> {
    if value.len() > max_length {
        return Err(bad_request(format!(
            "{} must be less than {} characters",
            field_name, max_length
        )));
    }
    Ok(())
}

pub fn validate_date(value: &str) -> Result<(), HandlerError> {
    if value.trim().is_empty() {
        return Err(bad_request("Date cannot be empty"));
    }
    if value.trim().len() != 10 || parse_iso_date(value).is_none() {
        return Err(bad_request("Invalid date format"));
    }
    Ok(())
}

/// Amounts are never negative; direction is carried by the record type.
pub fn validate_amount(amount: f64) -> Result<(), HandlerError> {
    if !amount.is_finite() {
        return Err(bad_request("Amount must be a valid finite number"));
    }
    if amount < 0.0 {
        return Err(bad_request("Amount cannot be negative"));
    }
    Ok(())
}

pub fn validate_positive_amount(amount: f64) -> Result<(), HandlerError> {
    validate_amount(amount)?;
    if amount == 0.0 {
        return Err(bad_request("Amount must be greater than zero"));
    }
    Ok(())
}

pub fn validate_color(color: &str) -> Result<(), HandlerError> {
    let hex = color.trim().strip_prefix('#').unwrap_or_default();
    let valid_length = hex.len() == 3 || hex.len() == 6;
    if !valid_length || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(bad_request("Color must be a hex string like #FF7A00"));
    }
    Ok(())
}

pub fn validate_receive_date(day: i64) -> Result<(), HandlerError> {
    if !(MIN_RECEIVE_DAY..=MAX_RECEIVE_DAY).contains(&day) {
        return Err(bad_request(format!(
            "Receive date must be a day between {} and {}",
            MIN_RECEIVE_DAY, MAX_RECEIVE_DAY
        )));
    }
    Ok(())
}

/// Trims optional free text, mapping blank values to `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn today_iso() -> String {
    OffsetDateTime::now_utc().date().to_string()
}

pub fn now_unix() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}
