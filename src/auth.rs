use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use password_hash::rand_core::{OsRng, RngCore};

use crate::AppState;
use crate::constants::*;
use crate::models::{AuthResponse, LoginPayload, RegisterPayload, User};
use crate::utils::{
    HandlerError, bad_request, db_error, db_error_with_context, now_unix, validate_string_length,
};

pub fn validate_email(email: &str) -> Result<(), HandlerError> {
    validate_string_length(email, "Email", MAX_EMAIL_LENGTH)?;
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(bad_request("Invalid email address")),
    }
}

pub fn validate_password(password: &str) -> Result<(), HandlerError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(bad_request(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn hash_password(password: &str) -> Result<String, HandlerError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to hash password".to_string(),
            )
        })
}

fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// 32 random bytes, URL-safe base64 without padding.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn extract_user_from_row(row: libsql::Row) -> Result<User, HandlerError> {
    let id: i64 = row
        .get(0)
        .map_err(|e| db_error_with_context("invalid user data", e))?;
    let email: String = row
        .get(1)
        .map_err(|e| db_error_with_context("invalid user data", e))?;
    let full_name: String = row
        .get(2)
        .map_err(|e| db_error_with_context("invalid user data", e))?;

    Ok(User {
        id,
        email,
        full_name,
    })
}

async fn issue_token(app_state: &AppState, user_id: i64) -> Result<String, HandlerError> {
    let token = generate_token();
    let created_at = now_unix();
    let expires_at = created_at + app_state.token_expiry_days * 24 * 60 * 60;

    let conn = app_state.main_db.write().await;
    conn.execute(
        "DELETE FROM auth_tokens WHERE expires_at <= ?",
        [created_at],
    )
    .await
    .map_err(|e| db_error_with_context("failed to prune expired tokens", e))?;

    conn.execute(
        "INSERT INTO auth_tokens (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        (token.as_str(), user_id, created_at, expires_at),
    )
    .await
    .map_err(|e| db_error_with_context("failed to store token", e))?;

    Ok(token)
}

/// Resolves the bearer token of a request to its user.
pub async fn get_current_user(
    app_state: &AppState,
    headers: &HeaderMap,
) -> Result<User, HandlerError> {
    let unauthorized = || (StatusCode::UNAUTHORIZED, ERR_UNAUTHORIZED.to_string());
    let token = extract_bearer_token(headers).ok_or_else(unauthorized)?;

    let conn = app_state.main_db.read().await;
    let mut rows = conn
        .query(
            "SELECT u.id, u.email, u.full_name FROM auth_tokens t \
             JOIN users u ON u.id = t.user_id \
             WHERE t.token = ? AND t.expires_at > ?",
            (token, now_unix()),
        )
        .await
        .map_err(|e| db_error_with_context("failed to look up token", e))?;

    match rows.next().await.map_err(db_error)? {
        Some(row) => extract_user_from_row(row),
        None => {
            tracing::debug!("rejected unknown or expired token");
            Err(unauthorized())
        }
    }
}

pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<AuthResponse>), HandlerError> {
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;
    validate_string_length(&payload.full_name, "Full name", MAX_NAME_LENGTH)?;

    let email = normalize_email(&payload.email);
    let full_name = payload.full_name.trim().to_string();
    let password_hash = hash_password(&payload.password)?;

    let user_id = {
        let conn = app_state.main_db.write().await;
        let mut existing = conn
            .query("SELECT id FROM users WHERE email = ?", [email.as_str()])
            .await
            .map_err(|e| db_error_with_context("failed to check existing user", e))?;
        if existing.next().await.map_err(db_error)?.is_some() {
            return Err((
                StatusCode::CONFLICT,
                "Email is already registered".to_string(),
            ));
        }

        conn.execute(
            "INSERT INTO users (email, full_name, password_hash) VALUES (?, ?, ?)",
            (email.as_str(), full_name.as_str(), password_hash.as_str()),
        )
        .await
        .map_err(|e| db_error_with_context("user creation failed", e))?;
        conn.last_insert_rowid()
    };

    let token = issue_token(&app_state, user_id).await?;
    tracing::info!(user_id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: User {
                id: user_id,
                email,
                full_name,
            },
            token,
        }),
    ))
}

pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<(StatusCode, Json<AuthResponse>), HandlerError> {
    let invalid = || (StatusCode::UNAUTHORIZED, ERR_INVALID_CREDENTIALS.to_string());
    let email = normalize_email(&payload.email);

    let (user, password_hash) = {
        let conn = app_state.main_db.read().await;
        let mut rows = conn
            .query(
                "SELECT id, email, full_name, password_hash FROM users WHERE email = ?",
                [email.as_str()],
            )
            .await
            .map_err(|e| db_error_with_context("failed to query user", e))?;

        let row = rows
            .next()
            .await
            .map_err(db_error)?
            .ok_or_else(invalid)?;
        let password_hash: String = row
            .get(3)
            .map_err(|e| db_error_with_context("invalid user data", e))?;
        (extract_user_from_row(row)?, password_hash)
    };

    if !verify_password(&payload.password, &password_hash) {
        tracing::warn!(user_id = user.id, "failed login attempt");
        return Err(invalid());
    }

    let token = issue_token(&app_state, user.id).await?;
    tracing::info!(user_id = user.id, "user logged in");

    Ok((StatusCode::OK, Json(AuthResponse { user, token })))
}

pub async fn me(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<User>), HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;
    Ok((StatusCode::OK, Json(user)))
}

/// Revokes the presented token.
pub async fn logout(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, HandlerError> {
    let user = get_current_user(&app_state, &headers).await?;
    let token = extract_bearer_token(&headers).unwrap_or_default();

    let conn = app_state.main_db.write().await;
    conn.execute("DELETE FROM auth_tokens WHERE token = ?", [token])
        .await
        .map_err(|e| db_error_with_context("failed to revoke token", e))?;

    tracing::info!(user_id = user.id, "user logged out");
    Ok(StatusCode::NO_CONTENT)
}
