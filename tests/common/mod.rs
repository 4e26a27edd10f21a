use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use cofrinho::{AppState, auth, build_router, constants::*, database};
use serde_json::Value;
use tower::util::ServiceExt;

#[derive(Clone)]
pub struct TestConfig {
    pub temp_dir_path: String,
}

impl TestConfig {
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let temp_dir_path = temp_dir.path().to_string_lossy().to_string();
        std::mem::forget(temp_dir);
        Ok(Self { temp_dir_path })
    }

    pub fn data_path(&self) -> String {
        self.temp_dir_path.clone()
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    #[allow(dead_code)]
    pub data_path: String,
}

pub async fn setup_test_app() -> anyhow::Result<TestApp> {
    let test_config = TestConfig::new()?;
    let data_path = test_config.data_path();

    let main_db = database::init_main_db(&data_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize main database: {}", e))?;

    let state = AppState {
        main_db,
        token_expiry_days: DEFAULT_TOKEN_EXPIRY_DAYS,
    };
    let router = build_router(state.clone(), None);

    Ok(TestApp {
        router,
        state,
        data_path,
    })
}

/// Serves the app on an ephemeral local port and returns its base URL.
#[allow(dead_code)]
pub async fn spawn_test_server() -> anyhow::Result<(String, TestApp)> {
    let app = setup_test_app().await?;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    let router = app.router.clone();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok((format!("http://{}", address), app))
}

/// Inserts a user straight into the database, bypassing `/auth/register`.
#[allow(dead_code)]
pub async fn create_test_user(
    app_state: &AppState,
    email: &str,
    password: &str,
) -> anyhow::Result<i64> {
    let hash = auth::hash_password(password)
        .map_err(|(_, e)| anyhow::anyhow!("Failed to hash password: {}", e))?;

    let conn = app_state.main_db.write().await;
    conn.execute(
        "INSERT INTO users (email, full_name, password_hash) VALUES (?, ?, ?)",
        (email, "Test User", hash.as_str()),
    )
    .await
    .map_err(|e| anyhow::anyhow!("Failed to create test user: {}", e))?;

    Ok(conn.last_insert_rowid())
}

/// Logs in and returns the bearer token.
pub async fn login_user(app: &Router, email: &str, password: &str) -> anyhow::Result<String> {
    let payload = serde_json::json!({
        "email": email,
        "password": password
    });

    let (status, body) = send(app, "POST", "/auth/login", None, Some(payload)).await?;
    if status != StatusCode::OK {
        anyhow::bail!("Login failed with {}: {}", status, body);
    }

    body["token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("No token in login response"))
}

/// Creates a user and returns a token for it.
#[allow(dead_code)]
pub async fn user_with_token(app: &TestApp, email: &str) -> anyhow::Result<String> {
    create_test_user(&app.state, email, "password123").await?;
    login_user(&app.router, email, "password123").await
}

/// Sends a request, decoding the body as JSON when possible and as a JSON
/// string otherwise.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    payload: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let body = match payload {
        Some(payload) => Body::from(payload.to_string()),
        None => Body::empty(),
    };
    let request = builder
        .body(body)
        .map_err(|e| anyhow::anyhow!("Failed to build request: {}", e))?;

    let response = app
        .clone()
        .oneshot(request)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to execute request: {}", e))?;

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read response body: {}", e))?;
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()));

    Ok((status, body))
}

#[allow(dead_code)]
pub async fn auth_request(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: &str,
    payload: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    send(&app.router, method, uri, Some(token), payload).await
}
