mod common;

use cofrinho::client::{
    ApiClient, FileTokenStore, MemoryTokenStore, SessionContext, SessionState, TokenStore,
};
use cofrinho::models::RegisterPayload;

#[test]
fn file_token_store_roundtrip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileTokenStore::new(dir.path().join("nested").join("token"));

    assert_eq!(store.load().expect("load empty"), None);
    store.save("abc123").expect("save");
    assert_eq!(store.load().expect("load"), Some("abc123".to_string()));

    store.clear().expect("clear");
    assert_eq!(store.load().expect("load cleared"), None);
    store.clear().expect("clear twice");
}

#[test]
fn file_token_store_ignores_blank_content() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("token");
    std::fs::write(&path, "  \n").expect("write");

    let store = FileTokenStore::new(&path);
    assert_eq!(store.load().expect("load"), None);
    assert_eq!(store.path(), path.as_path());
}

#[test]
fn memory_token_store_roundtrip() {
    let store = MemoryTokenStore::with_token("seed");
    assert_eq!(store.load().expect("load"), Some("seed".to_string()));
    store.save("next").expect("save");
    assert_eq!(store.load().expect("load"), Some("next".to_string()));
    store.clear().expect("clear");
    assert_eq!(store.load().expect("load"), None);
}

#[tokio::test]
async fn init_without_token_is_anonymous() {
    let session = SessionContext::new(
        ApiClient::new("http://127.0.0.1:9"),
        MemoryTokenStore::new(),
    );
    assert_eq!(session.init().await, SessionState::Anonymous);
    assert_eq!(session.current_user().await, None);
}

#[tokio::test]
async fn init_with_rejected_token_tears_down() {
    let (base_url, _app) = common::spawn_test_server().await.expect("server");
    let session = SessionContext::new(
        ApiClient::new(base_url),
        MemoryTokenStore::with_token("not-a-real-token"),
    );

    assert_eq!(session.init().await, SessionState::Anonymous);
    assert_eq!(session.store().load().expect("load"), None);
    assert_eq!(session.api().token().await, None);
}

#[tokio::test]
async fn register_persists_and_init_restores() {
    let (base_url, _app) = common::spawn_test_server().await.expect("server");
    let dir = tempfile::tempdir().expect("tempdir");
    let token_path = dir.path().join("token");

    let session = SessionContext::new(
        ApiClient::new(base_url.clone()),
        FileTokenStore::new(&token_path),
    );
    let user = session
        .register(&RegisterPayload {
            email: "ana@example.com".to_string(),
            password: "segredo123".to_string(),
            full_name: "Ana Souza".to_string(),
        })
        .await
        .expect("register");
    assert_eq!(session.current_user().await, Some(user.clone()));
    assert!(session.store().load().expect("load").is_some());

    let restored = SessionContext::new(ApiClient::new(base_url), FileTokenStore::new(&token_path));
    assert_eq!(restored.init().await, SessionState::Authenticated(user));
}

#[tokio::test]
async fn logout_clears_local_and_server_session() {
    let (base_url, app) = common::spawn_test_server().await.expect("server");
    common::create_test_user(&app.state, "ana@example.com", "password123")
        .await
        .expect("create user");

    let session = SessionContext::new(ApiClient::new(base_url.clone()), MemoryTokenStore::new());
    session
        .login("ana@example.com", "password123")
        .await
        .expect("login");
    let token = session.api().token().await.expect("token set");

    session.logout().await;
    assert_eq!(session.current_user().await, None);
    assert_eq!(session.store().load().expect("load"), None);
    assert_eq!(session.api().token().await, None);

    let stale = ApiClient::new(base_url);
    stale.set_token(token).await;
    let err = stale.me().await.expect_err("revoked token");
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn failed_login_leaves_session_anonymous() {
    let (base_url, _app) = common::spawn_test_server().await.expect("server");
    let session = SessionContext::new(ApiClient::new(base_url), MemoryTokenStore::new());

    let err = session
        .login("nobody@example.com", "password123")
        .await
        .expect_err("unknown user");
    assert_eq!(err.status(), Some(401));
    assert_eq!(session.current_user().await, None);
    assert_eq!(session.store().load().expect("load"), None);
}
