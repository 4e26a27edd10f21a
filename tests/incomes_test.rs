mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn income_crud_lifecycle() {
    let app = common::setup_test_app().await.expect("setup failed");
    let token = common::user_with_token(&app, "ana@example.com")
        .await
        .expect("user");

    let (status, created) = common::auth_request(
        &app,
        "POST",
        "/incomes",
        &token,
        Some(json!({"name": "Salário", "amount": 5000.0, "recurrence": "monthly", "receive_date": 5})),
    )
    .await
    .expect("create");
    assert_eq!(status, StatusCode::CREATED, "body: {created}");
    let id = created["id"].as_i64().expect("id");
    assert_eq!(created["name"], "Salário");
    assert_eq!(created["recurrence"], "monthly");

    let (status, updated) = common::auth_request(
        &app,
        "PUT",
        &format!("/incomes/{id}"),
        &token,
        Some(json!({"name": "Salário CLT", "amount": 5500.0, "recurrence": "monthly", "receive_date": 6})),
    )
    .await
    .expect("update");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["amount"], 5500.0);
    assert_eq!(updated["receive_date"], 6);

    let (status, list) = common::auth_request(&app, "GET", "/incomes", &token, None)
        .await
        .expect("list");
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().expect("array");
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Salário CLT");

    let (status, _) = common::auth_request(&app, "DELETE", &format!("/incomes/{id}"), &token, None)
        .await
        .expect("delete");
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = common::auth_request(&app, "DELETE", &format!("/incomes/{id}"), &token, None)
        .await
        .expect("delete again");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn recurrence_defaults_to_monthly() {
    let app = common::setup_test_app().await.expect("setup failed");
    let token = common::user_with_token(&app, "ana@example.com")
        .await
        .expect("user");

    let (status, created) = common::auth_request(
        &app,
        "POST",
        "/incomes",
        &token,
        Some(json!({"name": "Aluguel recebido", "amount": 900.0, "receive_date": 10})),
    )
    .await
    .expect("create");
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["recurrence"], "monthly");
}

#[tokio::test]
async fn invalid_incomes_are_rejected() {
    let app = common::setup_test_app().await.expect("setup failed");
    let token = common::user_with_token(&app, "ana@example.com")
        .await
        .expect("user");

    for payload in [
        json!({"name": "", "amount": 100.0, "receive_date": 5}),
        json!({"name": "Bônus", "amount": -100.0, "receive_date": 5}),
        json!({"name": "Bônus", "amount": 100.0, "receive_date": 0}),
        json!({"name": "Bônus", "amount": 100.0, "receive_date": 32}),
    ] {
        let (status, body) = common::auth_request(&app, "POST", "/incomes", &token, Some(payload))
            .await
            .expect("create");
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
    }

    let (status, _) = common::auth_request(
        &app,
        "POST",
        "/incomes",
        &token,
        Some(json!({"name": "Bônus", "amount": 100.0, "recurrence": "daily", "receive_date": 5})),
    )
    .await
    .expect("create");
    assert!(status.is_client_error());
}

#[tokio::test]
async fn incomes_are_isolated_between_users() {
    let app = common::setup_test_app().await.expect("setup failed");
    let ana = common::user_with_token(&app, "ana@example.com")
        .await
        .expect("ana");
    let bob = common::user_with_token(&app, "bob@example.com")
        .await
        .expect("bob");

    let (_, created) = common::auth_request(
        &app,
        "POST",
        "/incomes",
        &ana,
        Some(json!({"name": "Salário", "amount": 5000.0, "receive_date": 5})),
    )
    .await
    .expect("create");
    let id = created["id"].as_i64().expect("id");

    let (_, list) = common::auth_request(&app, "GET", "/incomes", &bob, None)
        .await
        .expect("list");
    assert_eq!(list.as_array().map(Vec::len), Some(0));

    let (status, _) = common::auth_request(
        &app,
        "PUT",
        &format!("/incomes/{id}"),
        &bob,
        Some(json!({"name": "Hack", "amount": 1.0, "receive_date": 1})),
    )
    .await
    .expect("update");
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = common::auth_request(&app, "DELETE", &format!("/incomes/{id}"), &bob, None)
        .await
        .expect("delete");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn storage_failure_returns_generic_500() {
    let app = common::setup_test_app().await.expect("setup failed");
    let token = common::user_with_token(&app, "ana@example.com")
        .await
        .expect("user");

    {
        let conn = app.state.main_db.write().await;
        conn.execute("DROP TABLE incomes", ())
            .await
            .expect("drop incomes");
    }

    let (status, body) = common::auth_request(&app, "GET", "/incomes", &token, None)
        .await
        .expect("list");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Database error: failed to query incomes");
}

#[test]
fn database_errors_keep_the_driver_message_out_of_the_response() {
    let (status, message) = cofrinho::utils::db_error_with_context(
        "failed to query incomes",
        "no such table: incomes",
    );
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!message.contains("no such table"));

    let (status, message) = cofrinho::utils::db_error("disk I/O error");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!message.contains("disk"));
}
