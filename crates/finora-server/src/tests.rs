//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use finora_core::db::Database;
use finora_core::AuditFilter;
use finora_core::test_utils::{MockBehavior, MockOllamaServer};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

fn test_config() -> ServerConfig {
    ServerConfig {
        require_auth: false,
        allowed_origins: vec![],
        ..Default::default()
    }
}

fn setup_test_app() -> Router {
    let db = Database::in_memory().unwrap();
    create_router_with_options(db, None, test_config(), None)
}

fn setup_test_app_with_db() -> (Router, Database) {
    let db = Database::in_memory().unwrap();
    let app = create_router_with_options(db.clone(), None, test_config(), None);
    (app, db)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, get_body_json(response).await)
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, get_body_json(response).await)
}

async fn delete(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, get_body_json(response).await)
}

/// Create a user with one account; returns (user_id, account_id)
async fn seed_user_and_account(app: &Router, balance: f64) -> (i64, i64) {
    let (status, user) = send_json(
        app,
        "POST",
        "/api/users",
        json!({"username": "ada", "email": "ada@example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = user["id"].as_i64().unwrap();

    let (status, account) = send_json(
        app,
        "POST",
        &format!("/api/users/{}/accounts", user_id),
        json!({"name": "Current", "account_type": "checking", "balance": balance}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    (user_id, account["id"].as_i64().unwrap())
}

// ========== Health & Auth Tests ==========

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();
    let (status, json) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["ai_configured"], false);
}

#[tokio::test]
async fn test_auth_required_by_default() {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        api_keys: vec!["s3cret-key".to_string()],
        ..Default::default()
    };
    let app = create_router_with_options(db, None, config, None);

    let (status, json) = get(&app, "/api/categories").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Authentication required");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/categories")
                .header("authorization", "Bearer wrong-key!")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/categories")
                .header("authorization", "Bearer s3cret-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Liveness stays open
    let (status, _) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
}

#[test]
fn test_validate_api_key() {
    let keys = vec!["abc".to_string(), "longer-key".to_string()];
    assert!(validate_api_key("abc", &keys));
    assert!(validate_api_key("longer-key", &keys));
    assert!(!validate_api_key("abd", &keys));
    assert!(!validate_api_key("", &keys));
    assert!(!validate_api_key("abc", &[]));
}

#[test]
fn test_parse_list() {
    assert_eq!(parse_list("a, b,,c "), vec!["a", "b", "c"]);
    assert!(parse_list("").is_empty());
}

// ========== User & Account Tests ==========

#[tokio::test]
async fn test_create_and_get_user() {
    let app = setup_test_app();

    let (status, user) = send_json(
        &app,
        "POST",
        "/api/users",
        json!({"username": "sam", "email": "Sam@Example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["email"], "sam@example.com");

    let (status, fetched) = get(&app, &format!("/api/users/{}", user["id"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["username"], "sam");

    let (status, json) = get(&app, "/api/users/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = setup_test_app();
    let body = json!({"username": "sam", "email": "sam@example.com"});

    let (status, _) = send_json(&app, "POST", "/api/users", body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, json) = send_json(&app, "POST", "/api/users", body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "Email already registered");
}

#[tokio::test]
async fn test_invalid_payloads_are_bad_requests() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(get_body_json(response).await["error"], "Invalid JSON");

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/users",
        json!({"username": "sam", "email": "not-an-email"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_accounts_for_unknown_user() {
    let app = setup_test_app();
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/users/42/accounts",
        json!({"name": "Ghost"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, "/api/users/42/accounts").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ========== Transaction Tests ==========

#[tokio::test]
async fn test_create_transaction_classifies_and_updates_balance() {
    let app = setup_test_app();
    let (user_id, account_id) = seed_user_and_account(&app, 500.0).await;
    let uri = format!("/api/users/{}/transactions", user_id);

    let (status, tx) = send_json(
        &app,
        "POST",
        &uri,
        json!({
            "account_id": account_id,
            "amount": 24.5,
            "description": "Pizza dinner with friends",
            "date": "2024-03-08"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tx["category"], "Dining");
    assert_eq!(tx["direction"], "expense");
    assert_eq!(tx["date"], "2024-03-08");

    // Known categories are canonicalized, unknown ones kept
    let (_, tx) = send_json(
        &app,
        "POST",
        &uri,
        json!({"account_id": account_id, "amount": 10, "description": "x", "category": "groceries", "date": "2024-03-09"}),
    )
    .await;
    assert_eq!(tx["category"], "Groceries");
    let (_, tx) = send_json(
        &app,
        "POST",
        &uri,
        json!({"account_id": account_id, "amount": 5, "description": "x", "category": "Pets", "date": "2024-03-09"}),
    )
    .await;
    assert_eq!(tx["category"], "Pets");

    let (_, salary) = send_json(
        &app,
        "POST",
        &uri,
        json!({"account_id": account_id, "amount": 1000, "description": "Salary", "direction": "income", "category": "Income", "date": "2024-03-01"}),
    )
    .await;
    assert_eq!(salary["direction"], "income");

    let (_, account) = get(&app, &format!("/api/accounts/{}", account_id)).await;
    assert_eq!(account["balance"].as_f64().unwrap(), 500.0 - 24.5 - 10.0 - 5.0 + 1000.0);
}

#[tokio::test]
async fn test_create_transaction_validation() {
    let app = setup_test_app();
    let (user_id, account_id) = seed_user_and_account(&app, 0.0).await;
    let uri = format!("/api/users/{}/transactions", user_id);

    let (status, _) = send_json(
        &app,
        "POST",
        &uri,
        json!({"account_id": account_id, "amount": -3, "description": "refund"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        "POST",
        &uri,
        json!({"account_id": account_id, "amount": 3, "description": "   "}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        "POST",
        &uri,
        json!({"account_id": 999, "amount": 3, "description": "coffee"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_and_delete_transaction() {
    let app = setup_test_app();
    let (user_id, account_id) = seed_user_and_account(&app, 100.0).await;

    let (_, tx) = send_json(
        &app,
        "POST",
        &format!("/api/users/{}/transactions", user_id),
        json!({"account_id": account_id, "amount": 40, "description": "Cinema night"}),
    )
    .await;
    assert_eq!(tx["category"], "Entertainment");
    let tx_uri = format!("/api/transactions/{}", tx["id"]);

    let (status, updated) = send_json(
        &app,
        "PUT",
        &tx_uri,
        json!({"amount": 25, "category": "shopping"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["amount"].as_f64().unwrap(), 25.0);
    assert_eq!(updated["category"], "Shopping");

    let (_, account) = get(&app, &format!("/api/accounts/{}", account_id)).await;
    assert_eq!(account["balance"].as_f64().unwrap(), 75.0);

    let (status, json) = delete(&app, &tx_uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let (_, account) = get(&app, &format!("/api/accounts/{}", account_id)).await;
    assert_eq!(account["balance"].as_f64().unwrap(), 100.0);

    let (status, _) = get(&app, &tx_uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = delete(&app, &tx_uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_transactions_filters() {
    let app = setup_test_app();
    let (user_id, account_id) = seed_user_and_account(&app, 0.0).await;
    let uri = format!("/api/users/{}/transactions", user_id);

    for (desc, date) in [
        ("Supermarket run", "2024-02-27"),
        ("Supermarket run", "2024-03-03"),
        ("Cinema", "2024-03-10"),
    ] {
        send_json(
            &app,
            "POST",
            &uri,
            json!({"account_id": account_id, "amount": 10, "description": desc, "date": date}),
        )
        .await;
    }

    let (status, all) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, march) = get(&app, &format!("{}?month=2024-03", uri)).await;
    let march = march.as_array().unwrap();
    assert_eq!(march.len(), 2);
    assert_eq!(march[0]["description"], "Cinema");

    let (_, groceries) = get(&app, &format!("{}?category=groceries", uri)).await;
    assert_eq!(groceries.as_array().unwrap().len(), 2);

    let (status, _) = get(&app, &format!("{}?month=March", uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ========== Budget & Goal Tests ==========

#[tokio::test]
async fn test_budget_lifecycle() {
    let app = setup_test_app();
    let (user_id, account_id) = seed_user_and_account(&app, 0.0).await;
    let budgets_uri = format!("/api/users/{}/budgets", user_id);

    let (status, budget) = send_json(
        &app,
        "POST",
        &budgets_uri,
        json!({"category": "dining", "month": "2024-03", "allocated": 100}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(budget["category"], "Dining");
    assert_eq!(budget["spent"].as_f64().unwrap(), 0.0);

    let (status, _) = send_json(
        &app,
        "POST",
        &budgets_uri,
        json!({"category": "Dining", "month": "2024-03", "allocated": 50}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    send_json(
        &app,
        "POST",
        &format!("/api/users/{}/transactions", user_id),
        json!({"account_id": account_id, "amount": 120, "description": "Sushi dinner", "date": "2024-03-15"}),
    )
    .await;

    let (_, budgets) = get(&app, &format!("{}?month=2024-03", budgets_uri)).await;
    let budgets = budgets.as_array().unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0]["spent"].as_f64().unwrap(), 120.0);

    let budget_uri = format!("/api/budgets/{}", budget["id"]);
    let (status, updated) = send_json(&app, "PUT", &budget_uri, json!({"allocated": 150})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["allocated"].as_f64().unwrap(), 150.0);
    assert_eq!(updated["spent"].as_f64().unwrap(), 120.0);

    let (status, _) = delete(&app, &budget_uri).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send_json(&app, "PUT", &budget_uri, json!({"allocated": 1})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_goal_lifecycle_and_progress() {
    let app = setup_test_app();
    let (user_id, _) = seed_user_and_account(&app, 0.0).await;
    let goals_uri = format!("/api/users/{}/goals", user_id);

    let (status, goal) = send_json(
        &app,
        "POST",
        &goals_uri,
        json!({"name": "Emergency fund", "target_amount": 1000, "priority": "large"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(goal["glyph"], "🎯");

    let (status, _) = send_json(
        &app,
        "POST",
        &goals_uri,
        json!({"name": "Nothing", "target_amount": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let goal_uri = format!("/api/goals/{}", goal["id"]);
    let (status, updated) =
        send_json(&app, "PUT", &goal_uri, json!({"current_amount": 250})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["current_amount"].as_f64().unwrap(), 250.0);

    let (status, progress) = get(&app, &format!("{}/progress", goal_uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["progress_percent"].as_f64().unwrap(), 25.0);
    assert_eq!(progress["amount_remaining"].as_f64().unwrap(), 750.0);
    assert_eq!(progress["status"], "healthy");

    let (_, goals) = get(&app, &goals_uri).await;
    assert_eq!(goals.as_array().unwrap().len(), 1);

    let (status, _) = delete(&app, &goal_uri).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app, &format!("{}/progress", goal_uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ========== Analytics & Advice Tests ==========

#[tokio::test]
async fn test_monthly_analytics() {
    let app = setup_test_app();
    let (user_id, account_id) = seed_user_and_account(&app, 0.0).await;
    let tx_uri = format!("/api/users/{}/transactions", user_id);

    for (amount, category) in [(600.0, "Groceries"), (900.0, "Rent")] {
        send_json(
            &app,
            "POST",
            &tx_uri,
            json!({"account_id": account_id, "amount": amount, "description": "x", "category": category, "date": "2024-03-05"}),
        )
        .await;
    }

    let (status, snapshot) = get(
        &app,
        &format!(
            "/api/users/{}/analytics/monthly?month=2024-03&monthly_income=1500",
            user_id
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["month"], "2024-03");
    assert_eq!(snapshot["income_basis"], "declared");
    assert_eq!(snapshot["total_spent"].as_f64().unwrap(), 1500.0);
    assert_eq!(snapshot["spending_percent"].as_f64().unwrap(), 100.0);
    assert_eq!(snapshot["recommendation"], "needs attention");
    assert_eq!(snapshot["recommendation_message"], "Needs attention");
    assert_eq!(snapshot["spending_by_category"][0]["category"], "Rent");
    let insights: Vec<&str> = snapshot["insights"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert!(insights
        .iter()
        .any(|i| i.contains("Rent") && i.contains("60%")));

    // No income transactions and no declared income
    let (_, snapshot) = get(
        &app,
        &format!("/api/users/{}/analytics/monthly?month=2024-03", user_id),
    )
    .await;
    assert_eq!(snapshot["income_basis"], "transactions");
    assert_eq!(snapshot["spending_percent"].as_f64().unwrap(), 0.0);

    let (status, _) = get(
        &app,
        &format!("/api/users/{}/analytics/monthly?month=2024-3", user_id),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/api/users/77/analytics/monthly?month=2024-03").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_budget_advice() {
    let app = setup_test_app();

    let (status, advice) = get(&app, "/api/budget-advice?total_income=1000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(advice["rule"], "50/30/20 Rule");
    assert_eq!(advice["amounts"]["needs"].as_f64().unwrap(), 500.0);
    assert_eq!(advice["amounts"]["wants"].as_f64().unwrap(), 300.0);
    assert_eq!(advice["amounts"]["savings"].as_f64().unwrap(), 200.0);

    for uri in [
        "/api/budget-advice?total_income=0",
        "/api/budget-advice?total_income=-5",
        "/api/budget-advice",
    ] {
        let (status, json) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(json["error"].as_str().unwrap().contains("total_income"));
    }
}

// ========== Classification Tests ==========

#[tokio::test]
async fn test_list_categories() {
    let app = setup_test_app();
    let (status, json) = get(&app, "/api/categories").await;
    assert_eq!(status, StatusCode::OK);
    let categories = json.as_array().unwrap();
    assert_eq!(categories.len(), 10);
    assert_eq!(categories[0]["name"], "Bills");
    assert_eq!(categories[0]["group"], "Bills");
}

#[tokio::test]
async fn test_classify_keywords() {
    let app = setup_test_app();

    let (status, json) = send_json(
        &app,
        "POST",
        "/api/classify",
        json!({"description": "Zzzz unknown merchant"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["category"], "Shopping");
    assert_eq!(json["confidence"].as_f64().unwrap(), 0.5);

    // Blank descriptions fall through to the default category
    let (status, json) = send_json(&app, "POST", "/api/classify", json!({"description": ""})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["category"], "Shopping");
    assert_eq!(json["confidence"].as_f64().unwrap(), 0.5);
}

#[tokio::test]
async fn test_classify_with_mock_backend() {
    let db = Database::in_memory().unwrap();
    let app = create_router_with_options(db, None, test_config(), Some(AIClient::mock()));

    let (status, json) = send_json(
        &app,
        "POST",
        "/api/classify",
        json!({"description": "NETFLIX.COM", "amount": 15.99}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["category"], "Entertainment");
    assert!((json["confidence"].as_f64().unwrap() - 0.9).abs() < 1e-9);

    let (_, health) = get(&app, "/api/health").await;
    assert_eq!(health["ai_configured"], true);
}

#[tokio::test]
async fn test_classify_falls_back_when_ollama_fails() {
    let server = MockOllamaServer::start_with(MockBehavior::ServerError).await;
    let db = Database::in_memory().unwrap();
    let app = create_router_with_options(
        db,
        None,
        test_config(),
        Some(AIClient::ollama(&server.url(), "llama3.2")),
    );

    let (status, json) = send_json(
        &app,
        "POST",
        "/api/classify",
        json!({"description": "gym membership"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["category"], "Fitness");
}

#[tokio::test]
async fn test_transaction_uses_ollama_classification() {
    let server = MockOllamaServer::start().await;
    let db = Database::in_memory().unwrap();
    let app = create_router_with_options(
        db,
        None,
        test_config(),
        Some(AIClient::ollama(&server.url(), "llama3.2")),
    );
    let (user_id, account_id) = seed_user_and_account(&app, 0.0).await;

    let (status, tx) = send_json(
        &app,
        "POST",
        &format!("/api/users/{}/transactions", user_id),
        json!({"account_id": account_id, "amount": 3.2, "description": "PRET A MANGER 0042"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tx["category"], "Dining");
}

// ========== Chat Tests ==========

#[tokio::test]
async fn test_chat_reply_and_history() {
    let app = setup_test_app();

    let (status, reply) = send_json(
        &app,
        "POST",
        "/api/chat",
        json!({"message": "How do I budget?", "user_id": 7}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["status"], "success");
    assert!(reply["reply"]
        .as_str()
        .unwrap()
        .starts_with("Based on the 50/30/20 rule"));

    let (status, history) = get(&app, "/api/chat/7/history").await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["role"], "user");
    assert_eq!(history[1]["role"], "assistant");

    // Anonymous messages go to the default session
    send_json(&app, "POST", "/api/chat", json!({"message": "hello"})).await;
    let (_, history) = get(&app, "/api/chat/default/history").await;
    assert_eq!(history.as_array().unwrap().len(), 2);

    let (status, json) = delete(&app, "/api/chat/7/history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    let (_, history) = get(&app, "/api/chat/7/history").await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_rejects_bad_messages() {
    let app = setup_test_app();

    let (status, _) = send_json(&app, "POST", "/api/chat", json!({"message": "  "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let long = "a".repeat(501);
    let (status, json) = send_json(&app, "POST", "/api/chat", json!({"message": long})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("too long"));
}

// ========== Audit Tests ==========

#[tokio::test]
async fn test_api_calls_are_audited() {
    let (app, db) = setup_test_app_with_db();
    seed_user_and_account(&app, 0.0).await;
    get(&app, "/api/categories").await;

    let entries = db.list_audit_log(&AuditFilter::with_limit(10)).unwrap();
    let actions: Vec<(&str, Option<&str>)> = entries
        .iter()
        .map(|e| (e.action.as_str(), e.entity_type.as_deref()))
        .collect();
    assert!(actions.contains(&("create", Some("user"))));
    assert!(actions.contains(&("create", Some("account"))));
    assert!(entries.iter().all(|e| e.actor == "local-dev"));

    let (status, json) = get(&app, "/api/audit?limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);

    let (status, json) = get(&app, "/api/audit?entity_type=account").await;
    assert_eq!(status, StatusCode::OK);
    let rows = json.as_array().unwrap();
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|r| r["entity_type"] == "account"));

    let (_, json) = get(&app, "/api/audit?actor=api-key").await;
    assert!(json.as_array().unwrap().is_empty());
}
