use crate::api::{
    self,
    handlers::AppState,
    models::{ApiError, ErrorResponse},
};
use crate::core::errors::LedgerError;
use crate::core::models::{Currency, ExpenseRecord, GroupLedger, Money};
use crate::infrastructure::storage::ExpenseStore;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use crate::tests::{balances, create_test_service, equal_expense};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::IntoResponse,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn test_app() -> (Router, InMemoryStorage) {
    let (service, storage, _) = create_test_service();
    let state = AppState {
        service: Arc::new(service),
        default_currency: Currency::Usd,
    };
    (api::app(state, Duration::from_secs(30)), storage)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = test_app();
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_expense_returns_created() {
    let (app, storage) = test_app();
    for member in ["alice", "bob"] {
        storage.add_member("trip", member).await;
    }

    let response = app
        .oneshot(post_json(
            "/api/expenses",
            json!({
                "group_id": "trip",
                "payer_id": "alice",
                "amount": 1250,
                "description": "Taxi",
                "split_between": [{ "user_id": "alice" }, { "user_id": "bob" }]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let expense: ExpenseRecord = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(expense.amount, Money::from_minor(1250));
    assert_eq!(expense.currency, Currency::Usd);
    assert_eq!(storage.group_snapshot("trip").await.unwrap(), vec![expense]);
}

#[tokio::test]
async fn test_create_expense_accepts_decimal_strings() {
    let (app, _) = test_app();

    let response = app
        .oneshot(post_json(
            "/api/expenses",
            json!({
                "group_id": "trip",
                "payer_id": "alice",
                "amount": "30.00",
                "currency": "EUR",
                "split_between": [
                    { "user_id": "alice", "share": "10.50" },
                    { "user_id": "bob", "share": "19.50" }
                ]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["amount"], 3000);
    assert_eq!(body["currency"], "EUR");
    assert_eq!(body["participants"][0]["share"], 1050);
}

#[tokio::test]
async fn test_create_expense_rejects_float_amount() {
    let (app, storage) = test_app();

    let response = app
        .oneshot(post_json(
            "/api/expenses",
            json!({
                "group_id": "trip",
                "payer_id": "alice",
                "amount": 12.5,
                "split_between": [{ "user_id": "alice" }]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(storage.group_snapshot("trip").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_expense_rejects_excess_precision() {
    let (app, _) = test_app();

    let response = app
        .oneshot(post_json(
            "/api/expenses",
            json!({
                "group_id": "trip",
                "payer_id": "alice",
                "amount": "10.005",
                "split_between": [{ "user_id": "alice" }]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert!(!error.retryable);
}

#[tokio::test]
async fn test_create_expense_rejects_non_member() {
    let (app, storage) = test_app();
    storage.add_member("trip", "alice").await;

    let response = app
        .oneshot(post_json(
            "/api/expenses",
            json!({
                "group_id": "trip",
                "payer_id": "alice",
                "amount": 100,
                "split_between": [{ "user_id": "alice" }, { "user_id": "mallory" }]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert!(error.error.contains("mallory"));
}

#[tokio::test]
async fn test_group_ledger_shape() {
    let (app, storage) = test_app();
    storage
        .save_expense(equal_expense("e1", "A", 300, &["A", "B", "C"]))
        .await
        .unwrap();

    let response = app.oneshot(get("/api/groups/g1/ledger")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({
            "group_id": "g1",
            "currency": "USD",
            "balances": { "A": 200, "B": -100, "C": -100 },
            "settlements": [
                { "from": "B", "to": "A", "amount": 100 },
                { "from": "C", "to": "A", "amount": 100 }
            ]
        })
    );
    let ledger: GroupLedger = serde_json::from_value(body).unwrap();
    assert_eq!(ledger.balances, balances(&[("A", 200), ("B", -100), ("C", -100)]));
}

#[tokio::test]
async fn test_settle_up_includes_display_amounts() {
    let (app, storage) = test_app();
    storage
        .save_expense(equal_expense("e1", "A", 1001, &["A", "B"]))
        .await
        .unwrap();

    let response = app.oneshot(get("/api/groups/g1/settle-up")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["balances"], json!({ "A": 500, "B": -500 }));
    assert_eq!(
        body["transfers"],
        json!([{ "from": "B", "to": "A", "amount": 500, "display_amount": "5.00" }])
    );
}

#[tokio::test]
async fn test_second_currency_is_unprocessable() {
    let (app, storage) = test_app();
    storage
        .save_expense(equal_expense("e1", "A", 100, &["A", "B"]))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json(
            "/api/expenses",
            json!({
                "group_id": "g1",
                "payer_id": "B",
                "amount": "4.00",
                "currency": "EUR",
                "split_between": [{ "user_id": "A" }, { "user_id": "B" }]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(storage.group_snapshot("g1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_expenses_and_activity_log() {
    let (app, storage) = test_app();
    storage
        .save_expense(equal_expense("e1", "A", 100, &["A", "B"]))
        .await
        .unwrap();

    let response = app.clone().oneshot(get("/api/groups/g1/expenses")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["id"], "e1");

    let response = app.oneshot(get("/api/logs")).await.unwrap();
    let logs = body_json(response).await;
    assert_eq!(logs[0]["action"], "EXPENSES_LISTED");
}

#[tokio::test]
async fn test_upstream_errors_are_retryable() {
    let response = ApiError(LedgerError::UpstreamUnavailable("store down".to_string())).into_response();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.headers().get(header::RETRY_AFTER).and_then(|v| v.to_str().ok()),
        Some("5")
    );
    let error: ErrorResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert!(error.retryable);
}

#[tokio::test]
async fn test_invariant_errors_are_internal() {
    for err in [
        LedgerError::InvariantViolation(Money::from_minor(3)),
        LedgerError::UnbalancedInput(Money::from_minor(-3)),
    ] {
        let response = ApiError(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }
}
