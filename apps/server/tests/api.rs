//! End-to-end API tests against the full router and an in-memory database.
//!
//! Each test builds its own isolated app; requests go through the router via
//! `tower::ServiceExt::oneshot`, no listening socket involved.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use kasir_db::{Database, DbConfig};

async fn test_app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    kasir_server::app(db)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

/// Creates a product and returns its id.
async fn create_product(app: &Router, name: &str, price: i64, stock: i64) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/products",
        Some(json!({ "name": name, "price": price, "stock": stock })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn product_stock(app: &Router, id: &str) -> i64 {
    let (status, body) = send(app, "GET", &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["stock"].as_i64().unwrap()
}

// =============================================================================
// Liveness
// =============================================================================

#[tokio::test]
async fn index_reports_ok() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn product_crud_round_trip() {
    let app = test_app().await;

    let id = create_product(&app, "Kopi Susu", 5000, 10).await;

    let (status, body) = send(&app, "GET", "/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "Kopi Susu");
    assert_eq!(body["data"][0]["price"], 5000);
    // minStock defaulted, stock 10 → not low
    assert_eq!(body["data"][0]["minStock"], 10);
    assert_eq!(body["data"][0]["lowStock"], false);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/products/{id}"),
        Some(json!({ "name": "Kopi Susu 250ml", "price": 6000, "stock": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Kopi Susu 250ml");
    assert_eq!(body["data"]["price"], 6000);
    // stock in a PUT body is ignored; the ledger owns it
    assert_eq!(body["data"]["stock"], 10);

    let (status, _) = send(&app, "DELETE", &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn product_validation_rejected() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({ "name": "", "price": 5000 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({ "name": "Negative", "price": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Transactions
// =============================================================================

#[tokio::test]
async fn sale_decrements_stock_and_computes_totals() {
    let app = test_app().await;
    let id = create_product(&app, "Kopi", 5000, 10).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(json!({
            "items": [{ "productId": id, "quantity": 3 }],
            "paymentMethod": "cash",
            "paymentAmount": 15000
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total"], 15000);
    assert_eq!(body["data"]["changeAmount"], 0);
    assert_eq!(body["data"]["items"][0]["productName"], "Kopi");
    assert_eq!(body["data"]["items"][0]["subtotal"], 15000);

    assert_eq!(product_stock(&app, &id).await, 7);
}

#[tokio::test]
async fn sale_ignores_client_prices() {
    let app = test_app().await;
    let id = create_product(&app, "Kopi", 5000, 10).await;

    // Client tries to pay a forged unit price; the catalog price wins.
    let (status, body) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(json!({
            "items": [{ "productId": id, "quantity": 1, "price": 1, "subtotal": 1 }],
            "total": 1,
            "paymentAmount": 5000
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["total"], 5000);
}

#[tokio::test]
async fn insufficient_payment_rejected_without_residue() {
    let app = test_app().await;
    let id = create_product(&app, "Kopi", 5000, 10).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(json!({
            "items": [{ "productId": id, "quantity": 3 }],
            "paymentAmount": 100
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    // Nothing persisted, stock untouched.
    assert_eq!(product_stock(&app, &id).await, 10);
    let (_, body) = send(&app, "GET", "/api/transactions", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_product_in_cart_rejected() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(json!({
            "items": [{ "productId": "ghost", "quantity": 1 }],
            "paymentAmount": 5000
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn empty_cart_rejected() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(json!({ "items": [], "paymentAmount": 0 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversell_goes_negative() {
    let app = test_app().await;
    let id = create_product(&app, "Kopi", 1000, 2).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(json!({
            "items": [{ "productId": id, "quantity": 5 }],
            "paymentAmount": 5000
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(product_stock(&app, &id).await, -3);
}

#[tokio::test]
async fn transaction_list_includes_items() {
    let app = test_app().await;
    let id = create_product(&app, "Kopi", 5000, 10).await;

    send(
        &app,
        "POST",
        "/api/transactions",
        Some(json!({
            "items": [{ "productId": id, "quantity": 2 }],
            "paymentAmount": 20000
        })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/transactions", None).await;
    assert_eq!(status, StatusCode::OK);
    let transactions = body["data"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["total"], 10000);
    assert_eq!(transactions[0]["changeAmount"], 10000);
    assert_eq!(transactions[0]["items"].as_array().unwrap().len(), 1);
}

// =============================================================================
// Stock Opnames
// =============================================================================

#[tokio::test]
async fn opname_reconciles_after_sale() {
    let app = test_app().await;
    let id = create_product(&app, "Kopi", 5000, 10).await;

    // Sell 3, system stock becomes 7.
    send(
        &app,
        "POST",
        "/api/transactions",
        Some(json!({
            "items": [{ "productId": id, "quantity": 3 }],
            "paymentAmount": 15000
        })),
    )
    .await;

    // Physical count finds 5: shrinkage of 2.
    let (status, body) = send(
        &app,
        "POST",
        "/api/stock-opnames",
        Some(json!({ "productId": id, "actualStock": 5, "notes": "monthly count" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["systemStock"], 7);
    assert_eq!(body["data"]["actualStock"], 5);
    assert_eq!(body["data"]["difference"], -2);

    assert_eq!(product_stock(&app, &id).await, 5);

    let (_, body) = send(&app, "GET", "/api/stock-opnames", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn opname_rejects_negative_count() {
    let app = test_app().await;
    let id = create_product(&app, "Kopi", 5000, 10).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/stock-opnames",
        Some(json!({ "productId": id, "actualStock": -1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(product_stock(&app, &id).await, 10);
}

#[tokio::test]
async fn opname_unknown_product_rejected() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/stock-opnames",
        Some(json!({ "productId": "ghost", "actualStock": 5 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Finances & Reports
// =============================================================================

#[tokio::test]
async fn finance_crud_and_summary() {
    let app = test_app().await;
    let id = create_product(&app, "Kopi", 5000, 3).await;

    // One sale of 5000.
    send(
        &app,
        "POST",
        "/api/transactions",
        Some(json!({
            "items": [{ "productId": id, "quantity": 1 }],
            "paymentAmount": 5000
        })),
    )
    .await;

    // Manual income and expense.
    let (status, body) = send(
        &app,
        "POST",
        "/api/finances",
        Some(json!({
            "type": "income",
            "category": "other",
            "amount": 2000,
            "date": "2026-08-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let income_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["type"], "income");

    send(
        &app,
        "POST",
        "/api/finances",
        Some(json!({
            "type": "expense",
            "category": "rent",
            "amount": 3000,
            "date": "2026-08-02"
        })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/reports/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalSales"], 5000);
    assert_eq!(body["data"]["totalIncome"], 2000);
    assert_eq!(body["data"]["totalExpense"], 3000);
    // 5000 + 2000 - 3000
    assert_eq!(body["data"]["balance"], 4000);
    assert_eq!(body["data"]["transactionCount"], 1);
    // stock went 3 → 2, below minStock 10
    assert_eq!(
        body["data"]["lowStockProducts"].as_array().unwrap().len(),
        1
    );

    // Edit then delete the income entry.
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/finances/{income_id}"),
        Some(json!({
            "type": "income",
            "category": "other",
            "amount": 2500,
            "date": "2026-08-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["amount"], 2500);

    let (status, _) = send(&app, "DELETE", &format!("/api/finances/{income_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/finances", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn finance_validation_rejected() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/finances",
        Some(json!({
            "type": "expense",
            "category": "rent",
            "amount": 0,
            "date": "2026-08-01"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
