//! # Route Handlers
//!
//! One module per resource, mounted under `/api`. Every success response is
//! wrapped in `{"success": true, "data": …}`; every failure goes through
//! [`crate::error::ApiError`] as `{"success": false, "message": …}`.
//!
//! Wire field names are camelCase. Handlers only trust the fields they
//! declare; anything else a client sends (prices, totals, stock figures) is
//! ignored and recomputed server-side.

pub mod finances;
pub mod products;
pub mod reports;
pub mod stock_opnames;
pub mod transactions;

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;

use crate::AppState;

/// The `{"success": true, "data": …}` envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

/// Wraps a payload in the success envelope.
pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
    })
}

/// Builds the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .nest("/api/products", products::router())
        .nest("/api/transactions", transactions::router())
        .nest("/api/stock-opnames", stock_opnames::router())
        .nest("/api/finances", finances::router())
        .nest("/api/reports", reports::router())
}

/// Liveness endpoint.
async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "kasir-pos-api",
            "version": env!("CARGO_PKG_VERSION"),
            "status": "ok",
        }
    }))
}
