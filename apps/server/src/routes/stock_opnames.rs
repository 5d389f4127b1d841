//! # Stock Opname Routes
//!
//! Physical count submission and history. The request carries only the
//! product id, the counted quantity and optional notes; the system stock and
//! difference are read and computed inside the commit, never taken from the
//! client.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use kasir_core::opname::validate_count;
use kasir_core::StockOpname;

use crate::error::ApiResult;
use crate::routes::{ok, Envelope};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list).post(create))
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStockOpnameRequest {
    pub product_id: String,
    pub actual_stock: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockOpnameDto {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub system_stock: i64,
    pub actual_stock: i64,
    pub difference: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<StockOpname> for StockOpnameDto {
    fn from(o: StockOpname) -> Self {
        StockOpnameDto {
            id: o.id,
            product_id: o.product_id,
            product_name: o.product_name,
            system_stock: o.system_stock,
            actual_stock: o.actual_stock,
            difference: o.difference,
            notes: o.notes,
            created_at: o.created_at,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn list(State(state): State<AppState>) -> ApiResult<Json<Envelope<Vec<StockOpnameDto>>>> {
    let records = state.db.stock_opnames().list().await?;
    Ok(ok(records.into_iter().map(Into::into).collect()))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateStockOpnameRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<StockOpnameDto>>)> {
    validate_count(body.actual_stock)?;

    let record = state
        .db
        .stock_opnames()
        .create(&body.product_id, body.actual_stock, body.notes.as_deref())
        .await?;

    info!(
        product_id = %record.product_id,
        difference = record.difference,
        "Stock opname recorded"
    );

    Ok((StatusCode::CREATED, ok(record.into())))
}
