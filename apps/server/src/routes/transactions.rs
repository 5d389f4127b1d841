//! # Transaction Routes
//!
//! The sale endpoint. The request carries only product ids and quantities;
//! names, prices, subtotals and the total are snapshotted from the catalog
//! server-side. A client that sends its own price or total fields is
//! silently ignored.
//!
//! ## POST Flow
//! ```text
//! body items ──► load catalog ──► price_cart ──► check_payment ──► commit
//!                                     │               │
//!                                 400/404 out     400 out, nothing
//!                                 before any      persisted
//!                                 mutation
//! ```

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use kasir_core::cart::{check_payment, price_cart, CartLine};
use kasir_core::{Money, PaymentMethod, TransactionItem, TransactionWithItems};

use crate::error::{ApiError, ApiResult};
use crate::routes::{ok, Envelope};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one))
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub items: Vec<CartLineRequest>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub payment_amount: i64,
}

/// Only the id and quantity are read; any other per-line fields the client
/// sends (name, price, subtotal) are dropped by deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineRequest {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: String,
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub payment_amount: Money,
    pub change_amount: Money,
    pub created_at: DateTime<Utc>,
    pub items: Vec<TransactionItemDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItemDto {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub price: Money,
    pub subtotal: Money,
}

impl From<TransactionItem> for TransactionItemDto {
    fn from(item: TransactionItem) -> Self {
        TransactionItemDto {
            id: item.id,
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            price: item.price,
            subtotal: item.subtotal,
        }
    }
}

impl From<TransactionWithItems> for TransactionDto {
    fn from(tx: TransactionWithItems) -> Self {
        TransactionDto {
            id: tx.transaction.id,
            total: tx.transaction.total,
            payment_method: tx.transaction.payment_method,
            payment_amount: tx.transaction.payment_amount,
            change_amount: tx.transaction.change_amount,
            created_at: tx.transaction.created_at,
            items: tx.items.into_iter().map(Into::into).collect(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn list(State(state): State<AppState>) -> ApiResult<Json<Envelope<Vec<TransactionDto>>>> {
    let transactions = state.db.transactions().list().await?;
    Ok(ok(transactions.into_iter().map(Into::into).collect()))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<TransactionDto>>> {
    let transaction = state
        .db
        .transactions()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Transaction not found: {id}")))?;

    Ok(ok(transaction.into()))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateTransactionRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<TransactionDto>>)> {
    let lines: Vec<CartLine> = body
        .items
        .iter()
        .map(|item| CartLine {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
        })
        .collect();

    let ids: Vec<String> = lines.iter().map(|l| l.product_id.clone()).collect();
    let catalog = state.db.products().get_many(&ids).await?;

    // All rejections happen here, before anything is written.
    let cart = price_cart(&lines, &catalog)?;
    let payment = Money::from_minor(body.payment_amount);
    let change = check_payment(cart.total, payment)?;

    let committed = state
        .db
        .transactions()
        .create(&cart, body.payment_method, payment, change)
        .await?;

    info!(
        id = %committed.transaction.id,
        total = %committed.transaction.total,
        "Sale recorded"
    );

    Ok((StatusCode::CREATED, ok(committed.into())))
}
