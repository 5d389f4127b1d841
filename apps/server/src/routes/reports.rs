//! # Report Routes
//!
//! Dashboard summary. Every figure is derived on read from the transaction,
//! finance and product tables; nothing here is stored or cached.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use kasir_core::report::{balance, finance_totals, low_stock};
use kasir_core::Money;

use crate::error::ApiResult;
use crate::routes::products::ProductDto;
use crate::routes::{ok, Envelope};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/summary", get(summary))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDto {
    /// Revenue from all committed transactions.
    pub total_sales: Money,
    /// Manual income ledger total.
    pub total_income: Money,
    /// Manual expense ledger total.
    pub total_expense: Money,
    /// total_sales + total_income - total_expense.
    pub balance: Money,
    pub transaction_count: i64,
    pub low_stock_products: Vec<ProductDto>,
}

async fn summary(State(state): State<AppState>) -> ApiResult<Json<Envelope<SummaryDto>>> {
    let total_sales = state.db.transactions().total_sales().await?;
    let transaction_count = state.db.transactions().count().await?;

    let finances = state.db.finances().list().await?;
    let totals = finance_totals(&finances);

    let products = state.db.products().list().await?;
    let low_stock_products = low_stock(&products)
        .into_iter()
        .cloned()
        .map(ProductDto::from)
        .collect();

    Ok(ok(SummaryDto {
        total_sales,
        total_income: totals.income,
        total_expense: totals.expense,
        balance: balance(total_sales, totals),
        transaction_count,
        low_stock_products,
    }))
}
