//! # Finance Routes
//!
//! Manual income/expense bookkeeping. Unlike transactions these records are
//! editable and deletable; they carry no stock linkage.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use kasir_core::validation::{validate_amount, validate_category};
use kasir_core::{FinanceKind, FinanceRecord, Money};
use kasir_db::repository::finance::generate_finance_id;

use crate::error::{ApiError, ApiResult};
use crate::routes::{ok, Envelope};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).put(update).delete(remove))
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceRequest {
    #[serde(rename = "type")]
    pub kind: FinanceKind,
    pub category: String,
    pub amount: i64,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceDto {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FinanceKind,
    pub category: String,
    pub amount: Money,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<FinanceRecord> for FinanceDto {
    fn from(r: FinanceRecord) -> Self {
        FinanceDto {
            id: r.id,
            kind: r.kind,
            category: r.category,
            amount: r.amount,
            description: r.description,
            date: r.date,
            created_at: r.created_at,
        }
    }
}

fn validate(body: &FinanceRequest) -> ApiResult<Money> {
    validate_category(&body.category)?;
    let amount = Money::from_minor(body.amount);
    validate_amount(amount)?;
    Ok(amount)
}

// =============================================================================
// Handlers
// =============================================================================

async fn list(State(state): State<AppState>) -> ApiResult<Json<Envelope<Vec<FinanceDto>>>> {
    let records = state.db.finances().list().await?;
    Ok(ok(records.into_iter().map(Into::into).collect()))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<FinanceDto>>> {
    let record = state
        .db
        .finances()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Finance record not found: {id}")))?;

    Ok(ok(record.into()))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<FinanceRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<FinanceDto>>)> {
    let amount = validate(&body)?;

    let record = FinanceRecord {
        id: generate_finance_id(),
        kind: body.kind,
        category: body.category.trim().to_string(),
        amount,
        description: body.description,
        date: body.date,
        created_at: Utc::now(),
    };

    state.db.finances().insert(&record).await?;
    Ok((StatusCode::CREATED, ok(record.into())))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<FinanceRequest>,
) -> ApiResult<Json<Envelope<FinanceDto>>> {
    let amount = validate(&body)?;

    let mut record = state
        .db
        .finances()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Finance record not found: {id}")))?;

    record.kind = body.kind;
    record.category = body.category.trim().to_string();
    record.amount = amount;
    record.description = body.description;
    record.date = body.date;

    state.db.finances().update(&record).await?;
    Ok(ok(record.into()))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<serde_json::Value>>> {
    state.db.finances().delete(&id).await?;
    Ok(ok(serde_json::json!({ "id": id })))
}
