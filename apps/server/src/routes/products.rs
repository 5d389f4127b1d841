//! # Product Routes
//!
//! Catalog CRUD. Stock is visible here but never writable: the PUT handler
//! deliberately has no stock field, because stock only moves through sales
//! and opnames.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kasir_core::error::ValidationError;
use kasir_core::validation::{
    validate_category, validate_min_stock, validate_price, validate_product_name,
};
use kasir_core::{Money, Product, DEFAULT_MIN_STOCK};
use kasir_db::repository::product::generate_product_id;

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

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Money,
    pub stock: i64,
    pub min_stock: i64,
    /// Recomputed on every read, never stored.
    pub low_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        let low_stock = p.is_low_stock();
        ProductDto {
            id: p.id,
            name: p.name,
            sku: p.sku,
            category: p.category,
            description: p.description,
            price: p.price,
            stock: p.stock,
            min_stock: p.min_stock,
            low_stock,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub price: i64,
    /// Initial stock; defaults to 0.
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub min_stock: Option<i64>,
}

/// No `stock` field: catalog edits never touch the ledger.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub price: i64,
    #[serde(default)]
    pub min_stock: Option<i64>,
}

// =============================================================================
// Handlers
// =============================================================================

async fn list(State(state): State<AppState>) -> ApiResult<Json<Envelope<Vec<ProductDto>>>> {
    let products = state.db.products().list().await?;
    Ok(ok(products.into_iter().map(ProductDto::from).collect()))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<ProductDto>>> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {id}")))?;

    Ok(ok(product.into()))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<ProductDto>>)> {
    validate_product_name(&body.name)?;
    if let Some(ref category) = body.category {
        validate_category(category)?;
    }

    let price = Money::from_minor(body.price);
    validate_price(price)?;

    let stock = body.stock.unwrap_or(0);
    if stock < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "stock".to_string(),
        }
        .into());
    }

    let min_stock = body.min_stock.unwrap_or(DEFAULT_MIN_STOCK);
    validate_min_stock(min_stock)?;

    let now = Utc::now();
    let product = Product {
        id: generate_product_id(),
        name: body.name.trim().to_string(),
        sku: body.sku,
        category: body.category,
        description: body.description,
        price,
        stock,
        min_stock,
        created_at: now,
        updated_at: now,
    };

    let inserted = state.db.products().insert(&product).await?;
    Ok((StatusCode::CREATED, ok(inserted.into())))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProductRequest>,
) -> ApiResult<Json<Envelope<ProductDto>>> {
    validate_product_name(&body.name)?;
    if let Some(ref category) = body.category {
        validate_category(category)?;
    }

    let price = Money::from_minor(body.price);
    validate_price(price)?;

    let mut product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {id}")))?;

    product.name = body.name.trim().to_string();
    product.sku = body.sku;
    product.category = body.category;
    product.description = body.description;
    product.price = price;
    if let Some(min_stock) = body.min_stock {
        validate_min_stock(min_stock)?;
        product.min_stock = min_stock;
    }

    state.db.products().update(&product).await?;

    // Re-read for the refreshed updated_at.
    let updated = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {id}")))?;

    Ok(ok(updated.into()))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<serde_json::Value>>> {
    state.db.products().delete(&id).await?;
    Ok(ok(serde_json::json!({ "id": id })))
}
