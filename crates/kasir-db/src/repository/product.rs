//! # Product Repository
//!
//! Catalog CRUD plus the **stock ledger**: the single source of truth for
//! each product's current stock count.
//!
//! ## Stock Ledger Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: read-modify-write in application code                        │
//! │     let stock = SELECT stock ...;                                       │
//! │     UPDATE products SET stock = {stock - 3}   ← lost updates            │
//! │                                                                         │
//! │  ✅ CORRECT: atomic delta evaluated by SQLite                           │
//! │     UPDATE products SET stock = stock - 3                               │
//! │                                                                         │
//! │  Register A: sells 3 → stock - 3                                        │
//! │  Register B: sells 2 → stock - 2                                        │
//! │  Final stock = initial - 5 regardless of interleaving                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ledger enforces no stock floor: a sale may drive stock negative.
//! Oversell is surfaced by the low-stock indicator, not blocked.
//!
//! Ledger mutations take a `&mut SqliteConnection` so they can only run
//! inside the same database transaction as the record that caused them
//! (sale or opname) - never as an independent statement.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kasir_core::Product;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

const PRODUCT_COLUMNS: &str =
    "id, name, sku, category, description, price, stock, min_stock, created_at, updated_at";

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products, newest first.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Loads the catalog rows for a set of product ids (cart pricing).
    ///
    /// Missing ids simply don't appear in the result; the pricing layer
    /// reports `ProductNotFound` for them before anything is persisted.
    pub async fn get_many(&self, ids: &[String]) -> DbResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        // sqlx has no array binding for SQLite; build the placeholder list.
        let placeholders = (1..=ids.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id IN ({placeholders})");

        let mut query = sqlx::query_as::<_, Product>(&sql);
        for id in ids {
            query = query.bind(id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Inserts a new product.
    ///
    /// ## Arguments
    /// * `product` - Product to insert (id and timestamps generated beforehand)
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, sku, category, description,
                price, stock, min_stock, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(&product.category)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.min_stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Updates a product's catalog fields.
    ///
    /// `stock` is deliberately NOT writable here: stock only moves through
    /// the ledger operations below, committed together with the transaction
    /// or opname record that caused the change.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                sku = ?3,
                category = ?4,
                description = ?5,
                price = ?6,
                min_stock = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(&product.category)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.min_stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Deletes a product.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Stock Ledger Operations
    // =========================================================================

    /// Applies a stock delta and returns the new stock level.
    ///
    /// The delta form (`stock = stock + ?`) is evaluated atomically by
    /// SQLite, so concurrent sales on the same product can never lose an
    /// update. Negative results are allowed (oversell policy).
    ///
    /// ## Errors
    /// `DbError::NotFound` if the product id doesn't resolve at apply time.
    pub async fn apply_stock_delta(
        conn: &mut SqliteConnection,
        product_id: &str,
        delta: i64,
    ) -> DbResult<i64> {
        debug!(id = %product_id, delta = %delta, "Applying stock delta");

        let now = Utc::now();

        let new_stock: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET stock = stock + ?2, updated_at = ?3
            WHERE id = ?1
            RETURNING stock
            "#,
        )
        .bind(product_id)
        .bind(delta)
        .bind(now)
        .fetch_optional(&mut *conn)
        .await?;

        new_stock.ok_or_else(|| DbError::not_found("Product", product_id))
    }

    /// Sets stock to an absolute value and returns it.
    ///
    /// Used by the opname processor, which computes and freezes the delta
    /// for audit purposes before calling this.
    pub async fn set_stock_absolute(
        conn: &mut SqliteConnection,
        product_id: &str,
        value: i64,
    ) -> DbResult<i64> {
        debug!(id = %product_id, value = %value, "Setting absolute stock");

        let now = Utc::now();

        let new_stock: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET stock = ?2, updated_at = ?3
            WHERE id = ?1
            RETURNING stock
            "#,
        )
        .bind(product_id)
        .bind(value)
        .bind(now)
        .fetch_optional(&mut *conn)
        .await?;

        new_stock.ok_or_else(|| DbError::not_found("Product", product_id))
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
