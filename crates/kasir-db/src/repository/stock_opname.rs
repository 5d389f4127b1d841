//! # Stock Opname Repository
//!
//! Persistence for physical stock counts (stock opname) and the
//! reconciliation they apply to the ledger.
//!
//! ## Atomic Commit Unit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      create() - one SQL transaction                     │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    SELECT name, stock FROM products        ← system stock read here,    │
//! │                                              never trusted from callers │
//! │    INSERT INTO stock_opnames (snapshot: name, system, actual, diff)     │
//! │    UPDATE products SET stock = actual      ← absolute set, not delta    │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reading the system stock inside the same transaction that overwrites it
//! means the recorded difference and the applied correction always agree,
//! even with sales committing concurrently.

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::product::ProductRepository;
use kasir_core::opname::reconcile;
use kasir_core::StockOpname;

/// Repository for stock opname database operations.
#[derive(Debug, Clone)]
pub struct StockOpnameRepository {
    pool: SqlitePool,
}

impl StockOpnameRepository {
    /// Creates a new StockOpnameRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockOpnameRepository { pool }
    }

    /// Records a physical count and corrects the product's stock to match,
    /// atomically.
    ///
    /// ## Arguments
    /// * `product_id` - The counted product
    /// * `actual_stock` - Physically counted quantity (already validated >= 0)
    /// * `notes` - Optional free-form annotation
    ///
    /// ## Returns
    /// The committed opname record, with system stock and difference as
    /// they were at commit time.
    pub async fn create(
        &self,
        product_id: &str,
        actual_stock: i64,
        notes: Option<&str>,
    ) -> DbResult<StockOpname> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(product_id, actual_stock, "Recording stock opname");

        let mut tx = self.pool.begin().await?;

        // Existence check and system-stock read in one statement, inside
        // the transaction that will apply the correction.
        let row = sqlx::query("SELECT name, stock FROM products WHERE id = ?1")
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Product", product_id))?;

        let product_name: String = row.get("name");
        let system_stock: i64 = row.get("stock");

        let reconciliation = reconcile(system_stock, actual_stock);

        sqlx::query(
            r#"
            INSERT INTO stock_opnames (
                id, product_id, product_name, system_stock, actual_stock,
                difference, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&id)
        .bind(product_id)
        .bind(&product_name)
        .bind(reconciliation.system_stock)
        .bind(reconciliation.actual_stock)
        .bind(reconciliation.difference)
        .bind(notes)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        ProductRepository::set_stock_absolute(&mut tx, product_id, actual_stock).await?;

        tx.commit().await?;

        info!(
            product_id,
            system_stock = reconciliation.system_stock,
            actual_stock,
            difference = reconciliation.difference,
            "Stock opname committed"
        );

        Ok(StockOpname {
            id,
            product_id: product_id.to_string(),
            product_name,
            system_stock: reconciliation.system_stock,
            actual_stock: reconciliation.actual_stock,
            difference: reconciliation.difference,
            notes: notes.map(str::to_string),
            created_at: now,
        })
    }

    /// Lists all opname records, newest first.
    pub async fn list(&self) -> DbResult<Vec<StockOpname>> {
        let records = sqlx::query_as::<_, StockOpname>(
            r#"
            SELECT id, product_id, product_name, system_stock, actual_stock,
                   difference, notes, created_at
            FROM stock_opnames
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use kasir_core::{Money, Product};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, id: &str, stock: i64) {
        let now = Utc::now();
        db.products()
            .insert(&Product {
                id: id.to_string(),
                name: format!("Product {id}"),
                sku: None,
                category: None,
                description: None,
                price: Money::from_minor(1000),
                stock,
                min_stock: 10,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_opname_records_shortfall_and_corrects_stock() {
        let db = test_db().await;
        seed_product(&db, "p1", 7).await;

        let opname = db
            .stock_opnames()
            .create("p1", 5, Some("monthly count"))
            .await
            .unwrap();

        assert_eq!(opname.system_stock, 7);
        assert_eq!(opname.actual_stock, 5);
        assert_eq!(opname.difference, -2);
        assert_eq!(opname.product_name, "Product p1");

        let product = db.products().get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(product.stock, 5);
    }

    #[tokio::test]
    async fn test_opname_surplus() {
        let db = test_db().await;
        seed_product(&db, "p1", 3).await;

        let opname = db.stock_opnames().create("p1", 8, None).await.unwrap();

        assert_eq!(opname.difference, 5);
        let product = db.products().get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(product.stock, 8);
    }

    #[tokio::test]
    async fn test_opname_resolves_negative_system_stock() {
        let db = test_db().await;
        seed_product(&db, "p1", -3).await;

        // Oversold ledger corrected by a physical count.
        let opname = db.stock_opnames().create("p1", 4, None).await.unwrap();

        assert_eq!(opname.system_stock, -3);
        assert_eq!(opname.difference, 7);
        let product = db.products().get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(product.stock, 4);
    }

    #[tokio::test]
    async fn test_opname_unknown_product_leaves_no_residue() {
        let db = test_db().await;

        let err = db
            .stock_opnames()
            .create("missing", 5, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        assert!(db.stock_opnames().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_opname_history_preserved_after_product_edit() {
        let db = test_db().await;
        seed_product(&db, "p1", 10).await;

        let opname = db.stock_opnames().create("p1", 9, None).await.unwrap();

        let mut edited = db.products().get_by_id("p1").await.unwrap().unwrap();
        edited.name = "Renamed".to_string();
        db.products().update(&edited).await.unwrap();

        let history = db.stock_opnames().list().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, opname.id);
        assert_eq!(history[0].product_name, "Product p1");
    }
}
