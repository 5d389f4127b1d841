//! # Transaction Repository
//!
//! Persistence for sales: the atomic half of the transaction processor.
//!
//! ## Atomic Commit Unit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      create() - one SQL transaction                     │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    INSERT INTO transactions (header: total, payment, change)            │
//! │    for each priced line:                                                │
//! │      INSERT INTO transaction_items (snapshots frozen)                   │
//! │      UPDATE products SET stock = stock - qty   ← ledger delta           │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure → ROLLBACK: no orphan header, no partial items,            │
//! │  no stock change without its causing record.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transactions are immutable history: this repository has no update or
//! delete operation, and never will.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::product::ProductRepository;
use kasir_core::cart::PricedCart;
use kasir_core::{Money, PaymentMethod, Transaction, TransactionItem, TransactionWithItems};

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Commits a priced cart as a transaction, atomically with its stock
    /// deltas.
    ///
    /// ## Arguments
    /// * `cart` - Already validated and priced (snapshots frozen)
    /// * `payment_method` - How the customer paid
    /// * `payment_amount` - Tendered amount, already checked against the total
    /// * `change_amount` - payment_amount - total
    ///
    /// ## Returns
    /// The committed transaction re-read with its items attached, for
    /// receipt generation by the caller.
    pub async fn create(
        &self,
        cart: &PricedCart,
        payment_method: PaymentMethod,
        payment_amount: Money,
        change_amount: Money,
    ) -> DbResult<TransactionWithItems> {
        let transaction_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(
            id = %transaction_id,
            total = %cart.total,
            lines = cart.lines.len(),
            "Committing transaction"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, total, payment_method, payment_amount, change_amount, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&transaction_id)
        .bind(cart.total)
        .bind(payment_method)
        .bind(payment_amount)
        .bind(change_amount)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for line in &cart.lines {
            sqlx::query(
                r#"
                INSERT INTO transaction_items (
                    id, transaction_id, product_id, product_name, quantity, price, subtotal
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&transaction_id)
            .bind(&line.product_id)
            .bind(&line.product_name)
            .bind(line.quantity)
            .bind(line.price)
            .bind(line.subtotal)
            .execute(&mut *tx)
            .await?;

            // Ledger delta in the same transaction as the record that
            // caused it; rollback undoes both.
            ProductRepository::apply_stock_delta(&mut tx, &line.product_id, -line.quantity)
                .await?;
        }

        tx.commit().await?;

        info!(id = %transaction_id, total = %cart.total, "Transaction committed");

        self.get_by_id(&transaction_id)
            .await?
            .ok_or_else(|| DbError::not_found("Transaction", &transaction_id))
    }

    /// Gets a transaction with its items.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<TransactionWithItems>> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, total, payment_method, payment_amount, change_amount, created_at
            FROM transactions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(transaction) = transaction else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, TransactionItem>(
            r#"
            SELECT id, transaction_id, product_id, product_name, quantity, price, subtotal
            FROM transaction_items
            WHERE transaction_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(TransactionWithItems { transaction, items }))
    }

    /// Lists all transactions with nested items, newest first.
    pub async fn list(&self) -> DbResult<Vec<TransactionWithItems>> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, total, payment_method, payment_amount, change_amount, created_at
            FROM transactions
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, TransactionItem>(
            r#"
            SELECT id, transaction_id, product_id, product_name, quantity, price, subtotal
            FROM transaction_items
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_transaction: HashMap<String, Vec<TransactionItem>> = HashMap::new();
        for item in items {
            by_transaction
                .entry(item.transaction_id.clone())
                .or_default()
                .push(item);
        }

        Ok(transactions
            .into_iter()
            .map(|transaction| {
                let items = by_transaction
                    .remove(&transaction.id)
                    .unwrap_or_default();
                TransactionWithItems { transaction, items }
            })
            .collect())
    }

    /// Counts all committed transactions.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Total revenue across all committed transactions.
    ///
    /// Read-side figure for the dashboard balance; recomputed on read,
    /// never stored.
    pub async fn total_sales(&self) -> DbResult<Money> {
        let total: Option<i64> = sqlx::query_scalar("SELECT SUM(total) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(Money::from_minor(total.unwrap_or(0)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use kasir_core::cart::{price_cart, CartLine};
    use kasir_core::Product;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, id: &str, price: i64, stock: i64) {
        let now = Utc::now();
        db.products()
            .insert(&Product {
                id: id.to_string(),
                name: format!("Product {id}"),
                sku: None,
                category: None,
                description: None,
                price: Money::from_minor(price),
                stock,
                min_stock: 10,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }

    fn line(product_id: &str, quantity: i64) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    async fn priced(db: &Database, lines: &[CartLine]) -> PricedCart {
        let ids: Vec<String> = lines.iter().map(|l| l.product_id.clone()).collect();
        let catalog = db.products().get_many(&ids).await.unwrap();
        price_cart(lines, &catalog).unwrap()
    }

    #[tokio::test]
    async fn test_create_decrements_stock() {
        let db = test_db().await;
        seed_product(&db, "p1", 5000, 10).await;

        let cart = priced(&db, &[line("p1", 3)]).await;
        let committed = db
            .transactions()
            .create(
                &cart,
                PaymentMethod::Cash,
                Money::from_minor(15000),
                Money::zero(),
            )
            .await
            .unwrap();

        assert_eq!(committed.transaction.total, Money::from_minor(15000));
        assert_eq!(committed.items.len(), 1);
        assert_eq!(committed.items[0].subtotal, Money::from_minor(15000));

        let product = db.products().get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(product.stock, 7);
    }

    #[tokio::test]
    async fn test_total_equals_sum_of_subtotals() {
        let db = test_db().await;
        seed_product(&db, "p1", 5000, 10).await;
        seed_product(&db, "p2", 2500, 8).await;

        let cart = priced(&db, &[line("p1", 2), line("p2", 3)]).await;
        let committed = db
            .transactions()
            .create(
                &cart,
                PaymentMethod::Card,
                Money::from_minor(17500),
                Money::zero(),
            )
            .await
            .unwrap();

        let summed: Money = committed.items.iter().map(|i| i.subtotal).sum();
        assert_eq!(committed.transaction.total, summed);
    }

    #[tokio::test]
    async fn test_items_snapshot_survives_product_edit() {
        let db = test_db().await;
        seed_product(&db, "p1", 5000, 10).await;

        let cart = priced(&db, &[line("p1", 1)]).await;
        let committed = db
            .transactions()
            .create(
                &cart,
                PaymentMethod::Cash,
                Money::from_minor(5000),
                Money::zero(),
            )
            .await
            .unwrap();

        // Edit the product after the sale.
        let mut edited = db.products().get_by_id("p1").await.unwrap().unwrap();
        edited.name = "Renamed".to_string();
        edited.price = Money::from_minor(9999);
        db.products().update(&edited).await.unwrap();

        // Re-read: the receipt is unchanged.
        let reread = db
            .transactions()
            .get_by_id(&committed.transaction.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reread.items[0].product_name, "Product p1");
        assert_eq!(reread.items[0].price, Money::from_minor(5000));
        assert_eq!(reread.transaction.total, committed.transaction.total);
    }

    #[tokio::test]
    async fn test_oversell_goes_negative() {
        let db = test_db().await;
        seed_product(&db, "p1", 1000, 2).await;

        let cart = priced(&db, &[line("p1", 5)]).await;
        db.transactions()
            .create(
                &cart,
                PaymentMethod::Cash,
                Money::from_minor(5000),
                Money::zero(),
            )
            .await
            .unwrap();

        let product = db.products().get_by_id("p1").await.unwrap().unwrap();
        // Permitted and exact: never clamped to zero.
        assert_eq!(product.stock, -3);
    }

    #[tokio::test]
    async fn test_failed_commit_leaves_no_residue() {
        let db = test_db().await;
        seed_product(&db, "p1", 5000, 10).await;

        // Price against a catalog snapshot, then delete the product so the
        // ledger delta inside the commit fails.
        let cart = priced(&db, &[line("p1", 1)]).await;
        db.products().delete("p1").await.unwrap();

        let err = db
            .transactions()
            .create(
                &cart,
                PaymentMethod::Cash,
                Money::from_minor(5000),
                Money::zero(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::NotFound { .. } | DbError::ForeignKeyViolation { .. }
        ));

        // Rollback: no orphan transaction, no orphan items.
        assert!(db.transactions().list().await.unwrap().is_empty());
        let orphan_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transaction_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphan_items, 0);
    }

    #[tokio::test]
    async fn test_concurrent_sales_lose_no_updates() {
        let db = test_db().await;
        seed_product(&db, "p1", 1000, 10).await;

        let mut handles = Vec::new();
        for _ in 0..10 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                let cart = priced(&db, &[line("p1", 1)]).await;
                db.transactions()
                    .create(
                        &cart,
                        PaymentMethod::Cash,
                        Money::from_minor(1000),
                        Money::zero(),
                    )
                    .await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let product = db.products().get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(product.stock, 0);
        assert_eq!(db.transactions().list().await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_total_sales() {
        let db = test_db().await;
        seed_product(&db, "p1", 5000, 100).await;

        for _ in 0..3 {
            let cart = priced(&db, &[line("p1", 1)]).await;
            db.transactions()
                .create(
                    &cart,
                    PaymentMethod::Cash,
                    Money::from_minor(5000),
                    Money::zero(),
                )
                .await
                .unwrap();
        }

        assert_eq!(
            db.transactions().total_sales().await.unwrap(),
            Money::from_minor(15000)
        );
    }
}
