//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    Product      │   │  Transaction    │   │   StockOpname   │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │        │
//! │  │  price          │   │  total          │   │  system_stock   │        │
//! │  │  stock          │   │  payment_amount │   │  actual_stock   │        │
//! │  │  min_stock      │   │  items […]      │   │  difference     │        │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │ FinanceRecord   │   │ PaymentMethod   │                              │
//! │  │  ─────────────  │   │  ─────────────  │                              │
//! │  │  kind (in/out)  │   │  Cash           │                              │
//! │  │  amount         │   │  Card           │                              │
//! │  │  date           │   │  Qris           │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `TransactionItem` and `StockOpname` copy the product name (and price for
//! items) at commit time. Later product edits never retroactively alter past
//! receipts or reconciliation records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// The `stock` field is owned by the stock ledger: it is only ever mutated
/// through declared delta/absolute operations committed together with the
/// record that caused them, never by direct overwrite from unrelated code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to cashier and on receipts.
    pub name: String,

    /// Stock Keeping Unit. Optional; uniqueness is by convention, not enforced.
    pub sku: Option<String>,

    /// Optional category label.
    pub category: Option<String>,

    /// Optional description.
    pub description: Option<String>,

    /// Unit price in the smallest currency unit. Never negative.
    pub price: Money,

    /// Current stock level. May go negative on oversell; flagged by
    /// low-stock reporting, not blocked.
    pub stock: i64,

    /// Threshold for low-stock alerting.
    pub min_stock: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Read-time computed property: stock below the configured threshold.
    ///
    /// Never stored; recomputed on every read (dashboard, product list).
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock < self.min_stock
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a transaction was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on external terminal.
    Card,
    /// QR-code payment (QRIS).
    Qris,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A committed sale. Immutable once created - there is no update or delete
/// operation; it is a historical record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: String,
    /// Sum of all item subtotals.
    pub total: Money,
    pub payment_method: PaymentMethod,
    /// Amount tendered by the customer. Always >= total.
    pub payment_amount: Money,
    /// Change returned: payment_amount - total.
    pub change_amount: Money,
    pub created_at: DateTime<Utc>,
}

/// A line item within a transaction.
/// Uses the snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionItem {
    pub id: String,
    pub transaction_id: String,
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Quantity sold. Always a positive integer.
    pub quantity: i64,
    /// Unit price at time of sale (frozen).
    pub price: Money,
    /// quantity × price.
    pub subtotal: Money,
}

/// A transaction together with its ordered line items - the read shape
/// returned to callers for receipt rendering and list display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionWithItems {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub items: Vec<TransactionItem>,
}

// =============================================================================
// Stock Opname
// =============================================================================

/// An immutable record of one stock reconciliation event.
///
/// `system_stock`, `actual_stock` and `difference` are frozen at creation;
/// `difference == actual_stock - system_stock` always holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockOpname {
    pub id: String,
    pub product_id: String,
    /// Product name at reconciliation time (frozen).
    pub product_name: String,
    /// Stock the system recorded before the adjustment.
    pub system_stock: i64,
    /// Physically counted stock. Never negative.
    pub actual_stock: i64,
    /// actual_stock - system_stock.
    pub difference: i64,
    /// Free-form reason for the discrepancy.
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Finance Record
// =============================================================================

/// Direction of a finance ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum FinanceKind {
    Income,
    Expense,
}

/// An income/expense ledger entry. Mutable (editable and deletable),
/// independent of stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct FinanceRecord {
    pub id: String,
    pub kind: FinanceKind,
    pub category: String,
    /// Positive amount; direction is carried by `kind`.
    pub amount: Money,
    pub description: Option<String>,
    /// Ledger date the entry applies to (not the insert timestamp).
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64, min_stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: "p1".to_string(),
            name: "Kopi Susu".to_string(),
            sku: None,
            category: None,
            description: None,
            price: Money::from_minor(5000),
            stock,
            min_stock,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_low_stock_threshold() {
        assert!(product(5, 10).is_low_stock());
        assert!(!product(10, 10).is_low_stock());
        // Negative stock after an oversell is always low.
        assert!(product(-2, 10).is_low_stock());
    }

    #[test]
    fn test_payment_method_serde() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Cash).unwrap(),
            "\"cash\""
        );
        let m: PaymentMethod = serde_json::from_str("\"qris\"").unwrap();
        assert_eq!(m, PaymentMethod::Qris);
    }

    #[test]
    fn test_finance_kind_serde() {
        assert_eq!(
            serde_json::to_string(&FinanceKind::Expense).unwrap(),
            "\"expense\""
        );
    }

    #[test]
    fn test_transaction_with_items_flattens() {
        let now = Utc::now();
        let tx = TransactionWithItems {
            transaction: Transaction {
                id: "t1".to_string(),
                total: Money::from_minor(15000),
                payment_method: PaymentMethod::Cash,
                payment_amount: Money::from_minor(20000),
                change_amount: Money::from_minor(5000),
                created_at: now,
            },
            items: vec![],
        };

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["id"], "t1");
        assert_eq!(json["total"], 15000);
        assert!(json["items"].is_array());
    }
}
