//! # Cart Pricing
//!
//! The pure half of the transaction processor: turns a cart of
//! `{product_id, quantity}` lines into priced line items with frozen
//! name/price snapshots and a computed total.
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/transactions                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load catalog rows for the cart's product ids          (kasir-db)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  price_cart(lines, catalog)                            (THIS MODULE)    │
//! │  ├── EmptyCart / quantity / ProductNotFound checks                      │
//! │  └── snapshot name + price, subtotal = price × qty, total = Σ subtotal  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  check_payment(total, payment)                         (THIS MODULE)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  atomic insert + stock deltas                          (kasir-db)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices are always taken from the catalog at pricing time, never from the
//! client payload. Resubmitting the same cart produces a new, distinct
//! transaction; the operation is deliberately not idempotent.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::validation::{validate_cart_size, validate_quantity};

// =============================================================================
// Input / Output Types
// =============================================================================

/// One raw cart line as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: String,
    pub quantity: i64,
}

/// A priced line with snapshots frozen from the catalog.
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub product_id: String,
    /// Name snapshot at pricing time.
    pub product_name: String,
    pub quantity: i64,
    /// Unit price snapshot at pricing time.
    pub price: Money,
    /// price × quantity.
    pub subtotal: Money,
}

/// A fully priced cart, ready for the atomic commit.
///
/// Invariant: `total == Σ lines[i].subtotal`.
#[derive(Debug, Clone)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    pub total: Money,
}

// =============================================================================
// Pricing
// =============================================================================

/// Validates and prices a cart against the current catalog.
///
/// ## Rules
/// - Cart must be non-empty and within the size cap
/// - Every quantity must be a positive integer
/// - Every product id must resolve to a catalog row
///
/// Duplicate product ids are allowed; each line gets its own snapshot and its
/// own stock delta, so the cumulative decrement is still correct.
///
/// ## Errors
/// - [`CoreError::EmptyCart`] for an empty cart
/// - [`CoreError::Validation`] for a bad quantity
/// - [`CoreError::ProductNotFound`] for an unknown product id
/// - [`CoreError::AmountOverflow`] if a subtotal or the total overflows
pub fn price_cart(lines: &[CartLine], catalog: &[Product]) -> CoreResult<PricedCart> {
    if lines.is_empty() {
        return Err(CoreError::EmptyCart);
    }
    validate_cart_size(lines.len())?;

    let by_id: HashMap<&str, &Product> =
        catalog.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut priced = Vec::with_capacity(lines.len());
    let mut total = Money::zero();

    for line in lines {
        validate_quantity(line.quantity)?;

        let product = by_id
            .get(line.product_id.as_str())
            .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

        let subtotal = product
            .price
            .times(line.quantity)
            .ok_or_else(|| CoreError::AmountOverflow {
                context: format!("subtotal for product {}", product.id),
            })?;

        total = total
            .checked_add(subtotal)
            .ok_or_else(|| CoreError::AmountOverflow {
                context: "cart total".to_string(),
            })?;

        priced.push(PricedLine {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity: line.quantity,
            price: product.price,
            subtotal,
        });
    }

    Ok(PricedCart {
        lines: priced,
        total,
    })
}

/// Checks the tendered payment against the cart total.
///
/// ## Returns
/// The change to hand back (`payment - total`).
///
/// ## Errors
/// [`CoreError::InsufficientPayment`] when `payment < total`. This check
/// belongs to the transaction processor, not the stock ledger: it fires
/// before anything is persisted, so a rejected payment leaves no residue.
pub fn check_payment(total: Money, payment: Money) -> CoreResult<Money> {
    if payment < total {
        return Err(CoreError::InsufficientPayment {
            total: total.minor(),
            payment: payment.minor(),
        });
    }

    Ok(payment - total)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, price: i64, stock: i64) -> Product {
        let now = Utc::now();
        Product {
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
        }
    }

    fn line(product_id: &str, quantity: i64) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_price_cart_totals() {
        let catalog = vec![product("p1", 5000, 10), product("p2", 2500, 4)];
        let cart = price_cart(&[line("p1", 3), line("p2", 2)], &catalog).unwrap();

        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.lines[0].subtotal, Money::from_minor(15000));
        assert_eq!(cart.lines[1].subtotal, Money::from_minor(5000));
        assert_eq!(cart.total, Money::from_minor(20000));

        // total always equals the sum of subtotals
        let summed: Money = cart.lines.iter().map(|l| l.subtotal).sum();
        assert_eq!(cart.total, summed);
    }

    #[test]
    fn test_price_cart_snapshots_catalog_price() {
        let catalog = vec![product("p1", 5000, 10)];
        let cart = price_cart(&[line("p1", 1)], &catalog).unwrap();

        assert_eq!(cart.lines[0].price, Money::from_minor(5000));
        assert_eq!(cart.lines[0].product_name, "Product p1");
    }

    #[test]
    fn test_price_cart_rejects_empty() {
        let catalog = vec![product("p1", 5000, 10)];
        assert!(matches!(
            price_cart(&[], &catalog),
            Err(CoreError::EmptyCart)
        ));
    }

    #[test]
    fn test_price_cart_rejects_bad_quantity() {
        let catalog = vec![product("p1", 5000, 10)];
        assert!(matches!(
            price_cart(&[line("p1", 0)], &catalog),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            price_cart(&[line("p1", -3)], &catalog),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_price_cart_rejects_unknown_product() {
        let catalog = vec![product("p1", 5000, 10)];
        let err = price_cart(&[line("ghost", 1)], &catalog).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(id) if id == "ghost"));
    }

    #[test]
    fn test_price_cart_allows_duplicate_lines() {
        let catalog = vec![product("p1", 5000, 10)];
        let cart = price_cart(&[line("p1", 2), line("p1", 1)], &catalog).unwrap();
        assert_eq!(cart.total, Money::from_minor(15000));
    }

    #[test]
    fn test_check_payment() {
        let total = Money::from_minor(15000);

        let change = check_payment(total, Money::from_minor(20000)).unwrap();
        assert_eq!(change, Money::from_minor(5000));

        let exact = check_payment(total, Money::from_minor(15000)).unwrap();
        assert_eq!(exact, Money::zero());

        let err = check_payment(total, Money::from_minor(100)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientPayment {
                total: 15000,
                payment: 100
            }
        ));
    }
}
