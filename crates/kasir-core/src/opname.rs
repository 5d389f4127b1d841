//! # Stock Opname Reconciliation
//!
//! The pure half of the stock opname processor: given the stock the system
//! recorded and the stock physically counted, freeze the reconciliation
//! values that get persisted.
//!
//! The system-stock read and the write-back happen inside one database
//! transaction in kasir-db; this module only does the arithmetic so the
//! frozen `difference` can never drift from the two inputs.

use crate::error::{CoreError, CoreResult};

/// The frozen result of one reconciliation.
///
/// Invariant: `difference == actual_stock - system_stock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    /// Stock the system recorded at the moment of processing.
    pub system_stock: i64,
    /// Physically counted stock.
    pub actual_stock: i64,
    /// actual_stock - system_stock. Negative means shrinkage.
    pub difference: i64,
}

/// Validates a physically counted stock value.
///
/// System stock may legitimately be negative after an oversell, but a
/// physical count never can be.
///
/// ## Errors
/// [`CoreError::InvalidCount`] when `actual_stock < 0`.
pub fn validate_count(actual_stock: i64) -> CoreResult<()> {
    if actual_stock < 0 {
        return Err(CoreError::InvalidCount(actual_stock));
    }
    Ok(())
}

/// Computes the reconciliation between system stock and counted stock.
///
/// Callers must run [`validate_count`] first; this function itself is
/// infallible so it can be used inside the database transaction that reads
/// `system_stock`.
pub fn reconcile(system_stock: i64, actual_stock: i64) -> Reconciliation {
    Reconciliation {
        system_stock,
        actual_stock,
        difference: actual_stock - system_stock,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_shrinkage() {
        let r = reconcile(7, 5);
        assert_eq!(r.system_stock, 7);
        assert_eq!(r.actual_stock, 5);
        assert_eq!(r.difference, -2);
    }

    #[test]
    fn test_reconcile_surplus() {
        let r = reconcile(3, 8);
        assert_eq!(r.difference, 5);
    }

    #[test]
    fn test_reconcile_negative_system_stock() {
        // Oversell drove system stock negative; the physical count corrects it.
        let r = reconcile(-2, 0);
        assert_eq!(r.difference, 2);
    }

    #[test]
    fn test_validate_count() {
        assert!(validate_count(0).is_ok());
        assert!(validate_count(10).is_ok());
        assert!(matches!(
            validate_count(-1),
            Err(CoreError::InvalidCount(-1))
        ));
    }
}
