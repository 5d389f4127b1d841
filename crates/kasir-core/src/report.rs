//! # Reporting Derivations
//!
//! Read-side figures for the dashboard: low-stock products and the
//! income/expense balance.
//!
//! Every function here is a deterministic derivation over the ledgers -
//! recomputed on read, never stored. No invariant beyond being a pure
//! function of its inputs.

use serde::Serialize;

use crate::money::Money;
use crate::types::{FinanceKind, FinanceRecord, Product};

/// Aggregated finance ledger totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FinanceTotals {
    pub income: Money,
    pub expense: Money,
}

/// Sums the finance ledger by direction.
pub fn finance_totals(records: &[FinanceRecord]) -> FinanceTotals {
    records.iter().fold(FinanceTotals::default(), |mut acc, r| {
        match r.kind {
            FinanceKind::Income => acc.income += r.amount,
            FinanceKind::Expense => acc.expense += r.amount,
        }
        acc
    })
}

/// Overall balance: sales revenue plus other income, minus expenses.
pub fn balance(total_sales: Money, totals: FinanceTotals) -> Money {
    total_sales + totals.income - totals.expense
}

/// Filters the catalog down to products below their low-stock threshold.
pub fn low_stock(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.is_low_stock()).collect()
}
