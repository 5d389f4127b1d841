//! # kasir-core: Pure Business Logic for Kasir POS
//!
//! This crate is the **heart** of Kasir POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                    Browser UI (external)                        │    │
//! │  │    Catalog ──► Cart ──► Payment ──► Receipt / Opname forms      │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │ HTTP (JSON)                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                    apps/server (axum)                           │    │
//! │  │    /api/products /api/transactions /api/stock-opnames ...       │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌───────────┐      │    │
//! │  │   │   types   │ │   money   │ │   cart    │ │  opname   │      │    │
//! │  │   │  Product  │ │   Money   │ │  pricing  │ │ reconcile │      │    │
//! │  │   │  Txn, …   │ │  (int)    │ │  payment  │ │           │      │    │
//! │  │   └───────────┘ └───────────┘ └───────────┘ └───────────┘      │    │
//! │  │   ┌───────────┐ ┌───────────┐                                   │    │
//! │  │   │  report   │ │ validation│                                   │    │
//! │  │   └───────────┘ └───────────┘                                   │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                    kasir-db (Database Layer)                    │    │
//! │  │        SQLite repositories, stock ledger, atomic commits        │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Transaction, StockOpname, …)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Cart pricing and payment checks
//! - [`opname`] - Stock reconciliation math
//! - [`report`] - Read-side dashboard derivations
//! - [`validation`] - Field validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are i64 minor units, never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod opname;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Low-stock threshold applied when a product is created without one.
pub const DEFAULT_MIN_STOCK: i64 = 10;

/// Maximum lines allowed in a single cart.
///
/// Prevents runaway carts and keeps transaction sizes reasonable.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity on a single cart line.
///
/// Guards against accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
