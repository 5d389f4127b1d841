//! # Kasir DB
//!
//! SQLite persistence layer for Kasir POS.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           kasir-db                                      │
//! │                                                                         │
//! │  ┌─────────┐   ┌─────────────┐   ┌──────────────────────────────────┐   │
//! │  │  pool   │──▶│ migrations  │   │           repository/            │   │
//! │  │Database │   │ (embedded)  │   │  product      (catalog + ledger) │   │
//! │  └─────────┘   └─────────────┘   │  transaction  (atomic sales)     │   │
//! │       │                         │  stock_opname (reconciliation)   │   │
//! │       │        ┌─────────────┐  │  finance      (bookkeeping)      │   │
//! │       └───────▶│   error     │  └──────────────────────────────────┘   │
//! │                │  DbError    │                                         │
//! │                └─────────────┘                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency Model
//! - WAL journal mode; SQLite serializes write transactions
//! - Stock changes are delta-form SQL (`stock = stock + ?`), never
//!   read-modify-write from application memory
//! - A sale's header, items, and stock deltas commit in one transaction
//! - An opname's record and stock correction commit in one transaction

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{
    FinanceRepository, ProductRepository, StockOpnameRepository, TransactionRepository,
};
