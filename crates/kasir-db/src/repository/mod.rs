//! # Repository Layer
//!
//! Data access repositories for each entity. Repositories own all SQL;
//! nothing outside this layer writes to the database.
//!
//! ## Pattern
//! Each repository holds a pool clone and exposes async methods returning
//! `DbResult<T>`. Operations that must be atomic (sale commit, opname
//! reconciliation) open a single SQL transaction internally; the stock
//! ledger primitives in [`product`] take `&mut SqliteConnection` so they
//! can only run inside such a transaction.

pub mod finance;
pub mod product;
pub mod stock_opname;
pub mod transaction;

pub use finance::FinanceRepository;
pub use product::ProductRepository;
pub use stock_opname::StockOpnameRepository;
pub use transaction::TransactionRepository;
