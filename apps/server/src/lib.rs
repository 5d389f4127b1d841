//! # Kasir Server
//!
//! HTTP API server for Kasir POS.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Browser UI ──► axum router ──► handler (routes/)                       │
//! │                                    │                                    │
//! │                 validation + pricing (kasir-core)                       │
//! │                                    │                                    │
//! │                 atomic persistence (kasir-db)                           │
//! │                                    │                                    │
//! │                 {"success": true, "data": …}                            │
//! │                 or ApiError ──► status + {"success": false, …}          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use kasir_db::Database;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

/// Builds the full application router over the given database handle.
///
/// Used by both `main` and the integration tests (against an in-memory
/// database).
pub fn app(db: Database) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { db })
}
