//! # API Error Types
//!
//! HTTP-facing error type and its mapping from the inner layers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CoreError (kasir-core)  ──┐                                            │
//! │                            ├──▶ ApiError ──▶ HTTP status +              │
//! │  DbError (kasir-db)      ──┘                {"success": false,          │
//! │                                              "message": "..."}          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Mapping
//! ```text
//! Validation / empty cart / bad count / short payment  → 400
//! Unknown product / missing record                     → 404
//! Duplicate / write contention                         → 409
//! Everything else                                      → 500 (detail logged,
//!                                                        not leaked)
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use kasir_core::error::CoreError;
use kasir_db::DbError;

/// API operation errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request failed validation.
    #[error("{0}")]
    Validation(String),

    /// Requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Payment does not cover the total.
    #[error("{0}")]
    InsufficientPayment(String),

    /// Concurrent write conflict or constraint clash; retryable.
    #[error("{0}")]
    Conflict(String),

    /// Internal failure. The message is logged, the client sees a
    /// generic line.
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InsufficientPayment(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref detail) = self {
            error!(detail, "Internal server error");
        }

        let body = json!({
            "success": false,
            "message": self.to_string(),
        });

        (self.status(), Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => {
                ApiError::NotFound(format!("Product not found: {id}"))
            }
            CoreError::InsufficientPayment { .. } => {
                ApiError::InsufficientPayment(err.to_string())
            }
            CoreError::EmptyCart | CoreError::InvalidCount(_) | CoreError::Validation(_) => {
                ApiError::Validation(err.to_string())
            }
            CoreError::AmountOverflow { .. } => ApiError::Validation(err.to_string()),
        }
    }
}

impl From<kasir_core::error::ValidationError> for ApiError {
    fn from(err: kasir_core::error::ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. }
            | DbError::ForeignKeyViolation { .. }
            | DbError::Conflict(_) => ApiError::Conflict(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kasir_core::Money;

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::ProductNotFound("p9".to_string()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = CoreError::EmptyCart.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = CoreError::InsufficientPayment {
            total: Money::from_minor(15000).minor(),
            payment: Money::from_minor(100).minor(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_db_error_mapping() {
        let err: ApiError = DbError::not_found("Product", "p9").into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = DbError::Conflict("database is locked".to_string()).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: ApiError = DbError::Internal("boom".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Internal detail never reaches the wire.
        assert_eq!(err.to_string(), "Internal server error");
    }
}
