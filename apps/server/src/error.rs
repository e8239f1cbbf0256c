//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Bodega POS                         │
//! │                                                                     │
//! │  handler ──► DbError ──► ApiError ──► (status, JSON body)           │
//! │                                                                     │
//! │  NotFound                        → 404                              │
//! │  DuplicateBarcode                → 400                              │
//! │  InsufficientStock               → 400                              │
//! │  InvalidState                    → 400                              │
//! │  Validation                      → 400                              │
//! │  everything else (db plumbing)   → 500, details logged not leaked   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The body carries a machine-readable `error` code next to the
//! human-readable `message`:
//! ```json
//! { "error": "INSUFFICIENT_STOCK", "message": "insufficient stock for ..." }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use bodega_core::CoreError;
use bodega_db::DbError;

/// API error returned from handlers.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Barcode already registered (400)
    DuplicateBarcode,

    /// Requested quantity exceeds stock on hand (400)
    InsufficientStock,

    /// Operation not valid for the account's current state (400)
    InvalidState,

    /// Database operation failed (500)
    DatabaseError,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self.code {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError
            | ErrorCode::DuplicateBarcode
            | ErrorCode::InsufficientStock
            | ErrorCode::InvalidState => StatusCode::BAD_REQUEST,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converts database-layer errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(core) => ApiError::from(core),
            other => {
                // Log the real failure; callers get a generic message.
                tracing::error!(error = %other, "database operation failed");
                ApiError::new(ErrorCode::DatabaseError, "database operation failed")
            }
        }
    }
}

/// Converts domain errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::NotFound { .. } => ErrorCode::NotFound,
            CoreError::DuplicateBarcode { .. } => ErrorCode::DuplicateBarcode,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::InvalidState { .. } => ErrorCode::InvalidState,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(json!({
                "error": self.code,
                "message": self.message,
            })),
        )
            .into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                CoreError::not_found("Product", 1),
                StatusCode::NOT_FOUND,
                ErrorCode::NotFound,
            ),
            (
                CoreError::DuplicateBarcode {
                    barcode: "x".to_string(),
                },
                StatusCode::BAD_REQUEST,
                ErrorCode::DuplicateBarcode,
            ),
            (
                CoreError::InsufficientStock {
                    product: "Milk 1L".to_string(),
                    available: 2,
                    requested: 3,
                },
                StatusCode::BAD_REQUEST,
                ErrorCode::InsufficientStock,
            ),
            (
                CoreError::InvalidState {
                    account_id: 1,
                    state: "settled".to_string(),
                },
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidState,
            ),
        ];

        for (core, status, code) in cases {
            let api = ApiError::from(DbError::Domain(core));
            assert_eq!(api.status(), status);
            assert_eq!(api.code, code);
        }
    }

    #[test]
    fn test_plumbing_errors_are_500_and_opaque() {
        let api = ApiError::from(DbError::QueryFailed("syntax error near ...".to_string()));
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "database operation failed");
    }

    #[test]
    fn test_error_code_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorCode::InsufficientStock).unwrap();
        assert_eq!(json, "\"INSUFFICIENT_STOCK\"");
    }
}
