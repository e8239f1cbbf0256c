//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Error Propagation                              │
//! │                                                                     │
//! │  SQLite error (sqlx::Error)                                         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  DbError (this module) ← adds context and categorization;           │
//! │       │                  domain failures ride along as              │
//! │       │                  DbError::Domain(CoreError)                 │
//! │       ▼                                                             │
//! │  ApiError (in apps/server) ← HTTP status + JSON body                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use bodega_core::CoreError;

/// Database operation errors.
///
/// Domain failures (`NotFound`, `DuplicateBarcode`, `InsufficientStock`,
/// `InvalidState`, validation) are carried inside [`DbError::Domain`] so one
/// result type covers a whole transaction.
#[derive(Debug, Error)]
pub enum DbError {
    /// A typed domain failure. The surrounding transaction has been rolled
    /// back in full by the time the caller sees this.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Database connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound domain error.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DbError::Domain(CoreError::not_found(entity, id))
    }

    /// True if this error is the barcode-uniqueness violation.
    pub fn is_duplicate_barcode(&self) -> bool {
        matches!(self, DbError::Domain(CoreError::DuplicateBarcode { .. }))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound  → DbError::Internal (repos use fetch_optional;
///                             reaching this means a query bug)
/// sqlx::Error::Database     → QueryFailed with the SQLite message
/// sqlx::Error::PoolTimedOut → DbError::PoolExhausted
/// Other                     → DbError::Internal
/// ```
/// Barcode UNIQUE violations are mapped at the call site (the repository
/// knows which barcode it tried to write); see
/// [`barcode_conflict`](crate::repository::product::ProductRepository).
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
