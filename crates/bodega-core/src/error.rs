//! # Error Types
//!
//! Domain-specific error types for bodega-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  bodega-core errors (this file)                                     │
//! │  ├── CoreError        - Domain rule violations                      │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  bodega-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  HTTP API errors (in apps/server)                                   │
//! │  └── ApiError         - What callers see (status + JSON body)       │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → caller    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (barcode, id, available stock)
//! 3. Errors are enum variants, never String
//! 4. Every failure rolls the surrounding transaction back fully; the core
//!    never panics on these

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain errors. All are recoverable at the caller.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A referenced product, sale or account does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Barcode uniqueness violated at product creation or update.
    #[error("barcode '{barcode}' is already registered")]
    DuplicateBarcode { barcode: String },

    /// Requested quantity exceeds quantity on hand.
    ///
    /// ## When This Occurs
    /// A reservation inside a sale or account transaction asked for more
    /// units than the inventory holds. The whole transaction rolls back;
    /// no earlier reservation from the same request survives.
    #[error("insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Operation not valid for the account's current state.
    ///
    /// ## When This Occurs
    /// - Settling an already-settled account (must not double-count)
    /// - Appending items to a settled account
    #[error("account {account_id} is {state}, cannot perform operation")]
    InvalidState { account_id: i64, state: String },

    /// Input validation failed before any stock was touched.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: &'static str },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    /// Value is not a finite number (NaN or infinity).
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product: "Milk 1L".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "insufficient stock for Milk 1L: available 3, requested 5"
        );

        let err = CoreError::not_found("Product", 42);
        assert_eq!(err.to_string(), "Product not found: 42");

        let err = CoreError::DuplicateBarcode {
            barcode: "7501000111111".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "barcode '7501000111111' is already registered"
        );
    }

    #[test]
    fn test_invalid_state_message() {
        let err = CoreError::InvalidState {
            account_id: 7,
            state: "settled".to_string(),
        };
        assert_eq!(err.to_string(), "account 7 is settled, cannot perform operation");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required { field: "name" };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
