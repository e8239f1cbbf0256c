//! # Validation Module
//!
//! Input validation for Bodega POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Validation Layers                             │
//! │                                                                     │
//! │  Layer 1: HTTP (axum)                                               │
//! │  └── Type validation (JSON deserialization)                         │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE — business rule validation                    │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  ├── NOT NULL / CHECK constraints                                   │
//! │  └── UNIQUE barcode constraint                                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{LineItemRequest, NewProduct};
use crate::{MAX_LINE_ITEMS, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required { field: "name" });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name",
            max: 200,
        });
    }

    Ok(())
}

/// Validates a barcode.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 64 characters
///
/// Format is deliberately not enforced: the store accepts EAN-13, UPC-A and
/// in-house codes alike. Uniqueness is the database's job.
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::Required { field: "barcode" });
    }

    if barcode.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "barcode",
            max: 64,
        });
    }

    Ok(())
}

/// Validates a customer name for a pending account.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customer_name",
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "customer_name",
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price.
///
/// ## Rules
/// - Must be finite (no NaN / infinity through JSON edge cases)
/// - Must be non-negative; zero is allowed (giveaway items)
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() {
        return Err(ValidationError::NotFinite { field: "price" });
    }

    if price < 0.0 {
        return Err(ValidationError::MustBeNonNegative { field: "price" });
    }

    Ok(())
}

/// Validates a stock quantity for product creation/update.
///
/// Zero is allowed: a product can exist while out of stock.
pub fn validate_stock_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::MustBeNonNegative { field: "quantity" });
    }

    Ok(())
}

/// Validates a requested line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_LINE_QUANTITY`]
pub fn validate_line_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive { field: "quantity" });
    }

    if quantity > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity",
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates the mutable fields of a product in one pass.
pub fn validate_product(fields: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&fields.name)?;
    validate_barcode(&fields.barcode)?;
    validate_price(fields.price)?;
    validate_stock_quantity(fields.quantity)?;
    Ok(())
}

/// Validates a line-item request list before any stock is touched.
///
/// ## Rules
/// - Must not be empty
/// - Must not exceed [`MAX_LINE_ITEMS`] entries
/// - Every quantity must pass [`validate_line_quantity`]
pub fn validate_line_items(items: &[LineItemRequest]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required { field: "items" });
    }

    if items.len() > MAX_LINE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items",
            min: 1,
            max: MAX_LINE_ITEMS as i64,
        });
    }

    for item in items {
        validate_line_quantity(item.quantity)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Milk 1L").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_barcode() {
        assert!(validate_barcode("7501000111111").is_ok());
        assert!(validate_barcode("IN-HOUSE-42").is_ok());
        assert!(validate_barcode("").is_err());
        assert!(validate_barcode(&"9".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(10.5).is_ok());
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(-1.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_stock_quantity() {
        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(50).is_ok());
        assert!(validate_stock_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_line_quantity() {
        assert!(validate_line_quantity(1).is_ok());
        assert!(validate_line_quantity(999).is_ok());
        assert!(validate_line_quantity(0).is_err());
        assert!(validate_line_quantity(-3).is_err());
        assert!(validate_line_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_line_items_rejects_empty() {
        assert!(validate_line_items(&[]).is_err());
    }

    #[test]
    fn test_validate_line_items_checks_each_quantity() {
        let items = vec![
            LineItemRequest {
                product_id: 1,
                quantity: 2,
            },
            LineItemRequest {
                product_id: 2,
                quantity: 0,
            },
        ];
        assert!(validate_line_items(&items).is_err());

        let items = vec![LineItemRequest {
            product_id: 1,
            quantity: 2,
        }];
        assert!(validate_line_items(&items).is_ok());
    }

    #[test]
    fn test_validate_product() {
        let good = NewProduct {
            name: "Milk 1L".to_string(),
            barcode: "7501000111111".to_string(),
            price: 10.0,
            quantity: 5,
        };
        assert!(validate_product(&good).is_ok());

        let bad = NewProduct {
            price: -10.0,
            ..good
        };
        assert!(validate_product(&bad).is_err());
    }
}
