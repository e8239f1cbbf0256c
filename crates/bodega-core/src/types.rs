//! # Domain Types
//!
//! Core domain types used throughout Bodega POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌───────────────┐    ┌───────────────┐    ┌──────────────────┐    │
//! │  │    Product    │    │     Sale      │    │  PendingAccount  │    │
//! │  │  ───────────  │    │  ───────────  │    │  ──────────────  │    │
//! │  │  id (i64)     │    │  id (i64)     │    │  id (i64)        │    │
//! │  │  barcode      │    │  created_at   │    │  customer_name   │    │
//! │  │  price        │    │  total        │    │  state           │    │
//! │  │  quantity     │    │  items[]      │    │  total, items[]  │    │
//! │  └───────────────┘    └───────────────┘    └──────────────────┘    │
//! │                                                                     │
//! │  Sale and PendingAccount own ordered LineItems; each LineItem       │
//! │  snapshots the product's name and unit price at write time.         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Line items never hold a live reference to a product's price or name.
//! Historical pricing is frozen when stock is reserved, so ledgers stay
//! correct even after product edits or deletes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Product
// =============================================================================

/// A product tracked by the inventory store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (assigned by the store).
    pub id: i64,

    /// Display name shown on listings and receipts.
    pub name: String,

    /// Scannable barcode. Unique across the inventory.
    pub barcode: String,

    /// Unit price. Never negative.
    pub price: f64,

    /// Quantity on hand. Never negative.
    pub quantity: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated (edits and stock reservations).
    pub updated_at: DateTime<Utc>,
}

/// Mutable product fields, used for creation and full-replace updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub barcode: String,
    pub price: f64,
    pub quantity: i64,
}

// =============================================================================
// Line Items
// =============================================================================

/// A requested (product, quantity) pair, before resolution against stock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LineItemRequest {
    pub product_id: i64,
    pub quantity: i64,
}

/// A priced line item owned by a [`Sale`] or [`PendingAccount`].
///
/// `product_name` and `unit_price` are frozen at reservation time; the
/// `product_id` is a lookup reference only and may dangle after a product
/// is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LineItem {
    pub product_id: i64,
    /// Product name at reservation time (frozen).
    pub product_name: String,
    /// Quantity sold. Always positive.
    pub quantity: i64,
    /// Unit price at reservation time (frozen).
    pub unit_price: f64,
}

impl LineItem {
    /// Line subtotal: quantity × unit price.
    #[inline]
    pub fn subtotal(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// Sums line subtotals into a ledger total.
pub fn items_total(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::subtotal).sum()
}

// =============================================================================
// Sale
// =============================================================================

/// A completed sale. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Sum of line subtotals.
    pub total: f64,
    /// Ordered line items, in request order.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<LineItem>,
}

// =============================================================================
// Pending Account
// =============================================================================

/// Lifecycle state of a [`PendingAccount`].
///
/// ```text
/// pending --(settle)--> settled
/// ```
/// `settled` is terminal; there are no other transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum AccountState {
    /// Open tab; accepts additional line items.
    Pending,
    /// Closed tab, archived into the sale ledger. Immutable.
    Settled,
}

impl AccountState {
    /// Lowercase name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountState::Pending => "pending",
            AccountState::Settled => "settled",
        }
    }
}

impl Default for AccountState {
    fn default() -> Self {
        AccountState::Pending
    }
}

/// A customer tab accumulating charges before settlement.
///
/// Invariant: `total` always equals the sum of the current line items'
/// `quantity × unit_price`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PendingAccount {
    pub id: i64,
    pub customer_name: String,
    pub created_at: DateTime<Utc>,
    pub state: AccountState,
    /// Running total over the current line items.
    pub total: f64,
    /// Ordered line items, append-only while pending.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<LineItem>,
}

impl PendingAccount {
    /// Whether the account still accepts charges.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.state == AccountState::Pending
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i64, unit_price: f64) -> LineItem {
        LineItem {
            product_id: 1,
            product_name: "Milk 1L".to_string(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn test_line_item_subtotal() {
        assert_eq!(item(3, 10.0).subtotal(), 30.0);
        assert_eq!(item(1, 0.0).subtotal(), 0.0);
    }

    #[test]
    fn test_items_total() {
        let items = vec![item(2, 10.0), item(1, 5.5)];
        assert_eq!(items_total(&items), 25.5);
        assert_eq!(items_total(&[]), 0.0);
    }

    #[test]
    fn test_account_state_default_is_pending() {
        assert_eq!(AccountState::default(), AccountState::Pending);
        assert_eq!(AccountState::default().as_str(), "pending");
    }

    #[test]
    fn test_account_state_serializes_lowercase() {
        let json = serde_json::to_string(&AccountState::Settled).unwrap();
        assert_eq!(json, "\"settled\"");
    }
}
