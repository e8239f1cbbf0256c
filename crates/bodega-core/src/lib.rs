//! # bodega-core: Pure Domain Logic for Bodega POS
//!
//! This crate is the heart of Bodega POS. It contains the domain types and
//! business rules with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Bodega POS Architecture                        │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                  HTTP layer (apps/server)                     │ │
//! │  │   product CRUD ─► sales ─► pending accounts ─► settle         │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │                ★ bodega-core (THIS CRATE) ★                   │ │
//! │  │                                                               │ │
//! │  │   ┌───────────┐     ┌───────────┐     ┌────────────┐         │ │
//! │  │   │   types   │     │   error   │     │ validation │         │ │
//! │  │   │  Product  │     │ CoreError │     │   rules    │         │ │
//! │  │   │   Sale    │     │ taxonomy  │     │   checks   │         │ │
//! │  │   └───────────┘     └───────────┘     └────────────┘         │ │
//! │  │                                                               │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │                 bodega-db (Database Layer)                    │ │
//! │  │      SQLite repositories, migrations, the register            │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, PendingAccount, LineItem)
//! - [`error`] - Domain error taxonomy
//! - [`validation`] - Business rule validation

pub mod error;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct line items allowed in a single request.
///
/// ## Business Reason
/// Prevents runaway requests and keeps transactions to a reasonable size.
pub const MAX_LINE_ITEMS: usize = 100;

/// Maximum quantity of a single item in one line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
