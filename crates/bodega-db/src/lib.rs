//! # bodega-db: Database Layer for Bodega POS
//!
//! SQLite storage for the inventory store, the sale ledger and the
//! pending-account ledger, plus the register that mutates them atomically.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Bodega POS Data Flow                          │
//! │                                                                     │
//! │  HTTP handler (POST /api/sales)                                     │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                   bodega-db (THIS CRATE)                      │ │
//! │  │                                                               │ │
//! │  │  ┌────────────┐  ┌──────────────┐  ┌────────────────────┐    │ │
//! │  │  │  Database  │  │ Repositories │  │      Register      │    │ │
//! │  │  │ (pool.rs)  │  │ product.rs   │  │   (register.rs)    │    │ │
//! │  │  │            │  │ sale.rs      │  │ reserve + ledger   │    │ │
//! │  │  │ SqlitePool │◄─│ account.rs   │  │ writes, one tx     │    │ │
//! │  │  └────────────┘  └──────────────┘  └────────────────────┘    │ │
//! │  │                                                               │ │
//! │  │  Embedded migrations: migrations/sqlite/*.sql                 │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database (WAL mode)                                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Read/CRUD repositories (product, sale, account)
//! - [`register`] - Atomic stock-reservation transactions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bodega_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("bodega.db")).await?;
//!
//! let product = db.products().get_by_barcode("7501000111111").await?;
//! let sale = db.register().create_sale(&items).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod register;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use register::Register;

// Repository re-exports for convenience
pub use repository::account::AccountRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
