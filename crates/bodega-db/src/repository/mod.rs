//! # Repository Module
//!
//! Database repository implementations for Bodega POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                       │
//! │       │  db.products().get_by_barcode("7501...")                    │
//! │       ▼                                                             │
//! │  ProductRepository                                                  │
//! │  ├── create / get_by_id / get_by_barcode                            │
//! │  ├── list(offset, limit) / update / delete                          │
//! │       │  SQL                                                        │
//! │       ▼                                                             │
//! │  SQLite                                                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories cover CRUD and read paths. Anything that mutates stock goes
//! through [`crate::register::Register`] instead, so every reservation and
//! ledger write shares one transaction.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD and barcode lookup
//! - [`sale::SaleRepository`] - Sale ledger reads
//! - [`account::AccountRepository`] - Pending account reads

pub mod account;
pub mod product;
pub mod sale;
