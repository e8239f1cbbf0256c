//! # Bodega POS HTTP Server
//!
//! Thin axum layer over `bodega-db`. Handlers deserialize requests, call the
//! repositories or the register, and map typed errors onto HTTP statuses.
//! Business rules live below this crate; nothing here touches SQL.

pub mod error;
pub mod routes;

use axum::extract::Extension;
use axum::Router;

use bodega_db::Database;

pub use error::{ApiError, ErrorCode};

/// Assembles the application router with the shared database handle.
pub fn build_router(db: Database) -> Router {
    Router::new()
        .nest("/api", routes::api_router())
        .layer(Extension(db))
}
