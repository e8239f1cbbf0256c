//! # API Routes
//!
//! One router per resource, nested under `/api`:
//! ```text
//! /api/products   inventory CRUD
//! /api/sales      register sales + ledger reads
//! /api/accounts   customer tabs
//! /api/health     liveness + db ping
//! ```

use axum::extract::Extension;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use bodega_db::Database;

use crate::error::ApiError;

pub mod account;
pub mod product;
pub mod sale;

/// Builds the full `/api` routing tree.
pub fn api_router() -> Router {
    Router::new()
        .nest("/products", product::router())
        .nest("/sales", sale::router())
        .nest("/accounts", account::router())
        .route("/health", get(health))
}

async fn health(
    Extension(db): Extension<Database>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !db.health_check().await {
        return Err(ApiError::new(
            crate::error::ErrorCode::DatabaseError,
            "database unreachable",
        ));
    }
    Ok(Json(json!({ "status": "ok" })))
}
