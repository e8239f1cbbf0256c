//! # Pending Account Routes
//!
//! Customer tabs: open, list active, append charges, settle. All writes go
//! through the register; settling archives the tab into the sale ledger
//! atomically.

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use bodega_core::{LineItemRequest, PendingAccount};
use bodega_db::Database;

use crate::error::ApiError;

pub fn router() -> Router {
    Router::new()
        .route("/", post(open_account).get(list_active_accounts))
        .route("/:id/items", post(add_items))
        .route("/:id/settle", post(settle_account))
}

#[derive(Debug, Deserialize)]
pub struct OpenAccountRequest {
    pub customer_name: String,
    pub items: Vec<LineItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct AddItemsRequest {
    pub items: Vec<LineItemRequest>,
}

pub async fn open_account(
    Extension(db): Extension<Database>,
    Json(body): Json<OpenAccountRequest>,
) -> Result<(StatusCode, Json<PendingAccount>), ApiError> {
    let account = db
        .register()
        .open_account(&body.customer_name, &body.items)
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn list_active_accounts(
    Extension(db): Extension<Database>,
) -> Result<Json<Vec<PendingAccount>>, ApiError> {
    let accounts = db.accounts().list_active().await?;
    Ok(Json(accounts))
}

pub async fn add_items(
    Extension(db): Extension<Database>,
    Path(id): Path<i64>,
    Json(body): Json<AddItemsRequest>,
) -> Result<Json<PendingAccount>, ApiError> {
    let account = db.register().add_to_account(id, &body.items).await?;
    Ok(Json(account))
}

pub async fn settle_account(
    Extension(db): Extension<Database>,
    Path(id): Path<i64>,
) -> Result<Json<PendingAccount>, ApiError> {
    let account = db.register().settle_account(id).await?;
    Ok(Json(account))
}
