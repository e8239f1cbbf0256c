//! # Sale Routes
//!
//! Direct sales and sale-ledger reads. Creation goes through the register,
//! which reserves stock and appends the sale in one transaction.

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use bodega_core::{LineItemRequest, Sale};
use bodega_db::Database;

use crate::error::ApiError;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_sale).get(list_sales))
        .route("/:id", get(get_sale))
}

#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    pub items: Vec<LineItemRequest>,
}

pub async fn create_sale(
    Extension(db): Extension<Database>,
    Json(body): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<Sale>), ApiError> {
    let sale = db.register().create_sale(&body.items).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn list_sales(
    Extension(db): Extension<Database>,
) -> Result<Json<Vec<Sale>>, ApiError> {
    let sales = db.sales().list().await?;
    Ok(Json(sales))
}

pub async fn get_sale(
    Extension(db): Extension<Database>,
    Path(id): Path<i64>,
) -> Result<Json<Sale>, ApiError> {
    let sale = db
        .sales()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", id))?;
    Ok(Json(sale))
}
