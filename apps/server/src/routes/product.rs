//! # Product Routes
//!
//! Inventory CRUD. Mirrors the repository surface one-to-one; stock is only
//! ever decremented through the sale/account routes.

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use bodega_core::{NewProduct, Product};
use bodega_db::Database;

use crate::error::ApiError;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/barcode/:code", get(get_by_barcode))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn create_product(
    Extension(db): Extension<Database>,
    Json(body): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = db.products().create(&body).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_products(
    Extension(db): Extension<Database>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let offset = params.offset.unwrap_or(0).max(0);
    let limit = params.limit.unwrap_or(100).clamp(1, 500);

    let products = db.products().list(offset, limit).await?;
    Ok(Json(products))
}

pub async fn get_product(
    Extension(db): Extension<Database>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, ApiError> {
    let product = db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;
    Ok(Json(product))
}

pub async fn get_by_barcode(
    Extension(db): Extension<Database>,
    Path(code): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = db
        .products()
        .get_by_barcode(&code)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &code))?;
    Ok(Json(product))
}

pub async fn update_product(
    Extension(db): Extension<Database>,
    Path(id): Path<i64>,
    Json(body): Json<NewProduct>,
) -> Result<Json<Product>, ApiError> {
    let product = db.products().update(id, &body).await?;
    Ok(Json(product))
}

pub async fn delete_product(
    Extension(db): Extension<Database>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    db.products().delete(id).await?;
    Ok(Json(json!({ "message": "product deleted" })))
}
