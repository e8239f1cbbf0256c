//! # Sale Repository
//!
//! Read surface of the sale ledger.
//!
//! Sales are append-only and immutable: they are written exclusively by the
//! register (direct sales and account settlements) inside the same
//! transaction that reserves stock. This repository only reads them back,
//! resolving each sale's line items with an explicit lookup — no ORM
//! cascade magic.

use sqlx::SqlitePool;

use crate::error::DbResult;
use bodega_core::{LineItem, Sale};

/// Repository for sale ledger reads.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by id, with its line items in request order.
    ///
    /// ## Returns
    /// * `Ok(Some(Sale))` - Sale found
    /// * `Ok(None)` - Sale not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, created_at, total
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut sale) = sale else {
            return Ok(None);
        };

        sale.items = self.get_items(id).await?;
        Ok(Some(sale))
    }

    /// Lists all sales in insertion order, each with its line items.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let mut sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, created_at, total
            FROM sales
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        for sale in &mut sales {
            sale.items = self.get_items(sale.id).await?;
        }

        Ok(sales)
    }

    /// Counts recorded sales (for diagnostics and tests).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Gets the line items for one sale, in request order.
    async fn get_items(&self, sale_id: i64) -> DbResult<Vec<LineItem>> {
        let items = sqlx::query_as::<_, LineItem>(
            r#"
            SELECT product_id, name_snapshot AS product_name, quantity, unit_price
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
