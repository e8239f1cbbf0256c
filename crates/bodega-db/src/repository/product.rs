//! # Product Repository
//!
//! Database operations for the inventory store.
//!
//! ## Key Operations
//! - CRUD with barcode uniqueness
//! - Paginated listing (stable insertion order)
//! - Barcode lookup for the scanner path
//!
//! Stock decrements are NOT here: they belong to the register, where the
//! check-and-decrement shares a transaction with the ledger write.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bodega_core::{validation, CoreError, NewProduct, Product};

/// Maps a SQLite UNIQUE violation on `products.barcode` to the domain error.
///
/// The repository knows which barcode it tried to write, so the error can
/// carry it; everything else falls through to the generic conversion.
pub(crate) fn barcode_conflict(err: sqlx::Error, barcode: &str) -> DbError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err
            .message()
            .contains("UNIQUE constraint failed: products.barcode")
        {
            return DbError::Domain(CoreError::DuplicateBarcode {
                barcode: barcode.to_string(),
            });
        }
    }
    DbError::from(err)
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let product = repo.get_by_barcode("7501000111111").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with its assigned id
    /// * `Err(DbError::Domain(DuplicateBarcode))` - barcode already exists
    /// * `Err(DbError::Domain(Validation(..)))` - invalid fields
    pub async fn create(&self, fields: &NewProduct) -> DbResult<Product> {
        validation::validate_product(fields).map_err(CoreError::from)?;

        debug!(barcode = %fields.barcode, "Inserting product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, barcode, price, quantity, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.barcode)
        .bind(fields.price)
        .bind(fields.quantity)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| barcode_conflict(e, &fields.barcode))?;

        let id = result.last_insert_rowid();

        Ok(Product {
            id,
            name: fields.name.clone(),
            barcode: fields.barcode.clone(),
            price: fields.price,
            quantity: fields.quantity,
            created_at: now,
            updated_at: now,
        })
    }

    /// Gets a product by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, barcode, price, quantity, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its barcode (the scanner path).
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, barcode, price, quantity, created_at, updated_at
            FROM products
            WHERE barcode = ?1
            "#,
        )
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists products with pagination, in insertion (id) order.
    pub async fn list(&self, offset: i64, limit: i64) -> DbResult<Vec<Product>> {
        debug!(offset, limit, "Listing products");

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, barcode, price, quantity, created_at, updated_at
            FROM products
            ORDER BY id
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Full replace of a product's mutable fields.
    ///
    /// ## Returns
    /// * `Ok(Product)` - the updated product
    /// * `Err(DbError::Domain(NotFound))` - product doesn't exist
    /// * `Err(DbError::Domain(DuplicateBarcode))` - new barcode taken
    pub async fn update(&self, id: i64, fields: &NewProduct) -> DbResult<Product> {
        validation::validate_product(fields).map_err(CoreError::from)?;

        debug!(id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                barcode = ?3,
                price = ?4,
                quantity = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.barcode)
        .bind(fields.price)
        .bind(fields.quantity)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| barcode_conflict(e, &fields.barcode))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product.
    ///
    /// Destructive: existing line items keep their snapshots but their
    /// `product_id` reference dangles from here on.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
