//! # The Register
//!
//! Every stock-mutating operation in Bodega POS goes through here: direct
//! sales, opening a customer tab, adding charges to it, and settling it.
//!
//! ## Transaction Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     One Register Operation                          │
//! │                                                                     │
//! │  acquire write lock  ← serializes multi-step transactions           │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  BEGIN                                                              │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  for each requested (product, quantity), in request order:          │
//! │    read product ── missing? ──────────► error, ROLLBACK             │
//! │    check stock ── insufficient? ──────► error, ROLLBACK             │
//! │    decrement stock, snapshot name + price into a line item          │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ledger write(s): sale row + items, or account row + items          │
//! │  (settle touches BOTH ledgers here)                                 │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  COMMIT  ← the only point effects become visible                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rollback is sqlx's rollback-on-drop: any `?` that leaves an operation
//! before `commit` discards every reservation and ledger write made in that
//! operation, including reservations from earlier items of the same
//! request. The first failing item decides the error; later items are never
//! examined.
//!
//! ## Why a Lock on Top of Transactions
//! SQLite serializes writers, but two deferred transactions could both read
//! the same stock level before either decrements it. Holding one
//! mutual-exclusion lock for the whole read-check-decrement-write span rules
//! that interleaving out, which is all the serialization this system's scale
//! needs. Plain reads never take the lock and, thanks to WAL, never see an
//! uncommitted transaction.

use std::sync::Arc;

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use bodega_core::{
    items_total, validation, AccountState, CoreError, LineItem, LineItemRequest, PendingAccount,
    Sale,
};

/// The transaction coordinator for sales and pending accounts.
///
/// Obtained from [`Database::register`](crate::Database::register). Clones
/// share the same write lock, so concurrent handlers still serialize.
#[derive(Debug, Clone)]
pub struct Register {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl Register {
    /// Creates a register over the given pool and shared write lock.
    pub(crate) fn new(pool: SqlitePool, write_lock: Arc<Mutex<()>>) -> Self {
        Register { pool, write_lock }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Records a direct sale.
    ///
    /// Reserves stock for every requested line, prices the lines at the
    /// moment of reservation, and appends an immutable sale — all in one
    /// transaction.
    pub async fn create_sale(&self, items: &[LineItemRequest]) -> DbResult<Sale> {
        validation::validate_line_items(items).map_err(CoreError::from)?;

        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let line_items = resolve_line_items(&mut tx, items).await?;
        let total = items_total(&line_items);
        let sale = insert_sale(&mut tx, &line_items, total).await?;

        tx.commit().await?;

        info!(sale_id = sale.id, total, items = sale.items.len(), "Sale recorded");
        Ok(sale)
    }

    /// Opens a pending account (customer tab) with an initial set of charges.
    pub async fn open_account(
        &self,
        customer_name: &str,
        items: &[LineItemRequest],
    ) -> DbResult<PendingAccount> {
        validation::validate_customer_name(customer_name).map_err(CoreError::from)?;
        validation::validate_line_items(items).map_err(CoreError::from)?;

        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let line_items = resolve_line_items(&mut tx, items).await?;
        let total = items_total(&line_items);
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO accounts (customer_name, state, total, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(customer_name)
        .bind(AccountState::Pending)
        .bind(total)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let account_id = result.last_insert_rowid();
        insert_account_items(&mut tx, account_id, &line_items).await?;

        tx.commit().await?;

        info!(account_id, customer = %customer_name, total, "Account opened");

        Ok(PendingAccount {
            id: account_id,
            customer_name: customer_name.to_string(),
            created_at: now,
            state: AccountState::Pending,
            total,
            items: line_items,
        })
    }

    /// Appends charges to a pending account.
    ///
    /// ## Errors
    /// * `NotFound` - no account with this id
    /// * `InvalidState` - account already settled
    /// * `NotFound` / `InsufficientStock` - from reservation; nothing is
    ///   appended and no stock moves
    pub async fn add_to_account(
        &self,
        account_id: i64,
        items: &[LineItemRequest],
    ) -> DbResult<PendingAccount> {
        validation::validate_line_items(items).map_err(CoreError::from)?;

        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let mut account = fetch_pending_account(&mut tx, account_id).await?;

        let line_items = resolve_line_items(&mut tx, items).await?;
        let added_total = items_total(&line_items);

        insert_account_items(&mut tx, account_id, &line_items).await?;

        sqlx::query("UPDATE accounts SET total = total + ?2 WHERE id = ?1")
            .bind(account_id)
            .bind(added_total)
            .execute(&mut *tx)
            .await?;

        // Re-read inside the transaction so the returned account reflects
        // the full item list in append order.
        account.items = fetch_account_items(&mut tx, account_id).await?;
        account.total += added_total;

        tx.commit().await?;

        info!(account_id, added_total, total = account.total, "Charges added to account");
        Ok(account)
    }

    /// Settles a pending account: transitions it to `settled` and records a
    /// sale with the account's line items and total, both in the same
    /// transaction. Settling twice fails with `InvalidState` and records
    /// nothing.
    pub async fn settle_account(&self, account_id: i64) -> DbResult<PendingAccount> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let mut account = fetch_pending_account(&mut tx, account_id).await?;
        account.items = fetch_account_items(&mut tx, account_id).await?;

        // Archive into the sale ledger; stock was already reserved when the
        // charges were added, so no reservation happens here.
        let sale = insert_sale(&mut tx, &account.items, account.total).await?;

        sqlx::query("UPDATE accounts SET state = ?2 WHERE id = ?1")
            .bind(account_id)
            .bind(AccountState::Settled)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        account.state = AccountState::Settled;

        info!(
            account_id,
            sale_id = sale.id,
            total = account.total,
            "Account settled"
        );
        Ok(account)
    }
}

// =============================================================================
// Transaction-Scoped Helpers
// =============================================================================

/// Reserves stock for one requested line.
///
/// Reads the product inside the caller's transaction, verifies sufficiency,
/// decrements, and returns the line item with name and price frozen at this
/// moment. Later reservations in the same transaction see this decrement,
/// so a request listing the same product twice cannot oversell it.
async fn reserve(
    conn: &mut SqliteConnection,
    product_id: i64,
    requested: i64,
) -> DbResult<LineItem> {
    let row = sqlx::query_as::<_, (String, f64, i64)>(
        "SELECT name, price, quantity FROM products WHERE id = ?1",
    )
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some((name, price, on_hand)) = row else {
        return Err(DbError::not_found("Product", product_id));
    };

    if on_hand < requested {
        return Err(DbError::Domain(CoreError::InsufficientStock {
            product: name,
            available: on_hand,
            requested,
        }));
    }

    sqlx::query("UPDATE products SET quantity = quantity - ?2, updated_at = ?3 WHERE id = ?1")
        .bind(product_id)
        .bind(requested)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

    debug!(product_id, requested, remaining = on_hand - requested, "Stock reserved");

    Ok(LineItem {
        product_id,
        product_name: name,
        quantity: requested,
        unit_price: price,
    })
}

/// Resolves a request list into priced line items, reserving stock for each
/// entry in request order. The first failure propagates and rolls the whole
/// transaction back.
async fn resolve_line_items(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    items: &[LineItemRequest],
) -> DbResult<Vec<LineItem>> {
    let mut line_items = Vec::with_capacity(items.len());

    for request in items {
        let item = reserve(&mut *tx, request.product_id, request.quantity).await?;
        line_items.push(item);
    }

    Ok(line_items)
}

/// Appends a sale with its items to the sale ledger, inside the caller's
/// transaction.
async fn insert_sale(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    items: &[LineItem],
    total: f64,
) -> DbResult<Sale> {
    let now = Utc::now();

    let result = sqlx::query("INSERT INTO sales (created_at, total) VALUES (?1, ?2)")
        .bind(now)
        .bind(total)
        .execute(&mut **tx)
        .await?;

    let sale_id = result.last_insert_rowid();

    for item in items {
        sqlx::query(
            r#"
            INSERT INTO sale_items (sale_id, product_id, name_snapshot, quantity, unit_price)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(sale_id)
        .bind(item.product_id)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(item.unit_price)
        .execute(&mut **tx)
        .await?;
    }

    Ok(Sale {
        id: sale_id,
        created_at: now,
        total,
        items: items.to_vec(),
    })
}

/// Appends line items to an account, inside the caller's transaction.
async fn insert_account_items(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    account_id: i64,
    items: &[LineItem],
) -> DbResult<()> {
    for item in items {
        sqlx::query(
            r#"
            INSERT INTO account_items (account_id, product_id, name_snapshot, quantity, unit_price)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(account_id)
        .bind(item.product_id)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(item.unit_price)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Fetches an account that must exist and must still be pending.
async fn fetch_pending_account(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    account_id: i64,
) -> DbResult<PendingAccount> {
    let account = sqlx::query_as::<_, PendingAccount>(
        r#"
        SELECT id, customer_name, created_at, state, total
        FROM accounts
        WHERE id = ?1
        "#,
    )
    .bind(account_id)
    .fetch_optional(&mut **tx)
    .await?;

    let Some(account) = account else {
        return Err(DbError::not_found("Account", account_id));
    };

    if !account.is_pending() {
        return Err(DbError::Domain(CoreError::InvalidState {
            account_id,
            state: account.state.as_str().to_string(),
        }));
    }

    Ok(account)
}

/// Fetches an account's line items inside the caller's transaction.
async fn fetch_account_items(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    account_id: i64,
) -> DbResult<Vec<LineItem>> {
    let items = sqlx::query_as::<_, LineItem>(
        r#"
        SELECT product_id, name_snapshot AS product_name, quantity, unit_price
        FROM account_items
        WHERE account_id = ?1
        ORDER BY id
        "#,
    )
    .bind(account_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(items)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use bodega_core::NewProduct;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, name: &str, barcode: &str, price: f64, qty: i64) -> i64 {
        db.products()
            .create(&NewProduct {
                name: name.to_string(),
                barcode: barcode.to_string(),
                price,
                quantity: qty,
            })
            .await
            .unwrap()
            .id
    }

    fn want(product_id: i64, quantity: i64) -> LineItemRequest {
        LineItemRequest {
            product_id,
            quantity,
        }
    }

    async fn stock_of(db: &Database, id: i64) -> i64 {
        db.products().get_by_id(id).await.unwrap().unwrap().quantity
    }

    // -------------------------------------------------------------------------
    // Direct sales
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_sale_decrements_stock_and_prices_at_reservation() {
        let db = test_db().await;
        let milk = seed_product(&db, "Milk 1L", "m-1", 10.0, 5).await;

        let sale = db.register().create_sale(&[want(milk, 3)]).await.unwrap();

        assert_eq!(sale.total, 30.0);
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.items[0].product_name, "Milk 1L");
        assert_eq!(sale.items[0].unit_price, 10.0);
        assert_eq!(stock_of(&db, milk).await, 2);

        // Ledger agrees with the returned value.
        let stored = db.sales().get_by_id(sale.id).await.unwrap().unwrap();
        assert_eq!(stored.total, 30.0);
        assert_eq!(stored.items.len(), 1);
    }

    #[tokio::test]
    async fn test_insufficient_stock_fails_and_changes_nothing() {
        let db = test_db().await;
        let milk = seed_product(&db, "Milk 1L", "m-1", 10.0, 5).await;

        db.register().create_sale(&[want(milk, 3)]).await.unwrap();

        // Second sale of 3 must fail: only 2 on hand.
        let err = db.register().create_sale(&[want(milk, 3)]).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock {
                available: 2,
                requested: 3,
                ..
            })
        ));

        assert_eq!(stock_of(&db, milk).await, 2);
        assert_eq!(db.sales().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_line_rolls_back_earlier_reservations() {
        let db = test_db().await;
        let milk = seed_product(&db, "Milk 1L", "m-1", 10.0, 5).await;
        let bread = seed_product(&db, "Bread", "b-1", 4.0, 1).await;

        // First line would succeed on its own; the second fails the request.
        let err = db
            .register()
            .create_sale(&[want(milk, 2), want(bread, 5)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock { .. })
        ));

        // No partial decrement survives, no sale was recorded.
        assert_eq!(stock_of(&db, milk).await, 5);
        assert_eq!(stock_of(&db, bread).await, 1);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_product_reports_first_failing_item() {
        let db = test_db().await;
        let milk = seed_product(&db, "Milk 1L", "m-1", 10.0, 5).await;

        let err = db
            .register()
            .create_sale(&[want(milk, 1), want(999, 1)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::NotFound { entity: "Product", .. })
        ));
        assert_eq!(stock_of(&db, milk).await, 5);
    }

    #[tokio::test]
    async fn test_same_product_twice_cannot_oversell() {
        let db = test_db().await;
        let milk = seed_product(&db, "Milk 1L", "m-1", 10.0, 5).await;

        // 3 + 3 exceeds the 5 on hand even though each line alone fits.
        let err = db
            .register()
            .create_sale(&[want(milk, 3), want(milk, 3)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock {
                available: 2,
                requested: 3,
                ..
            })
        ));
        assert_eq!(stock_of(&db, milk).await, 5);

        // 3 + 2 fits exactly.
        let sale = db
            .register()
            .create_sale(&[want(milk, 3), want(milk, 2)])
            .await
            .unwrap();
        assert_eq!(sale.total, 50.0);
        assert_eq!(stock_of(&db, milk).await, 0);
    }

    #[tokio::test]
    async fn test_empty_request_is_rejected_before_touching_stock() {
        let db = test_db().await;
        let err = db.register().create_sale(&[]).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_sale_snapshot_survives_product_changes() {
        let db = test_db().await;
        let milk = seed_product(&db, "Milk 1L", "m-1", 10.0, 5).await;

        let sale = db.register().create_sale(&[want(milk, 1)]).await.unwrap();

        // Repricing and renaming the product must not rewrite history.
        db.products()
            .update(
                milk,
                &NewProduct {
                    name: "Milk 1L (new)".to_string(),
                    barcode: "m-1".to_string(),
                    price: 99.0,
                    quantity: 4,
                },
            )
            .await
            .unwrap();
        db.products().delete(milk).await.unwrap();

        let stored = db.sales().get_by_id(sale.id).await.unwrap().unwrap();
        assert_eq!(stored.items[0].product_name, "Milk 1L");
        assert_eq!(stored.items[0].unit_price, 10.0);
        assert_eq!(stored.total, 10.0);
    }

    // -------------------------------------------------------------------------
    // Pending accounts
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_account_open_append_settle_flow() {
        let db = test_db().await;
        let milk = seed_product(&db, "Milk 1L", "m-1", 10.0, 5).await;
        let register = db.register();

        // Open for Ana with 2 units: total 20.0, stock 5 -> 3.
        let account = register.open_account("Ana", &[want(milk, 2)]).await.unwrap();
        assert_eq!(account.state, AccountState::Pending);
        assert_eq!(account.total, 20.0);
        assert_eq!(stock_of(&db, milk).await, 3);

        // Append 1 more: total 30.0, stock 3 -> 2.
        let account = register.add_to_account(account.id, &[want(milk, 1)]).await.unwrap();
        assert_eq!(account.total, 30.0);
        assert_eq!(account.items.len(), 2);
        assert_eq!(items_total(&account.items), account.total);
        assert_eq!(stock_of(&db, milk).await, 2);

        // Settle: account archived as a sale with the same items and total.
        let settled = register.settle_account(account.id).await.unwrap();
        assert_eq!(settled.state, AccountState::Settled);
        assert_eq!(settled.total, 30.0);

        let sales = db.sales().list().await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].total, 30.0);
        assert_eq!(sales[0].items.len(), 2);
        assert_eq!(items_total(&sales[0].items), 30.0);

        // Settled accounts drop out of the active listing.
        assert!(db.accounts().list_active().await.unwrap().is_empty());
        // ... but stay readable by id.
        let archived = db.accounts().get_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(archived.state, AccountState::Settled);
    }

    #[tokio::test]
    async fn test_settle_twice_fails_without_second_sale() {
        let db = test_db().await;
        let milk = seed_product(&db, "Milk 1L", "m-1", 10.0, 5).await;
        let register = db.register();

        let account = register.open_account("Ana", &[want(milk, 1)]).await.unwrap();
        register.settle_account(account.id).await.unwrap();

        let err = register.settle_account(account.id).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InvalidState { .. })
        ));
        assert_eq!(db.sales().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_append_to_settled_account_fails() {
        let db = test_db().await;
        let milk = seed_product(&db, "Milk 1L", "m-1", 10.0, 5).await;
        let register = db.register();

        let account = register.open_account("Ana", &[want(milk, 1)]).await.unwrap();
        register.settle_account(account.id).await.unwrap();

        let err = register
            .add_to_account(account.id, &[want(milk, 1)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InvalidState { .. })
        ));

        // Stock untouched by the rejected append.
        assert_eq!(stock_of(&db, milk).await, 4);
    }

    #[tokio::test]
    async fn test_append_failure_leaves_account_and_stock_unchanged() {
        let db = test_db().await;
        let milk = seed_product(&db, "Milk 1L", "m-1", 10.0, 5).await;
        let register = db.register();

        let account = register.open_account("Ana", &[want(milk, 2)]).await.unwrap();

        let err = register
            .add_to_account(account.id, &[want(milk, 10)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock { .. })
        ));

        let unchanged = db.accounts().get_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(unchanged.total, 20.0);
        assert_eq!(unchanged.items.len(), 1);
        assert_eq!(items_total(&unchanged.items), unchanged.total);
        assert_eq!(stock_of(&db, milk).await, 3);
    }

    #[tokio::test]
    async fn test_account_missing_is_not_found() {
        let db = test_db().await;
        let milk = seed_product(&db, "Milk 1L", "m-1", 10.0, 5).await;
        let register = db.register();

        let err = register
            .add_to_account(404, &[want(milk, 1)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::NotFound { entity: "Account", .. })
        ));

        let err = register.settle_account(404).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::NotFound { entity: "Account", .. })
        ));
    }

    #[tokio::test]
    async fn test_open_account_failure_reserves_nothing() {
        let db = test_db().await;
        let milk = seed_product(&db, "Milk 1L", "m-1", 10.0, 2).await;

        let err = db
            .register()
            .open_account("Ana", &[want(milk, 1), want(milk, 5)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock { .. })
        ));

        assert_eq!(stock_of(&db, milk).await, 2);
        assert!(db.accounts().list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_account_total_tracks_items_across_mixed_products() {
        let db = test_db().await;
        let milk = seed_product(&db, "Milk 1L", "m-1", 10.0, 10).await;
        let bread = seed_product(&db, "Bread", "b-1", 4.5, 10).await;
        let register = db.register();

        let account = register
            .open_account("Luis", &[want(milk, 2), want(bread, 2)])
            .await
            .unwrap();
        assert_eq!(account.total, 29.0);
        assert_eq!(items_total(&account.items), 29.0);

        let account = register
            .add_to_account(account.id, &[want(bread, 1)])
            .await
            .unwrap();
        assert_eq!(account.total, 33.5);
        assert_eq!(items_total(&account.items), 33.5);
    }
}
