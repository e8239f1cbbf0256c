//! # Account Repository
//!
//! Read surface of the pending-account ledger (customer tabs).
//!
//! Writes — opening a tab, appending charges, settling — go through the
//! register so the stock reservation and the ledger write commit together.
//! Settled accounts stay in the table for history but drop out of
//! `list_active`.

use sqlx::SqlitePool;

use crate::error::DbResult;
use bodega_core::{AccountState, LineItem, PendingAccount};

/// Repository for pending-account reads.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Gets an account by id (any state), with its line items.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<PendingAccount>> {
        let account = sqlx::query_as::<_, PendingAccount>(
            r#"
            SELECT id, customer_name, created_at, state, total
            FROM accounts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut account) = account else {
            return Ok(None);
        };

        account.items = self.get_items(id).await?;
        Ok(Some(account))
    }

    /// Lists accounts still in the `pending` state, with their line items.
    ///
    /// Settled accounts are excluded by definition.
    pub async fn list_active(&self) -> DbResult<Vec<PendingAccount>> {
        let mut accounts = sqlx::query_as::<_, PendingAccount>(
            r#"
            SELECT id, customer_name, created_at, state, total
            FROM accounts
            WHERE state = ?1
            ORDER BY id
            "#,
        )
        .bind(AccountState::Pending)
        .fetch_all(&self.pool)
        .await?;

        for account in &mut accounts {
            account.items = self.get_items(account.id).await?;
        }

        Ok(accounts)
    }

    /// Gets the line items for one account, in append order.
    async fn get_items(&self, account_id: i64) -> DbResult<Vec<LineItem>> {
        let items = sqlx::query_as::<_, LineItem>(
            r#"
            SELECT product_id, name_snapshot AS product_name, quantity, unit_price
            FROM account_items
            WHERE account_id = ?1
            ORDER BY id
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
