//! Inventory ledger reads and administrative restock.
//!
//! During normal operation the ledger is decremented only inside the
//! checkout transaction (`services::checkout`), which issues its
//! lock-and-decrement statements directly on the transaction handle.
//! This repository covers everything outside that path.

use sqlx::PgPool;

use arcadia_core::GameId;

use super::RepositoryError;

/// Repository for inventory ledger operations.
pub struct InventoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InventoryRepository<'a> {
    /// Create a new inventory repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add stock for a game, creating the ledger row if absent.
    ///
    /// This is the administrative restock path (seeding, receiving). Order
    /// cancellation does NOT restock; if that ever changes, this is the
    /// operation the cancellation path should call.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn restock(&self, game_id: GameId, quantity: i32) -> Result<i32, RepositoryError> {
        let available: i32 = sqlx::query_scalar(
            r"
            INSERT INTO inventory (game_id, available_quantity)
            VALUES ($1, $2)
            ON CONFLICT (game_id)
            DO UPDATE SET available_quantity = inventory.available_quantity + EXCLUDED.available_quantity
            RETURNING available_quantity
            ",
        )
        .bind(game_id.as_i32())
        .bind(quantity)
        .fetch_one(self.pool)
        .await?;

        Ok(available)
    }
}
