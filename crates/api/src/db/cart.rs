//! Cart snapshot reads and cart clearing.

use rust_decimal::Decimal;
use sqlx::PgPool;

use arcadia_core::{GameId, UserId};

use super::RepositoryError;
use crate::models::CartSnapshotLine;

/// Internal row type for the cart snapshot query.
#[derive(Debug, sqlx::FromRow)]
struct CartSnapshotRow {
    game_id: i32,
    quantity: i32,
    unit_price: Decimal,
    available_quantity: i32,
}

impl From<CartSnapshotRow> for CartSnapshotLine {
    fn from(row: CartSnapshotRow) -> Self {
        Self {
            game_id: GameId::new(row.game_id),
            quantity: row.quantity,
            unit_price: row.unit_price,
            available_quantity: row.available_quantity,
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Read a point-in-time view of a user's cart joined with live price
    /// and live stock.
    ///
    /// The snapshot is advisory only: it takes no locks and can go stale
    /// between read and checkout. A game without an inventory row reads as
    /// zero available. An empty cart returns an empty vec, not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn snapshot(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CartSnapshotLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartSnapshotRow>(
            r"
            SELECT c.game_id, c.quantity, g.price AS unit_price,
                   COALESCE(i.available_quantity, 0) AS available_quantity
            FROM cart_lines c
            JOIN games g ON g.id = c.game_id
            LEFT JOIN inventory i ON i.game_id = c.game_id
            WHERE c.user_id = $1
            ORDER BY c.game_id
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Upsert a cart line (used by the seed tooling; cart CRUD itself is
    /// out of scope for the order core).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn put_line(
        &self,
        user_id: UserId,
        game_id: GameId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO cart_lines (user_id, game_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, game_id) DO UPDATE SET quantity = EXCLUDED.quantity
            ",
        )
        .bind(user_id.as_i32())
        .bind(game_id.as_i32())
        .bind(quantity)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
