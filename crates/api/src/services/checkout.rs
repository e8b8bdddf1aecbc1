//! The order-creation transaction.
//!
//! [`CheckoutService::create_order`] converts a user's cart into an order,
//! order lines, a payment record, and an inventory decrement as one atomic
//! unit of work. Stock is re-validated inside the transaction under row
//! locks; the earlier cart snapshot is advisory only. Either the whole
//! order exists afterwards, or nothing changed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use arcadia_core::{
    AddressError, GameId, OrderId, OrderStatus, PaymentMethod, PaymentStatus, ShippingAddress,
    UserId,
};

use crate::db::{self, CartRepository, RepositoryError};
use crate::models::CartSnapshotLine;

/// How many times a conflicted transaction is retried from scratch before
/// the failure is surfaced to the caller.
const MAX_ATTEMPTS: u32 = 3;

/// Bound on how long the transaction may wait for inventory row locks.
const LOCK_TIMEOUT: &str = "5s";

/// Errors from order creation.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart had no lines; nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// At least one line asked for more units than the ledger holds.
    /// The whole order is rejected; no partial order is ever created.
    #[error("not enough stock available for game {game_id}")]
    InsufficientStock { game_id: GameId },

    /// The shipping address failed validation. Rejected before any write.
    #[error("invalid shipping address: {0}")]
    InvalidAddress(#[from] AddressError),

    /// The transaction kept losing races after all retries. Safe to retry
    /// the whole call; never reported as success.
    #[error("order creation conflicted with concurrent checkouts")]
    Conflict,

    /// Unexpected storage failure; the transaction was rolled back.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A freshly created order, echoed back to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub total_amount: Decimal,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
}

/// Outcome of a single transaction attempt.
enum AttemptError {
    /// Cart was empty when re-read inside the transaction.
    EmptyCart,
    /// A line failed the in-transaction stock check.
    Stock(GameId),
    /// Database error; may or may not be retryable.
    Db(sqlx::Error),
}

impl From<sqlx::Error> for AttemptError {
    fn from(e: sqlx::Error) -> Self {
        Self::Db(e)
    }
}

/// A cart line as re-read inside the transaction: quantity plus the price
/// frozen into the order.
#[derive(Debug, sqlx::FromRow)]
struct TxCartLine {
    game_id: i32,
    quantity: i32,
    unit_price: Decimal,
}

/// Service executing the order-creation transaction.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
    default_country: &'a str,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, default_country: &'a str) -> Self {
        Self {
            pool,
            default_country,
        }
    }

    /// Convert the user's cart into an order.
    ///
    /// Validation (address, payment method, non-empty cart) happens before
    /// any write. The write path runs in one transaction: re-read stock
    /// under `FOR UPDATE` row locks in game-id order, insert the order
    /// header, insert lines at frozen prices while decrementing the
    /// ledger, insert the pending payment, and clear the cart. Transient
    /// conflicts (serialization failure, deadlock, lock timeout) retry the
    /// whole transaction up to [`MAX_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`]; see its variants. On any error the
    /// ledger, orders, payments, and cart are observably unchanged.
    #[instrument(skip(self, address, payment_method), fields(user_id = %user_id))]
    pub async fn create_order(
        &self,
        user_id: UserId,
        address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Result<OrderConfirmation, CheckoutError> {
        let address = address.validated(self.default_country)?;

        // Unknown methods are accepted but flagged.
        if !payment_method.is_known() {
            tracing::warn!(method = %payment_method, "unrecognized payment method accepted");
        }

        // Advisory pre-check on a lock-free snapshot. The transaction
        // re-validates everything; this only gives fast, cheap rejections.
        let snapshot = CartRepository::new(self.pool).snapshot(user_id).await?;
        if snapshot.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if let Some(game_id) = first_short_line(&snapshot) {
            return Err(CheckoutError::InsufficientStock { game_id });
        }

        for attempt in 1..=MAX_ATTEMPTS {
            match self.try_create(user_id, &address, &payment_method).await {
                Ok(confirmation) => {
                    tracing::info!(
                        order_id = %confirmation.order_id,
                        total = %confirmation.total_amount,
                        "order created"
                    );
                    return Ok(confirmation);
                }
                Err(AttemptError::EmptyCart) => return Err(CheckoutError::EmptyCart),
                Err(AttemptError::Stock(game_id)) => {
                    return Err(CheckoutError::InsufficientStock { game_id });
                }
                Err(AttemptError::Db(e)) if db::is_retryable(&e) => {
                    tracing::warn!(attempt, error = %e, "checkout transaction conflicted, retrying");
                }
                Err(AttemptError::Db(e)) => {
                    return Err(CheckoutError::Repository(RepositoryError::Database(e)));
                }
            }
        }

        Err(CheckoutError::Conflict)
    }

    /// One attempt at the atomic unit of work. Any `Err` rolls back every
    /// write by dropping the transaction.
    async fn try_create(
        &self,
        user_id: UserId,
        address: &ShippingAddress,
        payment_method: &PaymentMethod,
    ) -> Result<OrderConfirmation, AttemptError> {
        let mut tx = self.pool.begin().await?;

        // Bound lock waits so a contended transaction aborts cleanly
        // (surfaced as retryable) instead of holding locks indefinitely.
        sqlx::query(&format!("SET LOCAL lock_timeout = '{LOCK_TIMEOUT}'"))
            .execute(&mut *tx)
            .await?;

        // Re-read the cart with current prices inside the transaction; the
        // pre-transaction snapshot may be stale by now.
        let lines = sqlx::query_as::<_, TxCartLine>(
            r"
            SELECT c.game_id, c.quantity, g.price AS unit_price
            FROM cart_lines c
            JOIN games g ON g.id = c.game_id
            WHERE c.user_id = $1
            ORDER BY c.game_id
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Err(AttemptError::EmptyCart);
        }

        // Lock and validate every ledger row before writing anything.
        // Rows are locked in game-id order so concurrent checkouts over
        // overlapping carts cannot deadlock on each other.
        for line in &lines {
            let available: Option<i32> = sqlx::query_scalar(
                "SELECT available_quantity FROM inventory WHERE game_id = $1 FOR UPDATE",
            )
            .bind(line.game_id)
            .fetch_optional(&mut *tx)
            .await?;

            if available.unwrap_or(0) < line.quantity {
                return Err(AttemptError::Stock(GameId::new(line.game_id)));
            }
        }

        // Total from the prices read under this transaction, never from
        // the client.
        let total_amount: Decimal = lines
            .iter()
            .map(|l| l.unit_price * Decimal::from(l.quantity))
            .sum();

        let (order_id, order_date): (i32, DateTime<Utc>) = sqlx::query_as(
            r"
            INSERT INTO orders (user_id, status, total_amount, ship_full_name,
                                ship_address, ship_city, ship_state,
                                ship_zip_code, ship_country)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, order_date
            ",
        )
        .bind(user_id.as_i32())
        .bind(OrderStatus::Pending.to_string())
        .bind(total_amount)
        .bind(&address.full_name)
        .bind(&address.address)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.zip_code)
        .bind(address.country().unwrap_or_default())
        .fetch_one(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                r"
                INSERT INTO order_lines (order_id, game_id, quantity, price_at_purchase)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order_id)
            .bind(line.game_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .execute(&mut *tx)
            .await?;

            // The rows were locked and validated above; the WHERE guard
            // keeps the ledger from ever going negative regardless.
            let decremented = sqlx::query(
                r"
                UPDATE inventory
                SET available_quantity = available_quantity - $1
                WHERE game_id = $2 AND available_quantity >= $1
                ",
            )
            .bind(line.quantity)
            .bind(line.game_id)
            .execute(&mut *tx)
            .await?;

            if decremented.rows_affected() == 0 {
                return Err(AttemptError::Stock(GameId::new(line.game_id)));
            }
        }

        sqlx::query(
            r"
            INSERT INTO payments (order_id, payment_method, payment_status, amount)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(order_id)
        .bind(payment_method.as_str())
        .bind(PaymentStatus::Pending.to_string())
        .bind(total_amount)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM cart_lines WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(OrderConfirmation {
            order_id: OrderId::new(order_id),
            total_amount,
            shipping_address: address.clone(),
            payment_method: payment_method.clone(),
            status: OrderStatus::Pending,
            order_date,
        })
    }
}

// =============================================================================
// Pure helpers (exported for tests)
// =============================================================================

/// Sum of `unit_price * quantity` over the lines.
#[must_use]
pub fn order_total(lines: &[CartSnapshotLine]) -> Decimal {
    lines
        .iter()
        .map(|l| l.unit_price * Decimal::from(l.quantity))
        .sum()
}

/// First line asking for more units than are available, if any.
#[must_use]
pub fn first_short_line(lines: &[CartSnapshotLine]) -> Option<GameId> {
    lines
        .iter()
        .find(|l| l.available_quantity < l.quantity)
        .map(|l| l.game_id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn line(game_id: i32, quantity: i32, price: &str, available: i32) -> CartSnapshotLine {
        CartSnapshotLine {
            game_id: GameId::new(game_id),
            quantity,
            unit_price: price.parse::<Decimal>().unwrap(),
            available_quantity: available,
        }
    }

    #[test]
    fn test_order_total_exact_decimal() {
        let lines = [line(1, 2, "19.99", 10), line(2, 1, "59.99", 3)];
        assert_eq!(order_total(&lines), "99.97".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_order_total_empty_is_zero() {
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_first_short_line_flags_exhausted_stock() {
        let lines = [line(1, 1, "9.99", 5), line(7, 3, "4.99", 2)];
        assert_eq!(first_short_line(&lines), Some(GameId::new(7)));
    }

    #[test]
    fn test_first_short_line_exact_stock_is_enough() {
        let lines = [line(1, 5, "9.99", 5)];
        assert_eq!(first_short_line(&lines), None);
    }

    #[test]
    fn test_first_short_line_missing_ledger_row_reads_as_zero() {
        // CartRepository::snapshot coalesces a missing inventory row to 0.
        let lines = [line(1, 1, "9.99", 0)];
        assert_eq!(first_short_line(&lines), Some(GameId::new(1)));
    }
}
