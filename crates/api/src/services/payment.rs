//! Payment settlement stub.
//!
//! Stands in for a payment gateway: settlement flips the payment status
//! and advances the order through its lifecycle (`pending -> processing`)
//! in one transaction. Both updates commit together or neither does.

use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use arcadia_core::{OrderId, OrderStatus, PaymentStatus, UserId};

use crate::db::RepositoryError;

/// Errors from payment settlement.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// No such order, or it belongs to someone else.
    #[error("order not found")]
    OrderNotFound,

    /// The payment is already completed. A no-op error, never a silent
    /// success.
    #[error("payment already completed")]
    AlreadyPaid,

    /// Unexpected storage failure; the transaction was rolled back.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for PaymentError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Service settling payments for orders.
pub struct PaymentService<'a> {
    pool: &'a PgPool,
}

impl<'a> PaymentService<'a> {
    /// Create a new payment service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Settle the payment for one of the caller's own orders.
    ///
    /// The payment and order rows are locked while their statuses are
    /// checked, so two concurrent settlements cannot both succeed: the
    /// loser observes `completed` and gets [`PaymentError::AlreadyPaid`].
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::OrderNotFound`] if the order doesn't exist
    /// or isn't owned by `user_id`, [`PaymentError::AlreadyPaid`] if the
    /// payment was settled before, and [`PaymentError::Repository`] for
    /// storage failures.
    #[instrument(skip(self), fields(order_id = %order_id, user_id = %user_id))]
    pub async fn settle(&self, order_id: OrderId, user_id: UserId) -> Result<(), PaymentError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(String, String)> = sqlx::query_as(
            r"
            SELECT p.payment_status, o.status
            FROM payments p
            JOIN orders o ON o.id = p.order_id
            WHERE p.order_id = $1 AND o.user_id = $2
            FOR UPDATE OF p, o
            ",
        )
        .bind(order_id.as_i32())
        .bind(user_id.as_i32())
        .fetch_optional(&mut *tx)
        .await?;

        let (payment_status, order_status) = row.ok_or(PaymentError::OrderNotFound)?;
        let payment_status = payment_status.parse::<PaymentStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid payment status in database: {e}"))
        })?;
        let order_status = order_status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        // In a real integration the gateway call would happen here.
        let settled = payment_status
            .settle()
            .map_err(|_| PaymentError::AlreadyPaid)?;

        sqlx::query("UPDATE payments SET payment_status = $1 WHERE order_id = $2")
            .bind(settled.to_string())
            .bind(order_id.as_i32())
            .execute(&mut *tx)
            .await?;

        // Settlement intentionally advances the order; the two updates
        // commit together or roll back together.
        if let Some(next) = advance_on_settlement(order_status) {
            sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
                .bind(next.to_string())
                .bind(order_id.as_i32())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!("payment settled");
        Ok(())
    }
}

/// Order status written alongside a successful settlement, if any.
///
/// The advance goes through the lifecycle graph: a `pending` order moves to
/// `processing`, while an order an admin has already pushed further (or
/// cancelled) keeps its status even though the payment completes.
fn advance_on_settlement(current: OrderStatus) -> Option<OrderStatus> {
    current
        .can_progress_to(OrderStatus::Processing)
        .then_some(OrderStatus::Processing)
}
