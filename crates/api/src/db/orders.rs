//! Order queries and the administrative status override.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use arcadia_core::{
    GameId, OrderId, OrderLineId, OrderStatus, PaymentId, PaymentMethod, PaymentStatus,
    ShippingAddress, UserId,
};

use super::RepositoryError;
use crate::models::{
    Order, OrderDetails, OrderFilter, OrderLine, OrderPage, OrderSummary, PageRequest, Payment,
};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for order header queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    status: String,
    total_amount: Decimal,
    order_date: DateTime<Utc>,
    ship_full_name: String,
    ship_address: String,
    ship_city: String,
    ship_state: String,
    ship_zip_code: String,
    ship_country: String,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            status,
            total_amount: row.total_amount,
            order_date: row.order_date,
            shipping_address: ShippingAddress {
                full_name: row.ship_full_name,
                address: row.ship_address,
                city: row.ship_city,
                state: row.ship_state,
                zip_code: row.ship_zip_code,
                country: if row.ship_country.is_empty() {
                    None
                } else {
                    Some(row.ship_country)
                },
            },
        })
    }
}

/// Internal row type for order listings with payment info joined in.
#[derive(Debug, sqlx::FromRow)]
struct OrderSummaryRow {
    id: i32,
    user_id: i32,
    status: String,
    total_amount: Decimal,
    order_date: DateTime<Utc>,
    payment_status: Option<String>,
    payment_method: Option<String>,
}

impl TryFrom<OrderSummaryRow> for OrderSummary {
    type Error = RepositoryError;

    fn try_from(row: OrderSummaryRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;
        let payment_status = row
            .payment_status
            .map(|s| s.parse::<PaymentStatus>())
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid payment status in database: {e}"))
            })?;

        Ok(Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            status,
            total_amount: row.total_amount,
            order_date: row.order_date,
            payment_status,
            payment_method: row.payment_method.map(PaymentMethod::new),
        })
    }
}

/// Internal row type for order line queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    id: i32,
    order_id: i32,
    game_id: i32,
    title: String,
    quantity: i32,
    price_at_purchase: Decimal,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        Self {
            id: OrderLineId::new(row.id),
            order_id: OrderId::new(row.order_id),
            game_id: GameId::new(row.game_id),
            title: row.title,
            quantity: row.quantity,
            price_at_purchase: row.price_at_purchase,
        }
    }
}

/// Internal row type for payment queries.
#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: i32,
    order_id: i32,
    payment_method: String,
    payment_status: String,
    amount: Decimal,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = RepositoryError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let payment_status = row.payment_status.parse::<PaymentStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid payment status in database: {e}"))
        })?;

        Ok(Self {
            id: PaymentId::new(row.id),
            order_id: OrderId::new(row.order_id),
            payment_method: PaymentMethod::new(row.payment_method),
            payment_status,
            amount: row.amount,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a fully-assembled order (header, payment, lines).
    ///
    /// Non-admin callers only see their own orders; for anyone else the
    /// order is indistinguishable from absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if the order has no payment
    /// or a status column holds an unknown value.
    pub async fn get_details(
        &self,
        order_id: OrderId,
        requester: UserId,
        is_admin: bool,
    ) -> Result<Option<OrderDetails>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, status, total_amount, order_date,
                   ship_full_name, ship_address, ship_city, ship_state,
                   ship_zip_code, ship_country
            FROM orders
            WHERE id = $1 AND (user_id = $2 OR $3)
            ",
        )
        .bind(order_id.as_i32())
        .bind(requester.as_i32())
        .bind(is_admin)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let order = Order::try_from(row)?;

        let payment = sqlx::query_as::<_, PaymentRow>(
            r"
            SELECT id, order_id, payment_method, payment_status, amount
            FROM payments
            WHERE order_id = $1
            ",
        )
        .bind(order_id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| {
            RepositoryError::DataCorruption(format!("order {order_id} has no payment record"))
        })?;

        let lines = self.lines(order_id).await?;

        Ok(Some(OrderDetails {
            order,
            payment: Payment::try_from(payment)?,
            lines,
        }))
    }

    /// Get the lines of an order with catalog titles joined in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, order_id: OrderId) -> Result<Vec<OrderLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderLineRow>(
            r"
            SELECT ol.id, ol.order_id, ol.game_id, g.title, ol.quantity,
                   ol.price_at_purchase
            FROM order_lines ol
            JOIN games g ON g.id = ol.game_id
            WHERE ol.order_id = $1
            ORDER BY ol.id
            ",
        )
        .bind(order_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List a user's orders, newest first, with payment info joined in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderSummaryRow>(
            r"
            SELECT o.id, o.user_id, o.status, o.total_amount, o.order_date,
                   p.payment_status, p.payment_method
            FROM orders o
            LEFT JOIN payments p ON p.order_id = o.id
            WHERE o.user_id = $1
            ORDER BY o.order_date DESC
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderSummary::try_from).collect()
    }

    /// Admin listing with optional filters and limit/offset pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        filter: &OrderFilter,
        page: PageRequest,
    ) -> Result<OrderPage, RepositoryError> {
        let status = filter.status.map(|s| s.to_string());
        let user_id = filter.user_id.map(|id| id.as_i32());

        let total_count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM orders o
            WHERE ($1::text IS NULL OR o.status = $1)
              AND ($2::int4 IS NULL OR o.user_id = $2)
              AND ($3::timestamptz IS NULL OR o.order_date >= $3)
              AND ($4::timestamptz IS NULL OR o.order_date < $4)
            ",
        )
        .bind(status.as_deref())
        .bind(user_id)
        .bind(filter.placed_after)
        .bind(filter.placed_before)
        .fetch_one(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, OrderSummaryRow>(
            r"
            SELECT o.id, o.user_id, o.status, o.total_amount, o.order_date,
                   p.payment_status, p.payment_method
            FROM orders o
            LEFT JOIN payments p ON p.order_id = o.id
            WHERE ($1::text IS NULL OR o.status = $1)
              AND ($2::int4 IS NULL OR o.user_id = $2)
              AND ($3::timestamptz IS NULL OR o.order_date >= $3)
              AND ($4::timestamptz IS NULL OR o.order_date < $4)
            ORDER BY o.order_date DESC
            LIMIT $5 OFFSET $6
            ",
        )
        .bind(status.as_deref())
        .bind(user_id)
        .bind(filter.placed_after)
        .bind(filter.placed_before)
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        let orders = rows
            .into_iter()
            .map(OrderSummary::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OrderPage {
            orders,
            page: page.page,
            limit: page.limit,
            total_count,
            total_pages: {
                let per_page = i64::from(page.limit.max(1));
                ((total_count + per_page - 1) / per_page).max(1)
            },
        })
    }

    /// Administrative status override.
    ///
    /// Deliberately permissive: any of the five statuses is accepted
    /// regardless of the current one. This method is the single call site
    /// for that policy; a stricter graph check
    /// (`OrderStatus::can_progress_to`) can be added here without touching
    /// callers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
            .bind(status.to_string())
            .bind(order_id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
