//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use arcadia_core::{
    GameId, OrderId, OrderLineId, OrderStatus, PaymentId, PaymentMethod, PaymentStatus,
    ShippingAddress, UserId,
};

/// An order header.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    /// Sum of line totals, computed once at creation and never recomputed.
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
    pub shipping_address: ShippingAddress,
}

/// One line of an order, with the catalog title joined in for display.
///
/// `price_at_purchase` is the frozen copy of the catalog price at the
/// moment the order was created; later price changes never touch it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: OrderLineId,
    pub order_id: OrderId,
    pub game_id: GameId,
    pub title: String,
    pub quantity: i32,
    pub price_at_purchase: Decimal,
}

/// The payment record attached one-to-one to an order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    /// Always equals the order's `total_amount`.
    pub amount: Decimal,
}

/// A fully-assembled order: header, payment, and lines.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub payment: Payment,
    pub lines: Vec<OrderLine>,
}

/// A single order in a listing, with payment info joined in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_method: Option<PaymentMethod>,
}

/// One cart line joined with live price and live stock.
///
/// This is a point-in-time view only. It is not a lock: the checkout
/// transaction re-reads stock under row locks before it writes anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshotLine {
    pub game_id: GameId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub available_quantity: i32,
}

/// Filter criteria for the admin order listing.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub user_id: Option<UserId>,
    /// Inclusive lower bound on `order_date`.
    pub placed_after: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `order_date`.
    pub placed_before: Option<DateTime<Utc>>,
}

/// Pagination request with 1-based page numbers.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl PageRequest {
    /// Row offset for this page.
    #[must_use]
    pub fn offset(self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }
}

/// One page of the admin order listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage {
    pub orders: Vec<OrderSummary>,
    pub page: u32,
    pub limit: u32,
    pub total_count: i64,
    pub total_pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        assert_eq!(PageRequest::default().offset(), 0);
        assert_eq!(PageRequest { page: 3, limit: 10 }.offset(), 20);
        assert_eq!(PageRequest { page: 0, limit: 10 }.offset(), 0);
    }
}
