//! Customer-facing order route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use arcadia_core::{OrderId, PaymentMethod, ShippingAddress};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{OrderDetails, OrderSummary};
use crate::services::{CheckoutService, OrderConfirmation, PaymentService};
use crate::state::AppState;

/// Request body for order creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
}

/// Response wrapper for a single order.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order: OrderDetails,
}

/// Response wrapper for an order listing.
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderSummary>,
}

/// Response for payment settlement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `POST /orders` - convert the caller's cart into an order.
///
/// # Errors
///
/// 400 for an empty cart, invalid address, or insufficient stock; 500 for
/// storage failures or exhausted conflict retries.
pub async fn create(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderConfirmation>)> {
    let checkout = CheckoutService::new(state.pool(), &state.config().default_country);
    let confirmation = checkout
        .create_order(
            user.id,
            body.shipping_address,
            PaymentMethod::new(body.payment_method),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(confirmation)))
}

/// `GET /orders` - the caller's order history, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list(
    user: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<OrderListResponse>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Json(OrderListResponse { orders }))
}

/// `GET /orders/{id}` - one order with payment and lines.
///
/// Admins may read any order; everyone else only their own. An order the
/// caller may not see is reported as absent, not forbidden.
///
/// # Errors
///
/// 404 if the order doesn't exist or isn't visible to the caller.
pub async fn show(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<Json<OrderResponse>> {
    let order = OrderRepository::new(state.pool())
        .get_details(order_id, user.id, user.is_admin())
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;

    Ok(Json(OrderResponse { order }))
}

/// `POST /orders/{id}/payment` - settle payment for the caller's order.
///
/// # Errors
///
/// 404 if the order isn't the caller's; 400 if the payment is already
/// completed.
pub async fn settle_payment(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<Json<MessageResponse>> {
    PaymentService::new(state.pool())
        .settle(order_id, user.id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Payment processed successfully".to_owned(),
    }))
}
