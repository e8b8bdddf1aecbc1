//! HTTP route handlers for the order API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (DB ping)
//!
//! # Orders (authenticated)
//! POST /orders                  - Convert the caller's cart into an order
//! GET  /orders                  - The caller's order history
//! GET  /orders/{id}             - One order with its lines (owner or admin)
//! POST /orders/{id}/payment     - Settle payment for the caller's order
//!
//! # Admin (requires admin role)
//! GET  /admin/orders            - Filtered, paginated order listing
//! PUT  /admin/orders/{id}/status - Status override
//! ```

pub mod admin;
pub mod orders;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the full application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(orders::create).get(orders::list))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/payment", post(orders::settle_payment))
        .route("/admin/orders", get(admin::list))
        .route("/admin/orders/{id}/status", put(admin::update_status))
}
