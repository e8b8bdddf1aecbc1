//! Administrative order route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use arcadia_core::{OrderId, OrderStatus, UserId};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{OrderFilter, OrderPage, PageRequest};
use crate::state::AppState;

const MAX_PAGE_SIZE: u32 = 100;

/// Query parameters for the admin order listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersQuery {
    pub status: Option<String>,
    pub user_id: Option<i32>,
    /// Inclusive, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Inclusive, `YYYY-MM-DD`.
    pub end_date: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Request body for the status override.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Response for the status override.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Parse a `YYYY-MM-DD` query value into the UTC midnight starting that day.
fn day_start(key: &str, raw: &str) -> Result<DateTime<Utc>> {
    let date = raw
        .parse::<NaiveDate>()
        .map_err(|_| AppError::BadRequest(format!("Invalid {key}: expected YYYY-MM-DD")))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

/// `GET /admin/orders` - filtered, paginated order listing.
///
/// # Errors
///
/// 400 for an unknown status value or malformed date.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<OrderPage>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let placed_after = query
        .start_date
        .as_deref()
        .map(|raw| day_start("startDate", raw))
        .transpose()?;
    // End date is inclusive in the query string; the filter bound is
    // exclusive, so move it to the start of the following day.
    let placed_before = query
        .end_date
        .as_deref()
        .map(|raw| day_start("endDate", raw).map(|start| start + chrono::Days::new(1)))
        .transpose()?;

    let filter = OrderFilter {
        status,
        user_id: query.user_id.map(UserId::new),
        placed_after,
        placed_before,
    };
    let page = PageRequest {
        page: query.page.unwrap_or(1).max(1),
        limit: query.limit.unwrap_or(10).clamp(1, MAX_PAGE_SIZE),
    };

    let orders = OrderRepository::new(state.pool()).list(&filter, page).await?;
    Ok(Json(orders))
}

/// `PUT /admin/orders/{id}/status` - status override.
///
/// Accepts any of the five statuses regardless of the order's current one;
/// the permissive policy itself lives in `OrderRepository::update_status`.
///
/// # Errors
///
/// 400 for an unknown status value; 404 if the order doesn't exist.
pub async fn update_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<MessageResponse>> {
    let status = body
        .status
        .parse::<OrderStatus>()
        .map_err(AppError::BadRequest)?;

    OrderRepository::new(state.pool())
        .update_status(order_id, status)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Order not found".to_owned())
            }
            other => AppError::Database(other),
        })?;

    Ok(Json(MessageResponse {
        message: format!("Order status updated to {status}"),
    }))
}
