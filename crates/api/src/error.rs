//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{CheckoutError, PaymentError};

/// Application-level error type for the order API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Order creation failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Payment settlement failed.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is a server-side fault worth reporting.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Database(_) | Self::Internal(_) => true,
            Self::Checkout(err) => matches!(
                err,
                CheckoutError::Conflict | CheckoutError::Repository(_)
            ),
            Self::Payment(err) => matches!(err, PaymentError::Repository(_)),
            Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart
                | CheckoutError::InsufficientStock { .. }
                | CheckoutError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
                CheckoutError::Conflict | CheckoutError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Payment(err) => match err {
                PaymentError::OrderNotFound => StatusCode::NOT_FOUND,
                PaymentError::AlreadyPaid => StatusCode::BAD_REQUEST,
                PaymentError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart => "Cart is empty".to_owned(),
                CheckoutError::InsufficientStock { .. } => {
                    "Not enough stock available for one or more items".to_owned()
                }
                CheckoutError::InvalidAddress(_) => "Shipping information is required".to_owned(),
                CheckoutError::Conflict | CheckoutError::Repository(_) => {
                    "Error creating order".to_owned()
                }
            },
            Self::Payment(err) => match err {
                PaymentError::OrderNotFound => "Order not found".to_owned(),
                PaymentError::AlreadyPaid => "Payment already completed".to_owned(),
                PaymentError::Repository(_) => "Internal server error".to_owned(),
            },
            Self::NotFound(msg) => msg.clone(),
            Self::BadRequest(msg) => msg.clone(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
