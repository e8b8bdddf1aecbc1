//! Status enums for orders and payments.
//!
//! The order lifecycle moves forward through
//! `pending -> processing -> shipped -> delivered`, with `cancelled`
//! reachable only while the order is still `pending` or `processing`.
//! [`OrderStatus::can_progress_to`] encodes that graph. The administrative
//! override path deliberately bypasses it (any parseable status is
//! accepted); see `OrderRepository::update_status` in the api crate, which
//! is the single call site where that policy lives.
//!
//! Payment status is a separate two-state machine that only ever moves
//! `pending -> completed`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Whether the customer-facing lifecycle allows moving to `target`.
    ///
    /// Forward progression only; cancellation is allowed from `pending` and
    /// `processing`. Terminal states allow nothing.
    #[must_use]
    pub const fn can_progress_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Processing | Self::Cancelled)
                | (Self::Processing, Self::Shipped | Self::Cancelled)
                | (Self::Shipped, Self::Delivered)
        )
    }

    /// Whether this status is terminal (no further lifecycle transitions).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Error returned when settling a payment that is already completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("payment already completed")]
pub struct AlreadyPaid;

/// Payment status: a one-way `pending -> completed` machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
}

impl PaymentStatus {
    /// Move the payment to `completed`.
    ///
    /// # Errors
    ///
    /// Returns [`AlreadyPaid`] if the payment is already completed. Settling
    /// twice is a visible error, never a silent success.
    pub const fn settle(self) -> Result<Self, AlreadyPaid> {
        match self {
            Self::Pending => Ok(Self::Completed),
            Self::Completed => Err(AlreadyPaid),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("invalid payment status: {s}")),
        }
    }
}

/// Role attached to an authenticated caller by the auth boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
}

impl UserRole {
    /// Whether this role has administrative privileges.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_forward_progression() {
        assert!(OrderStatus::Pending.can_progress_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_progress_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_progress_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_no_backwards_progression() {
        assert!(!OrderStatus::Processing.can_progress_to(OrderStatus::Pending));
        assert!(!OrderStatus::Shipped.can_progress_to(OrderStatus::Processing));
        assert!(!OrderStatus::Delivered.can_progress_to(OrderStatus::Shipped));
    }

    #[test]
    fn test_cancellation_window() {
        assert!(OrderStatus::Pending.can_progress_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Processing.can_progress_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Shipped.can_progress_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_progress_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        for target in OrderStatus::ALL {
            assert!(!OrderStatus::Delivered.can_progress_to(target));
            assert!(!OrderStatus::Cancelled.can_progress_to(target));
        }
    }

    #[test]
    fn test_order_status_round_trip() {
        for status in OrderStatus::ALL {
            let parsed = OrderStatus::from_str(&status.to_string()).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_order_status_rejects_unknown() {
        assert!(OrderStatus::from_str("refunded").is_err());
        assert!(OrderStatus::from_str("PENDING").is_err());
    }

    #[test]
    fn test_payment_settle_once() {
        assert_eq!(PaymentStatus::Pending.settle(), Ok(PaymentStatus::Completed));
    }

    #[test]
    fn test_payment_settle_twice_is_already_paid() {
        let completed = PaymentStatus::Pending.settle().unwrap();
        assert_eq!(completed.settle(), Err(AlreadyPaid));
    }

    #[test]
    fn test_user_role_parse() {
        assert_eq!(UserRole::from_str("admin").unwrap(), UserRole::Admin);
        assert!(UserRole::from_str("admin").unwrap().is_admin());
        assert!(!UserRole::from_str("customer").unwrap().is_admin());
        assert!(UserRole::from_str("root").is_err());
    }
}
