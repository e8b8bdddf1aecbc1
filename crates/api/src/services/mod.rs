//! Business logic services.
//!
//! - [`checkout`] - the order-creation transaction
//! - [`payment`] - payment settlement stub

pub mod checkout;
pub mod payment;

pub use checkout::{CheckoutError, CheckoutService, OrderConfirmation};
pub use payment::{PaymentError, PaymentService};
