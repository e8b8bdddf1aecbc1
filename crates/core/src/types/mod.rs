//! Core types for Arcadia.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod id;
pub mod payment;
pub mod status;

pub use address::{AddressError, ShippingAddress};
pub use id::*;
pub use payment::PaymentMethod;
pub use status::*;
