//! Payment method as a tolerant open string.
//!
//! The checkout flow recognizes a closed set of methods for the UI, but an
//! unrecognized value is accepted and logged rather than rejected, so new
//! methods can roll out ahead of a server deploy. The known set is only a
//! hint, never a hard invariant.

use serde::{Deserialize, Serialize};

/// Payment methods the storefront offers out of the box.
pub const KNOWN_PAYMENT_METHODS: [&str; 3] =
    ["Credit/Debit Card", "PayPal", "Cash on Delivery"];

/// A payment method selected at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentMethod(String);

impl PaymentMethod {
    /// Wrap a raw payment method string.
    #[must_use]
    pub const fn new(method: String) -> Self {
        Self(method)
    }

    /// Whether this method is in the known set offered by the storefront.
    #[must_use]
    pub fn is_known(&self) -> bool {
        KNOWN_PAYMENT_METHODS.contains(&self.0.as_str())
    }

    /// The raw method string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PaymentMethod {
    fn from(method: &str) -> Self {
        Self(method.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_methods() {
        for method in KNOWN_PAYMENT_METHODS {
            assert!(PaymentMethod::from(method).is_known());
        }
    }

    #[test]
    fn test_unknown_method_is_representable() {
        let method = PaymentMethod::from("Space Credits");
        assert!(!method.is_known());
        assert_eq!(method.as_str(), "Space Credits");
    }
}
