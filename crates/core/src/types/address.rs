//! Shipping address with validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation error for a shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("full name is required")]
    MissingFullName,
    #[error("street address is required")]
    MissingStreet,
}

/// A structured shipping address, persisted with the order it belongs to.
///
/// The wire format uses camelCase field names (`fullName`, `zipCode`) to
/// match the checkout request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    /// Defaults to the configured country when omitted.
    #[serde(default)]
    pub country: Option<String>,
}

impl ShippingAddress {
    /// Validate the address and fill in the default country if none was given.
    ///
    /// Only the full name and street address are hard requirements; the rest
    /// of the fields pass through as provided.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError`] if the full name or street address is empty.
    pub fn validated(mut self, default_country: &str) -> Result<Self, AddressError> {
        if self.full_name.trim().is_empty() {
            return Err(AddressError::MissingFullName);
        }
        if self.address.trim().is_empty() {
            return Err(AddressError::MissingStreet);
        }
        if self
            .country
            .as_ref()
            .is_none_or(|c| c.trim().is_empty())
        {
            self.country = Some(default_country.to_owned());
        }
        Ok(self)
    }

    /// The country, if validation has filled it in or the caller supplied one.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }
}
