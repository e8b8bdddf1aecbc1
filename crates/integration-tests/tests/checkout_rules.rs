//! Integration tests for checkout validation and total computation.
//!
//! These cover the pure checkout rules: the total formula with frozen unit
//! prices, the stock pre-check, shipping address validation, and the wire
//! shapes the handlers accept and produce.

use rust_decimal::Decimal;

use arcadia_api::models::CartSnapshotLine;
use arcadia_api::services::checkout::{first_short_line, order_total};
use arcadia_core::{AddressError, GameId, PaymentMethod, ShippingAddress};

fn line(game_id: i32, quantity: i32, unit_price: &str, available: i32) -> CartSnapshotLine {
    CartSnapshotLine {
        game_id: GameId::new(game_id),
        quantity,
        unit_price: unit_price.parse().expect("test prices are valid decimals"),
        available_quantity: available,
    }
}

// =============================================================================
// Total Computation Tests
// =============================================================================

#[test]
fn test_total_sums_price_times_quantity() {
    let lines = vec![line(1, 2, "19.99", 10), line(2, 1, "59.99", 3)];
    assert_eq!(order_total(&lines), Decimal::new(99_97, 2));
}

#[test]
fn test_total_of_empty_cart_is_zero() {
    assert_eq!(order_total(&[]), Decimal::ZERO);
}

/// Totals must be exact decimal arithmetic, not floating point.
#[test]
fn test_total_has_no_float_drift() {
    let lines: Vec<_> = (1..=10).map(|id| line(id, 3, "0.10", 100)).collect();
    assert_eq!(order_total(&lines), Decimal::new(300, 2));
}

// =============================================================================
// Stock Pre-Check Tests
// =============================================================================

#[test]
fn test_fully_stocked_cart_has_no_short_line() {
    let lines = vec![line(1, 2, "19.99", 2), line(2, 1, "59.99", 1)];
    assert_eq!(first_short_line(&lines), None);
}

#[test]
fn test_short_line_is_reported_by_game() {
    let lines = vec![line(1, 2, "19.99", 5), line(2, 4, "59.99", 3)];
    assert_eq!(first_short_line(&lines), Some(GameId::new(2)));
}

#[test]
fn test_zero_availability_is_short() {
    let lines = vec![line(7, 1, "9.99", 0)];
    assert_eq!(first_short_line(&lines), Some(GameId::new(7)));
}

// =============================================================================
// Address Validation Tests
// =============================================================================

fn address(full_name: &str, street: &str, country: Option<&str>) -> ShippingAddress {
    ShippingAddress {
        full_name: full_name.to_owned(),
        address: street.to_owned(),
        city: "Springfield".to_owned(),
        state: "IL".to_owned(),
        zip_code: "62704".to_owned(),
        country: country.map(ToOwned::to_owned),
    }
}

#[test]
fn test_address_requires_full_name() {
    let result = address("  ", "1 Main St", None).validated("United States");
    assert_eq!(result, Err(AddressError::MissingFullName));
}

#[test]
fn test_address_requires_street() {
    let result = address("Jo Bloggs", "", None).validated("United States");
    assert_eq!(result, Err(AddressError::MissingStreet));
}

#[test]
fn test_missing_country_defaults() {
    let validated = address("Jo Bloggs", "1 Main St", None)
        .validated("United States")
        .expect("address is valid");
    assert_eq!(validated.country(), Some("United States"));
}

#[test]
fn test_supplied_country_is_kept() {
    let validated = address("Jo Bloggs", "1 Main St", Some("Canada"))
        .validated("United States")
        .expect("address is valid");
    assert_eq!(validated.country(), Some("Canada"));
}

// =============================================================================
// Payment Method Tests
// =============================================================================

/// Unknown methods are tolerated at checkout; only the known set is
/// flagged for operator attention.
#[test]
fn test_known_payment_methods() {
    for method in ["Credit/Debit Card", "PayPal", "Cash on Delivery"] {
        assert!(PaymentMethod::new(method.to_owned()).is_known(), "{method}");
    }
    assert!(!PaymentMethod::new("Barter".to_owned()).is_known());
}

// =============================================================================
// Wire Shape Tests
// =============================================================================

#[test]
fn test_create_request_accepts_camel_case() {
    let body = serde_json::json!({
        "shippingAddress": {
            "fullName": "Jo Bloggs",
            "address": "1 Main St",
            "city": "Springfield",
            "state": "IL",
            "zipCode": "62704"
        },
        "paymentMethod": "PayPal"
    });
    let request: arcadia_api::routes::orders::CreateOrderRequest =
        serde_json::from_value(body).expect("request body deserializes");
    assert_eq!(request.payment_method, "PayPal");
    assert_eq!(request.shipping_address.full_name, "Jo Bloggs");
    assert_eq!(request.shipping_address.country, None);
}

#[test]
fn test_address_serializes_camel_case() {
    let validated = address("Jo Bloggs", "1 Main St", None)
        .validated("United States")
        .expect("address is valid");
    let value = serde_json::to_value(&validated).expect("address serializes");
    assert_eq!(value["fullName"], "Jo Bloggs");
    assert_eq!(value["zipCode"], "62704");
    assert_eq!(value["country"], "United States");
}
