//! Integration tests for Arcadia.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p arcadia-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `order_lifecycle` - Order and payment status machine behavior
//! - `checkout_rules` - Checkout validation and total computation
//! - `checkout_database` - Concurrency, atomicity, price freezing, and
//!   settlement coupling against a live `PostgreSQL`
//!
//! The first two suites exercise the exported lifecycle and checkout logic
//! without a database. The `checkout_database` suite is ignored by default;
//! point `DATABASE_URL` at a disposable database and run:
//!
//! ```bash
//! cargo test -p arcadia-integration-tests -- --ignored
//! ```
