//! Database operations for the order core.
//!
//! ## Tables
//!
//! - `games` / `inventory` - catalog prices and the inventory ledger
//! - `cart_lines` - per-user cart, cleared on successful checkout
//! - `orders` / `order_lines` / `payments` - created atomically at checkout
//!
//! Repositories use runtime `sqlx::query_as` with internal `FromRow` row
//! structs converted into domain models, so the crate builds without a
//! live database.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p arcadia-cli -- migrate
//! ```

pub mod cart;
pub mod inventory;
pub mod orders;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use cart::CartRepository;
pub use inventory::InventoryRepository;
pub use orders::OrderRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Postgres error codes that indicate a transient conflict: the transaction
/// lost a race and the whole unit of work is safe to retry from scratch.
const RETRYABLE_SQLSTATE: [&str; 3] = [
    "40001", // serialization_failure
    "40P01", // deadlock_detected
    "55P03", // lock_not_available (lock_timeout expired)
];

/// Whether an sqlx error is a transient conflict worth retrying.
#[must_use]
pub fn is_retryable(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .is_some_and(|code| RETRYABLE_SQLSTATE.contains(&code.as_ref())),
        _ => false,
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
