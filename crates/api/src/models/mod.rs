//! Domain models for the order core.
//!
//! These types represent validated domain objects, separate from the
//! database row types kept private inside `db/`.

pub mod order;

pub use order::{
    CartSnapshotLine, Order, OrderDetails, OrderFilter, OrderLine, OrderPage, OrderSummary,
    PageRequest, Payment,
};
