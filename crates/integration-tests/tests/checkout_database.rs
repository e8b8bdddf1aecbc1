//! Database-backed checkout tests.
//!
//! These exercise the guarantees only a live `PostgreSQL` can demonstrate:
//! the concurrent last-unit race, rollback atomicity, price freezing, cart
//! clearing, and the payment/order settlement coupling. They are ignored by
//! default; point `DATABASE_URL` at a disposable database and run:
//!
//! ```bash
//! cargo test -p arcadia-integration-tests -- --ignored
//! ```
//!
//! Fixtures use fresh game rows and time-derived user IDs, so reruns do not
//! interfere with each other.

use std::time::{SystemTime, UNIX_EPOCH};

use rust_decimal::Decimal;
use sqlx::PgPool;

use arcadia_api::db::{CartRepository, InventoryRepository, OrderRepository};
use arcadia_api::services::checkout::{CheckoutError, CheckoutService};
use arcadia_api::services::{PaymentError, PaymentService};
use arcadia_core::{GameId, OrderStatus, PaymentMethod, PaymentStatus, ShippingAddress, UserId};

const COUNTRY: &str = "United States";

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must point at a disposable test database");
    let pool = PgPool::connect(&url).await.expect("database connects");
    sqlx::migrate!("../api/migrations")
        .run(&pool)
        .await
        .expect("migrations apply");
    pool
}

/// A user ID unlikely to collide with seeded data or other test runs.
/// `tag` keeps suites in the same run apart.
fn fresh_user(tag: i32) -> UserId {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock after the epoch")
        .subsec_nanos();
    let suffix = i32::try_from(nanos % 9_000_000).expect("bounded by the modulus");
    UserId::new(tag * 10_000_000 + suffix)
}

async fn seed_game(pool: &PgPool, price: &str, stock: i32) -> GameId {
    let price = price.parse::<Decimal>().expect("test prices are valid decimals");
    let id: i32 =
        sqlx::query_scalar("INSERT INTO games (title, price) VALUES ($1, $2) RETURNING id")
            .bind(format!("Test Fixture {price}/{stock}"))
            .bind(price)
            .fetch_one(pool)
            .await
            .expect("game inserts");

    let game_id = GameId::new(id);
    InventoryRepository::new(pool)
        .restock(game_id, stock)
        .await
        .expect("inventory stocks");
    game_id
}

fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Jo Bloggs".to_owned(),
        address: "1 Main St".to_owned(),
        city: "Springfield".to_owned(),
        state: "IL".to_owned(),
        zip_code: "62704".to_owned(),
        country: None,
    }
}

async fn cart_lines_for_game(pool: &PgPool, game_id: GameId) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM cart_lines WHERE game_id = $1")
        .bind(game_id.as_i32())
        .fetch_one(pool)
        .await
        .expect("cart count query")
}

// =============================================================================
// Concurrency and Atomicity Tests
// =============================================================================

/// Twenty buyers race for a single unit. Exactly one order may exist
/// afterwards; every loser fails with insufficient stock and keeps their
/// cart, and the ledger never goes negative.
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn test_last_unit_goes_to_exactly_one_buyer() {
    const BUYERS: i32 = 20;

    let pool = pool().await;
    let game_id = seed_game(&pool, "59.99", 1).await;
    let base = fresh_user(1);

    let cart = CartRepository::new(&pool);
    for i in 0..BUYERS {
        cart.put_line(UserId::new(base.as_i32() + i), game_id, 1)
            .await
            .expect("cart line inserts");
    }

    let mut handles = Vec::new();
    for i in 0..BUYERS {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            CheckoutService::new(&pool, COUNTRY)
                .create_order(
                    UserId::new(base.as_i32() + i),
                    address(),
                    PaymentMethod::from("PayPal"),
                )
                .await
        }));
    }

    let mut won = 0;
    let mut short = 0;
    for handle in handles {
        match handle.await.expect("task completes") {
            Ok(_) => won += 1,
            Err(CheckoutError::InsufficientStock { .. }) => short += 1,
            Err(other) => panic!("unexpected checkout failure: {other}"),
        }
    }
    assert_eq!(won, 1, "exactly one buyer gets the last unit");
    assert_eq!(short, i64::from(BUYERS) - 1);

    let remaining: i32 =
        sqlx::query_scalar("SELECT available_quantity FROM inventory WHERE game_id = $1")
            .bind(game_id.as_i32())
            .fetch_one(&pool)
            .await
            .expect("inventory query");
    assert_eq!(remaining, 0);

    // Only the winner's decrement committed.
    let sold: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(quantity), 0) FROM order_lines WHERE game_id = $1",
    )
    .bind(game_id.as_i32())
    .fetch_one(&pool)
    .await
    .expect("order line query");
    assert_eq!(sold, 1);

    // Losers keep their carts untouched so they can adjust and resubmit.
    assert_eq!(
        cart_lines_for_game(&pool, game_id).await,
        i64::from(BUYERS) - 1
    );
}

/// A later catalog price change never touches an existing order.
#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn test_price_frozen_at_purchase() {
    let pool = pool().await;
    let game_id = seed_game(&pool, "19.99", 5).await;
    let user = fresh_user(2);
    let original_price = "19.99".parse::<Decimal>().expect("valid decimal");

    CartRepository::new(&pool)
        .put_line(user, game_id, 1)
        .await
        .expect("cart line inserts");
    let confirmation = CheckoutService::new(&pool, COUNTRY)
        .create_order(user, address(), PaymentMethod::from("PayPal"))
        .await
        .expect("checkout succeeds");
    assert_eq!(confirmation.total_amount, original_price);

    sqlx::query("UPDATE games SET price = $1 WHERE id = $2")
        .bind("29.99".parse::<Decimal>().expect("valid decimal"))
        .bind(game_id.as_i32())
        .execute(&pool)
        .await
        .expect("price update");

    let details = OrderRepository::new(&pool)
        .get_details(confirmation.order_id, user, false)
        .await
        .expect("order query")
        .expect("order exists");
    let line = details.lines.first().expect("order has one line");
    assert_eq!(line.price_at_purchase, original_price);
    assert_eq!(details.order.total_amount, original_price);
}

/// A successful checkout empties the cart; resubmitting is `EmptyCart`,
/// never a duplicate order.
#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn test_cart_cleared_exactly_once() {
    let pool = pool().await;
    let game_id = seed_game(&pool, "24.99", 5).await;
    let user = fresh_user(3);

    CartRepository::new(&pool)
        .put_line(user, game_id, 2)
        .await
        .expect("cart line inserts");
    let checkout = CheckoutService::new(&pool, COUNTRY);
    checkout
        .create_order(user, address(), PaymentMethod::from("Cash on Delivery"))
        .await
        .expect("checkout succeeds");

    let leftover: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_lines WHERE user_id = $1")
        .bind(user.as_i32())
        .fetch_one(&pool)
        .await
        .expect("cart count query");
    assert_eq!(leftover, 0);

    let second = checkout
        .create_order(user, address(), PaymentMethod::from("Cash on Delivery"))
        .await;
    assert!(matches!(second, Err(CheckoutError::EmptyCart)));
}

// =============================================================================
// Settlement Coupling Tests
// =============================================================================

/// After settlement, the payment is completed and the order is processing,
/// atomically. A second settlement is `AlreadyPaid` and changes nothing.
#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn test_settlement_couples_payment_and_order() {
    let pool = pool().await;
    let game_id = seed_game(&pool, "39.99", 5).await;
    let user = fresh_user(4);

    CartRepository::new(&pool)
        .put_line(user, game_id, 1)
        .await
        .expect("cart line inserts");
    let confirmation = CheckoutService::new(&pool, COUNTRY)
        .create_order(user, address(), PaymentMethod::from("Credit/Debit Card"))
        .await
        .expect("checkout succeeds");
    assert_eq!(confirmation.status, OrderStatus::Pending);

    let payments = PaymentService::new(&pool);
    payments
        .settle(confirmation.order_id, user)
        .await
        .expect("settlement succeeds");

    let details = OrderRepository::new(&pool)
        .get_details(confirmation.order_id, user, false)
        .await
        .expect("order query")
        .expect("order exists");
    assert_eq!(details.payment.payment_status, PaymentStatus::Completed);
    assert_eq!(details.order.status, OrderStatus::Processing);

    let second = payments.settle(confirmation.order_id, user).await;
    assert!(matches!(second, Err(PaymentError::AlreadyPaid)));

    let after = OrderRepository::new(&pool)
        .get_details(confirmation.order_id, user, false)
        .await
        .expect("order query")
        .expect("order exists");
    assert_eq!(after.payment.payment_status, PaymentStatus::Completed);
    assert_eq!(after.order.status, OrderStatus::Processing);
}
