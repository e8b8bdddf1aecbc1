//! Seed the catalog and inventory with sample data for local development.

use rust_decimal::Decimal;

use arcadia_api::db::{CartRepository, InventoryRepository};
use arcadia_core::{GameId, UserId};

use super::{CommandError, database_url};

/// Sample catalog: title, price, initial stock.
const SAMPLE_GAMES: [(&str, &str, i32); 5] = [
    ("Starlight Drifter", "59.99", 40),
    ("Dungeon of Echoes", "39.99", 25),
    ("Pixel Racer GT", "19.99", 60),
    ("Last Colony", "49.99", 15),
    ("Harvest Song", "24.99", 30),
];

/// User that receives the demo cart.
const DEMO_USER_ID: i32 = 1;

/// Insert the sample games, stock their inventory rows, and leave a small
/// cart for user 1 so a checkout can be exercised immediately.
///
/// Idempotence is not attempted: running seed twice inserts the catalog
/// twice. Intended for fresh local databases only.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or an insert
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;
    let pool = arcadia_api::db::create_pool(&database_url).await?;
    let inventory = InventoryRepository::new(&pool);
    let cart = CartRepository::new(&pool);

    let mut seeded_ids = Vec::with_capacity(SAMPLE_GAMES.len());
    for (title, price, stock) in SAMPLE_GAMES {
        let price = price
            .parse::<Decimal>()
            .expect("sample prices are valid decimals");

        let game_id: i32 =
            sqlx::query_scalar("INSERT INTO games (title, price) VALUES ($1, $2) RETURNING id")
                .bind(title)
                .bind(price)
                .fetch_one(&pool)
                .await?;

        let available = inventory.restock(GameId::new(game_id), stock).await?;
        tracing::info!(game_id, title, available, "seeded game");
        seeded_ids.push(GameId::new(game_id));
    }

    let demo_user = UserId::new(DEMO_USER_ID);
    for game_id in seeded_ids.iter().take(2) {
        cart.put_line(demo_user, *game_id, 1).await?;
    }
    tracing::info!(user_id = DEMO_USER_ID, "seeded demo cart");

    tracing::info!("Seed complete!");
    Ok(())
}
