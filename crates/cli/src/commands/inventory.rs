//! Administrative restock command.
//!
//! This is the out-of-band way stock enters the ledger; order cancellation
//! never restocks (see the api crate's `db::inventory` notes).

use arcadia_api::db::InventoryRepository;
use arcadia_core::GameId;

use super::{CommandError, database_url};

/// Add `quantity` units of stock for `game_id`.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or the update
/// fails (e.g. the game does not exist).
pub async fn restock(game_id: i32, quantity: i32) -> Result<(), CommandError> {
    let database_url = database_url()?;
    let pool = arcadia_api::db::create_pool(&database_url).await?;

    let available = InventoryRepository::new(&pool)
        .restock(GameId::new(game_id), quantity)
        .await?;

    tracing::info!(game_id, added = quantity, available, "restocked");
    Ok(())
}
