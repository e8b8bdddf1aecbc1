//! Arcadia CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! arcadia-cli migrate
//!
//! # Seed the catalog and inventory with sample data
//! arcadia-cli seed
//!
//! # Add stock for a game
//! arcadia-cli restock --game-id 3 --quantity 25
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the catalog and inventory with sample data
//! - `restock` - Add stock for a game

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "arcadia-cli")]
#[command(author, version, about = "Arcadia CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog and inventory with sample data
    Seed,
    /// Add stock for a game (creates the ledger row if absent)
    Restock {
        /// Catalog ID of the game
        #[arg(short, long)]
        game_id: i32,

        /// Units to add
        #[arg(short, long)]
        quantity: i32,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arcadia_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Seed => commands::seed::run().await,
        Commands::Restock { game_id, quantity } => {
            commands::inventory::restock(game_id, quantity).await
        }
    };

    if let Err(e) = result {
        tracing::error!("command failed: {e}");
        std::process::exit(1);
    }
}
