//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! VOIDSHOP_DATABASE_URL=sqlite://voidshop.db?mode=rwc vs-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `VOIDSHOP_STORAGE` - Nothing to migrate when set to `memory`
//! - `VOIDSHOP_DATABASE_URL` - `SQLite` connection string
//!
//! Migrations live in `crates/storefront/migrations/`. Opening the store for
//! any other command applies them too, so this is mainly for deploy scripts.

use tracing::{info, warn};

use voidshop_storefront::config::{StorageBackend, StorefrontConfig};
use voidshop_storefront::db;
use voidshop_storefront::error::AppError;

use super::CliError;

/// Apply pending storefront migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a migration fails.
pub async fn run(config: &StorefrontConfig) -> Result<(), CliError> {
    if config.storage == StorageBackend::Memory {
        warn!("VOIDSHOP_STORAGE is memory; nothing to migrate");
        return Ok(());
    }
    if db::is_in_memory(&config.database_url) {
        warn!(database_url = %config.database_url, "In-memory database is discarded on exit");
    }

    info!("Connecting to storefront database...");
    let pool = db::create_pool(&config.database_url, config.max_connections)
        .await
        .map_err(AppError::from)?;

    info!("Running storefront migrations...");
    db::run_migrations(&pool).await.map_err(AppError::from)?;

    info!("Storefront migrations complete!");
    Ok(())
}
