//! Integration test support for Void Shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p voidshop-integration-tests
//! ```
//!
//! No services are needed: every test opens its own `SQLite` database, either
//! in memory or as a throwaway file under the system temp directory.
//!
//! # Test Categories
//!
//! - `catalog_store` - User products, ordering, seeding and persistence
//! - `cart_persistence` - Cart write-through and reload
//! - `checkout_flow` - Checkout and buy-now against a persisted cart
//! - `query_engine` - Filtering and sorting the built-in catalog

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use uuid::Uuid;

use voidshop_core::{Category, NewProduct};
use voidshop_storefront::config::{StorageBackend, StorefrontConfig};
use voidshop_storefront::db;
use voidshop_storefront::state::AppState;

/// An in-memory `SQLite` pool with migrations applied.
///
/// # Panics
///
/// Panics if the database cannot be created or migrated.
pub async fn memory_pool() -> SqlitePool {
    let pool = db::create_pool("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Open an [`AppState`] on `pool`. Calling this twice on the same pool
/// simulates restarting the app against the same database.
///
/// # Panics
///
/// Panics if the stores cannot be loaded.
pub async fn open_state(pool: &SqlitePool) -> AppState {
    AppState::with_pool(StorefrontConfig::default(), pool.clone())
        .await
        .expect("Failed to open storefront state")
}

/// A database file that is deleted when dropped.
pub struct TempDatabase {
    path: PathBuf,
}

impl TempDatabase {
    /// Reserve a fresh file path under the temp directory.
    #[must_use]
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("voidshop-test-{}.db", Uuid::new_v4()));
        Self { path }
    }

    /// A config pointing at this file.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig {
            storage: StorageBackend::Sqlite,
            database_url: format!("sqlite://{}?mode=rwc", self.path.display()),
            max_connections: 2,
            ..StorefrontConfig::default()
        }
    }

    /// Open the stores on this file, creating and migrating it if needed.
    ///
    /// # Panics
    ///
    /// Panics if the database cannot be opened.
    pub async fn open(&self) -> AppState {
        AppState::open(self.config())
            .await
            .expect("Failed to open file database")
    }
}

impl Default for TempDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let mut path = self.path.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Build a `NewProduct` input.
///
/// # Panics
///
/// Panics if `price` is not a decimal number.
#[must_use]
pub fn new_product(name: &str, price: &str, category: Category, keywords: &[&str]) -> NewProduct {
    NewProduct {
        name: name.to_owned(),
        price: Decimal::from_str(price).expect("test price must be a decimal"),
        category,
        keywords: keywords.iter().map(|k| (*k).to_owned()).collect(),
    }
}
