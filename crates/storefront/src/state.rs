//! Application state shared by every front end.

use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::info;

use voidshop_core::Price;

use crate::config::{StorageBackend, StorefrontConfig};
use crate::db;
use crate::error::AppError;
use crate::services::catalog::builtin_products;
use crate::services::{CartAggregator, CatalogStore, CheckoutController};

/// Application state: the catalog, the cart and the checkout flow.
///
/// This struct is cheaply cloneable via `Arc`; clones share the same stores.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: Option<SqlitePool>,
    catalog: CatalogStore,
    cart: CartAggregator,
    checkout: CheckoutController,
}

impl AppState {
    /// Open the stores described by `config`.
    ///
    /// For `SQLite` storage this creates the pool, applies pending migrations
    /// and loads stored products and cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened, migrated or read.
    pub async fn open(config: StorefrontConfig) -> Result<Self, AppError> {
        match config.storage {
            StorageBackend::Memory => Ok(Self::in_memory(config)),
            StorageBackend::Sqlite => {
                let pool = db::create_pool(&config.database_url, config.max_connections).await?;
                db::run_migrations(&pool).await?;
                Self::with_pool(config, pool).await
            }
        }
    }

    /// Build the stores on an existing, already migrated pool.
    ///
    /// # Errors
    ///
    /// Returns an error if stored products or cart lines cannot be read.
    pub async fn with_pool(config: StorefrontConfig, pool: SqlitePool) -> Result<Self, AppError> {
        let catalog = CatalogStore::open(pool.clone(), builtin_products()).await?;
        let cart = CartAggregator::open(pool.clone()).await?;

        info!(
            storage = %config.storage,
            products = catalog.products().len(),
            cart_items = cart.count(),
            "Opened storefront"
        );

        Ok(Self::from_parts(config, Some(pool), catalog, cart))
    }

    /// Stores held only in memory; nothing survives the process.
    #[must_use]
    pub fn in_memory(config: StorefrontConfig) -> Self {
        let catalog = CatalogStore::in_memory(builtin_products());
        Self::from_parts(config, None, catalog, CartAggregator::in_memory())
    }

    fn from_parts(
        config: StorefrontConfig,
        pool: Option<SqlitePool>,
        catalog: CatalogStore,
        cart: CartAggregator,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog,
                cart,
                checkout: CheckoutController::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool, if persistent.
    #[must_use]
    pub fn pool(&self) -> Option<&SqlitePool> {
        self.inner.pool.as_ref()
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.inner.catalog
    }

    /// Get a reference to the cart.
    #[must_use]
    pub fn cart(&self) -> &CartAggregator {
        &self.inner.cart
    }

    /// Get a reference to the checkout controller.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutController {
        &self.inner.checkout
    }

    /// Format a price in the configured currency.
    #[must_use]
    pub fn format_price(&self, price: Price) -> String {
        price.display(self.inner.config.currency)
    }
}
