//! Observable product catalog.
//!
//! The catalog is the built-in product list plus any products the shopper has
//! added. User products come first, newest first, followed by the built-ins in
//! their defined order.
//!
//! Every mutation runs under one lock: validate, persist (when backed by
//! `SQLite`), then publish the new list through a `watch` channel. Readers see
//! the latest published list and never wait on a writer's database call.

mod builtin;
mod seed;

pub use builtin::{CLOTHING_SIZES, FOOTWEAR_SIZES, builtin_products};
pub use seed::{SeedFile, SeedResult};

use std::sync::Arc;

use sqlx::SqlitePool;
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument};

use voidshop_core::{
    FilterSpec, NewProduct, PriceRange, Product, ProductError, ProductId, filter,
};

use crate::db::{ProductRepository, RepositoryError};

/// Shared, immutable product list handed to observers.
pub type ProductList = Arc<Vec<Product>>;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The new product failed validation.
    #[error("invalid product: {0}")]
    Validation(#[from] ProductError),

    /// A seed entry failed validation; nothing was imported.
    #[error("seed entry {index} is invalid: {source}")]
    InvalidSeedEntry {
        index: usize,
        #[source]
        source: ProductError,
    },

    /// Reading a seed file failed.
    #[error("IO error: {0}")]
    Io(String),

    /// A seed file could not be parsed.
    #[error("seed file error: {0}")]
    Seed(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// The product catalog.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct CatalogStore {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    pool: Option<SqlitePool>,
    builtin: Vec<Product>,
    /// User-added products, newest first.
    user: Mutex<Vec<Product>>,
    products: watch::Sender<ProductList>,
}

impl CatalogStore {
    /// A catalog held only in memory.
    #[must_use]
    pub fn in_memory(builtin: Vec<Product>) -> Self {
        Self::build(None, builtin, Vec::new())
    }

    /// Open a catalog backed by `SQLite`, loading previously added products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the stored products cannot be read.
    #[instrument(skip(pool, builtin))]
    pub async fn open(pool: SqlitePool, builtin: Vec<Product>) -> Result<Self, CatalogError> {
        let user = ProductRepository::new(&pool).list().await?;
        info!(
            builtin = builtin.len(),
            user = user.len(),
            "Opened catalog"
        );
        Ok(Self::build(Some(pool), builtin, user))
    }

    fn build(pool: Option<SqlitePool>, builtin: Vec<Product>, user: Vec<Product>) -> Self {
        let (products, _) = watch::channel(Arc::new(merge(&user, &builtin)));
        Self {
            inner: Arc::new(CatalogInner {
                pool,
                builtin,
                user: Mutex::new(user),
                products,
            }),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The current product list: user products newest first, then built-ins.
    #[must_use]
    pub fn list_products(&self) -> Vec<Product> {
        self.inner.products.borrow().to_vec()
    }

    /// The current list without copying the products.
    #[must_use]
    pub fn products(&self) -> ProductList {
        Arc::clone(&self.inner.products.borrow())
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get_product(&self, id: &ProductId) -> Option<Product> {
        self.inner
            .products
            .borrow()
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }

    /// Lowest and highest price over the whole catalog, or `None` when empty.
    #[must_use]
    pub fn price_bounds(&self) -> Option<PriceRange> {
        PriceRange::bounds_of(&self.inner.products.borrow())
    }

    /// Apply a filter to the current list.
    #[must_use]
    pub fn query(&self, spec: &FilterSpec) -> Vec<Product> {
        filter::apply(&self.inner.products.borrow(), spec)
    }

    /// Watch the product list. The receiver always holds the latest list.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProductList> {
        self.inner.products.subscribe()
    }

    /// Returns true when user products are written to `SQLite`.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.inner.pool.is_some()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Add a user product under a freshly generated `U-` id.
    ///
    /// The product is stored (when persistent) and the new list published
    /// before this returns.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if the name is blank or the price is
    /// not positive. Returns `CatalogError::Repository` if the write fails; the
    /// catalog is unchanged in that case.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn add_product(&self, input: NewProduct) -> Result<ProductId, CatalogError> {
        let product = input.into_product(ProductId::generate_user())?;
        let id = product.id.clone();

        let mut user = self.inner.user.lock().await;
        if let Some(pool) = &self.inner.pool {
            ProductRepository::new(pool).insert(&product).await?;
        }
        user.insert(0, product);
        self.publish(&user);

        info!(product_id = %id, "Added product");
        Ok(id)
    }

    /// Add several user products at once.
    ///
    /// Every entry is validated before anything is written, so an invalid entry
    /// imports nothing. Entries keep their relative order, so the last one ends
    /// up first in the list, as if each had been added in turn.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidSeedEntry` for the first invalid entry.
    /// Returns `CatalogError::Repository` if the write fails.
    #[instrument(skip(self, inputs), fields(count = inputs.len()))]
    pub async fn add_products(&self, inputs: Vec<NewProduct>) -> Result<Vec<ProductId>, CatalogError> {
        let products = inputs
            .into_iter()
            .enumerate()
            .map(|(index, input)| {
                input
                    .into_product(ProductId::generate_user())
                    .map_err(|source| CatalogError::InvalidSeedEntry { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if products.is_empty() {
            return Ok(Vec::new());
        }

        let mut user = self.inner.user.lock().await;
        if let Some(pool) = &self.inner.pool {
            ProductRepository::new(pool).insert_many(&products).await?;
        }

        let ids = products.iter().map(|p| p.id.clone()).collect();
        for product in products {
            user.insert(0, product);
        }
        self.publish(&user);

        debug!(total_user = user.len(), "Imported products");
        Ok(ids)
    }

    fn publish(&self, user: &[Product]) {
        self.inner
            .products
            .send_replace(Arc::new(merge(user, &self.inner.builtin)));
    }
}

fn merge(user: &[Product], builtin: &[Product]) -> Vec<Product> {
    user.iter().chain(builtin).cloned().collect()
}
