//! Cart aggregator.
//!
//! Wraps [`CartLines`] with a mutation lock, optional `SQLite` write-through
//! and a `watch` channel of [`CartSnapshot`]s.
//!
//! A mutation runs on a copy of the lines. The resulting [`LineChange`] is
//! written to the database first; only when that succeeds does the copy
//! replace the in-memory state and a new snapshot get published. A failed
//! write leaves memory, database and observers agreeing on the old state.

use std::sync::Arc;

use sqlx::SqlitePool;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard, watch};
use tracing::{debug, info, instrument};

use voidshop_core::{
    CartKey, CartLine, CartLines, CartSnapshot, LineChange, Price, Product, Quantity,
    QuantityError,
};

use crate::db::{CartRepository, RepositoryError};

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity is not a positive integer.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// The shopper's cart.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct CartAggregator {
    inner: Arc<CartInner>,
}

struct CartInner {
    pool: Option<SqlitePool>,
    lines: Mutex<CartLines>,
    snapshots: watch::Sender<CartSnapshot>,
}

impl Default for CartAggregator {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl CartAggregator {
    /// An empty cart held only in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::build(None, CartLines::new())
    }

    /// Open a cart backed by `SQLite`, loading stored lines in the order they
    /// were first added.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the stored lines cannot be read.
    #[instrument(skip(pool))]
    pub async fn open(pool: SqlitePool) -> Result<Self, CartError> {
        let lines = CartLines::from_lines(CartRepository::new(&pool).list().await?);
        info!(lines = lines.lines().len(), count = lines.count(), "Opened cart");
        Ok(Self::build(Some(pool), lines))
    }

    fn build(pool: Option<SqlitePool>, lines: CartLines) -> Self {
        let (snapshots, _) = watch::channel(lines.snapshot());
        Self {
            inner: Arc::new(CartInner {
                pool,
                lines: Mutex::new(lines),
                snapshots,
            }),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of `product` under `variant`.
    ///
    /// Creates the line or increments it. The product's current name, price
    /// and image are captured on the line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity` is zero.
    /// Returns `CartError::Repository` if the write fails; the cart is
    /// unchanged in that case.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add(
        &self,
        product: &Product,
        variant: Option<&str>,
        quantity: u32,
    ) -> Result<CartLine, CartError> {
        let quantity = Quantity::new(quantity)?;
        let mut lines = self.inner.lines.lock().await;
        self.add_locked(&mut lines, product, variant, quantity).await
    }

    /// Take one unit off a line, removing it when it reaches zero.
    ///
    /// Returns `false` without touching anything if the line does not exist.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the write fails.
    #[instrument(skip(self))]
    pub async fn remove_one(&self, key: &CartKey) -> Result<bool, CartError> {
        let mut lines = self.inner.lines.lock().await;
        let change = self
            .apply_locked(&mut lines, |cart| cart.remove_one(key))
            .await?;
        Ok(change.is_change())
    }

    /// Remove a line entirely, whatever its quantity.
    ///
    /// Returns `false` without touching anything if the line does not exist.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the write fails.
    #[instrument(skip(self))]
    pub async fn remove_line(&self, key: &CartKey) -> Result<bool, CartError> {
        let mut lines = self.inner.lines.lock().await;
        let change = self
            .apply_locked(&mut lines, |cart| cart.remove_line(key))
            .await?;
        Ok(change.is_change())
    }

    /// Remove every line, returning how many lines were removed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the delete fails.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<usize, CartError> {
        let mut lines = self.inner.lines.lock().await;
        self.clear_locked(&mut lines).await
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Total number of units across all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.inner.snapshots.borrow().count
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.inner.snapshots.borrow().total
    }

    /// The lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.inner.snapshots.borrow().lines.clone()
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.inner.snapshots.borrow().clone()
    }

    /// Watch the cart. The receiver always holds the latest snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.inner.snapshots.subscribe()
    }

    // =========================================================================
    // Locked operations (used by checkout)
    // =========================================================================

    /// Take the mutation lock. Other mutations wait until the guard drops.
    pub(crate) async fn lock(&self) -> MutexGuard<'_, CartLines> {
        self.inner.lines.lock().await
    }

    pub(crate) async fn add_locked(
        &self,
        lines: &mut CartLines,
        product: &Product,
        variant: Option<&str>,
        quantity: Quantity,
    ) -> Result<CartLine, CartError> {
        let change = self
            .apply_locked(lines, |cart| cart.add(product, variant, quantity))
            .await?;

        match change {
            LineChange::Inserted(line) | LineChange::Updated(line) => Ok(line),
            LineChange::Removed(_) | LineChange::Unchanged => {
                Err(RepositoryError::DataCorruption("add did not produce a cart line".to_owned()).into())
            }
        }
    }

    /// Run `mutate` on a copy of `lines`, persist the change, then commit and
    /// publish.
    async fn apply_locked<F>(&self, lines: &mut CartLines, mutate: F) -> Result<LineChange, CartError>
    where
        F: FnOnce(&mut CartLines) -> LineChange,
    {
        let mut next = lines.clone();
        let change = mutate(&mut next);
        if !change.is_change() {
            return Ok(change);
        }

        if let Some(pool) = &self.inner.pool {
            CartRepository::new(pool).apply(&change).await?;
        }

        *lines = next;
        self.publish(lines);
        debug!(count = lines.count(), "Cart updated");
        Ok(change)
    }

    pub(crate) async fn clear_locked(&self, lines: &mut CartLines) -> Result<usize, CartError> {
        if lines.is_empty() {
            return Ok(0);
        }

        if let Some(pool) = &self.inner.pool {
            CartRepository::new(pool).clear().await?;
        }

        let removed = lines.clear();
        self.publish(lines);
        debug!(removed, "Cart cleared");
        Ok(removed)
    }

    fn publish(&self, lines: &CartLines) {
        self.inner.snapshots.send_replace(lines.snapshot());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use voidshop_core::{Category, ImageRef, ProductId};

    use super::*;

    fn product(id: &str, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: price.parse().unwrap(),
            image: ImageRef::new(format!("image_{id}")),
            category: Category::Clothing,
            keywords: Vec::new(),
            variants: vec!["M".to_owned(), "L".to_owned()],
        }
    }

    fn key(id: &str, variant: Option<&str>) -> CartKey {
        CartKey::new(ProductId::new(id), variant)
    }

    #[tokio::test]
    async fn test_empty_cart() {
        let cart = CartAggregator::in_memory();
        assert_eq!(cart.count(), 0);
        assert_eq!(cart.total(), Price::ZERO);
        assert!(cart.lines().is_empty());
    }

    #[tokio::test]
    async fn test_add_and_totals() {
        let cart = CartAggregator::in_memory();
        let a = product("a", "10.00");
        let b = product("b", "2.00");

        cart.add(&a, None, 2).await.unwrap();
        cart.add(&b, None, 1).await.unwrap();

        assert_eq!(cart.count(), 3);
        assert_eq!(cart.total(), "22.00".parse().unwrap());
    }

    #[tokio::test]
    async fn test_add_zero_is_rejected() {
        let cart = CartAggregator::in_memory();
        let err = cart.add(&product("a", "1"), None, 0).await.unwrap_err();
        assert!(matches!(err, CartError::InvalidQuantity(_)));
        assert_eq!(cart.count(), 0);
    }

    #[tokio::test]
    async fn test_variants_are_separate_lines() {
        let cart = CartAggregator::in_memory();
        let p = product("p", "12.90");

        cart.add(&p, Some("M"), 1).await.unwrap();
        cart.add(&p, Some("L"), 1).await.unwrap();
        cart.add(&p, Some("M"), 1).await.unwrap();

        let lines = cart.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines.first().map(|l| l.quantity.get()), Some(2));
        assert_eq!(lines.get(1).map(|l| l.variant.as_deref()), Some(Some("L")));
    }

    #[tokio::test]
    async fn test_remove_one_down_to_absent() {
        let cart = CartAggregator::in_memory();
        let p = product("p", "5");
        cart.add(&p, Some("M"), 1).await.unwrap();

        assert!(cart.remove_one(&key("p", Some("M"))).await.unwrap());
        assert!(!cart.remove_one(&key("p", Some("M"))).await.unwrap());
        assert_eq!(cart.count(), 0);
        assert!(cart.lines().is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_line_is_noop() {
        let cart = CartAggregator::in_memory();
        cart.add(&product("p", "5"), None, 3).await.unwrap();
        let mut rx = cart.subscribe();

        assert!(!cart.remove_line(&key("q", None)).await.unwrap());
        assert!(!cart.remove_one(&key("p", Some("XL"))).await.unwrap());
        assert!(!rx.has_changed().unwrap());
        assert_eq!(cart.count(), 3);
    }

    #[tokio::test]
    async fn test_remove_line_and_clear() {
        let cart = CartAggregator::in_memory();
        cart.add(&product("a", "1"), None, 4).await.unwrap();
        cart.add(&product("b", "1"), None, 1).await.unwrap();

        assert!(cart.remove_line(&key("a", None)).await.unwrap());
        assert_eq!(cart.count(), 1);

        assert_eq!(cart.clear().await.unwrap(), 1);
        assert_eq!(cart.clear().await.unwrap(), 0);
        assert_eq!(cart.snapshot(), CartSnapshot::default());
    }

    #[tokio::test]
    async fn test_subscriber_sees_every_mutation() {
        let cart = CartAggregator::in_memory();
        let mut rx = cart.subscribe();

        cart.add(&product("a", "3.50"), None, 2).await.unwrap();
        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.count, 2);
        assert_eq!(snapshot.total, "7".parse().unwrap());

        cart.clear().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());
    }

    #[tokio::test]
    async fn test_line_keeps_price_at_time_of_add() {
        let cart = CartAggregator::in_memory();
        let mut p = product("a", "10");
        cart.add(&p, None, 1).await.unwrap();

        p.price = "99".parse().unwrap();
        assert_eq!(cart.total(), "10".parse().unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_adds_keep_one_line_per_key() {
        let cart = CartAggregator::in_memory();
        let p = product("a", "1");

        let mut handles = Vec::new();
        for _ in 0..16 {
            let cart = cart.clone();
            let p = p.clone();
            handles.push(tokio::spawn(async move { cart.add(&p, Some("M"), 1).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.count(), 16);
    }
}
