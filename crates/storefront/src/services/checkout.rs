//! Checkout flow.
//!
//! Turns a non-empty cart plus delivery details into an [`OrderConfirmation`]
//! and empties the cart. Nothing is charged and the order is not stored.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use thiserror::Error;
use tracing::{info, instrument, warn};

use voidshop_core::{
    CartLines, CheckoutError, DeliveryAddress, OrderConfirmation, OrderId, PaymentMethod, Product,
    Quantity,
};

use super::cart::{CartAggregator, CartError};

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutFlowError {
    /// The checkout was refused; the cart is untouched.
    #[error(transparent)]
    Rejected(#[from] CheckoutError),

    /// Updating the cart failed.
    #[error("cart error: {0}")]
    Cart(#[from] CartError),
}

type OrderIdSource = Arc<dyn Fn() -> OrderId + Send + Sync>;

/// Random `VS-NNNNNN` order id.
#[must_use]
pub fn random_order_id() -> OrderId {
    OrderId::from_number(rand::rng().random_range(OrderId::MIN_NUMBER..=OrderId::MAX_NUMBER))
}

/// Runs checkouts against a cart.
#[derive(Clone)]
pub struct CheckoutController {
    order_ids: OrderIdSource,
}

impl fmt::Debug for CheckoutController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutController").finish_non_exhaustive()
    }
}

impl Default for CheckoutController {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutController {
    /// A controller issuing random order ids.
    #[must_use]
    pub fn new() -> Self {
        Self {
            order_ids: Arc::new(random_order_id),
        }
    }

    /// A controller drawing order ids from `source`.
    #[must_use]
    pub fn with_order_ids<F>(source: F) -> Self
    where
        F: Fn() -> OrderId + Send + Sync + 'static,
    {
        Self {
            order_ids: Arc::new(source),
        }
    }

    /// Place an order for everything in the cart.
    ///
    /// The emptiness check, the address check and the clear all happen under
    /// the cart's lock, so no other mutation can slip in between.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no items, checked
    /// first. Returns `CheckoutError::MissingAddress` if the address is blank.
    /// The cart is untouched on either. Returns `CartError` if clearing the
    /// stored cart fails.
    #[instrument(skip(self, cart, address))]
    pub async fn checkout(
        &self,
        cart: &CartAggregator,
        address: &str,
        payment_method: PaymentMethod,
    ) -> Result<OrderConfirmation, CheckoutFlowError> {
        let mut lines = cart.lock().await;
        if lines.is_empty() {
            warn!("Checkout refused: empty cart");
            return Err(CheckoutError::EmptyCart.into());
        }
        let address = DeliveryAddress::parse(address).inspect_err(|_| {
            warn!("Checkout refused: missing address");
        })?;

        self.place(cart, &mut lines, address, payment_method).await
    }

    /// Add a product and check out straight away.
    ///
    /// The address is checked before the product is added, so a blank address
    /// leaves the cart untouched.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingAddress` if the address is blank.
    /// Returns `CartError::InvalidQuantity` if `quantity` is zero.
    /// Returns `CartError::Repository` if a cart write fails.
    #[instrument(skip(self, cart, product, address), fields(product_id = %product.id))]
    pub async fn buy_now(
        &self,
        cart: &CartAggregator,
        product: &Product,
        variant: Option<&str>,
        quantity: u32,
        address: &str,
        payment_method: PaymentMethod,
    ) -> Result<OrderConfirmation, CheckoutFlowError> {
        let address = DeliveryAddress::parse(address)?;
        let quantity = Quantity::new(quantity).map_err(CartError::from)?;

        let mut lines = cart.lock().await;
        cart.add_locked(&mut lines, product, variant, quantity).await?;
        self.place(cart, &mut lines, address, payment_method).await
    }

    async fn place(
        &self,
        cart: &CartAggregator,
        lines: &mut CartLines,
        address: DeliveryAddress,
        payment_method: PaymentMethod,
    ) -> Result<OrderConfirmation, CheckoutFlowError> {
        let item_count = lines.count();
        let total = lines.total();
        let order_id = (self.order_ids)();

        cart.clear_locked(lines).await?;

        info!(
            order_id = %order_id,
            item_count,
            total = %total,
            payment_method = %payment_method,
            "Order placed"
        );

        Ok(OrderConfirmation {
            order_id,
            item_count,
            total,
            payment_method,
            address,
            placed_at: Utc::now(),
        })
    }
}
