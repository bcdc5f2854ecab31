//! Storefront services.
//!
//! # Services
//!
//! - `catalog` - Observable product list with user-added products and seeding
//! - `cart` - Cart aggregator with write-through persistence
//! - `checkout` - Order placement against a cart

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use cart::{CartAggregator, CartError};
pub use catalog::{CatalogError, CatalogStore, ProductList};
pub use checkout::{CheckoutController, CheckoutFlowError};
