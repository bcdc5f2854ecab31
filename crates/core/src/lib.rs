//! Void Shop Core - catalog, cart and order logic.
//!
//! This crate provides the types and pure logic shared by every Void Shop
//! component:
//! - `storefront` - Observable stores, persistence and the checkout flow
//! - `cli` - Command-line driver for the storefront
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no async runtime. Everything here can be tested without a database.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, categories and quantities
//! - [`product`] - Catalog products and validated user input
//! - [`cart`] - The cart line state machine and derived totals
//! - [`filter`] - The catalog query engine (search, category, price, sort)
//! - [`order`] - Checkout input and order confirmations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod filter;
pub mod order;
pub mod product;
pub mod types;

pub use cart::{CartKey, CartLine, CartLines, CartSnapshot, LineChange};
pub use filter::{FilterSpec, PriceRange, SortOption};
pub use order::{CheckoutError, DeliveryAddress, OrderConfirmation, PaymentMethod};
pub use product::{ImageRef, NewProduct, Product, ProductError};
pub use types::*;
