//! Void Shop storefront library.
//!
//! Observable catalog, cart and checkout stores over an in-memory or `SQLite`
//! backend. Front ends build an [`state::AppState`] and drive it:
//!
//! ```no_run
//! use voidshop_core::{PaymentMethod, ProductId};
//! use voidshop_storefront::{config::StorefrontConfig, state::AppState};
//!
//! # async fn run() -> Result<(), voidshop_storefront::error::AppError> {
//! let state = AppState::open(StorefrontConfig::in_memory()).await?;
//! if let Some(tee) = state.catalog().get_product(&ProductId::new("4")) {
//!     state.cart().add(&tee, Some("M"), 2).await?;
//! }
//! let order = state
//!     .checkout()
//!     .checkout(state.cart(), "Calle 1", PaymentMethod::Card)
//!     .await?;
//! println!("{} {}", order.order_id, state.format_price(order.total));
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod state;
