//! Command implementations.

pub mod cart;
pub mod checkout;
pub mod migrate;
pub mod products;
pub mod seed;

use serde::Serialize;
use thiserror::Error;

use voidshop_core::{Product, ProductId};
use voidshop_storefront::error::AppError;
use voidshop_storefront::state::AppState;

/// Errors a command can end with.
#[derive(Debug, Error)]
pub enum CliError {
    /// A storefront operation failed.
    #[error(transparent)]
    App(#[from] AppError),

    /// Output could not be encoded.
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Returns true if the shopper can fix the error by changing the input.
    pub const fn is_user_error(&self) -> bool {
        match self {
            Self::App(e) => e.is_user_error(),
            Self::Json(_) => false,
        }
    }

    /// Message to print for the error.
    pub fn user_message(&self) -> String {
        match self {
            Self::App(e) => e.user_message(),
            Self::Json(e) => e.to_string(),
        }
    }
}

/// Look up a product or fail with `AppError::NotFound`.
pub fn find_product(state: &AppState, product_id: &str) -> Result<Product, AppError> {
    state
        .catalog()
        .get_product(&ProductId::new(product_id))
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{json}");
    }
    Ok(())
}
