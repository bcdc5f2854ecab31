//! Unified error handling.
//!
//! [`AppError`] wraps every storefront error so a front end can decide in one
//! place whether to re-prompt the shopper or report a failure.

use thiserror::Error;

use voidshop_core::{CheckoutError, ProductError};

use crate::config::ConfigError;
use crate::db::RepositoryError;
use crate::services::{CartError, CatalogError, CheckoutFlowError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutFlowError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(RepositoryError::Database(e))
    }
}

impl AppError {
    /// Returns true for errors caused by the shopper's input, which can be
    /// fixed by asking again. Everything else is an infrastructure failure.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        match self {
            Self::Catalog(err) => matches!(
                err,
                CatalogError::Validation(_)
                    | CatalogError::InvalidSeedEntry { .. }
                    | CatalogError::Seed(_)
            ),
            Self::Cart(err) | Self::Checkout(CheckoutFlowError::Cart(err)) => {
                matches!(err, CartError::InvalidQuantity(_))
            }
            Self::Checkout(CheckoutFlowError::Rejected(_)) | Self::NotFound(_) => true,
            Self::Config(_) | Self::Database(_) => false,
        }
    }

    /// A message safe to show the shopper. Internal details are hidden.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(_) | Self::Database(_) => "Internal storage error".to_string(),
            Self::Catalog(CatalogError::Validation(err)) => product_message(err).to_string(),
            Self::Checkout(CheckoutFlowError::Rejected(err)) => match err {
                CheckoutError::EmptyCart => "Your cart is empty".to_string(),
                CheckoutError::MissingAddress => "Please enter a delivery address".to_string(),
            },
            Self::Cart(CartError::InvalidQuantity(_))
            | Self::Checkout(CheckoutFlowError::Cart(CartError::InvalidQuantity(_))) => {
                "Quantity must be at least 1".to_string()
            }
            Self::Cart(CartError::Repository(_))
            | Self::Checkout(CheckoutFlowError::Cart(CartError::Repository(_)))
            | Self::Catalog(CatalogError::Repository(_)) => "Internal storage error".to_string(),
            _ => self.to_string(),
        }
    }
}

const fn product_message(err: &ProductError) -> &'static str {
    match err {
        ProductError::BlankName => "Please enter a product name",
        ProductError::NonPositivePrice(_) => "Price must be greater than zero",
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use voidshop_core::QuantityError;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 42".to_string());
        assert_eq!(err.to_string(), "Not found: product 42");
    }

    #[test]
    fn test_user_errors() {
        assert!(AppError::from(CheckoutFlowError::from(CheckoutError::EmptyCart)).is_user_error());
        assert!(AppError::from(CatalogError::from(ProductError::BlankName)).is_user_error());
        assert!(
            AppError::from(CartError::from(QuantityError::NotPositive(0))).is_user_error()
        );
        assert!(AppError::NotFound("x".to_string()).is_user_error());
    }

    #[test]
    fn test_infrastructure_errors() {
        assert!(!AppError::from(RepositoryError::NotFound).is_user_error());
        assert!(
            !AppError::from(CartError::from(RepositoryError::DataCorruption("x".to_string())))
                .is_user_error()
        );
        assert!(!AppError::from(CatalogError::Io("gone".to_string())).is_user_error());
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = AppError::from(RepositoryError::Conflict("product id already exists".to_string()));
        assert_eq!(err.user_message(), "Internal storage error");

        let err = AppError::from(CatalogError::from(ProductError::NonPositivePrice(Decimal::ZERO)));
        assert_eq!(err.user_message(), "Price must be greater than zero");

        let err = AppError::from(CheckoutFlowError::from(CheckoutError::MissingAddress));
        assert_eq!(err.user_message(), "Please enter a delivery address");
    }
}
