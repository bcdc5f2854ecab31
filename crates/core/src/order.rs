//! Checkout input and order confirmations.
//!
//! Orders are not stored anywhere: a confirmation is returned once, shown to
//! the shopper, and dropped.

use core::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, Price};

/// Reasons a checkout is refused. The cart is left untouched in every case.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutError {
    /// The cart has no items.
    #[error("cannot check out an empty cart")]
    EmptyCart,
    /// No delivery address was given.
    #[error("a delivery address is required")]
    MissingAddress,
}

/// How the shopper intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    CashOnDelivery,
}

impl PaymentMethod {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Card => "Card",
            Self::CashOnDelivery => "Cash on delivery",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "cod" | "cash" | "cash_on_delivery" | "cash-on-delivery" => Ok(Self::CashOnDelivery),
            _ => Err(format!("invalid payment method: {s} (expected card or cod)")),
        }
    }
}

/// A non-blank delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryAddress(String);

impl DeliveryAddress {
    /// Parse an address, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingAddress`] if the input is blank.
    pub fn parse(s: &str) -> Result<Self, CheckoutError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CheckoutError::MissingAddress);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeliveryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    /// Number of units purchased.
    pub item_count: u64,
    pub total: Price,
    pub payment_method: PaymentMethod,
    pub address: DeliveryAddress,
    pub placed_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_address_blank_rejected() {
        assert_eq!(DeliveryAddress::parse(""), Err(CheckoutError::MissingAddress));
        assert_eq!(
            DeliveryAddress::parse(" \t\n"),
            Err(CheckoutError::MissingAddress)
        );
    }

    #[test]
    fn test_address_trimmed() {
        let address = DeliveryAddress::parse("  12 Main St ").unwrap();
        assert_eq!(address.as_str(), "12 Main St");
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("Card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!(
            "cod".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::CashOnDelivery
        );
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_checkout_error_messages() {
        assert_eq!(
            CheckoutError::EmptyCart.to_string(),
            "cannot check out an empty cart"
        );
    }
}
