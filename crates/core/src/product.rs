//! Catalog products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Category, Price, ProductId};

/// Errors raised when validating user-supplied product data.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    /// The product name is empty or whitespace.
    #[error("product name cannot be blank")]
    BlankName,
    /// The price is zero or negative.
    #[error("product price must be greater than zero (got {0})")]
    NonPositivePrice(Decimal),
}

/// Opaque handle to a product image (an asset name, not a path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Handle used for products created without an image.
    pub const PLACEHOLDER: &'static str = "placeholder";

    /// Create an image handle.
    #[must_use]
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// The placeholder image handle.
    #[must_use]
    pub fn placeholder() -> Self {
        Self(Self::PLACEHOLDER.to_owned())
    }

    /// Returns the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A product in the catalog. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: ImageRef,
    pub category: Category,
    /// Search tokens, in the order they were entered.
    pub keywords: Vec<String>,
    /// Variant labels such as sizes. Empty means the product has no variant
    /// dimension.
    #[serde(default)]
    pub variants: Vec<String>,
}

impl Product {
    /// Returns true if the product is sold in variants (e.g. sizes).
    #[must_use]
    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    /// Case-insensitive match of an already lower-cased needle against the
    /// name and every keyword.
    #[must_use]
    pub fn matches_query(&self, needle_lowercase: &str) -> bool {
        self.name.to_lowercase().contains(needle_lowercase)
            || self
                .keywords
                .iter()
                .any(|k| k.to_lowercase().contains(needle_lowercase))
    }
}

/// User input for creating a catalog product.
///
/// Seed files use the same shape:
///
/// ```yaml
/// - name: Camping Mug
///   price: "8.75"
///   category: KITCHEN
///   keywords: [mug, camping]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub category: Category,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl NewProduct {
    /// Check the input without consuming it.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::BlankName`] if the name is blank and
    /// [`ProductError::NonPositivePrice`] if the price is not above zero.
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.name.trim().is_empty() {
            return Err(ProductError::BlankName);
        }
        if self.price <= Decimal::ZERO {
            return Err(ProductError::NonPositivePrice(self.price));
        }
        Ok(())
    }

    /// Validate the input and build the product under the given id.
    ///
    /// The name is trimmed. Keywords are split on commas, trimmed, and empty
    /// tokens are dropped so they survive the comma-joined storage format.
    ///
    /// # Errors
    ///
    /// Returns a [`ProductError`] if validation fails.
    pub fn into_product(self, id: ProductId) -> Result<Product, ProductError> {
        self.validate()?;
        let price = Price::new(self.price).map_err(|_| ProductError::NonPositivePrice(self.price))?;

        let keywords = self
            .keywords
            .iter()
            .flat_map(|k| k.split(','))
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_owned)
            .collect();

        Ok(Product {
            id,
            name: self.name.trim().to_owned(),
            price,
            image: ImageRef::placeholder(),
            category: self.category,
            keywords,
            variants: Vec::new(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input(name: &str, price: Decimal) -> NewProduct {
        NewProduct {
            name: name.to_owned(),
            price,
            category: Category::Kitchen,
            keywords: vec![" mug ".to_owned(), String::new(), "camping,outdoor".to_owned()],
        }
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = input("   ", Decimal::ONE)
            .into_product(ProductId::new("U-1"))
            .unwrap_err();
        assert_eq!(err, ProductError::BlankName);
    }

    #[test]
    fn test_non_positive_price_rejected() {
        assert!(matches!(
            input("Mug", Decimal::ZERO).validate(),
            Err(ProductError::NonPositivePrice(_))
        ));
        assert!(matches!(
            input("Mug", Decimal::NEGATIVE_ONE).validate(),
            Err(ProductError::NonPositivePrice(_))
        ));
    }

    #[test]
    fn test_keywords_normalized() {
        let product = input(" Mug ", Decimal::new(875, 2))
            .into_product(ProductId::new("U-1"))
            .unwrap();
        assert_eq!(product.name, "Mug");
        assert_eq!(product.keywords, vec!["mug", "camping", "outdoor"]);
        assert_eq!(product.image, ImageRef::placeholder());
        assert!(!product.has_variants());
    }

    #[test]
    fn test_matches_query() {
        let product = input("Camping Mug", Decimal::ONE)
            .into_product(ProductId::new("U-1"))
            .unwrap();
        assert!(product.matches_query("camp"));
        assert!(product.matches_query("outdoor"));
        assert!(!product.matches_query("knife"));
    }

    #[test]
    fn test_seed_yaml_shape() {
        let json = r#"{"name":"Mug","price":"8.75","category":"KITCHEN"}"#;
        let parsed: NewProduct = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.price, Decimal::new(875, 2));
        assert!(parsed.keywords.is_empty());
    }
}
