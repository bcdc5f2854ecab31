//! Import user products from YAML.
//!
//! ## YAML Format
//!
//! ```yaml
//! products:
//!   - name: Camping Mug
//!     price: "8.75"
//!     category: KITCHEN
//!     keywords: [mug, camping]
//!   - name: Wool Socks
//!     price: "6.00"
//!     category: CLOTHING
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{info, instrument};

use voidshop_core::{NewProduct, ProductId};

use super::{CatalogError, CatalogStore};

/// Full seed file structure.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    /// Products to add, in file order.
    #[serde(default)]
    pub products: Vec<NewProduct>,
}

impl SeedFile {
    /// Parse a seed file from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Seed` if the YAML is malformed.
    pub fn parse(content: &str) -> Result<Self, CatalogError> {
        serde_yaml::from_str(content)
            .map_err(|e| CatalogError::Seed(format!("Failed to parse YAML: {e}")))
    }
}

/// Result of a seeding operation.
#[derive(Debug)]
pub struct SeedResult {
    /// Ids of the imported products, in file order.
    pub inserted: Vec<ProductId>,
}

impl CatalogStore {
    /// Import the products listed in a YAML seed file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if any entry is
    /// invalid, or if the database write fails. Nothing is imported on error.
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub async fn seed_from_file<P: AsRef<Path>>(&self, path: P) -> Result<SeedResult, CatalogError> {
        let path = path.as_ref();

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CatalogError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

        self.seed_from_config(SeedFile::parse(&content)?).await
    }

    /// Import the products of an already parsed seed file.
    ///
    /// # Errors
    ///
    /// Returns an error if any entry is invalid or the database write fails.
    #[instrument(skip(self, config), fields(products = config.products.len()))]
    pub async fn seed_from_config(&self, config: SeedFile) -> Result<SeedResult, CatalogError> {
        let inserted = self.add_products(config.products).await?;
        info!(inserted = inserted.len(), "Seeded products");
        Ok(SeedResult { inserted })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use voidshop_core::Category;

    use super::*;
    use crate::services::catalog::builtin_products;

    const SEED: &str = r#"
products:
  - name: Camping Mug
    price: "8.75"
    category: KITCHEN
    keywords: [mug, camping]
  - name: Wool Socks
    price: "6.00"
    category: CLOTHING
"#;

    #[test]
    fn test_parse_seed() {
        let seed = SeedFile::parse(SEED).unwrap();
        assert_eq!(seed.products.len(), 2);
        let mug = seed.products.first().unwrap();
        assert_eq!(mug.category, Category::Kitchen);
        assert_eq!(mug.keywords, vec!["mug", "camping"]);
        assert!(seed.products.get(1).unwrap().keywords.is_empty());
    }

    #[test]
    fn test_parse_rejects_unknown_category() {
        let yaml = "products:\n  - name: Ring\n    price: \"5\"\n    category: RINGS\n";
        assert!(matches!(SeedFile::parse(yaml), Err(CatalogError::Seed(_))));
    }

    #[test]
    fn test_parse_lowercase_category() {
        let yaml = "products:\n  - name: Mug\n    price: \"3\"\n    category: kitchen\n";
        let seed = SeedFile::parse(yaml).unwrap();
        assert_eq!(seed.products.first().unwrap().category, Category::Kitchen);
    }

    #[test]
    fn test_empty_file_has_no_products() {
        assert!(SeedFile::parse("{}").unwrap().products.is_empty());
    }

    #[tokio::test]
    async fn test_seed_from_config() {
        let catalog = CatalogStore::in_memory(builtin_products());
        let result = catalog
            .seed_from_config(SeedFile::parse(SEED).unwrap())
            .await
            .unwrap();

        assert_eq!(result.inserted.len(), 2);
        assert_eq!(catalog.list_products().len(), 14);
    }

    #[tokio::test]
    async fn test_seed_missing_file() {
        let catalog = CatalogStore::in_memory(builtin_products());
        let err = catalog
            .seed_from_file("/nonexistent/voidshop-seed.yaml")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
