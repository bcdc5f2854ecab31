//! Product repository for user-created catalog products.

use sqlx::SqlitePool;
use tracing::{debug, instrument};

use voidshop_core::{Category, ImageRef, Price, Product, ProductId};

use super::{RepositoryError, map_unique_violation};

/// Separator used for the stored keyword list.
const KEYWORD_SEPARATOR: char = ',';

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    product_id: String,
    name: String,
    price: String,
    image_ref: String,
    category: String,
    keywords: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::parse(&row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "invalid price for product {}: {e}",
                row.product_id
            ))
        })?;
        let category = row.category.parse::<Category>().map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "invalid category for product {}: {e}",
                row.product_id
            ))
        })?;

        Ok(Self {
            id: ProductId::new(row.product_id),
            name: row.name,
            price,
            image: ImageRef::new(row.image_ref),
            category,
            keywords: split_keywords(&row.keywords),
            variants: Vec::new(),
        })
    }
}

/// Join keywords into their stored form.
#[must_use]
pub fn join_keywords(keywords: &[String]) -> String {
    keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Split a stored keyword list, trimming tokens and dropping empty ones.
#[must_use]
pub fn split_keywords(stored: &str) -> Vec<String> {
    stored
        .split(KEYWORD_SEPARATOR)
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Repository for user-created products.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All stored products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT product_id, name, price, image_ref, category, keywords
            FROM products
            ORDER BY id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded stored products");
        rows.into_iter().map(Product::try_from).collect()
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product id already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn insert(&self, product: &Product) -> Result<(), RepositoryError> {
        insert_product(self.pool, product).await
    }

    /// Insert several products in one transaction. Either all are stored or
    /// none are.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if any product id already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub async fn insert_many(&self, products: &[Product]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        for product in products {
            insert_product(&mut *tx, product).await?;
        }
        tx.commit().await?;

        debug!(count = products.len(), "Inserted products");
        Ok(())
    }
}

async fn insert_product<'e, E>(executor: E, product: &Product) -> Result<(), RepositoryError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        r"
        INSERT INTO products (product_id, name, price, image_ref, category, keywords)
        VALUES (?, ?, ?, ?, ?, ?)
        ",
    )
    .bind(product.id.as_str())
    .bind(&product.name)
    .bind(product.price.amount().to_string())
    .bind(product.image.as_str())
    .bind(product.category.as_str())
    .bind(join_keywords(&product.keywords))
    .execute(executor)
    .await
    .map_err(|e| map_unique_violation(e, "product id"))?;

    Ok(())
}
