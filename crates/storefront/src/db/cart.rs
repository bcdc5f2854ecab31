//! Cart repository for persisted cart lines.
//!
//! Lines are matched on `product_id` plus `variant IS ?`, so a NULL variant
//! matches only the NULL-variant line.

use sqlx::SqlitePool;
use tracing::{debug, instrument};

use voidshop_core::{CartLine, ImageRef, LineChange, Price, ProductId, Quantity};

use super::{RepositoryError, map_unique_violation};

#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    product_id: String,
    name: String,
    price: String,
    image_ref: String,
    variant: Option<String>,
    quantity: i64,
}

impl TryFrom<CartItemRow> for CartLine {
    type Error = RepositoryError;

    fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
        let unit_price = Price::parse(&row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "invalid price for cart line {}: {e}",
                row.product_id
            ))
        })?;
        let quantity = Quantity::try_from(row.quantity).map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "invalid quantity for cart line {}: {e}",
                row.product_id
            ))
        })?;

        Ok(Self {
            product_id: ProductId::new(row.product_id),
            variant: row.variant,
            name: row.name,
            unit_price,
            image: ImageRef::new(row.image_ref),
            quantity,
        })
    }
}

/// Repository for cart lines.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All stored lines in first-add order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT product_id, name, price, image_ref, variant, quantity
            FROM cart_items
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded cart lines");
        rows.into_iter().map(CartLine::try_from).collect()
    }

    /// Write a single line change.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if an inserted line already exists.
    /// Returns `RepositoryError::NotFound` if an updated line is missing.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, change))]
    pub async fn apply(&self, change: &LineChange) -> Result<(), RepositoryError> {
        match change {
            LineChange::Inserted(line) => self.insert(line).await,
            LineChange::Updated(line) => self.update(line).await,
            LineChange::Removed(line) => self.delete(line).await,
            LineChange::Unchanged => Ok(()),
        }
    }

    async fn insert(&self, line: &CartLine) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO cart_items (product_id, name, price, image_ref, variant, quantity)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(line.product_id.as_str())
        .bind(&line.name)
        .bind(line.unit_price.amount().to_string())
        .bind(line.image.as_str())
        .bind(line.variant.as_deref())
        .bind(i64::from(line.quantity.get()))
        .execute(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "cart line"))?;

        debug!(product_id = %line.product_id, variant = ?line.variant, "Inserted cart line");
        Ok(())
    }

    async fn update(&self, line: &CartLine) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cart_items
            SET name = ?, price = ?, image_ref = ?, quantity = ?
            WHERE product_id = ? AND variant IS ?
            ",
        )
        .bind(&line.name)
        .bind(line.unit_price.amount().to_string())
        .bind(line.image.as_str())
        .bind(i64::from(line.quantity.get()))
        .bind(line.product_id.as_str())
        .bind(line.variant.as_deref())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, line: &CartLine) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            DELETE FROM cart_items
            WHERE product_id = ? AND variant IS ?
            ",
        )
        .bind(line.product_id.as_str())
        .bind(line.variant.as_deref())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Delete every line, returning how many rows were removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items")
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(quantity: i64, price: &str) -> CartItemRow {
        CartItemRow {
            product_id: "4".to_owned(),
            name: "Oversize Tee".to_owned(),
            price: price.to_owned(),
            image_ref: "oversize_tee_black".to_owned(),
            variant: Some("M".to_owned()),
            quantity,
        }
    }

    #[test]
    fn test_row_decodes() {
        let line = CartLine::try_from(row(2, "12.90")).unwrap();
        assert_eq!(line.quantity.get(), 2);
        assert_eq!(line.variant.as_deref(), Some("M"));
        assert_eq!(line.line_total(), "25.80".parse().unwrap());
    }

    #[test]
    fn test_zero_quantity_is_corruption() {
        assert!(matches!(
            CartLine::try_from(row(0, "12.90")),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_unparseable_price_is_corruption() {
        assert!(matches!(
            CartLine::try_from(row(1, "twelve")),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
