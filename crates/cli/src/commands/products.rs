//! Catalog commands.

use rust_decimal::Decimal;
use tracing::info;

use voidshop_core::{Category, FilterSpec, NewProduct, Price, PriceRange, Product, SortOption};
use voidshop_storefront::error::AppError;
use voidshop_storefront::state::AppState;

use super::{CliError, print_json};

/// Filter options for `products list`.
#[derive(Debug, Default)]
pub struct ListArgs {
    pub query: String,
    pub categories: Vec<Category>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub sort: SortOption,
}

impl ListArgs {
    /// Build the filter. A missing end of the price range is taken from the
    /// catalog bounds.
    fn into_spec(self, bounds: Option<PriceRange>) -> FilterSpec {
        let mut spec = FilterSpec::default()
            .with_query(self.query)
            .sorted_by(self.sort);
        for category in self.categories {
            spec = spec.with_category(category);
        }

        if self.min_price.is_some() || self.max_price.is_some() {
            let min = self
                .min_price
                .or_else(|| bounds.map(|b| b.min))
                .unwrap_or(Price::ZERO);
            let max = self
                .max_price
                .or_else(|| bounds.map(|b| b.max))
                .unwrap_or(min);
            spec = spec.with_price_range(PriceRange::new(min, max));
        }
        spec
    }
}

/// Print the products matching `args`.
///
/// # Errors
///
/// Returns an error if JSON encoding fails.
pub fn list(state: &AppState, args: ListArgs, json: bool) -> Result<(), CliError> {
    let catalog = state.catalog();
    let spec = args.into_spec(catalog.price_bounds());
    let products = catalog.query(&spec);

    if json {
        return print_json(&products);
    }

    #[allow(clippy::print_stdout)]
    {
        for product in &products {
            println!("{}", product_row(state, product));
        }
        println!("{} of {} products", products.len(), catalog.products().len());
    }
    Ok(())
}

fn product_row(state: &AppState, product: &Product) -> String {
    let sizes = if product.has_variants() {
        format!("  [{}]", product.variants.join(" "))
    } else {
        String::new()
    };
    format!(
        "{:<4} {:<32} {:>10}  {:<9}{sizes}",
        product.id.as_str(),
        product.name,
        state.format_price(product.price),
        product.category.label(),
    )
}

/// Add a user product.
///
/// # Errors
///
/// Returns an error if the input is invalid or the write fails.
pub async fn add(
    state: &AppState,
    name: String,
    price: Decimal,
    category: Category,
    keywords: Vec<String>,
) -> Result<(), CliError> {
    let input = NewProduct {
        name,
        price,
        category,
        keywords,
    };
    let id = state
        .catalog()
        .add_product(input)
        .await
        .map_err(AppError::from)?;

    info!(product_id = %id, "Product added");
    #[allow(clippy::print_stdout)]
    {
        println!("{id}");
    }
    Ok(())
}
