//! Cart commands.

use tracing::info;

use voidshop_core::{CartKey, CartSnapshot, ProductId};
use voidshop_storefront::error::AppError;
use voidshop_storefront::state::AppState;

use super::{CliError, find_product, print_json};

/// Print the cart.
///
/// # Errors
///
/// Returns an error if JSON encoding fails.
pub fn show(state: &AppState, json: bool) -> Result<(), CliError> {
    let snapshot = state.cart().snapshot();
    if json {
        return print_json(&snapshot);
    }

    #[allow(clippy::print_stdout)]
    {
        println!("{}", render(state, &snapshot));
    }
    Ok(())
}

fn render(state: &AppState, snapshot: &CartSnapshot) -> String {
    if snapshot.is_empty() {
        return "Your cart is empty".to_string();
    }

    let mut out = String::new();
    for line in &snapshot.lines {
        out.push_str(&format!(
            "{:<4} {:<40} x{:<4} {:>10}\n",
            line.product_id.as_str(),
            line.label(),
            line.quantity.get(),
            state.format_price(line.line_total()),
        ));
    }
    out.push_str(&format!(
        "{} items, total {}",
        snapshot.count,
        state.format_price(snapshot.total)
    ));
    out
}

/// Add units of a product.
///
/// # Errors
///
/// Returns an error if the product does not exist, the quantity is zero, or
/// the write fails.
pub async fn add(
    state: &AppState,
    product_id: &str,
    variant: Option<&str>,
    quantity: u32,
) -> Result<(), CliError> {
    let product = find_product(state, product_id)?;
    let line = state
        .cart()
        .add(&product, variant, quantity)
        .await
        .map_err(AppError::from)?;

    info!(
        line = %line.label(),
        quantity = line.quantity.get(),
        cart_count = state.cart().count(),
        "Added to cart"
    );
    Ok(())
}

/// Take one unit off a line.
///
/// # Errors
///
/// Returns an error if the write fails.
pub async fn remove_one(
    state: &AppState,
    product_id: &str,
    variant: Option<&str>,
) -> Result<(), CliError> {
    let key = CartKey::new(ProductId::new(product_id), variant);
    let changed = state
        .cart()
        .remove_one(&key)
        .await
        .map_err(AppError::from)?;
    report(state, changed);
    Ok(())
}

/// Remove a whole line.
///
/// # Errors
///
/// Returns an error if the write fails.
pub async fn remove_line(
    state: &AppState,
    product_id: &str,
    variant: Option<&str>,
) -> Result<(), CliError> {
    let key = CartKey::new(ProductId::new(product_id), variant);
    let changed = state
        .cart()
        .remove_line(&key)
        .await
        .map_err(AppError::from)?;
    report(state, changed);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub async fn clear(state: &AppState) -> Result<(), CliError> {
    let removed = state.cart().clear().await.map_err(AppError::from)?;
    info!(removed, "Cart cleared");
    Ok(())
}

fn report(state: &AppState, changed: bool) {
    if changed {
        info!(cart_count = state.cart().count(), "Cart updated");
    } else {
        info!("No such line in the cart; nothing changed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use voidshop_storefront::config::StorefrontConfig;

    use super::*;

    #[tokio::test]
    async fn test_render() {
        let state = AppState::in_memory(StorefrontConfig::in_memory());
        assert_eq!(render(&state, &state.cart().snapshot()), "Your cart is empty");

        add(&state, "4", Some("M"), 2).await.unwrap();
        let text = render(&state, &state.cart().snapshot());
        assert!(text.contains("Oversize Tee Black · Size M"));
        assert!(text.ends_with("2 items, total $25.80"));
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let state = AppState::in_memory(StorefrontConfig::in_memory());
        let err = add(&state, "999", None, 1).await.unwrap_err();
        assert!(err.is_user_error());
        assert_eq!(state.cart().count(), 0);
    }
}
