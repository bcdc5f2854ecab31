//! Checkout commands.

use voidshop_core::{OrderConfirmation, PaymentMethod};
use voidshop_storefront::error::AppError;
use voidshop_storefront::state::AppState;

use super::{CliError, find_product, print_json};

/// Input for `buy-now`.
#[derive(Debug)]
pub struct BuyNow {
    pub product_id: String,
    pub variant: Option<String>,
    pub quantity: u32,
    pub address: String,
    pub payment: PaymentMethod,
}

/// Check out the whole cart.
///
/// # Errors
///
/// Returns an error if the cart is empty, the address is blank, or clearing
/// the cart fails.
pub async fn checkout(
    state: &AppState,
    address: &str,
    payment: PaymentMethod,
    json: bool,
) -> Result<(), CliError> {
    let confirmation = state
        .checkout()
        .checkout(state.cart(), address, payment)
        .await
        .map_err(AppError::from)?;
    print_confirmation(state, &confirmation, json)
}

/// Add one product and check out straight away.
///
/// # Errors
///
/// Returns an error if the product does not exist, the address is blank, the
/// quantity is zero, or a cart write fails.
pub async fn buy_now(state: &AppState, order: BuyNow, json: bool) -> Result<(), CliError> {
    let product = find_product(state, &order.product_id)?;
    let confirmation = state
        .checkout()
        .buy_now(
            state.cart(),
            &product,
            order.variant.as_deref(),
            order.quantity,
            &order.address,
            order.payment,
        )
        .await
        .map_err(AppError::from)?;
    print_confirmation(state, &confirmation, json)
}

fn print_confirmation(
    state: &AppState,
    confirmation: &OrderConfirmation,
    json: bool,
) -> Result<(), CliError> {
    if json {
        return print_json(confirmation);
    }

    #[allow(clippy::print_stdout)]
    {
        println!("Order {} confirmed", confirmation.order_id);
        println!("  Items:    {}", confirmation.item_count);
        println!("  Total:    {}", state.format_price(confirmation.total));
        println!("  Payment:  {}", confirmation.payment_method);
        println!("  Deliver:  {}", confirmation.address);
    }
    Ok(())
}
