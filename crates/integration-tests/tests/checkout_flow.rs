//! Integration tests for checkout against a persisted cart.

#![allow(clippy::unwrap_used)]

use voidshop_core::{CheckoutError, OrderId, PaymentMethod, Price, Product, ProductId};
use voidshop_integration_tests::{memory_pool, open_state};
use voidshop_storefront::db::CartRepository;
use voidshop_storefront::error::AppError;
use voidshop_storefront::services::{CheckoutController, CheckoutFlowError};
use voidshop_storefront::state::AppState;

fn builtin(state: &AppState, id: &str) -> Product {
    state.catalog().get_product(&ProductId::new(id)).unwrap()
}

#[tokio::test]
async fn test_checkout_clears_persisted_cart() {
    let pool = memory_pool().await;
    let state = open_state(&pool).await;
    state.cart().add(&builtin(&state, "4"), Some("M"), 2).await.unwrap();
    state.cart().add(&builtin(&state, "7"), None, 1).await.unwrap();

    let confirmation = state
        .checkout()
        .checkout(state.cart(), "Calle 1, Santo Domingo", PaymentMethod::Card)
        .await
        .unwrap();

    assert_eq!(confirmation.item_count, 3);
    // 2 x 12.90 + 99.99
    assert_eq!(confirmation.total, Price::from_cents(12579));
    assert_eq!(state.format_price(confirmation.total), "$125.79");
    assert!(confirmation.order_id.as_str().starts_with(OrderId::PREFIX));

    assert_eq!(state.cart().count(), 0);
    assert!(CartRepository::new(&pool).list().await.unwrap().is_empty());
    assert_eq!(open_state(&pool).await.cart().count(), 0);
}

#[tokio::test]
async fn test_empty_cart_is_refused() {
    let pool = memory_pool().await;
    let state = open_state(&pool).await;

    let err = state
        .checkout()
        .checkout(state.cart(), "Calle 1", PaymentMethod::CashOnDelivery)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CheckoutFlowError::Rejected(CheckoutError::EmptyCart)
    ));
    assert!(AppError::from(err).is_user_error());
}

#[tokio::test]
async fn test_missing_address_keeps_persisted_cart() {
    let pool = memory_pool().await;
    let state = open_state(&pool).await;
    state.cart().add(&builtin(&state, "1"), None, 1).await.unwrap();

    let err = state
        .checkout()
        .checkout(state.cart(), "   ", PaymentMethod::Card)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CheckoutFlowError::Rejected(CheckoutError::MissingAddress)
    ));

    assert_eq!(state.cart().count(), 1);
    assert_eq!(CartRepository::new(&pool).list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_buy_now_with_fixed_order_ids() {
    let pool = memory_pool().await;
    let state = open_state(&pool).await;
    let controller = CheckoutController::with_order_ids(|| OrderId::from_number(777_001));

    let confirmation = controller
        .buy_now(
            state.cart(),
            &builtin(&state, "12"),
            None,
            1,
            "Av. Churchill 5",
            PaymentMethod::CashOnDelivery,
        )
        .await
        .unwrap();

    assert_eq!(confirmation.order_id.as_str(), "VS-777001");
    assert_eq!(confirmation.total, Price::from_cents(19999));
    assert_eq!(confirmation.payment_method, PaymentMethod::CashOnDelivery);
    assert!(CartRepository::new(&pool).list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_buy_now_blank_address_adds_nothing() {
    let pool = memory_pool().await;
    let state = open_state(&pool).await;

    let err = state
        .checkout()
        .buy_now(state.cart(), &builtin(&state, "12"), None, 1, "", PaymentMethod::Card)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CheckoutFlowError::Rejected(CheckoutError::MissingAddress)
    ));
    assert!(CartRepository::new(&pool).list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_order_ids_in_range() {
    let pool = memory_pool().await;
    let state = open_state(&pool).await;

    for _ in 0..5 {
        state.cart().add(&builtin(&state, "2"), None, 1).await.unwrap();
        let confirmation = state
            .checkout()
            .checkout(state.cart(), "Calle 1", PaymentMethod::Card)
            .await
            .unwrap();
        let number: u32 = confirmation
            .order_id
            .as_str()
            .trim_start_matches(OrderId::PREFIX)
            .parse()
            .unwrap();
        assert!((OrderId::MIN_NUMBER..=OrderId::MAX_NUMBER).contains(&number));
    }
}
