//! Integration tests for filtering and sorting the built-in catalog.

#![allow(clippy::unwrap_used)]

use voidshop_core::{Category, FilterSpec, Price, PriceRange, SortOption};
use voidshop_integration_tests::new_product;
use voidshop_storefront::config::StorefrontConfig;
use voidshop_storefront::state::AppState;

fn names(state: &AppState, spec: &FilterSpec) -> Vec<String> {
    state
        .catalog()
        .query(spec)
        .into_iter()
        .map(|p| p.name)
        .collect()
}

fn state() -> AppState {
    AppState::in_memory(StorefrontConfig::in_memory())
}

#[test]
fn test_unrestricted_spec_returns_everything_in_order() {
    let state = state();
    let all = state.catalog().query(&FilterSpec::default());
    assert_eq!(all, state.catalog().list_products());
}

#[test]
fn test_query_matches_names_and_keywords_case_insensitively() {
    let state = state();
    assert_eq!(
        names(&state, &FilterSpec::default().with_query("  GAMING ")),
        vec!["Xbox Headset", "Razer DeathAdder Mouse"]
    );
    assert_eq!(
        names(&state, &FilterSpec::default().with_query("jordan")),
        vec!["Jordan 1 Sneakers"]
    );
    assert!(names(&state, &FilterSpec::default().with_query("zzz")).is_empty());
}

#[test]
fn test_categories_combine_with_query() {
    let state = state();
    let spec = FilterSpec::default()
        .with_query("shoes")
        .with_category(Category::Footwear)
        .with_category(Category::Kitchen);
    assert_eq!(
        names(&state, &spec),
        vec!["Jordan 1 Sneakers", "Salvatore Dress Shoes"]
    );
}

#[test]
fn test_price_range_is_clamped_to_catalog_bounds() {
    let state = state();
    let spec = FilterSpec::default()
        .with_price_range(PriceRange::new(Price::ZERO, Price::from_cents(1200)))
        .sorted_by(SortOption::PriceAsc);
    assert_eq!(
        names(&state, &spec),
        vec!["Xbox Headset", "Sleeveless Tee White"]
    );

    let inverted = FilterSpec::default().with_price_range(PriceRange::new(
        Price::from_cents(50_000),
        Price::from_cents(100),
    ));
    assert_eq!(names(&state, &inverted).len(), 12);
}

#[test]
fn test_price_desc_is_stable() {
    let state = state();
    let spec = FilterSpec::default().sorted_by(SortOption::PriceDesc);
    let sorted = names(&state, &spec);
    assert_eq!(sorted.first().map(String::as_str), Some("23K Gold Chain"));
    // Both 99.99; catalog order is kept
    assert_eq!(
        sorted.get(1..3).unwrap(),
        ["Napi Knife", "Sterling Silver 925 Bracelet"]
    );
}

#[tokio::test]
async fn test_name_sort_includes_user_products() {
    let state = state();
    state
        .catalog()
        .add_product(new_product("aardvark plush", "5", Category::Games, &[]))
        .await
        .unwrap();

    let spec = FilterSpec::default()
        .with_category(Category::Games)
        .sorted_by(SortOption::Name);
    assert_eq!(
        names(&state, &spec),
        vec![
            "aardvark plush",
            "Keymove K61SE Keyboard",
            "Razer DeathAdder Mouse",
            "Xbox Headset",
        ]
    );
}
