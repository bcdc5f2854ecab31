//! Catalog query engine.
//!
//! [`apply`] turns the full product list and a [`FilterSpec`] into the visible
//! list. It is a pure function, recomputed whenever the catalog or the filter
//! changes.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{Category, Price};

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Keep catalog order.
    #[default]
    None,
    PriceAsc,
    PriceDesc,
    /// Case-insensitive by name, ties broken by id.
    Name,
}

impl SortOption {
    /// Every sort option, in the order they are offered.
    pub const ALL: [Self; 4] = [Self::None, Self::PriceAsc, Self::PriceDesc, Self::Name];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "Relevance",
            Self::PriceAsc => "Price ↑",
            Self::PriceDesc => "Price ↓",
            Self::Name => "Name",
        }
    }

    /// The name accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Name => "name",
        }
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|opt| opt.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("invalid sort option: {s} (expected none, price-asc, price-desc or name)"))
    }
}

/// An inclusive price interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Price,
    pub max: Price,
}

impl PriceRange {
    /// Create a range. The ends are kept as given; an inverted range is
    /// resolved by [`PriceRange::clamp_to`].
    #[must_use]
    pub const fn new(min: Price, max: Price) -> Self {
        Self { min, max }
    }

    /// The smallest range covering every product price, or `None` for an empty
    /// catalog.
    #[must_use]
    pub fn bounds_of(products: &[Product]) -> Option<Self> {
        let min = products.iter().map(|p| p.price).min()?;
        let max = products.iter().map(|p| p.price).max()?;
        Some(Self { min, max })
    }

    /// Returns true if the range spans a single price.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.min >= self.max
    }

    /// Returns true if `price` lies inside the range, ends included.
    #[must_use]
    pub fn contains(&self, price: Price) -> bool {
        self.min <= price && price <= self.max
    }

    /// Clamp both ends into `bounds`. If the clamped ends cross, the full
    /// bounds are returned.
    #[must_use]
    pub fn clamp_to(&self, bounds: &Self) -> Self {
        let min = self.min.clamp(bounds.min, bounds.max);
        let max = self.max.clamp(bounds.min, bounds.max);
        if min <= max { Self { min, max } } else { *bounds }
    }
}

/// Search, category, price and sort criteria for the catalog view.
///
/// `FilterSpec::default()` is the "reset filters" state and shows the whole
/// catalog in its natural order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Matched case-insensitively against names and keywords.
    pub query: String,
    /// Empty means every category.
    pub categories: BTreeSet<Category>,
    /// `None` means no price restriction.
    pub price_range: Option<PriceRange>,
    pub sort: SortOption,
}

impl FilterSpec {
    /// Set the search query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Restrict to `category` (in addition to any already selected).
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.insert(category);
        self
    }

    /// Restrict to a price range.
    #[must_use]
    pub const fn with_price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    /// Set the sort order.
    #[must_use]
    pub const fn sorted_by(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Select `category` if it is not selected, otherwise deselect it.
    pub fn toggle_category(&mut self, category: Category) {
        if !self.categories.remove(&category) {
            self.categories.insert(category);
        }
    }

    /// Returns true if the spec shows the whole catalog in natural order.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.query.trim().is_empty()
            && self.categories.is_empty()
            && self.price_range.is_none()
            && self.sort == SortOption::None
    }
}

/// Produce the visible product list for `spec`.
///
/// Price bounds come from the full, unfiltered catalog. The requested range
/// is clamped into those bounds before filtering. When every product has the
/// same price the price step keeps everything.
#[must_use]
pub fn apply(products: &[Product], spec: &FilterSpec) -> Vec<Product> {
    let needle = spec.query.trim().to_lowercase();
    let price_window = effective_price_range(products, spec.price_range.as_ref());

    let mut visible: Vec<Product> = products
        .iter()
        .filter(|p| needle.is_empty() || p.matches_query(&needle))
        .filter(|p| spec.categories.is_empty() || spec.categories.contains(&p.category))
        .filter(|p| price_window.is_none_or(|range| range.contains(p.price)))
        .cloned()
        .collect();

    // `sort_by` and `sort_by_cached_key` are stable, so equal keys keep their
    // catalog order.
    match spec.sort {
        SortOption::None => {}
        SortOption::PriceAsc => visible.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOption::PriceDesc => visible.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOption::Name => {
            visible.sort_by_cached_key(|p| (p.name.to_lowercase(), p.id.clone()));
        }
    }

    visible
}

/// The price window actually applied, or `None` when price does not restrict.
fn effective_price_range(products: &[Product], requested: Option<&PriceRange>) -> Option<PriceRange> {
    let requested = requested?;
    let bounds = PriceRange::bounds_of(products)?;
    if bounds.is_degenerate() {
        return None;
    }
    Some(requested.clamp_to(&bounds))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::product::ImageRef;
    use crate::types::ProductId;

    fn product(id: &str, name: &str, price: &str, category: Category, keywords: &[&str]) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            price: price.parse().unwrap(),
            image: ImageRef::placeholder(),
            category,
            keywords: keywords.iter().map(|k| (*k).to_owned()).collect(),
            variants: Vec::new(),
        }
    }

    fn price(s: &str) -> Price {
        s.parse().unwrap()
    }

    fn range(min: &str, max: &str) -> PriceRange {
        PriceRange::new(price(min), price(max))
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    fn four_prices() -> Vec<Product> {
        vec![
            product("a", "Alpha", "5", Category::Games, &[]),
            product("b", "Bravo", "10", Category::Games, &[]),
            product("c", "Charlie", "15", Category::Kitchen, &[]),
            product("d", "Delta", "20", Category::Kitchen, &[]),
        ]
    }

    #[test]
    fn test_default_spec_returns_everything_in_order() {
        let products = four_prices();
        let visible = apply(&products, &FilterSpec::default());
        assert_eq!(ids(&visible), ["a", "b", "c", "d"]);
        assert!(FilterSpec::default().is_unrestricted());
    }

    #[test]
    fn test_price_range_inclusive() {
        let products = four_prices();
        let spec = FilterSpec::default().with_price_range(range("10", "15"));
        assert_eq!(ids(&apply(&products, &spec)), ["b", "c"]);
    }

    #[test]
    fn test_price_range_clamped_to_catalog_bounds() {
        let products = four_prices();

        let wide = FilterSpec::default().with_price_range(range("0", "1000"));
        assert_eq!(apply(&products, &wide).len(), 4);

        let upper = FilterSpec::default().with_price_range(range("12", "1000"));
        assert_eq!(ids(&apply(&products, &upper)), ["c", "d"]);

        let below = FilterSpec::default().with_price_range(range("0", "10"));
        assert_eq!(ids(&apply(&products, &below)), ["a", "b"]);
    }

    #[test]
    fn test_inverted_range_falls_back_to_bounds() {
        let clamped = range("15", "10").clamp_to(&range("5", "20"));
        assert_eq!(clamped, range("5", "20"));
    }

    #[test]
    fn test_degenerate_bounds_do_not_exclude() {
        let products = vec![
            product("a", "Alpha", "7", Category::Games, &[]),
            product("b", "Bravo", "7", Category::Games, &[]),
        ];
        let spec = FilterSpec::default().with_price_range(range("100", "200"));
        assert_eq!(apply(&products, &spec).len(), 2);
    }

    #[test]
    fn test_empty_catalog() {
        let spec = FilterSpec::default()
            .with_query("x")
            .with_price_range(range("1", "2"));
        assert!(apply(&[], &spec).is_empty());
        assert!(PriceRange::bounds_of(&[]).is_none());
    }

    #[test]
    fn test_query_matches_name_or_keyword_case_insensitive() {
        let products = vec![
            product("1", "Xbox Headset", "10.99", Category::Games, &["audio", "gaming"]),
            product("2", "Razer Mouse", "15.49", Category::Games, &["GAMING"]),
            product("3", "Chef Knife", "99.99", Category::Kitchen, &["kitchen"]),
        ];

        let spec = FilterSpec::default().with_query("  Gaming ");
        assert_eq!(ids(&apply(&products, &spec)), ["1", "2"]);

        let spec = FilterSpec::default().with_query("KNIFE");
        assert_eq!(ids(&apply(&products, &spec)), ["3"]);

        let spec = FilterSpec::default().with_query("   ");
        assert_eq!(apply(&products, &spec).len(), 3);
    }

    #[test]
    fn test_category_filter() {
        let products = four_prices();
        let spec = FilterSpec::default().with_category(Category::Kitchen);
        assert_eq!(ids(&apply(&products, &spec)), ["c", "d"]);
    }

    #[test]
    fn test_toggle_category() {
        let mut spec = FilterSpec::default();
        spec.toggle_category(Category::Games);
        assert!(spec.categories.contains(&Category::Games));
        spec.toggle_category(Category::Games);
        assert!(spec.categories.is_empty());
    }

    #[test]
    fn test_price_bounds_use_full_catalog() {
        // The query removes the cheapest product, but bounds still start at 5,
        // so a request for [0, 12] keeps "b" only.
        let products = four_prices();
        let spec = FilterSpec::default()
            .with_query("bravo")
            .with_price_range(range("0", "12"));
        assert_eq!(ids(&apply(&products, &spec)), ["b"]);
    }

    #[test]
    fn test_price_sort_is_stable() {
        let products = vec![
            product("x", "Xylophone", "10", Category::Games, &[]),
            product("y", "Yoyo", "5", Category::Games, &[]),
            product("z", "Zither", "10", Category::Games, &[]),
        ];

        let asc = FilterSpec::default().sorted_by(SortOption::PriceAsc);
        assert_eq!(ids(&apply(&products, &asc)), ["y", "x", "z"]);

        let desc = FilterSpec::default().sorted_by(SortOption::PriceDesc);
        assert_eq!(ids(&apply(&products, &desc)), ["x", "z", "y"]);
    }

    #[test]
    fn test_name_sort_case_insensitive_with_id_tiebreak() {
        let products = vec![
            product("2", "banana", "1", Category::Kitchen, &[]),
            product("3", "Apple", "1", Category::Kitchen, &[]),
            product("1", "Banana", "1", Category::Kitchen, &[]),
        ];
        let spec = FilterSpec::default().sorted_by(SortOption::Name);
        assert_eq!(ids(&apply(&products, &spec)), ["3", "1", "2"]);
    }

    #[test]
    fn test_sort_option_parse() {
        assert_eq!("price-asc".parse::<SortOption>().unwrap(), SortOption::PriceAsc);
        assert_eq!("NAME".parse::<SortOption>().unwrap(), SortOption::Name);
        assert!("cheapest".parse::<SortOption>().is_err());
    }
}
