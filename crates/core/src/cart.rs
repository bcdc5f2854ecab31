//! The cart line state machine.
//!
//! A cart holds at most one [`CartLine`] per [`CartKey`] (product id plus
//! optional variant). Lines move through these states:
//!
//! | From | Operation | To |
//! |------|-----------|----|
//! | absent | `add(n)` | present(n) |
//! | present(n) | `add(m)` | present(n + m) |
//! | present(n > 1) | `remove_one` | present(n - 1) |
//! | present(1) | `remove_one` | absent |
//! | present(n) | `remove_line` | absent |
//! | any | `clear` | absent |
//!
//! [`CartLines`] is plain data. Persistence and change publication live in the
//! storefront crate, which applies each [`LineChange`] to its store.

use serde::{Deserialize, Serialize};

use crate::product::{ImageRef, Product};
use crate::types::{Price, ProductId, Quantity};

/// Identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CartKey {
    pub product_id: ProductId,
    pub variant: Option<String>,
}

impl CartKey {
    /// Build a key. A blank variant is treated as no variant.
    #[must_use]
    pub fn new(product_id: ProductId, variant: Option<&str>) -> Self {
        let variant = variant
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned);
        Self {
            product_id,
            variant,
        }
    }
}

/// One row in the cart: a (product, variant) pair and its quantity.
///
/// Name, price and image are captured from the product when it is added, so
/// the line total does not follow later catalog changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub variant: Option<String>,
    pub name: String,
    pub unit_price: Price,
    pub image: ImageRef,
    pub quantity: Quantity,
}

impl CartLine {
    /// The key this line is stored under.
    #[must_use]
    pub fn key(&self) -> CartKey {
        CartKey {
            product_id: self.product_id.clone(),
            variant: self.variant.clone(),
        }
    }

    /// Returns true if this line is stored under `key`.
    #[must_use]
    pub fn has_key(&self, key: &CartKey) -> bool {
        self.product_id == key.product_id && self.variant == key.variant
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity.get())
    }

    /// Display label, e.g. `Oversize Tee · Size M`.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.variant {
            Some(variant) => format!("{} · Size {variant}", self.name),
            None => self.name.clone(),
        }
    }
}

/// What a mutation did to a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineChange {
    /// A new line was created.
    Inserted(CartLine),
    /// An existing line now has this state.
    Updated(CartLine),
    /// The line was removed; this was its last state.
    Removed(CartLine),
    /// Nothing changed (the key was absent).
    Unchanged,
}

impl LineChange {
    /// Returns true unless the change is [`LineChange::Unchanged`].
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Immutable view of a cart, published to observers after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    /// Sum of all line quantities.
    pub count: u64,
    /// Sum of all line totals.
    pub total: Price,
}

impl CartSnapshot {
    /// Returns true if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Ordered cart lines, at most one per key, in order of first add.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartLines {
    lines: Vec<CartLine>,
}

impl CartLines {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from stored lines, merging any duplicate keys into the
    /// first occurrence.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            match cart.position(&line.key()) {
                Some(index) => {
                    if let Some(existing) = cart.lines.get_mut(index) {
                        existing.quantity = existing.quantity.saturating_add(line.quantity);
                    }
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }

    fn position(&self, key: &CartKey) -> Option<usize> {
        self.lines.iter().position(|line| line.has_key(key))
    }

    /// Add `quantity` units of `product` under `variant`, creating the line if
    /// needed. The product's current name, price and image become the line's
    /// snapshot.
    pub fn add(&mut self, product: &Product, variant: Option<&str>, quantity: Quantity) -> LineChange {
        let key = CartKey::new(product.id.clone(), variant);

        if let Some(line) = self
            .position(&key)
            .and_then(|index| self.lines.get_mut(index))
        {
            line.quantity = line.quantity.saturating_add(quantity);
            line.name.clone_from(&product.name);
            line.unit_price = product.price;
            line.image = product.image.clone();
            return LineChange::Updated(line.clone());
        }

        let line = CartLine {
            product_id: key.product_id,
            variant: key.variant,
            name: product.name.clone(),
            unit_price: product.price,
            image: product.image.clone(),
            quantity,
        };
        self.lines.push(line.clone());
        LineChange::Inserted(line)
    }

    /// Take one unit off the line under `key`, removing the line at zero.
    /// Absent keys are a no-op.
    pub fn remove_one(&mut self, key: &CartKey) -> LineChange {
        let Some(index) = self.position(key) else {
            return LineChange::Unchanged;
        };
        let Some(line) = self.lines.get_mut(index) else {
            return LineChange::Unchanged;
        };

        match line.quantity.decremented() {
            Some(quantity) => {
                line.quantity = quantity;
                LineChange::Updated(line.clone())
            }
            None => LineChange::Removed(self.lines.remove(index)),
        }
    }

    /// Remove the line under `key` regardless of its quantity. Absent keys are
    /// a no-op.
    pub fn remove_line(&mut self, key: &CartKey) -> LineChange {
        match self.position(key) {
            Some(index) => LineChange::Removed(self.lines.remove(index)),
            None => LineChange::Unchanged,
        }
    }

    /// Remove every line, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.lines.len();
        self.lines.clear();
        removed
    }

    /// The line stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &CartKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.has_key(key))
    }

    /// Lines in order of first add.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Returns true if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }

    /// Sum of all line totals, computed in exact decimal arithmetic.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Snapshot for observers and display.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self.lines.clone(),
            count: self.count(),
            total: self.total(),
        }
    }
}
