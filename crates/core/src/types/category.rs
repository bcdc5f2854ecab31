//! Product categories.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown category name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// The fixed set of catalog categories.
///
/// Stored and serialized as the SCREAMING_SNAKE_CASE name (`"GAMES"`).
/// Deserializing accepts any case, same as [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum Category {
    Games,
    Clothing,
    Kitchen,
    Footwear,
    Jewelry,
}

impl Category {
    /// Every category, in catalog display order.
    pub const ALL: [Self; 5] = [
        Self::Games,
        Self::Clothing,
        Self::Kitchen,
        Self::Footwear,
        Self::Jewelry,
    ];

    /// The stored name of this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Games => "GAMES",
            Self::Clothing => "CLOTHING",
            Self::Kitchen => "KITCHEN",
            Self::Footwear => "FOOTWEAR",
            Self::Jewelry => "JEWELRY",
        }
    }

    /// Human-readable label for filter chips.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Games => "Games",
            Self::Clothing => "Clothing",
            Self::Kitchen => "Kitchen",
            Self::Footwear => "Footwear",
            Self::Jewelry => "Jewelry",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CategoryError(s.to_owned()))
    }
}

impl TryFrom<String> for Category {
    type Error = CategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
