//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use uuid::Uuid;

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use voidshop_core::define_id;
/// define_id!(SkuId);
/// define_id!(WarehouseId);
///
/// let sku = SkuId::new("SKU-1");
/// let warehouse = WarehouseId::new("SKU-1");
/// assert_eq!(sku.as_str(), warehouse.as_str());
///
/// // These are different types, so this won't compile:
/// // let _: SkuId = warehouse;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(OrderId);

impl ProductId {
    /// Prefix carried by every user-created product id.
    ///
    /// Built-in catalog ids are plain numbers, so the prefix keeps the two
    /// namespaces disjoint.
    pub const USER_PREFIX: &'static str = "U-";

    /// Generate a fresh id for a user-created product.
    #[must_use]
    pub fn generate_user() -> Self {
        Self(format!("{}{}", Self::USER_PREFIX, Uuid::new_v4()))
    }

    /// Returns true if this id was generated for a user-created product.
    #[must_use]
    pub fn is_user_defined(&self) -> bool {
        self.0.starts_with(Self::USER_PREFIX)
    }
}

impl OrderId {
    /// Prefix shown on every order number.
    pub const PREFIX: &'static str = "VS-";

    /// Smallest order number handed out.
    pub const MIN_NUMBER: u32 = 100_000;

    /// Largest order number handed out.
    pub const MAX_NUMBER: u32 = 999_999;

    /// Build an order id from its numeric part (e.g. `VS-482913`).
    #[must_use]
    pub fn from_number(number: u32) -> Self {
        Self(format!("{}{number}", Self::PREFIX))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_ids_are_prefixed_and_unique() {
        let a = ProductId::generate_user();
        let b = ProductId::generate_user();
        assert!(a.is_user_defined());
        assert!(a.as_str().starts_with("U-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_builtin_ids_are_not_user_defined() {
        assert!(!ProductId::new("7").is_user_defined());
    }

    #[test]
    fn test_order_id_format() {
        assert_eq!(OrderId::from_number(482_913).as_str(), "VS-482913");
    }

    #[test]
    fn test_serde_transparent() {
        let id = ProductId::new("12");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"12\"");
        let parsed: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
