//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
/// - A `Display` impl printing the raw number (used in URLs and filenames)
///
/// # Example
///
/// ```rust
/// # use wheels_core::define_id;
/// define_id!(BikeId);
/// define_id!(RentalId);
///
/// let bike_id = BikeId::new(1);
/// let rental_id = RentalId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: BikeId = rental_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>().map(Self)
            }
        }
    };
}

define_id!(BikeId);
define_id!(CustomerId);
define_id!(RentalId);
define_id!(SaleId);

/// Assert that the ID types serialize transparently (the remote API sends
/// bare numbers, not objects).
#[allow(dead_code)]
fn _serde_assertions() {
    fn assert_serde<T: Serialize + for<'de> Deserialize<'de>>() {}
    assert_serde::<BikeId>();
    assert_serde::<CustomerId>();
    assert_serde::<RentalId>();
    assert_serde::<SaleId>();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = BikeId::new(42);
        assert_eq!(id.as_i64(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(BikeId::from(42), id);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(RentalId::new(7).to_string(), "7");
    }

    #[test]
    fn test_id_serde_transparent() {
        let id: CustomerId = serde_json::from_str("15").unwrap();
        assert_eq!(id, CustomerId::new(15));
        assert_eq!(serde_json::to_string(&id).unwrap(), "15");
    }

    #[test]
    fn test_id_from_str() {
        let id: SaleId = "99".parse().unwrap();
        assert_eq!(id, SaleId::new(99));
        assert!("abc".parse::<SaleId>().is_err());
    }
}
