//! Resolved identities for catalog records.
//!
//! Catalog payloads are not consistent about which field carries the key of a
//! record: some have a primary `id`, older ones only a legacy `_id`, some only a
//! `uuid` or a `slug`. [`resolve_identity`] picks the first usable one so that
//! the same record always maps to the same key.
//!
//! Use the `define_identity!` macro to create type-safe identity wrappers that
//! prevent accidentally comparing a product key against a variant key.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Errors that can occur when constructing an identity from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The identity string is empty or whitespace.
    #[error("identity cannot be empty")]
    Empty,
}

/// Macro to define a type-safe identity wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `parse()`, `as_str()`, `into_inner()`
/// - `Display`, `FromStr` and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use pocketshop_core::define_identity;
/// define_identity!(StoreIdentity);
///
/// let id = StoreIdentity::parse("store-1").unwrap();
/// assert_eq!(id.as_str(), "store-1");
/// assert!(StoreIdentity::parse("  ").is_err());
/// ```
#[macro_export]
macro_rules! define_identity {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse an identity, trimming surrounding whitespace.
            ///
            /// # Errors
            ///
            /// Returns `IdentityError::Empty` if nothing is left after trimming.
            pub fn parse(
                s: impl AsRef<str>,
            ) -> ::core::result::Result<Self, $crate::types::identity::IdentityError> {
                let trimmed = s.as_ref().trim();
                if trimmed.is_empty() {
                    return Err($crate::types::identity::IdentityError::Empty);
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Get the identity as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the inner string.
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

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::identity::IdentityError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_identity!(ProductIdentity);
define_identity!(VariantIdentity);

/// Pick the first usable identity candidate.
///
/// Candidates are tried in precedence order (primary id, alternate id, uuid,
/// slug). A candidate is usable when it is present and not blank. The chosen
/// value is trimmed.
#[must_use]
pub fn resolve_identity<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .map(str::to_owned)
}

/// Uniqueness key of a cart line.
///
/// Two lines for the same product but different variants are distinct; a line
/// without a variant never merges with one that has a variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    /// Identity of the product.
    pub product: ProductIdentity,
    /// Identity of the selected variant, if any.
    pub variant: Option<VariantIdentity>,
}

impl LineKey {
    /// Create a new line key.
    #[must_use]
    pub const fn new(product: ProductIdentity, variant: Option<VariantIdentity>) -> Self {
        Self { product, variant }
    }
}

/// Deserialize an optional identifier that may arrive as a JSON string or number.
///
/// Numbers are kept in their canonical decimal form so `42` and `"42"` resolve
/// to the same identity.
pub(crate) fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(
        Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }),
    )
}
