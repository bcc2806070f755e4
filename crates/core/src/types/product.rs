//! Catalog records as seen by the client-state store.
//!
//! Products and variants come from the remote catalog with many more fields
//! than the store needs. Only identity fields, the display name and the price
//! are typed; the rest is kept in `extra` and written back verbatim.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::identity::{ProductIdentity, VariantIdentity, deserialize_opt_id, resolve_identity};

/// A catalog product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Primary catalog ID.
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Legacy document ID (`_id` in older payloads).
    #[serde(
        default,
        alias = "_id",
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub alt_id: Option<String>,
    /// Stable UUID.
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub uuid: Option<String>,
    /// URL slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unit price. Missing prices count as zero.
    #[serde(default)]
    pub price: Decimal,
    /// Fields the store does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Create a product with a primary ID and a price.
    #[must_use]
    pub fn new(id: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: Some(id.into()),
            price,
            ..Self::default()
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Resolve the product identity (`id`, then `_id`, then `uuid`, then `slug`).
    #[must_use]
    pub fn identity(&self) -> Option<ProductIdentity> {
        resolve_identity([
            self.id.as_deref(),
            self.alt_id.as_deref(),
            self.uuid.as_deref(),
            self.slug.as_deref(),
        ])
        .and_then(|id| ProductIdentity::parse(id).ok())
    }

    /// Whether this product resolves to the given identity.
    #[must_use]
    pub fn has_identity(&self, identity: &ProductIdentity) -> bool {
        self.identity().as_ref() == Some(identity)
    }
}

/// A purchasable variant of a product (size, color, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(
        default,
        alias = "_id",
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub alt_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Price override; the product price applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Variant {
    /// Create a variant with a primary ID and no price override.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Set a price override.
    #[must_use]
    pub const fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Resolve the variant identity with the same precedence as products.
    #[must_use]
    pub fn identity(&self) -> Option<VariantIdentity> {
        resolve_identity([
            self.id.as_deref(),
            self.alt_id.as_deref(),
            self.uuid.as_deref(),
            self.slug.as_deref(),
        ])
        .and_then(|id| VariantIdentity::parse(id).ok())
    }
}

/// Unit price of a product, honoring a variant price override.
#[must_use]
pub fn unit_price(product: &Product, variant: Option<&Variant>) -> Decimal {
    variant
        .and_then(|variant| variant.price)
        .unwrap_or(product.price)
}
