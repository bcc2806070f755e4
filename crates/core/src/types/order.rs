//! Order records returned by a tracking lookup.
//!
//! The store only needs a short summary of an order to enrich a scan history
//! entry: its ID, the customer to show, and the current status. The full record
//! is kept as-is so the detail screen can render from history without a refetch.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::identity::{deserialize_opt_id, resolve_identity};

/// An order as returned by the tracking lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderData {
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub order_id: Option<String>,
    #[serde(
        default,
        alias = "order_number",
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub order_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulfillment_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<OrderCustomer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<OrderAddress>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Customer block of an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Shipping address block of an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderData {
    /// The order reference shown to the user (`orderId`, then `id`, then `orderNumber`).
    #[must_use]
    pub fn reference(&self) -> Option<String> {
        resolve_identity([
            self.order_id.as_deref(),
            self.id.as_deref(),
            self.order_number.as_deref(),
        ])
    }

    /// The order status, falling back to the fulfillment status.
    #[must_use]
    pub fn current_status(&self) -> Option<String> {
        resolve_identity([self.status.as_deref(), self.fulfillment_status.as_deref()])
    }

    /// Name to display for the customer.
    ///
    /// Tries "first last", then the customer's full name, then the shipping
    /// recipient, then the customer's email.
    #[must_use]
    pub fn customer_display_name(&self) -> Option<String> {
        let customer = self.customer.as_ref();

        let joined = customer.map(|c| {
            [c.first_name.as_deref(), c.last_name.as_deref()]
                .into_iter()
                .flatten()
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        });

        resolve_identity([
            joined.as_deref(),
            customer.and_then(|c| c.name.as_deref()),
            self.shipping_address.as_ref().and_then(|a| a.name.as_deref()),
            customer.and_then(|c| c.email.as_deref()),
        ])
    }
}
