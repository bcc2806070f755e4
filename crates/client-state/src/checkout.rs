//! Checkout form draft.
//!
//! Remembers what the user last typed into the checkout form so the next
//! checkout can be prefilled. The free-text order note is never stored, and
//! empty fields are left out entirely.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::document::Document;
use crate::keys;
use crate::kv::KeyValueStore;

/// The checkout form as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub alternate_phone: String,
    pub address: String,
    pub landmark: String,
    /// Free-text note for the courier. Not persisted.
    pub notes: String,
}

/// Sparse snapshot of the persisted checkout fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

impl From<&CheckoutForm> for CheckoutDraft {
    fn from(form: &CheckoutForm) -> Self {
        Self {
            full_name: non_empty(&form.full_name),
            email: non_empty(&form.email),
            phone: non_empty(&form.phone),
            alternate_phone: non_empty(&form.alternate_phone),
            address: non_empty(&form.address),
            landmark: non_empty(&form.landmark),
        }
    }
}

impl CheckoutDraft {
    /// Whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// A form prefilled from the draft, with an empty note.
    #[must_use]
    pub fn to_form(&self) -> CheckoutForm {
        CheckoutForm {
            full_name: self.full_name.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            phone: self.phone.clone().unwrap_or_default(),
            alternate_phone: self.alternate_phone.clone().unwrap_or_default(),
            address: self.address.clone().unwrap_or_default(),
            landmark: self.landmark.clone().unwrap_or_default(),
            notes: String::new(),
        }
    }
}

/// Store for the checkout draft.
#[derive(Clone)]
pub struct CheckoutDraftStore {
    doc: Document<CheckoutDraft>,
}

impl CheckoutDraftStore {
    /// Create a store over the given persistence port.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            doc: Document::new(kv, keys::CHECKOUT_DRAFT),
        }
    }

    /// The saved draft, or an empty draft.
    pub async fn get(&self) -> CheckoutDraft {
        self.doc.load_or_default().await
    }

    /// Replace the saved draft with the allowlisted, non-empty form fields.
    #[instrument(skip_all)]
    pub async fn save(&self, form: &CheckoutForm) -> CheckoutDraft {
        let draft = CheckoutDraft::from(form);
        self.doc.persist(&draft).await;
        draft
    }

    /// Remove the backing key.
    #[instrument(skip(self))]
    pub async fn clear(&self) {
        self.doc.clear().await;
    }
}
