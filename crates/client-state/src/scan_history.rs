//! Tracking scan history.
//!
//! A bounded, most-recent-first log of tracking-code lookups. Entries are
//! unique by tracking code; when the log is full, new entries push the oldest
//! one out of the tail.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pocketshop_core::OrderData;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::clock::Clock;
use crate::document::Document;
use crate::error::{Result, StoreError};
use crate::keys;
use crate::kv::KeyValueStore;

/// Default maximum number of entries kept.
pub const DEFAULT_SCAN_HISTORY_LIMIT: usize = 50;

/// A recorded tracking lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanHistoryItem {
    pub tracking_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub scanned_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_data: Option<OrderData>,
}

/// A lookup to record; the store stamps the scan time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScan {
    pub tracking_code: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub order_data: Option<OrderData>,
}

impl NewScan {
    /// A scan of a bare tracking code.
    #[must_use]
    pub fn new(tracking_code: impl Into<String>) -> Self {
        Self {
            tracking_code: tracking_code.into(),
            ..Self::default()
        }
    }
}

/// Store for the scan history.
#[derive(Clone)]
pub struct ScanHistoryStore {
    doc: Document<Vec<ScanHistoryItem>>,
    clock: Arc<dyn Clock>,
    limit: usize,
}

impl ScanHistoryStore {
    /// Create a store keeping at most [`DEFAULT_SCAN_HISTORY_LIMIT`] entries.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_limit(kv, clock, DEFAULT_SCAN_HISTORY_LIMIT)
    }

    /// Create a store keeping at most `limit` entries (at least one).
    #[must_use]
    pub fn with_limit(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, limit: usize) -> Self {
        Self {
            doc: Document::new(kv, keys::SCAN_HISTORY),
            clock,
            limit: limit.max(1),
        }
    }

    /// Maximum number of entries kept.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// The history, most recent first.
    pub async fn list(&self) -> Vec<ScanHistoryItem> {
        self.doc.load_or_default().await
    }

    /// Look up one entry by tracking code.
    pub async fn get(&self, tracking_code: &str) -> Option<ScanHistoryItem> {
        let code = tracking_code.trim();
        self.list()
            .await
            .into_iter()
            .find(|item| item.tracking_code == code)
    }

    /// Record a lookup.
    ///
    /// A known tracking code is replaced where it stands with a fresh
    /// `scanned_at`; a new one goes to the head and the tail is trimmed to the
    /// limit. If the history cannot be read, nothing is written and an empty
    /// history is returned.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EmptyTrackingCode` if the code is blank.
    #[instrument(skip(self, scan), fields(tracking_code = %scan.tracking_code))]
    pub async fn add(&self, scan: NewScan) -> Result<Vec<ScanHistoryItem>> {
        let tracking_code = scan.tracking_code.trim().to_owned();
        if tracking_code.is_empty() {
            return Err(StoreError::EmptyTrackingCode);
        }

        let entry = ScanHistoryItem {
            tracking_code,
            order_id: scan.order_id,
            customer_name: scan.customer_name,
            status: scan.status,
            scanned_at: self.clock.now(),
            order_data: scan.order_data,
        };

        let Some(mut items) = self.doc.load_for_update().await else {
            return Ok(Vec::new());
        };
        if let Some(existing) = items
            .iter_mut()
            .find(|item| item.tracking_code == entry.tracking_code)
        {
            debug!("Refreshing existing scan");
            *existing = entry;
        } else {
            items.insert(0, entry);
            if items.len() > self.limit {
                debug!(evicted = items.len() - self.limit, "Trimming scan history");
                items.truncate(self.limit);
            }
        }

        self.doc.persist(&items).await;
        Ok(items)
    }

    /// Remove an entry. Unknown codes are a no-op, and so is an unreadable
    /// history.
    #[instrument(skip(self))]
    pub async fn remove(&self, tracking_code: &str) -> Vec<ScanHistoryItem> {
        let code = tracking_code.trim();
        let Some(mut items) = self.doc.load_for_update().await else {
            return Vec::new();
        };
        let before = items.len();
        items.retain(|item| item.tracking_code != code);

        if items.len() != before {
            self.doc.persist(&items).await;
        }
        items
    }

    /// Fill an entry's order summary from a fetched order.
    ///
    /// Copies the order reference, customer display name and status (keeping
    /// the previous value where the order has none), stores the order, and
    /// refreshes `scanned_at`. Unknown codes and an unreadable history are a
    /// no-op; nothing is created.
    #[instrument(skip(self, order_data))]
    pub async fn enrich_with_order_data(
        &self,
        tracking_code: &str,
        order_data: OrderData,
    ) -> Vec<ScanHistoryItem> {
        let code = tracking_code.trim();
        let Some(mut items) = self.doc.load_for_update().await else {
            return Vec::new();
        };
        let Some(item) = items.iter_mut().find(|item| item.tracking_code == code) else {
            debug!("No scan to enrich");
            return items;
        };

        if let Some(order_id) = order_data.reference() {
            item.order_id = Some(order_id);
        }
        if let Some(name) = order_data.customer_display_name() {
            item.customer_name = Some(name);
        }
        if let Some(status) = order_data.current_status() {
            item.status = Some(status);
        }
        item.order_data = Some(order_data);
        item.scanned_at = self.clock.now();

        self.doc.persist(&items).await;
        items
    }

    /// Remove the backing key.
    #[instrument(skip(self))]
    pub async fn clear(&self) {
        self.doc.clear().await;
    }
}
