//! Store error types.
//!
//! Only validation failures reach callers of mutating operations. Storage and
//! encoding failures are logged by the stores and degraded to the best
//! in-memory result; they surface as errors only from the fallible `load`
//! accessors used by the count notifier.

use thiserror::Error;

use crate::kv::StorageError;

/// Client-state store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The persistence port rejected an operation.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A value could not be serialized for persistence.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// A cart quantity must be a positive integer.
    #[error("Invalid quantity: {0} (must be at least 1)")]
    InvalidQuantity(u32),

    /// The product or variant has no usable identity field.
    #[error("Record has no id, _id, uuid or slug")]
    MissingIdentity,

    /// A cart line or total does not fit in a `Decimal`.
    #[error("Cart amount overflowed")]
    AmountOverflow,

    /// A scan must carry a tracking code.
    #[error("Tracking code cannot be empty")]
    EmptyTrackingCode,
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;
