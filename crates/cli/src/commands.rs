//! Subcommand implementations.

pub mod cart;
pub mod draft;
pub mod favorites;
pub mod scans;

use std::sync::Arc;

use pocketshop_client_state::{ClientState, CountListener, Counts, StoreError};
use pocketshop_core::IdentityError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur while running a subcommand.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A JSON argument could not be parsed.
    #[error("Invalid {what} JSON: {source}")]
    InvalidJson {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// An ID argument was blank.
    #[error("Invalid id: {0}")]
    InvalidId(#[from] IdentityError),

    /// A `key=value` argument was malformed or names an unknown field.
    #[error("Invalid field: {0}")]
    InvalidField(String),

    /// A store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Favorites or cart could not be read.
    #[error("Badge counts unavailable, see log for the storage error")]
    CountsUnavailable,

    /// Output could not be encoded.
    #[error("Output error: {0}")]
    Output(#[source] serde_json::Error),
}

/// Parse a JSON command-line argument.
pub fn parse_json<T: DeserializeOwned>(what: &'static str, raw: &str) -> Result<T, CommandError> {
    serde_json::from_str(raw).map_err(|source| CommandError::InvalidJson { what, source })
}

/// Print a value as pretty JSON on stdout.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CommandError> {
    let out = serde_json::to_string_pretty(value).map_err(CommandError::Output)?;
    println!("{out}");
    Ok(())
}

/// Publish badge counts once through a printing listener.
pub async fn counts(state: &ClientState) -> Result<(), CommandError> {
    let listener: CountListener = Arc::new(|counts: Counts| {
        tracing::info!(
            favorites = counts.favorites,
            cart_quantity = counts.cart_quantity,
            "Badge counts"
        );
    });
    state.counts().subscribe(&listener);

    let published = state.counts().publish().await;
    state.counts().unsubscribe(&listener);

    match published {
        Some(counts) => print_json(&counts),
        None => Err(CommandError::CountsUnavailable),
    }
}
