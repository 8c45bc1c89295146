use std::fmt;

use async_trait::async_trait;

use crate::core::item::Item;

/// Errors that can occur while fetching an item.
/// Every variant means "not available"; none are retried automatically.
#[derive(Debug)]
pub enum FetchError {
    /// Transport failure (DNS, connection refused, TLS).
    Network(String),
    /// The API answered with a non-success status.
    Api { status: u16, message: String },
    /// The API answered `null`: no item with that id.
    NotFound(u64),
    /// The response body was not a valid item.
    Parse(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "network error: {msg}"),
            FetchError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            FetchError::NotFound(id) => write!(f, "item {id} not found"),
            FetchError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Read-only source of forum items.
#[async_trait]
pub trait ItemFetcher: Send + Sync {
    /// Returns the name of the source, for logs.
    fn name(&self) -> &str;

    /// Fetches one item by id. Issues exactly one request.
    async fn fetch_item(&self, id: u64) -> Result<Item, FetchError>;
}
