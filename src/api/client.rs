//! Hacker News Firebase API client.
//!
//! `GET {base_url}/item/{id}.json` returns the item, or the literal `null`
//! when the id does not exist.

use async_trait::async_trait;
use log::{debug, warn};

use super::fetcher::{FetchError, ItemFetcher};
use crate::core::item::Item;

pub const DEFAULT_API_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";

pub struct HnClient {
    base_url: String,
    client: reqwest::Client,
}

impl HnClient {
    pub fn new(base_url: Option<String>) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn item_url(&self, id: u64) -> String {
        format!("{}/item/{}.json", self.base_url, id)
    }
}

#[async_trait]
impl ItemFetcher for HnClient {
    fn name(&self) -> &str {
        "hacker-news"
    }

    async fn fetch_item(&self, id: u64) -> Result<Item, FetchError> {
        let url = self.item_url(id);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("HN API error for item {}: {} - {}", id, status, message);
            return Err(FetchError::Api { status, message });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let item: Option<Item> =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;
        item.ok_or(FetchError::NotFound(id))
    }
}
