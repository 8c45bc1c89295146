pub mod client;
pub mod fetcher;
pub mod html;

pub use client::HnClient;
pub use fetcher::{FetchError, ItemFetcher};
pub use html::html_to_text;
