// src/fetch/mod.rs
pub mod client;

use crate::utils::error::FetchError;
use async_trait::async_trait;
use url::Url;

pub use client::{HttpFetcher, HttpFetcherOptions};

/// A page body as served, with the URL it ended up at after redirects.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,
    pub body: String,
}

/// Turns URLs into page bodies. Implementations own their concurrency,
/// retry and timeout policy.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}
