// src/fetch/client.rs
use super::{FetchedPage, Fetcher};
use crate::utils::error::FetchError;
use async_trait::async_trait;
use reqwest::header;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

// Default crawl identity
pub const DEFAULT_USER_AGENT: &str = "Mozilla/4.0 (compatible; MSIE 7.0; Windows NT 5.1)";
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 150;
const BACKOFF_BASE_MS: u64 = 500;
const BACKOFF_MAX_MS: u64 = 8_000;

#[derive(Debug, Clone)]
pub struct HttpFetcherOptions {
    pub user_agent: String,
    pub max_concurrent: usize,
    pub request_delay: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl Default for HttpFetcherOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_concurrent: 8,
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }
}

/// reqwest-backed fetcher with a concurrency cap, a politeness delay and
/// retries for transient failures.
pub struct HttpFetcher {
    client: reqwest::Client,
    permits: Arc<Semaphore>,
    options: HttpFetcherOptions,
}

impl HttpFetcher {
    pub fn new(options: HttpFetcherOptions) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(options.user_agent.as_str())
            .timeout(options.timeout)
            .build()?;

        Ok(Self {
            client,
            permits: Arc::new(Semaphore::new(options.max_concurrent.max(1))),
            options,
        })
    }

    async fn fetch_once(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        // Hold a permit for the whole request, delay included
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| FetchError::Closed)?;

        tokio::time::sleep(self.options.request_delay).await;

        let response = self
            .client
            .get(url.as_str())
            .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("HTTP error status: {} for URL: {}", status, url);
            if status == reqwest::StatusCode::FORBIDDEN {
                tracing::warn!("Received 403 Forbidden - check User-Agent and request rate.");
                return Err(FetchError::RateLimited);
            }
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(FetchError::NotFound(url.to_string()));
            }
            return Err(FetchError::Http(status));
        }

        let final_url = response.url().clone();
        let body = response.text().await?;
        tracing::debug!("Downloaded {} bytes from {}", body.len(), final_url);

        Ok(FetchedPage { url: final_url, body })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.fetch_once(url).await {
                Ok(page) => return Ok(page),
                Err(e) if e.is_transient() && attempt <= self.options.max_retries => {
                    let delay = backoff_delay(attempt);
                    tracing::warn!("Attempt {} for {} failed ({}); retrying in {:?}", attempt, url, e, delay);
                    tokio::time::sleep(delay).await;
                }
                Err(e) if e.is_transient() => {
                    tracing::error!("Giving up on {}: {}", url, e);
                    return Err(FetchError::RetriesExhausted {
                        url: url.to_string(),
                        attempts: attempt,
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Exponential backoff for the given 1-based attempt, capped.
pub fn backoff_delay(attempt: u32) -> Duration {
    let factor = 1u64 << attempt.saturating_sub(1).min(16);
    Duration::from_millis((BACKOFF_BASE_MS * factor).min(BACKOFF_MAX_MS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_and_caps() {
        assert_eq!(backoff_delay(1), Duration::from_millis(500));
        assert_eq!(backoff_delay(2), Duration::from_millis(1_000));
        assert_eq!(backoff_delay(3), Duration::from_millis(2_000));
        assert_eq!(backoff_delay(10), Duration::from_millis(8_000));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_millis(8_000));
    }

    #[tokio::test]
    async fn test_non_http_scheme_is_rejected_without_request() {
        let fetcher = HttpFetcher::new(HttpFetcherOptions::default()).unwrap();
        let url = Url::parse("ftp://www.sgg.ro/legislativ/").unwrap();
        let err = tokio_test::assert_err!(fetcher.fetch(&url).await);
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
