// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode),

    #[error("Rate limit likely exceeded")]
    RateLimited,

    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Fetcher is shut down")]
    Closed,

    #[error("Giving up on {url} after {attempts} attempts")]
    RetriesExhausted { url: String, attempts: u32 },
}

#[derive(Error, Debug)]
pub enum ExtractError {
    /// The page lacks the structure needed to attribute its rows.
    #[error("Malformed page: {0}")]
    MalformedPage(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}

impl FetchError {
    /// Whether another attempt at the same URL could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            FetchError::Http(status) => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}
