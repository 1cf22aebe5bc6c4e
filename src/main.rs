// src/main.rs
mod crawler;
mod extractors;
mod fetch;
mod models;
mod storage;
mod utils;

use clap::Parser;
use crawler::{config, CrawlConfig, Crawler};
use fetch::{client, HttpFetcher, HttpFetcherOptions};
use std::sync::Arc;
use std::time::Duration;
use storage::{MemoryStore, SqliteStore};
use utils::AppError;

/// Crawls the public consultation index and stores every listed draft regulation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Index page listing the category pages
    #[arg(long, default_value = config::INDEX_URL)]
    index_url: String,

    /// Value stored in the `institution` field of every record
    #[arg(long, default_value = config::DEFAULT_INSTITUTION)]
    institution: String,

    /// Substring that marks a link as a category page
    #[arg(long, default_value = config::CATEGORY_MARKER)]
    category_marker: String,

    /// CSS selector of the pagination block on category pages
    #[arg(long, default_value = config::PAGINATION_SELECTOR)]
    pagination_selector: String,

    /// SQLite database the records are upserted into
    #[arg(long, default_value = "data.sqlite")]
    db: String,

    /// User-Agent header sent with every request
    #[arg(long, default_value = client::DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Maximum number of requests in flight
    #[arg(long, default_value = "8")]
    concurrency: usize,

    /// Pause before each request, in milliseconds
    #[arg(long, default_value = "150")]
    delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Retries for timeouts, 429 and 5xx responses
    #[arg(long, default_value = "3")]
    max_retries: u32,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Print records as JSON instead of writing the database
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // 1. Setup Logging (RUST_LOG wins over --log-level)
    utils::logging::setup_logging(&args.log_level);
    tracing::info!("Starting crawl with args: {:?}", args);

    // 2. Build the extraction configuration
    let config = CrawlConfig::from_index(&args.index_url)?
        .with_institution(args.institution.clone())
        .with_category_marker(args.category_marker.clone())
        .with_pagination_selector(&args.pagination_selector)?;

    // 3. Build the HTTP fetcher
    if args.concurrency == 0 {
        return Err(AppError::Config("--concurrency must be at least 1".to_string()));
    }
    let fetcher = Arc::new(HttpFetcher::new(HttpFetcherOptions {
        user_agent: args.user_agent.clone(),
        max_concurrent: args.concurrency,
        request_delay: Duration::from_millis(args.delay_ms),
        timeout: Duration::from_secs(args.timeout_secs),
        max_retries: args.max_retries,
    })?);

    // 4. Crawl into the chosen store
    if args.dry_run {
        let store = Arc::new(MemoryStore::new());
        Crawler::new(config, fetcher, store.clone()).run().await?;

        tracing::info!("Collected {} records", store.len()?);
        let records = store.snapshot()?;
        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| AppError::Processing(format!("Could not serialize records: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    let store = Arc::new(SqliteStore::open(&args.db)?);
    let stats = Crawler::new(config, fetcher, store.clone()).run().await?;
    tracing::info!("{} records in {}", store.count()?, args.db);

    if stats.pages_visited == 0 && stats.pages_failed > 0 {
        return Err(AppError::Processing(format!(
            "None of the {} category pages could be processed",
            stats.pages_failed
        )));
    }

    Ok(())
}
