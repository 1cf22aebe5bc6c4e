// src/crawler/orchestrator.rs
use super::config::CrawlConfig;
use crate::extractors::{discover_category_links, extract_publications, next_page, PageDocument};
use crate::fetch::{FetchedPage, Fetcher};
use crate::storage::RecordSink;
use crate::utils::error::{AppError, ExtractError};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

/// Counters for one crawl, reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrawlStats {
    pub pages_visited: usize,
    pub pages_failed: usize,
    pub records_emitted: usize,
    pub records_rejected: usize,
}

/// What a single category page produced.
#[derive(Debug, Default)]
pub struct PageOutcome {
    pub emitted: usize,
    pub rejected: usize,
    pub next: Option<Url>,
}

type PageTasks = JoinSet<(Url, Result<PageOutcome, AppError>)>;

/// Walks the index page, every category it links to, and each category's
/// pagination chain, pushing every extracted publication into the sink.
pub struct Crawler<F, S> {
    config: Arc<CrawlConfig>,
    fetcher: Arc<F>,
    sink: Arc<S>,
}

impl<F, S> Crawler<F, S>
where
    F: Fetcher + 'static,
    S: RecordSink + 'static,
{
    pub fn new(config: CrawlConfig, fetcher: Arc<F>, sink: Arc<S>) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
            sink,
        }
    }

    /// Runs the crawl to completion.
    ///
    /// Only a failure to load the index page, or an index without category
    /// links, ends the run early; a category page that cannot be fetched or
    /// attributed is logged and counted.
    pub async fn run(&self) -> Result<CrawlStats, AppError> {
        let index_url = &self.config.index_url;
        tracing::info!("Fetching index page {}", index_url);
        let index = self.fetcher.fetch(index_url).await?;
        let index_final = index.url.clone();
        let categories = self.discover(index);
        if categories.is_empty() {
            tracing::warn!("No '{}' links on {}", self.config.category_marker, index_final);
            return Err(AppError::Processing(format!(
                "No category links found on {}",
                index_final
            )));
        }
        tracing::info!("Found {} category pages", categories.len());

        let mut stats = CrawlStats::default();
        let mut visited = HashSet::new();
        let mut tasks = PageTasks::new();

        for url in categories {
            if visited.insert(url.clone()) {
                self.spawn_page(&mut tasks, url);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            let (url, result) = match joined {
                Ok(done) => done,
                Err(e) => {
                    tracing::error!("Page task failed: {}", e);
                    stats.pages_failed += 1;
                    continue;
                }
            };

            match result {
                Ok(outcome) => {
                    stats.pages_visited += 1;
                    stats.records_emitted += outcome.emitted;
                    stats.records_rejected += outcome.rejected;

                    if let Some(next) = outcome.next {
                        if visited.insert(next.clone()) {
                            tracing::debug!("Following pagination {} -> {}", url, next);
                            self.spawn_page(&mut tasks, next);
                        } else {
                            tracing::debug!("Already visited {}, pagination of {} stops", next, url);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", url, e);
                    stats.pages_failed += 1;
                }
            }
        }

        tracing::info!(
            "Crawl finished. Pages: {} ok, {} failed. Records: {} saved, {} rejected",
            stats.pages_visited,
            stats.pages_failed,
            stats.records_emitted,
            stats.records_rejected
        );
        Ok(stats)
    }

    /// Category links are matched against the host the index was finally
    /// served from, which may differ from the configured one after redirects.
    fn discover(&self, index: FetchedPage) -> BTreeSet<Url> {
        let page = PageDocument::parse(&index.body, index.url);
        discover_category_links(&page, page.url(), &self.config.category_marker)
    }

    fn spawn_page(&self, tasks: &mut PageTasks, url: Url) {
        let config = Arc::clone(&self.config);
        let fetcher = Arc::clone(&self.fetcher);
        let sink = Arc::clone(&self.sink);

        tasks.spawn(async move {
            let result = match fetcher.fetch(&url).await {
                // Parsing and sink writes are synchronous; run them on the blocking pool
                Ok(fetched) => tokio::task::spawn_blocking(move || {
                    process_category_page(fetched, &config, sink.as_ref())
                })
                .await
                .map_err(|e| AppError::Processing(format!("Page worker failed: {}", e)))
                .and_then(|processed| processed.map_err(AppError::from)),
                Err(e) => Err(AppError::from(e)),
            };
            (url, result)
        });
    }
}

/// Extracts and stores every row of a fetched category page and reports
/// where its pagination leads.
pub fn process_category_page<S>(
    fetched: FetchedPage,
    config: &CrawlConfig,
    sink: &S,
) -> Result<PageOutcome, ExtractError>
where
    S: RecordSink + ?Sized,
{
    let page = PageDocument::parse(&fetched.body, fetched.url);
    let mut outcome = PageOutcome::default();

    for publication in extract_publications(&page, config)? {
        match sink.upsert(&publication) {
            Ok(()) => outcome.emitted += 1,
            Err(e) => {
                tracing::warn!("Could not store '{}': {}", publication.identifier, e);
                outcome.rejected += 1;
            }
        }
    }

    outcome.next = next_page(&page, &config.pagination_selector);
    Ok(outcome)
}
