//! Batch coordinator - runs many site crawls over a bounded worker pool
//!
//! Each site is crawled on its own task. At most `max_workers` tasks are in
//! flight at once; results are collected in completion order. A task that
//! dies is turned into an `Aborted` result for its site, so every input
//! yields exactly one result.

use crate::config::Config;
use crate::crawler::fetcher::{Fetcher, RetryPolicy};
use crate::crawler::rate_limiter::RateLimiter;
use crate::crawler::site::{CrawlSettings, SiteCrawler};
use crate::crawler::transport::{ReqwestTransport, Transport};
use crate::output::{BatchResult, SiteResult};
use crate::state::SiteStatus;
use crate::TrawlerError;
use futures::stream::{self, StreamExt};
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

/// Callback invoked after each site completes with `(completed, total)`
///
/// The callback may borrow caller state for the duration of the batch.
pub type ProgressFn<'a> = dyn Fn(usize, usize) + Send + Sync + 'a;

/// Main batch coordinator structure
pub struct BatchCoordinator {
    crawler: Arc<SiteCrawler>,
    max_workers: usize,
}

impl BatchCoordinator {
    pub fn new(crawler: Arc<SiteCrawler>, max_workers: usize) -> Self {
        Self {
            crawler,
            max_workers: max_workers.max(1),
        }
    }

    /// Builds the full engine from configuration
    ///
    /// One HTTP client and one rate limiter are shared by every worker.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchCoordinator)` - Ready to run batches
    /// * `Err(TrawlerError)` - The HTTP client could not be built
    pub fn from_config(config: &Config) -> Result<Self, TrawlerError> {
        let transport = ReqwestTransport::from_config(&config.http)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Builds the engine from configuration around an existing transport
    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Self {
        let limiter = Arc::new(RateLimiter::new(config.extractor.rate_limit()));
        let fetcher = Fetcher::new(
            transport,
            limiter,
            RetryPolicy::from_config(&config.extractor),
        );
        let crawler = SiteCrawler::new(
            Arc::new(fetcher),
            CrawlSettings::from_config(&config.extractor),
        );

        Self::new(Arc::new(crawler), config.extractor.max_workers)
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Crawls every site in `urls` and returns one result per input
    ///
    /// # Arguments
    ///
    /// * `urls` - Raw site identifiers; duplicates are crawled independently
    /// * `on_progress` - Called after each site completes
    pub async fn run(
        &self,
        urls: &[String],
        on_progress: Option<&ProgressFn<'_>>,
    ) -> BatchResult {
        let start = Instant::now();
        let total = urls.len();

        tracing::info!("Starting batch of {} sites with {} workers", total, self.max_workers);

        let mut results = stream::iter(urls.iter().cloned())
            .map(|url| {
                let crawler = Arc::clone(&self.crawler);
                async move {
                    let task_url = url.clone();
                    let handle = tokio::spawn(async move { crawler.crawl_site(&task_url).await });

                    match handle.await {
                        Ok(result) => result,
                        Err(e) => {
                            let message = if e.is_panic() {
                                panic_message(e.into_panic())
                            } else {
                                e.to_string()
                            };
                            tracing::error!("Site task for {} died: {}", url, message);
                            SiteResult::failed(url, SiteStatus::Aborted(message))
                        }
                    }
                }
            })
            .buffer_unordered(self.max_workers);

        let mut sites = Vec::with_capacity(total);
        while let Some(result) = results.next().await {
            sites.push(result);

            let completed = sites.len();
            tracing::debug!("[{}/{}] {}", completed, total, sites[completed - 1].url);
            if let Some(callback) = on_progress {
                callback(completed, total);
            }
        }

        let duration = start.elapsed();
        tracing::info!("Batch completed: {} sites in {:?}", sites.len(), duration);

        BatchResult { sites, duration }
    }
}

/// Best-effort text of a panic payload
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => message.to_string(),
            Err(_) => "task panicked".to_string(),
        },
    }
}

/// Crawls a batch with a freshly built engine
///
/// This is the main entry point for running an extraction from configuration.
pub async fn run_batch(
    config: &Config,
    urls: &[String],
    on_progress: Option<&ProgressFn<'_>>,
) -> Result<BatchResult, TrawlerError> {
    let coordinator = BatchCoordinator::from_config(config)?;
    Ok(coordinator.run(urls, on_progress).await)
}
