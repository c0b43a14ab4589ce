//! Crawler module for contact page discovery and scraping
//!
//! This module contains the crawl engine, including:
//! - HTTP fetching with per-domain rate limiting and retry logic
//! - Sitemap and homepage based page discovery
//! - Page analysis for emails and contact forms
//! - Per-site orchestration under a time budget
//! - Batch coordination over a bounded worker pool

mod coordinator;
mod discovery;
mod fetcher;
mod page;
mod parser;
mod rate_limiter;
mod site;
mod sitemap;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{run_batch, BatchCoordinator, ProgressFn};
pub use discovery::{discover_pages, FALLBACK_PAGES, LINK_KEYWORDS};
pub use fetcher::{is_retryable_status, Fetcher, RetryPolicy, RETRYABLE_STATUSES};
pub use page::scrape_page;
pub use parser::{analyze_html, extract_links, PageAnalysis, PageLink};
pub use rate_limiter::{RateLimiter, DEFAULT_RATE_JITTER};
pub use site::{CrawlSettings, SiteCrawler};
pub use sitemap::{
    find_priority_urls, is_priority_url, load_sitemap, parse_sitemap, MAX_SITEMAP_URLS,
};
pub use transport::{build_http_client, FetchError, FetchResponse, ReqwestTransport, Transport};
