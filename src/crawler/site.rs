//! Per-site crawl orchestration

use crate::config::ExtractorConfig;
use crate::crawler::discovery::discover_pages;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::page::scrape_page;
use crate::output::SiteResult;
use crate::state::SiteStatus;
use crate::url::normalize_site_url;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Limits applied to each site crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSettings {
    pub page_timeout: Duration,
    pub site_timeout: Duration,
    pub max_emails: usize,
    pub max_pages: usize,
}

impl CrawlSettings {
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self {
            page_timeout: config.page_timeout(),
            site_timeout: config.site_timeout(),
            max_emails: config.max_emails_per_site,
            max_pages: config.max_pages_per_site,
        }
    }
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}

/// Crawls one site at a time: discovery, then each page in order
pub struct SiteCrawler {
    fetcher: Arc<Fetcher>,
    settings: CrawlSettings,
}

impl SiteCrawler {
    pub fn new(fetcher: Arc<Fetcher>, settings: CrawlSettings) -> Self {
        Self { fetcher, settings }
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    /// Crawls a site and aggregates its page results
    ///
    /// # Crawl Flow
    ///
    /// 1. Normalize the raw identifier; on failure return `Failed`
    /// 2. Discover candidate pages
    /// 3. Scrape pages sequentially, checking the site budget before each one
    /// 4. Merge emails in first-discovered order and keep the first `max_emails`
    ///
    /// The budget check is cooperative: a page in flight is never interrupted,
    /// so a crawl can overrun by at most one page's fetch time. A timed-out
    /// site keeps every email gathered before the budget ran out.
    pub async fn crawl_site(&self, raw: &str) -> SiteResult {
        let start = Instant::now();

        // Step 1: Normalize
        let root = match normalize_site_url(raw) {
            Ok(root) => root,
            Err(e) => {
                tracing::warn!(input = raw, error = %e, "Invalid site identifier");
                return SiteResult::failed(raw.trim(), SiteStatus::Failed(e.to_string()));
            }
        };

        tracing::info!(site = %root, "Crawling site");

        // Step 2: Discover
        let pages = discover_pages(
            &self.fetcher,
            &root,
            self.settings.page_timeout,
            self.settings.max_pages,
        )
        .await;

        // Step 3: Scrape
        let mut emails = Vec::new();
        let mut seen = HashSet::new();
        let mut pages_crawled = Vec::new();
        let mut email_sources = Vec::new();
        let mut successful_pages = 0;
        let mut has_contact_form = false;
        let mut timed_out = None;

        for page_url in &pages {
            let elapsed = start.elapsed();
            if elapsed > self.settings.site_timeout {
                tracing::warn!(
                    site = %root,
                    elapsed_secs = elapsed.as_secs_f64(),
                    "Site budget exhausted"
                );
                timed_out = Some(elapsed);
                break;
            }

            let page = scrape_page(&self.fetcher, page_url, self.settings.page_timeout).await;

            pages_crawled.push(page.summary());
            has_contact_form |= page.has_contact_form;

            if !page.emails.is_empty() {
                for email in &page.emails {
                    if seen.insert(email.clone()) {
                        emails.push(email.clone());
                    }
                }
                email_sources.push(page.url.clone());
            }

            if page.status.is_success() {
                successful_pages += 1;
            }
        }

        // Step 4: Truncate and summarize
        let total = emails.len();
        emails.truncate(self.settings.max_emails);

        let status = match timed_out {
            Some(elapsed) => SiteStatus::TimedOut { elapsed },
            None => SiteStatus::Success {
                total,
                shown: emails.len(),
                sources: email_sources.len(),
                elapsed: start.elapsed(),
            },
        };

        let result = SiteResult {
            url: root,
            emails,
            error: status.error_message(),
            status,
            pages_crawled,
            successful_pages,
            email_sources,
            has_contact_form,
        };

        tracing::info!(
            site = %result.url,
            emails = total,
            pages = result.pages_crawled.len(),
            status = %result.status,
            "Finished site"
        );

        result
    }
}
