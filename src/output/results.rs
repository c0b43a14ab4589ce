//! Result records produced by the crawl engine

use crate::state::{PageStatus, SiteStatus};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::time::Duration;

/// Outcome of scraping a single page
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    pub url: String,

    /// Validated emails found anywhere on the page, sorted
    pub emails: BTreeSet<String>,

    pub status: PageStatus,

    /// Detail for error statuses
    pub error: Option<String>,

    pub has_contact_form: bool,
}

impl PageResult {
    /// A result with no emails and the detail message of `status`
    pub fn with_status(url: impl Into<String>, status: PageStatus) -> Self {
        Self {
            url: url.into(),
            emails: BTreeSet::new(),
            error: status.error_message(),
            status,
            has_contact_form: false,
        }
    }

    /// Condenses the result into the per-page record kept on a site
    pub fn summary(&self) -> PageSummary {
        PageSummary {
            url: self.url.clone(),
            emails_found: self.emails.len(),
            status: self.status,
            has_contact_form: self.has_contact_form,
        }
    }
}

/// Per-page record kept on a [`SiteResult`]
#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    pub url: String,
    pub emails_found: usize,
    pub status: PageStatus,
    pub has_contact_form: bool,
}

/// Outcome of crawling one site
#[derive(Debug, Clone, Serialize)]
pub struct SiteResult {
    /// Normalized site URL, or the raw input if normalization failed
    pub url: String,

    /// At most the configured number of emails, in first-discovered order
    pub emails: Vec<String>,

    pub status: SiteStatus,

    pub error: Option<String>,

    pub pages_crawled: Vec<PageSummary>,

    /// Pages whose fetch and parse succeeded, with or without emails
    pub successful_pages: usize,

    /// Pages that yielded at least one email, in crawl order
    pub email_sources: Vec<String>,

    pub has_contact_form: bool,
}

impl SiteResult {
    /// A result carrying no pages, used for failures before or outside the crawl
    pub fn failed(url: impl Into<String>, status: SiteStatus) -> Self {
        Self {
            url: url.into(),
            emails: Vec::new(),
            error: status.error_message(),
            status,
            pages_crawled: Vec::new(),
            successful_pages: 0,
            email_sources: Vec::new(),
            has_contact_form: false,
        }
    }

    pub fn has_emails(&self) -> bool {
        !self.emails.is_empty()
    }
}

/// Results of one batch, in completion order
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub sites: Vec<SiteResult>,

    /// Wall-clock duration of the whole batch
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    pub duration: Duration,
}

impl BatchResult {
    /// Total emails across all sites, after per-site truncation
    pub fn total_emails(&self) -> usize {
        self.sites.iter().map(|s| s.emails.len()).sum()
    }

    /// Looks up the result for a site by its normalized or raw URL
    pub fn find(&self, url: &str) -> Option<&SiteResult> {
        self.sites.iter().find(|s| s.url == url)
    }
}

pub(crate) fn serialize_secs<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
