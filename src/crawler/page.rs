//! Single page scraping

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::analyze_html;
use crate::output::PageResult;
use crate::state::PageStatus;
use crate::url::{is_homepage, is_valid_contact_page};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

/// Fetches one page and extracts its emails and contact-form presence
///
/// # Outcomes
///
/// | Condition | Status |
/// |-----------|--------|
/// | Not the homepage and not a plausible contact page | `Skipped`, no request made |
/// | Transport failure after retries | `FetchFailed` |
/// | Final status other than 200 | `HttpError` |
/// | Analysis failed | `ParseError` |
/// | Otherwise | `Success` with the number of emails found |
pub async fn scrape_page(fetcher: &Fetcher, url: &str, timeout: Duration) -> PageResult {
    if !is_homepage(url) && !is_valid_contact_page(url) {
        tracing::debug!(url, "Skipping page that does not look like a contact page");
        return PageResult::with_status(url, PageStatus::Skipped);
    }

    let response = match fetcher.fetch(url, timeout).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(url, error = %e, "Failed to fetch page");
            return PageResult::with_status(url, PageStatus::FetchFailed);
        }
    };

    if response.status != 200 {
        tracing::debug!(url, status = response.status, "Page returned HTTP error");
        return PageResult::with_status(url, PageStatus::HttpError(response.status));
    }

    // html5ever recovers from any markup; a panic here is the only way analysis fails
    let analysis = match catch_unwind(AssertUnwindSafe(|| analyze_html(&response.body))) {
        Ok(analysis) => analysis,
        Err(_) => {
            tracing::warn!(url, "Error parsing page content");
            return PageResult::with_status(url, PageStatus::ParseError);
        }
    };

    if !analysis.emails.is_empty() {
        tracing::info!(url, count = analysis.emails.len(), "Found emails on page");
    }

    PageResult {
        url: url.to_string(),
        status: PageStatus::Success {
            found: analysis.emails.len(),
        },
        error: None,
        emails: analysis.emails,
        has_contact_form: analysis.has_contact_form,
    }
}
