//! State module for tracking crawl outcomes
//!
//! This module provides the status types reported for pages and sites, plus
//! the per-domain schedule kept by the rate limiter.
//!
//! # Components
//!
//! - `PageStatus`: Outcome of scraping one page (success, skipped, fetch/HTTP/parse error)
//! - `SiteStatus`: Outcome of crawling one site (success, timed out, failed, aborted)
//! - `DomainState`: Per-domain request slot tracking for rate limiting

mod domain_state;
mod page_state;
mod site_state;

// Re-export main types
pub use domain_state::DomainState;
pub use page_state::PageStatus;
pub use site_state::SiteStatus;
