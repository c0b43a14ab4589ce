/// Page status definitions for tracking scrape outcomes
///
/// This module defines every outcome a single page scrape can end in.
use serde::{Serialize, Serializer};
use std::fmt;

/// Represents the outcome of scraping one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageStatus {
    // ===== Success States =====
    /// Page was fetched and every extraction pass ran
    Success { found: usize },

    // ===== Skip States =====
    /// Page path looks like an article rather than a contact/about page
    Skipped,

    // ===== Error States =====
    /// Page could not be fetched after all retries (timeout or connection error)
    FetchFailed,

    /// Page returned a non-200 status
    HttpError(u16),

    /// Page content could not be processed
    ParseError,
}

impl PageStatus {
    /// Returns true if this represents a successful scrape
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns true if the page was skipped before any request was made
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(self, Self::FetchFailed | Self::HttpError(_) | Self::ParseError)
    }

    /// Short machine-readable label, used for grouping in reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Skipped => "skipped",
            Self::FetchFailed => "fetch_failed",
            Self::HttpError(_) => "http_error",
            Self::ParseError => "parse_error",
        }
    }

    /// Detail message for error states
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::FetchFailed => Some("Request failed after all retry attempts".to_string()),
            Self::HttpError(code) => Some(format!("HTTP {}", code)),
            Self::ParseError => Some("Error parsing page content".to_string()),
            Self::Success { .. } | Self::Skipped => None,
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { found } => write!(f, "Success - Found {} emails", found),
            Self::Skipped => write!(f, "Skipped - Not a proper contact/about page"),
            Self::FetchFailed => write!(f, "Error - Request failed after retries"),
            Self::HttpError(code) => write!(f, "Error - HTTP {}", code),
            Self::ParseError => write!(f, "Error - Parsing error"),
        }
    }
}

impl Serialize for PageStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
