use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Represents the outcome of crawling one site
#[derive(Debug, Clone, PartialEq)]
pub enum SiteStatus {
    /// Every discovered page was visited within the time budget
    Success {
        /// Distinct validated emails found across all pages
        total: usize,
        /// Emails kept after truncation
        shown: usize,
        /// Pages that contributed at least one email
        sources: usize,
        elapsed: Duration,
    },

    /// The time budget ran out; results hold whatever was gathered
    TimedOut { elapsed: Duration },

    /// The site crawl failed before or during discovery
    Failed(String),

    /// The crawl task itself died; synthesized by the batch coordinator
    Aborted(String),
}

impl SiteStatus {
    /// Returns true if the site was crawled to completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns true if the crawl stopped on the time budget
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }

    /// Returns true for failures, including synthesized ones
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::Aborted(_))
    }

    /// Short machine-readable label, used for grouping in reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::TimedOut { .. } => "timeout",
            Self::Failed(_) => "failed",
            Self::Aborted(_) => "aborted",
        }
    }

    /// Detail message carried alongside non-success statuses
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::TimedOut { elapsed } => Some(format!(
                "Site processing timeout after {:.1} seconds",
                elapsed.as_secs_f64()
            )),
            Self::Failed(message) => Some(message.clone()),
            Self::Aborted(message) => Some(format!("Unexpected error: {}", message)),
        }
    }
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success {
                total,
                shown,
                sources,
                elapsed,
            } => {
                let secs = elapsed.as_secs_f64();
                if total > shown {
                    write!(
                        f,
                        "Success - Found {} emails (showing {}) from {} pages ({:.1}s)",
                        total, shown, sources, secs
                    )
                } else {
                    write!(
                        f,
                        "Success - Found {} emails from {} pages ({:.1}s)",
                        shown, sources, secs
                    )
                }
            }
            Self::TimedOut { elapsed } => write!(
                f,
                "Skipped - Taking longer than usual ({:.1}s timeout)",
                elapsed.as_secs_f64()
            ),
            Self::Failed(message) => write!(f, "Error - {}", message),
            Self::Aborted(_) => write!(f, "Skipped - Processing error"),
        }
    }
}

impl Serialize for SiteStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_display_all_shown() {
        let status = SiteStatus::Success {
            total: 3,
            shown: 3,
            sources: 2,
            elapsed: Duration::from_millis(4_240),
        };
        assert_eq!(
            status.to_string(),
            "Success - Found 3 emails from 2 pages (4.2s)"
        );
    }

    #[test]
    fn test_success_display_truncated() {
        let status = SiteStatus::Success {
            total: 8,
            shown: 5,
            sources: 3,
            elapsed: Duration::from_millis(12_080),
        };
        assert_eq!(
            status.to_string(),
            "Success - Found 8 emails (showing 5) from 3 pages (12.1s)"
        );
    }

    #[test]
    fn test_timeout_display_and_error() {
        let status = SiteStatus::TimedOut {
            elapsed: Duration::from_millis(31_400),
        };
        assert_eq!(
            status.to_string(),
            "Skipped - Taking longer than usual (31.4s timeout)"
        );
        assert_eq!(
            status.error_message(),
            Some("Site processing timeout after 31.4 seconds".to_string())
        );
        assert!(status.is_timeout());
    }

    #[test]
    fn test_failed_display() {
        let status = SiteStatus::Failed("URL is empty".to_string());
        assert_eq!(status.to_string(), "Error - URL is empty");
        assert!(status.is_error());
    }

    #[test]
    fn test_aborted_display() {
        let status = SiteStatus::Aborted("task panicked".to_string());
        assert_eq!(status.to_string(), "Skipped - Processing error");
        assert_eq!(
            status.error_message(),
            Some("Unexpected error: task panicked".to_string())
        );
    }

    #[test]
    fn test_kind() {
        assert_eq!(SiteStatus::Failed(String::new()).kind(), "failed");
        assert_eq!(
            SiteStatus::TimedOut {
                elapsed: Duration::ZERO
            }
            .kind(),
            "timeout"
        );
    }
}
