//! Batch statistics
//!
//! This module condenses a finished batch into the counters reported after
//! each run.

use crate::output::BatchResult;
use serde::Serialize;
use std::time::Duration;

/// Batch statistics summary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchStatistics {
    pub total_sites: usize,

    /// Sites with at least one email
    pub sites_with_emails: usize,

    /// Emails across all sites, after per-site truncation
    pub total_emails: usize,

    pub sites_with_contact_forms: usize,
    pub timed_out_sites: usize,

    /// Sites that failed or whose task died
    pub failed_sites: usize,

    /// Pages fetched and analyzed across all sites
    pub successful_pages: usize,

    #[serde(rename = "duration_secs", serialize_with = "crate::output::results::serialize_secs")]
    pub duration: Duration,
}

impl BatchStatistics {
    /// Computes statistics for a batch
    pub fn from_batch(batch: &BatchResult) -> Self {
        let mut stats = Self {
            total_sites: batch.sites.len(),
            duration: batch.duration,
            ..Self::default()
        };

        for site in &batch.sites {
            if site.has_emails() {
                stats.sites_with_emails += 1;
            }
            if site.has_contact_form {
                stats.sites_with_contact_forms += 1;
            }
            if site.status.is_timeout() {
                stats.timed_out_sites += 1;
            }
            if site.status.is_error() {
                stats.failed_sites += 1;
            }
            stats.total_emails += site.emails.len();
            stats.successful_pages += site.successful_pages;
        }

        stats
    }

    /// Percentage of sites that yielded at least one email
    pub fn hit_rate(&self) -> f64 {
        if self.total_sites == 0 {
            0.0
        } else {
            (self.sites_with_emails as f64 / self.total_sites as f64) * 100.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &BatchStatistics) {
    println!("=== Extraction Statistics ===\n");

    println!("Overview:");
    println!("  Sites processed: {}", stats.total_sites);
    println!("  Sites with emails: {}", stats.sites_with_emails);
    println!("  Total emails found: {}", stats.total_emails);
    println!("  Sites with contact forms: {}", stats.sites_with_contact_forms);
    println!("  Pages analyzed: {}", stats.successful_pages);
    println!();

    if stats.timed_out_sites > 0 || stats.failed_sites > 0 {
        println!("Problems:");
        println!("  Timed out: {}", stats.timed_out_sites);
        println!("  Failed: {}", stats.failed_sites);
        println!();
    }

    println!(
        "Hit Rate: {:.1}% ({} / {} sites) in {:.1}s",
        stats.hit_rate(),
        stats.sites_with_emails,
        stats.total_sites,
        stats.duration.as_secs_f64()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::SiteResult;
    use crate::state::SiteStatus;

    fn site(emails: &[&str], status: SiteStatus, form: bool) -> SiteResult {
        let mut site = SiteResult::failed("https://acme.com", status);
        site.emails = emails.iter().map(|e| e.to_string()).collect();
        site.has_contact_form = form;
        site.successful_pages = emails.len();
        site
    }

    fn success() -> SiteStatus {
        SiteStatus::Success {
            total: 0,
            shown: 0,
            sources: 0,
            elapsed: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_statistics_from_batch() {
        let batch = BatchResult {
            sites: vec![
                site(&["a@acme.com", "b@acme.com"], success(), true),
                site(&[], success(), true),
                site(
                    &["c@acme.com"],
                    SiteStatus::TimedOut {
                        elapsed: Duration::from_secs(31),
                    },
                    false,
                ),
                site(&[], SiteStatus::Failed("bad url".to_string()), false),
                site(&[], SiteStatus::Aborted("panic".to_string()), false),
            ],
            duration: Duration::from_secs(42),
        };

        let stats = BatchStatistics::from_batch(&batch);
        assert_eq!(stats.total_sites, 5);
        assert_eq!(stats.sites_with_emails, 2);
        assert_eq!(stats.total_emails, 3);
        assert_eq!(stats.sites_with_contact_forms, 2);
        assert_eq!(stats.timed_out_sites, 1);
        assert_eq!(stats.failed_sites, 2);
        assert_eq!(stats.successful_pages, 3);
        assert_eq!(stats.duration, Duration::from_secs(42));
        assert!((stats.hit_rate() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_batch_statistics() {
        let batch = BatchResult {
            sites: Vec::new(),
            duration: Duration::ZERO,
        };
        let stats = BatchStatistics::from_batch(&batch);
        assert_eq!(stats.total_sites, 0);
        assert_eq!(stats.hit_rate(), 0.0);
    }
}
