//! Markdown report generation
//!
//! This module renders a finished batch as a human-readable markdown report,
//! including statistics, a per-site table, and the emails found on each site.

use crate::output::{BatchResult, BatchStatistics};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Run metadata shown at the top of a report
#[derive(Debug, Clone)]
pub struct ReportInfo {
    pub name: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub config_hash: String,
}

impl ReportInfo {
    pub fn new(name: Option<String>, config_hash: impl Into<String>) -> Self {
        Self {
            name,
            generated_at: Utc::now(),
            config_hash: config_hash.into(),
        }
    }
}

/// Generates a markdown report for a batch
///
/// # Arguments
///
/// * `batch` - The finished batch
/// * `info` - Run metadata
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_report(
    batch: &BatchResult,
    info: &ReportInfo,
    output_path: &Path,
) -> io::Result<()> {
    let markdown = format_markdown_report(batch, info);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a batch as markdown
pub fn format_markdown_report(batch: &BatchResult, info: &ReportInfo) -> String {
    let stats = BatchStatistics::from_batch(batch);
    let mut md = String::new();

    // Title
    md.push_str("# Contact Trawler Report\n\n");

    md.push_str("## Run Information\n\n");
    if let Some(name) = &info.name {
        md.push_str(&format!("- **Name**: {}\n", name));
    }
    md.push_str(&format!(
        "- **Generated**: {}\n",
        info.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        stats.duration.as_secs_f64()
    ));
    md.push_str(&format!("- **Config Hash**: {}\n\n", info.config_hash));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Sites Processed**: {}\n", stats.total_sites));
    md.push_str(&format!(
        "- **Sites With Emails**: {}\n",
        stats.sites_with_emails
    ));
    md.push_str(&format!("- **Total Emails**: {}\n", stats.total_emails));
    md.push_str(&format!(
        "- **Sites With Contact Forms**: {}\n",
        stats.sites_with_contact_forms
    ));
    md.push_str(&format!("- **Timed Out**: {}\n", stats.timed_out_sites));
    md.push_str(&format!("- **Failed**: {}\n", stats.failed_sites));
    md.push_str(&format!("- **Hit Rate**: {:.2}%\n\n", stats.hit_rate()));

    md.push_str("## Sites\n\n");
    md.push_str("| Site | Emails | Contact Form | Pages | Status |\n");
    md.push_str("|------|--------|--------------|-------|--------|\n");
    for site in &batch.sites {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            escape_cell(&site.url),
            site.emails.len(),
            if site.has_contact_form { "yes" } else { "no" },
            site.successful_pages,
            escape_cell(&site.status.to_string())
        ));
    }
    md.push('\n');

    let with_emails: Vec<_> = batch.sites.iter().filter(|s| s.has_emails()).collect();
    if !with_emails.is_empty() {
        md.push_str("## Emails\n\n");
        for site in with_emails {
            md.push_str(&format!("### {}\n\n", site.url));
            for email in &site.emails {
                md.push_str(&format!("- {}\n", email));
            }
            if !site.email_sources.is_empty() {
                md.push_str("\nSources:\n\n");
                for source in &site.email_sources {
                    md.push_str(&format!("- <{}>\n", source));
                }
            }
            md.push('\n');
        }
    }

    let problems: Vec<_> = batch
        .sites
        .iter()
        .filter_map(|s| s.error.as_ref().map(|e| (&s.url, e)))
        .collect();
    if !problems.is_empty() {
        md.push_str("## Problems\n\n");
        for (url, error) in problems {
            md.push_str(&format!("- **{}**: {}\n", url, error));
        }
        md.push('\n');
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
