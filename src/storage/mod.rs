//! Storage module for persisting extraction history
//!
//! This module keeps a bounded history of finished batches, including:
//! - SQLite database initialization and schema management
//! - One entry per saved batch with its totals and inputs
//! - One row per site with up to five emails and their source pages
//! - Search and aggregate statistics over the stored entries

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteHistory;
pub use traits::{HistoryStore, StorageError, StorageResult};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Opens or creates a history database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
/// * `retain` - Number of newest entries kept after each save
pub fn open_history(path: &Path, retain: usize) -> StorageResult<SqliteHistory> {
    SqliteHistory::open(path, retain)
}

/// How the site identifiers of a batch were supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    Text,
    File,
}

impl InputMethod {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::File => "file",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "file" => Some(Self::File),
            _ => None,
        }
    }
}

impl fmt::Display for InputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}

/// A saved batch
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionRecord {
    pub id: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub input_method: InputMethod,
    pub urls_processed: Vec<String>,
    pub total_urls: usize,

    /// Batch duration in seconds, rounded to two decimals
    pub processing_time: f64,

    pub total_emails_found: usize,

    /// Sites with at least one email
    pub successful_extractions: usize,

    /// Sites without emails, whatever their status
    pub failed_extractions: usize,

    pub config_hash: String,
    pub results: Vec<SiteRecord>,
}

/// A saved site result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteRecord {
    pub url: String,
    pub emails: Vec<String>,
    pub email_sources: Vec<String>,
    pub has_contact_form: bool,

    /// Rendered site status
    pub status: String,

    pub successful_pages: usize,
}

/// Aggregates over the stored history
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryStatistics {
    pub total_extractions: usize,
    pub total_urls_processed: usize,
    pub total_emails_found: usize,

    /// Mean batch duration in seconds, rounded to two decimals
    pub average_processing_time: f64,

    pub total_successful: usize,
    pub total_failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_method_db_strings() {
        assert_eq!(InputMethod::Text.to_db_string(), "text");
        assert_eq!(InputMethod::from_db_string("file"), Some(InputMethod::File));
        assert_eq!(InputMethod::from_db_string("csv"), None);
    }

    #[test]
    fn test_input_method_json() {
        assert_eq!(serde_json::to_string(&InputMethod::File).unwrap(), "\"file\"");
    }
}
