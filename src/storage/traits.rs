//! Storage traits and error types
//!
//! This module defines the trait interface for history backends and
//! associated error types.

use crate::output::BatchResult;
use crate::storage::{ExtractionRecord, HistoryStatistics, InputMethod};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Extraction not found: {0}")]
    EntryNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for extraction history backends
///
/// The crawl engine never calls a history store; callers hand it finished
/// batches.
pub trait HistoryStore {
    /// Saves a finished batch and prunes entries beyond the retention limit
    ///
    /// # Arguments
    ///
    /// * `urls` - The raw identifiers the batch was run on
    /// * `batch` - The batch result
    /// * `input_method` - How the identifiers were supplied
    /// * `name` - Display name; defaults to `Extraction N`
    /// * `config_hash` - Hash of the configuration used
    ///
    /// # Returns
    ///
    /// The ID of the new entry, `extraction_<unix-millis>`
    fn save_extraction(
        &mut self,
        urls: &[String],
        batch: &BatchResult,
        input_method: InputMethod,
        name: Option<&str>,
        config_hash: &str,
    ) -> StorageResult<String>;

    /// Loads the retained entries, newest first
    fn load_history(&self) -> StorageResult<Vec<ExtractionRecord>>;

    /// Gets an entry by ID
    fn get_entry(&self, id: &str) -> StorageResult<Option<ExtractionRecord>>;

    /// Deletes an entry and its site rows; returns false if it did not exist
    fn delete_entry(&mut self, id: &str) -> StorageResult<bool>;

    /// Deletes every entry and returns how many were removed
    fn delete_all(&mut self) -> StorageResult<usize>;

    /// Finds entries whose inputs, site URLs, or emails contain `query`
    fn search(&self, query: &str) -> StorageResult<Vec<ExtractionRecord>>;

    /// Aggregates over every stored entry
    fn statistics(&self) -> StorageResult<HistoryStatistics>;
}
