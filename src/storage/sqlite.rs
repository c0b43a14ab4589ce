//! SQLite history implementation
//!
//! This module provides a SQLite-based implementation of the HistoryStore trait.

use crate::output::BatchResult;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{HistoryStore, StorageResult};
use crate::storage::{ExtractionRecord, HistoryStatistics, InputMethod, SiteRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// Emails stored per site
const EMAIL_COLUMNS: usize = 5;

/// Separator for source pages in the `source_pages` column
const SOURCE_SEPARATOR: &str = ", ";

const EXTRACTION_COLUMNS: &str = "id, name, timestamp, input_method, urls_processed, total_urls,
     processing_time, total_emails_found, successful_extractions, failed_extractions, config_hash";

/// SQLite history backend
pub struct SqliteHistory {
    conn: Connection,
    retain: usize,
}

impl SqliteHistory {
    /// Opens or creates the history database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `retain` - Number of newest entries kept after each save
    pub fn open(path: &Path, retain: usize) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn, retain })
    }

    /// Creates an in-memory database
    pub fn new_in_memory(retain: usize) -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn, retain })
    }

    pub fn retain(&self) -> usize {
        self.retain
    }

    fn entry_count(&self) -> StorageResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM extractions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn load_results(&self, extraction_id: &str) -> StorageResult<Vec<SiteRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT website_url, email_1, email_2, email_3, email_4, email_5,
             source_pages, contact_form_found, status, pages_crawled
             FROM extraction_results WHERE extraction_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![extraction_id], |row| {
            let mut emails = Vec::with_capacity(EMAIL_COLUMNS);
            for column in 1..=EMAIL_COLUMNS {
                if let Some(email) = row.get::<_, Option<String>>(column)? {
                    emails.push(email);
                }
            }

            let sources: String = row.get(6)?;
            Ok(SiteRecord {
                url: row.get(0)?,
                emails,
                email_sources: split_sources(&sources),
                has_contact_form: row.get(7)?,
                status: row.get(8)?,
                successful_pages: row.get::<_, i64>(9)? as usize,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Loads entries for the given query, attaching their site rows
    fn load_entries(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> StorageResult<Vec<ExtractionRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let raw = stmt
            .query_map(params, RawExtraction::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|entry| {
                let results = self.load_results(&entry.id)?;
                entry.into_record(results)
            })
            .collect()
    }
}

/// An `extractions` row before its JSON and timestamp columns are decoded
struct RawExtraction {
    id: String,
    name: String,
    timestamp: String,
    input_method: String,
    urls_processed: String,
    total_urls: i64,
    processing_time: f64,
    total_emails_found: i64,
    successful_extractions: i64,
    failed_extractions: i64,
    config_hash: String,
}

impl RawExtraction {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            timestamp: row.get(2)?,
            input_method: row.get(3)?,
            urls_processed: row.get(4)?,
            total_urls: row.get(5)?,
            processing_time: row.get(6)?,
            total_emails_found: row.get(7)?,
            successful_extractions: row.get(8)?,
            failed_extractions: row.get(9)?,
            config_hash: row.get(10)?,
        })
    }

    fn into_record(self, results: Vec<SiteRecord>) -> StorageResult<ExtractionRecord> {
        Ok(ExtractionRecord {
            timestamp: DateTime::parse_from_rfc3339(&self.timestamp)?.with_timezone(&Utc),
            input_method: InputMethod::from_db_string(&self.input_method)
                .unwrap_or(InputMethod::Text),
            urls_processed: serde_json::from_str(&self.urls_processed)?,
            id: self.id,
            name: self.name,
            total_urls: self.total_urls as usize,
            processing_time: self.processing_time,
            total_emails_found: self.total_emails_found as usize,
            successful_extractions: self.successful_extractions as usize,
            failed_extractions: self.failed_extractions as usize,
            config_hash: self.config_hash,
            results,
        })
    }
}

fn split_sources(joined: &str) -> Vec<String> {
    if joined.is_empty() {
        Vec::new()
    } else {
        joined.split(SOURCE_SEPARATOR).map(str::to_string).collect()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Issues the next `extraction_<millis>` ID
///
/// IDs are strictly increasing over the life of the database, so an ID
/// freed by pruning or deletion is never handed out again.
fn next_id(conn: &Connection, now: DateTime<Utc>) -> StorageResult<String> {
    let last: Option<i64> = conn
        .query_row(
            "SELECT last_value FROM id_sequence WHERE name = 'extraction'",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let mut millis = match last {
        Some(last) => now.timestamp_millis().max(last + 1),
        None => now.timestamp_millis(),
    };
    loop {
        let id = format!("extraction_{}", millis);
        let exists: Option<i64> = conn
            .query_row("SELECT 1 FROM extractions WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        if exists.is_none() {
            break;
        }
        millis += 1;
    }

    conn.execute(
        "INSERT INTO id_sequence (name, last_value) VALUES ('extraction', ?1)
         ON CONFLICT(name) DO UPDATE SET last_value = excluded.last_value",
        params![millis],
    )?;

    Ok(format!("extraction_{}", millis))
}

impl HistoryStore for SqliteHistory {
    fn save_extraction(
        &mut self,
        urls: &[String],
        batch: &BatchResult,
        input_method: InputMethod,
        name: Option<&str>,
        config_hash: &str,
    ) -> StorageResult<String> {
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("Extraction {}", self.entry_count()? + 1),
        };

        let now = Utc::now();
        let successful = batch.sites.iter().filter(|s| s.has_emails()).count();
        let urls_json = serde_json::to_string(urls)?;

        let tx = self.conn.transaction()?;
        let id = next_id(&tx, now)?;

        tx.execute(
            "INSERT INTO extractions
             (id, name, timestamp, input_method, total_urls, processing_time,
              total_emails_found, successful_extractions, failed_extractions, urls_processed, config_hash)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                id,
                name,
                now.to_rfc3339_opts(SecondsFormat::Millis, true),
                input_method.to_db_string(),
                urls.len() as i64,
                round2(batch.duration.as_secs_f64()),
                batch.total_emails() as i64,
                successful as i64,
                (batch.sites.len() - successful) as i64,
                urls_json,
                config_hash,
            ],
        )?;

        for site in &batch.sites {
            let email = |i: usize| site.emails.get(i).cloned();
            tx.execute(
                "INSERT INTO extraction_results
                 (extraction_id, website_url, email_1, email_2, email_3, email_4, email_5,
                  source_pages, contact_form_found, status, pages_crawled)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    id,
                    site.url,
                    email(0),
                    email(1),
                    email(2),
                    email(3),
                    email(4),
                    site.email_sources.join(SOURCE_SEPARATOR),
                    site.has_contact_form,
                    site.status.to_string(),
                    site.successful_pages as i64,
                ],
            )?;
        }

        // Keep only the newest entries
        let pruned = tx.execute(
            "DELETE FROM extractions WHERE id NOT IN
             (SELECT id FROM extractions ORDER BY timestamp DESC, rowid DESC LIMIT ?1)",
            params![self.retain as i64],
        )?;

        tx.commit()?;

        if pruned > 0 {
            tracing::debug!("Pruned {} old history entries", pruned);
        }
        tracing::info!("Saved extraction {}", id);

        Ok(id)
    }

    fn load_history(&self) -> StorageResult<Vec<ExtractionRecord>> {
        self.load_entries(
            &format!(
                "SELECT {} FROM extractions ORDER BY timestamp DESC, rowid DESC LIMIT ?1",
                EXTRACTION_COLUMNS
            ),
            params![self.retain as i64],
        )
    }

    fn get_entry(&self, id: &str) -> StorageResult<Option<ExtractionRecord>> {
        let entries = self.load_entries(
            &format!("SELECT {} FROM extractions WHERE id = ?1", EXTRACTION_COLUMNS),
            params![id],
        )?;
        Ok(entries.into_iter().next())
    }

    fn delete_entry(&mut self, id: &str) -> StorageResult<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM extractions WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    fn delete_all(&mut self) -> StorageResult<usize> {
        Ok(self.conn.execute("DELETE FROM extractions", [])?)
    }

    fn search(&self, query: &str) -> StorageResult<Vec<ExtractionRecord>> {
        let pattern = format!("%{}%", query);
        self.load_entries(
            &format!(
                "SELECT {} FROM extractions WHERE id IN (
                    SELECT e.id FROM extractions e
                    LEFT JOIN extraction_results er ON e.id = er.extraction_id
                    WHERE e.urls_processed LIKE ?1
                       OR er.website_url LIKE ?1
                       OR er.email_1 LIKE ?1
                       OR er.email_2 LIKE ?1
                       OR er.email_3 LIKE ?1
                       OR er.email_4 LIKE ?1
                       OR er.email_5 LIKE ?1
                 )
                 ORDER BY timestamp DESC, rowid DESC LIMIT ?2",
                EXTRACTION_COLUMNS
            ),
            params![pattern, self.retain as i64],
        )
    }

    fn statistics(&self) -> StorageResult<HistoryStatistics> {
        let stats = self.conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(total_urls), 0),
                    COALESCE(SUM(total_emails_found), 0),
                    COALESCE(AVG(processing_time), 0.0),
                    COALESCE(SUM(successful_extractions), 0),
                    COALESCE(SUM(failed_extractions), 0)
             FROM extractions",
            [],
            |row| {
                Ok(HistoryStatistics {
                    total_extractions: row.get::<_, i64>(0)? as usize,
                    total_urls_processed: row.get::<_, i64>(1)? as usize,
                    total_emails_found: row.get::<_, i64>(2)? as usize,
                    average_processing_time: round2(row.get(3)?),
                    total_successful: row.get::<_, i64>(4)? as usize,
                    total_failed: row.get::<_, i64>(5)? as usize,
                })
            },
        )?;

        Ok(stats)
    }
}
