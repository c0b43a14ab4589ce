//! Database schema definitions
//!
//! This module contains the SQL schema for the extraction history database.

use rusqlite::Connection;

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per saved batch
CREATE TABLE IF NOT EXISTS extractions (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    input_method TEXT NOT NULL,
    total_urls INTEGER NOT NULL,
    processing_time REAL NOT NULL,
    total_emails_found INTEGER NOT NULL,
    successful_extractions INTEGER NOT NULL,
    failed_extractions INTEGER NOT NULL,
    urls_processed TEXT NOT NULL,
    config_hash TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_extractions_timestamp ON extractions(timestamp);
CREATE INDEX IF NOT EXISTS idx_extractions_name ON extractions(name);

-- One row per site in a saved batch
CREATE TABLE IF NOT EXISTS extraction_results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    extraction_id TEXT NOT NULL REFERENCES extractions(id) ON DELETE CASCADE,
    website_url TEXT NOT NULL,
    email_1 TEXT,
    email_2 TEXT,
    email_3 TEXT,
    email_4 TEXT,
    email_5 TEXT,
    source_pages TEXT NOT NULL DEFAULT '',
    contact_form_found INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT '',
    pages_crawled INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_extraction_results_extraction ON extraction_results(extraction_id);

-- Last issued ID value per sequence; survives pruning and deletes
CREATE TABLE IF NOT EXISTS id_sequence (
    name TEXT PRIMARY KEY,
    last_value INTEGER NOT NULL
);
"#;

/// Creates every table and index that does not exist yet
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
