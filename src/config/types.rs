use serde::Deserialize;
use std::time::Duration;

/// Browser-like user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure for Contact-Trawler
///
/// Every table and key is optional; an empty file yields [`Config::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extractor: ExtractorConfig,
    pub http: HttpConfig,
    pub history: HistoryConfig,
}

/// Crawl and extraction behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum number of sites crawled concurrently
    #[serde(rename = "max-workers")]
    pub max_workers: usize,

    /// Timeout for a single page request (milliseconds)
    #[serde(rename = "page-timeout-ms")]
    pub page_timeout_ms: u64,

    /// Time budget for one whole site (milliseconds)
    #[serde(rename = "site-timeout-ms")]
    pub site_timeout_ms: u64,

    /// Minimum time between requests to the same domain (milliseconds)
    #[serde(rename = "rate-limit-ms")]
    pub rate_limit_ms: u64,

    /// Additional attempts after the first failed request
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Emails kept per site after aggregation
    #[serde(rename = "max-emails-per-site")]
    pub max_emails_per_site: usize,

    /// Pages discovered per site
    #[serde(rename = "max-pages-per-site")]
    pub max_pages_per_site: usize,
}

impl ExtractorConfig {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_millis(self.page_timeout_ms)
    }

    pub fn site_timeout(&self) -> Duration {
        Duration::from_millis(self.site_timeout_ms)
    }

    pub fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_workers: 8,
            page_timeout_ms: 5_000,
            site_timeout_ms: 30_000,
            rate_limit_ms: 200,
            max_retries: 2,
            max_emails_per_site: 5,
            max_pages_per_site: 15,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header value
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// TCP connect timeout (milliseconds)
    #[serde(rename = "connect-timeout-ms")]
    pub connect_timeout_ms: u64,

    /// Maximum redirect hops followed per request
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout_ms: 5_000,
            max_redirects: 10,
        }
    }
}

/// Extraction history storage
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Number of most recent extractions kept
    pub retain: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            database_path: "contact_history.db".to_string(),
            retain: 15,
        }
    }
}
