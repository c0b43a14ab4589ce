use crate::config::types::{Config, ExtractorConfig, HistoryConfig, HttpConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_extractor_config(&config.extractor)?;
    validate_http_config(&config.http)?;
    validate_history_config(&config.history)?;
    Ok(())
}

/// Validates extractor configuration
fn validate_extractor_config(config: &ExtractorConfig) -> Result<(), ConfigError> {
    if config.max_workers < 1 || config.max_workers > 100 {
        return Err(ConfigError::Validation(format!(
            "max_workers must be between 1 and 100, got {}",
            config.max_workers
        )));
    }

    if config.page_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "page_timeout_ms must be >= 100ms, got {}ms",
            config.page_timeout_ms
        )));
    }

    if config.site_timeout_ms < config.page_timeout_ms {
        return Err(ConfigError::Validation(format!(
            "site_timeout_ms ({}ms) must be >= page_timeout_ms ({}ms)",
            config.site_timeout_ms, config.page_timeout_ms
        )));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    if config.max_emails_per_site < 1 {
        return Err(ConfigError::Validation(format!(
            "max_emails_per_site must be >= 1, got {}",
            config.max_emails_per_site
        )));
    }

    if config.max_pages_per_site < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages_per_site must be >= 1, got {}",
            config.max_pages_per_site
        )));
    }

    Ok(())
}

/// Validates HTTP configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates history configuration
fn validate_history_config(config: &HistoryConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.retain < 1 {
        return Err(ConfigError::Validation(format!(
            "retain must be >= 1, got {}",
            config.retain
        )));
    }

    Ok(())
}
