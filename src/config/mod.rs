//! Configuration module for Contact-Trawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so running without a file is valid.
//!
//! # Example
//!
//! ```no_run
//! use contact_trawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("trawler.toml")).unwrap();
//! println!("Per-site budget: {:?}", config.extractor.site_timeout());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ExtractorConfig, HistoryConfig, HttpConfig, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, parse_config, resolve_config,
};
pub use validation::validate;
