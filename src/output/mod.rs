//! Output module for result records and batch reports
//!
//! This module handles:
//! - The page, site and batch result records returned by the crawl engine
//! - Batch statistics printed after each run
//! - Markdown reports and the plain-text result table

mod markdown;
mod results;
pub mod stats;
mod table;

pub use markdown::{format_markdown_report, generate_markdown_report, ReportInfo};
pub use results::{BatchResult, PageResult, PageSummary, SiteResult};
pub use stats::{print_statistics, BatchStatistics};
pub use table::format_results_table;
