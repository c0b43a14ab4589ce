//! Contact-Trawler main entry point
//!
//! This is the command-line interface for the Contact-Trawler email extractor.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use contact_trawler::config::{resolve_config, validate, Config};
use contact_trawler::crawler::BatchCoordinator;
use contact_trawler::output::{
    format_results_table, generate_markdown_report, print_statistics, BatchStatistics, ReportInfo,
};
use contact_trawler::storage::{
    open_history, ExtractionRecord, HistoryStore, InputMethod, StorageError,
};
use contact_trawler::url::split_site_list;
use contact_trawler::{ConfigError, TrawlerError};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Contact-Trawler: finds contact emails on websites
///
/// Contact-Trawler visits the pages of each site most likely to carry
/// contact details and extracts validated, de-obfuscated email addresses.
#[derive(Parser, Debug)]
#[command(name = "contact-trawler")]
#[command(version = "1.0.0")]
#[command(about = "Finds contact emails on websites", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract contact emails from a list of sites
    Extract(ExtractArgs),

    /// Inspect or manage saved extractions
    History {
        /// Path to TOML configuration file
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Sites to crawl; bare domains or URLs, comma separated or repeated
    #[arg(value_name = "URLS")]
    urls: Vec<String>,

    /// Read sites from a file, one per line or comma separated
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Also write a markdown report to this path
    #[arg(long, value_name = "PATH")]
    markdown: Option<PathBuf>,

    /// Save the batch to the extraction history
    #[arg(long)]
    save: bool,

    /// Name for the saved extraction and the report
    #[arg(long)]
    name: Option<String>,

    /// Number of sites crawled concurrently
    #[arg(long)]
    workers: Option<usize>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    page_timeout_ms: Option<u64>,

    /// Per-site time budget in milliseconds
    #[arg(long)]
    site_timeout_ms: Option<u64>,

    /// Minimum interval between requests to one domain in milliseconds
    #[arg(long)]
    rate_limit_ms: Option<u64>,

    /// Retries per request after the first attempt
    #[arg(long)]
    retries: Option<u32>,
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// List saved extractions, newest first
    List,

    /// Show one saved extraction
    Show { id: String },

    /// Find extractions mentioning a URL or email
    Search { query: String },

    /// Delete one saved extraction
    Delete { id: String },

    /// Delete every saved extraction
    Clear,

    /// Show aggregate statistics over the history
    Stats,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let outcome = match cli.command {
        Command::Extract(args) => handle_extract(args).await,
        Command::History { config, action } => handle_history(config.as_deref(), action),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            if is_setup_error(&e) {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("contact_trawler=info,warn"),
            1 => EnvFilter::new("contact_trawler=debug,info"),
            2 => EnvFilter::new("contact_trawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Configuration and storage failures exit with code 2
fn is_setup_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause.is::<ConfigError>()
            || cause.is::<StorageError>()
            || matches!(
                cause.downcast_ref::<TrawlerError>(),
                Some(TrawlerError::Config(_) | TrawlerError::Storage(_))
            )
    })
}

fn load_config(path: Option<&Path>) -> anyhow::Result<(Config, String)> {
    if let Some(path) = path {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let (config, hash) = resolve_config(path)?;
    tracing::debug!("Configuration loaded (hash: {})", hash);
    Ok((config, hash))
}

/// Applies command-line overrides and re-validates the result
fn apply_overrides(config: &mut Config, args: &ExtractArgs) -> Result<(), ConfigError> {
    let extractor = &mut config.extractor;
    if let Some(workers) = args.workers {
        extractor.max_workers = workers;
    }
    if let Some(ms) = args.page_timeout_ms {
        extractor.page_timeout_ms = ms;
    }
    if let Some(ms) = args.site_timeout_ms {
        extractor.site_timeout_ms = ms;
    }
    if let Some(ms) = args.rate_limit_ms {
        extractor.rate_limit_ms = ms;
    }
    if let Some(retries) = args.retries {
        extractor.max_retries = retries;
    }
    validate(config)
}

/// Collects sites from positional arguments and the optional input file
fn collect_sites(args: &ExtractArgs) -> anyhow::Result<(Vec<String>, InputMethod)> {
    let mut sites: Vec<String> = args.urls.iter().flat_map(|u| split_site_list(u)).collect();
    let mut method = InputMethod::Text;

    if let Some(path) = &args.file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read site list {}", path.display()))?;
        sites.extend(split_site_list(&content));
        method = InputMethod::File;
    }

    if sites.is_empty() {
        bail!("No sites given; pass URLs or --file");
    }

    Ok((sites, method))
}

/// Handles the extract command: crawls every site and reports results
async fn handle_extract(args: ExtractArgs) -> anyhow::Result<()> {
    let (mut config, config_hash) = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, &args)?;
    let (sites, input_method) = collect_sites(&args)?;

    tracing::info!(
        "Extracting from {} sites ({} workers, {}ms site budget)",
        sites.len(),
        config.extractor.max_workers,
        config.extractor.site_timeout_ms
    );

    let coordinator = BatchCoordinator::from_config(&config)?;
    let progress = |completed: usize, total: usize| {
        tracing::info!("[{}/{}] sites complete", completed, total);
    };
    let batch = coordinator.run(&sites, Some(&progress)).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
    } else {
        print!("{}", format_results_table(&batch));
        println!();
        print_statistics(&BatchStatistics::from_batch(&batch));
    }

    if let Some(path) = &args.markdown {
        let info = ReportInfo::new(args.name.clone(), config_hash.clone());
        generate_markdown_report(&batch, &info, path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        tracing::info!("Report written to: {}", path.display());
    }

    if args.save {
        let mut history = open_history(
            Path::new(&config.history.database_path),
            config.history.retain,
        )?;
        let id = history.save_extraction(
            &sites,
            &batch,
            input_method,
            args.name.as_deref(),
            &config_hash,
        )?;
        tracing::info!("Saved extraction {}", id);
    }

    Ok(())
}

/// Handles the history subcommands
fn handle_history(config_path: Option<&Path>, action: HistoryAction) -> anyhow::Result<()> {
    let (config, _) = load_config(config_path)?;
    let mut history = open_history(
        Path::new(&config.history.database_path),
        config.history.retain,
    )?;

    match action {
        HistoryAction::List => {
            let entries = history.load_history()?;
            if entries.is_empty() {
                println!("No saved extractions");
            }
            for entry in &entries {
                print_entry_line(entry);
            }
        }
        HistoryAction::Show { id } => match history.get_entry(&id)? {
            Some(entry) => print_entry(&entry),
            None => bail!(StorageError::EntryNotFound(id)),
        },
        HistoryAction::Search { query } => {
            let entries = history.search(&query)?;
            println!("{} extractions match \"{}\"", entries.len(), query);
            for entry in &entries {
                print_entry_line(entry);
            }
        }
        HistoryAction::Delete { id } => {
            if !history.delete_entry(&id)? {
                bail!(StorageError::EntryNotFound(id));
            }
            println!("Deleted {}", id);
        }
        HistoryAction::Clear => {
            let removed = history.delete_all()?;
            println!("Deleted {} extractions", removed);
        }
        HistoryAction::Stats => {
            let stats = history.statistics()?;
            println!("=== History Statistics ===\n");
            println!("  Extractions: {}", stats.total_extractions);
            println!("  URLs processed: {}", stats.total_urls_processed);
            println!("  Emails found: {}", stats.total_emails_found);
            println!(
                "  Average processing time: {:.2}s",
                stats.average_processing_time
            );
            println!("  Sites with emails: {}", stats.total_successful);
            println!("  Sites without emails: {}", stats.total_failed);
        }
    }

    Ok(())
}

fn print_entry_line(entry: &ExtractionRecord) {
    println!(
        "{}  {}  {}  {} urls, {} emails ({:.2}s)",
        entry.id,
        entry.timestamp.format("%Y-%m-%d %H:%M"),
        entry.name,
        entry.total_urls,
        entry.total_emails_found,
        entry.processing_time
    );
}

fn print_entry(entry: &ExtractionRecord) {
    println!("=== {} ===\n", entry.name);
    println!("  ID: {}", entry.id);
    println!("  Saved: {}", entry.timestamp.to_rfc3339());
    println!("  Input: {}", entry.input_method);
    println!("  Config hash: {}", entry.config_hash);
    println!(
        "  URLs: {}, with emails: {}, without: {}",
        entry.total_urls, entry.successful_extractions, entry.failed_extractions
    );
    println!("  Processing time: {:.2}s\n", entry.processing_time);

    for site in &entry.results {
        let form = if site.has_contact_form { " [form]" } else { "" };
        println!("{} - {}{}", site.url, site.status, form);
        for email in &site.emails {
            println!("    {}", email);
        }
        if !site.email_sources.is_empty() {
            println!("    sources: {}", site.email_sources.join(", "));
        }
    }
}
