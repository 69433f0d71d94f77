//! issue-metrics - timing metrics for issues, pull requests and discussions
//!
//! Reads items with precomputed durations, aggregates overall and
//! per-author statistics, and writes a markdown (or JSON) report.
//!
//! Exit codes:
//!   0 - Report written
//!   1 - Invalid arguments, unreadable input, or a write failure

mod analysis;
mod cli;
mod config;
mod duration;
mod error;
mod input;
mod models;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use models::MetricsReport;
use report::ColumnSet;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // The config can turn on verbose logging, so it is loaded first
    let config = match load_config(&args) {
        Ok(mut config) => {
            config.merge_with_args(&args);
            config
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(config.log_level(args.quiet));

    info!("issue-metrics v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Effective config: {:?}", config);

    if let Err(e) = run(&args, &config) {
        error!("Report generation failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

/// Handle --init-config: generate a default .issue-metrics.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to choose hidden columns and tracked labels.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load items, aggregate, render and write the report.
fn run(args: &Args, config: &Config) -> Result<()> {
    let items_path = args.items.as_deref().context("--items is required")?;
    let items = input::load_items(items_path)?;
    info!("Loaded {} items from {}", items.len(), items_path.display());

    let report = analysis::build_report(
        items,
        config.columns.labels.clone(),
        config.report.search_query.clone(),
    )?;

    let output = render(&report, config)?;
    let output_path = PathBuf::from(&config.general.output);
    report::write_report(&output_path, &output)?;

    if !args.quiet {
        println!("📊 Issue Metrics Summary:");
        println!("   Items: {}", report.counts.total);
        println!(
            "   Open: {} | Closed: {}",
            report.counts.open, report.counts.closed
        );
        println!("   Contributors: {}", report.authors.len());
        println!("\n✅ Report saved to: {}", output_path.display());
    }

    Ok(())
}

/// Render the report in the configured format.
fn render(report: &MetricsReport, config: &Config) -> Result<String> {
    match config.report.format {
        OutputFormat::Markdown => {
            let columns = ColumnSet::from_config(&config.columns);
            debug!("Rendering {} columns", columns.len());
            Ok(report::generate_markdown_report(report, &columns))
        }
        OutputFormat::Json => report::generate_json_report(report),
    }
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems with the default file are
/// reported on stderr.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Ignoring {}: {:#}", DEFAULT_CONFIG_FILE, e);
            Ok(Config::default())
        }
    }
}
