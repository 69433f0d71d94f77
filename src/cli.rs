//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// issue-metrics - summarize issue and pull request response times
///
/// Reads a JSON list of items with precomputed durations and writes a
/// markdown report with overall, per-author and per-item metrics.
///
/// Examples:
///   issue-metrics --items items.json
///   issue-metrics --items items.json --labels bug,feature --output report.md
///   HIDE_AUTHOR=true issue-metrics --items items.json
///   issue-metrics --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// JSON file with the items to report on
    #[arg(short, long, value_name = "FILE", required_unless_present = "init_config")]
    pub items: Option<PathBuf>,

    /// Output file path for the report
    ///
    /// Default: from config or issue_metrics.md
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .issue-metrics.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (markdown, json)
    ///
    /// JSON reports default to issue_metrics.json unless --output is given
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Labels to measure time spent in (comma-separated)
    #[arg(long, value_name = "LABELS", value_delimiter = ',', env = "LABELS_TO_MEASURE")]
    pub labels: Option<Vec<String>>,

    /// Search query shown in the report footer
    #[arg(long, value_name = "QUERY", env = "SEARCH_QUERY")]
    pub search_query: Option<String>,

    /// Hide the Author column
    #[arg(long, env = "HIDE_AUTHOR")]
    pub hide_author: bool,

    /// Hide the Time to first response column
    #[arg(long, env = "HIDE_TIME_TO_FIRST_RESPONSE")]
    pub hide_time_to_first_response: bool,

    /// Hide the Time to close column
    #[arg(long, env = "HIDE_TIME_TO_CLOSE")]
    pub hide_time_to_close: bool,

    /// Hide the Time to answer column
    #[arg(long, env = "HIDE_TIME_TO_ANSWER")]
    pub hide_time_to_answer: bool,

    /// Hide all time-in-label columns
    #[arg(long, env = "HIDE_LABEL_METRICS")]
    pub hide_label_metrics: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .issue-metrics.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        match self.items {
            Some(ref path) if !path.is_file() => {
                return Err(format!("Items file does not exist: {}", path.display()));
            }
            None => return Err("--items is required".to_string()),
            _ => {}
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref query) = self.search_query {
            if query.trim().is_empty() {
                return Err("Search query must not be empty".to_string());
            }
        }

        Ok(())
    }
}
