//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.issue-metrics.toml` files.

use crate::cli::{Args, OutputFormat};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".issue-metrics.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Column visibility and tracked labels.
    #[serde(default)]
    pub columns: ColumnsConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "issue_metrics.md".to_string()
}

/// Output file used for JSON reports when no output path was chosen.
const DEFAULT_JSON_OUTPUT: &str = "issue_metrics.json";

/// Which report columns are hidden, and which labels are measured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default)]
    pub hide_author: bool,

    #[serde(default)]
    pub hide_time_to_first_response: bool,

    #[serde(default)]
    pub hide_time_to_close: bool,

    #[serde(default)]
    pub hide_time_to_answer: bool,

    /// Hide every `Time spent in <label>` column.
    #[serde(default)]
    pub hide_label_metrics: bool,

    /// Labels whose time-in-label durations are reported.
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Report generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Search query echoed in the report footer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.issue-metrics.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given. Hide flags can only turn columns off.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if args.verbose {
            self.general.verbose = true;
        }

        self.columns.hide_author |= args.hide_author;
        self.columns.hide_time_to_first_response |= args.hide_time_to_first_response;
        self.columns.hide_time_to_close |= args.hide_time_to_close;
        self.columns.hide_time_to_answer |= args.hide_time_to_answer;
        self.columns.hide_label_metrics |= args.hide_label_metrics;

        if let Some(ref labels) = args.labels {
            self.columns.labels = labels
                .iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect();
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }
        if args.output.is_none()
            && self.report.format == OutputFormat::Json
            && self.general.output == default_output()
        {
            self.general.output = DEFAULT_JSON_OUTPUT.to_string();
        }
        if let Some(ref query) = args.search_query {
            self.report.search_query = Some(query.clone());
        }
    }

    /// Log level for this run. `quiet` wins over a verbose config or flag.
    pub fn log_level(&self, quiet: bool) -> tracing::Level {
        if quiet {
            tracing::Level::ERROR
        } else if self.general.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.output, "issue_metrics.md");
        assert_eq!(config.report.format, OutputFormat::Markdown);
        assert!(config.columns.labels.is_empty());
        assert!(!config.columns.hide_author);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "custom_report.md"
verbose = true

[columns]
hide_author = true
labels = ["bug", "needs-triage"]

[report]
format = "json"
search_query = "repo:owner/repo is:pr"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "custom_report.md");
        assert!(config.general.verbose);
        assert!(config.columns.hide_author);
        assert!(!config.columns.hide_time_to_close);
        assert_eq!(config.columns.labels, vec!["bug", "needs-triage"]);
        assert_eq!(config.report.format, OutputFormat::Json);
        assert_eq!(
            config.report.search_query.as_deref(),
            Some("repo:owner/repo is:pr")
        );
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[columns]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.columns, ColumnsConfig::default());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[columns]\nhide_time_to_answer = true\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert!(config.columns.hide_time_to_answer);
    }

    #[test]
    fn test_load_invalid_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[columns\nhide_author = ").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        config.columns.hide_time_to_close = true;
        config.columns.labels = vec!["bug".to_string()];

        let mut args = make_args();
        args.hide_author = true;
        args.labels = Some(vec![" feature ".to_string(), "".to_string()]);
        args.format = Some(OutputFormat::Json);
        args.search_query = Some("is:issue".to_string());
        config.merge_with_args(&args);

        assert!(config.columns.hide_author);
        assert!(config.columns.hide_time_to_close);
        assert_eq!(config.columns.labels, vec!["feature"]);
        assert_eq!(config.report.format, OutputFormat::Json);
        assert_eq!(config.report.search_query.as_deref(), Some("is:issue"));
        assert_eq!(config.general.output, "issue_metrics.json");
    }

    #[test]
    fn test_verbose_from_config_file() {
        let mut config: Config = toml::from_str("[general]\nverbose = true\n").unwrap();
        config.merge_with_args(&make_args());

        assert_eq!(config.log_level(false), tracing::Level::DEBUG);
        assert_eq!(config.log_level(true), tracing::Level::ERROR);
    }

    #[test]
    fn test_log_level_from_args() {
        let mut config = Config::default();
        assert_eq!(config.log_level(false), tracing::Level::INFO);

        let mut args = make_args();
        args.verbose = true;
        config.merge_with_args(&args);
        assert_eq!(config.log_level(false), tracing::Level::DEBUG);
    }

    #[test]
    fn test_json_format_picks_json_output() {
        let mut config = Config::default();
        let mut args = make_args();
        args.format = Some(OutputFormat::Json);
        config.merge_with_args(&args);
        assert_eq!(config.general.output, "issue_metrics.json");

        let mut config = Config::default();
        args.output = Some("report.md".into());
        config.merge_with_args(&args);
        assert_eq!(config.general.output, "report.md");

        let mut config: Config =
            toml::from_str("[general]\noutput = \"custom.txt\"\n[report]\nformat = \"json\"\n")
                .unwrap();
        config.merge_with_args(&make_args());
        assert_eq!(config.general.output, "custom.txt");
    }
}
