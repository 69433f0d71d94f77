//! Markdown report generation.
//!
//! This module renders a [`MetricsReport`] as markdown (or JSON). Header
//! names and table layout are fixed; downstream tools parse them.

use crate::duration::{format_optional, optional_seconds};
use crate::models::{AuthorStats, Item, ItemCounts, MetricStats, MetricsReport, OverallStats};
use crate::report::columns::{Column, ColumnSet};
use anyhow::{Context, Result};
use chrono::Duration;
use indexmap::IndexMap;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

const AUTHOR_COLUMNS: [&str; 5] = [
    "Author",
    "Avg Time to First Response",
    "Avg Time to Close",
    "Total PRs",
    "PR Review Comments Left",
];

/// Generate the complete markdown report.
pub fn generate_markdown_report(report: &MetricsReport, columns: &ColumnSet) -> String {
    let mut output = String::new();

    output.push_str("# Issue Metrics\n\n");

    if report.items.is_empty() {
        output.push_str("no issues found for the given search criteria\n\n");
        output.push_str(&generate_footer(report.search_query.as_deref()));
        return output;
    }

    // Overall and count tables
    output.push_str(&generate_overall_section(report, columns));

    // Per-author breakdown
    output.push_str(&generate_author_section(report));

    // One row per item
    output.push_str(&generate_items_section(report, columns));

    output.push_str(&generate_footer(report.search_query.as_deref()));

    output
}

fn table_row<S: AsRef<str>>(cells: impl IntoIterator<Item = S>) -> String {
    let mut row = String::from("|");
    for cell in cells {
        row.push(' ');
        row.push_str(cell.as_ref());
        row.push_str(" |");
    }
    row.push('\n');
    row
}

fn stats_row(name: &str, stats: Option<&MetricStats>) -> String {
    table_row([
        name.to_string(),
        format_optional(stats.map(|s| &s.average)),
        format_optional(stats.map(|s| &s.median)),
        format_optional(stats.map(|s| &s.p90)),
    ])
}

/// Generate the overall metrics table and the count table.
fn generate_overall_section(report: &MetricsReport, columns: &ColumnSet) -> String {
    let mut section = String::new();
    let overall = &report.overall;

    if columns.has_duration_columns() {
        section.push_str("| Metric | Average | Median | 90th percentile |\n");
        section.push_str("| --- | --- | --- | ---: |\n");

        let metrics = [
            (Column::TimeToFirstResponse, overall.time_to_first_response.as_ref()),
            (Column::TimeToClose, overall.time_to_close.as_ref()),
            (Column::TimeToAnswer, overall.time_to_answer.as_ref()),
        ];
        for (column, stats) in metrics {
            if columns.contains(&column) {
                section.push_str(&stats_row(&column.to_string(), stats));
            }
        }

        // Labels without any data are left out rather than shown as None
        for label in &report.labels {
            let column = Column::Label(label.clone());
            if !columns.contains(&column) {
                continue;
            }
            if let Some(Some(stats)) = overall.time_in_labels.get(label) {
                section.push_str(&stats_row(&column.to_string(), Some(stats)));
            }
        }
        section.push('\n');
    }

    section.push_str("| Metric | Count |\n");
    section.push_str("| --- | ---: |\n");
    section.push_str(&format!(
        "| Number of items that remain open | {} |\n",
        report.counts.open
    ));
    section.push_str(&format!(
        "| Number of items closed | {} |\n",
        report.counts.closed
    ));
    section.push_str(&format!(
        "| Total number of items created | {} |\n\n",
        report.counts.total
    ));

    section
}

/// Generate the per-author table.
fn generate_author_section(report: &MetricsReport) -> String {
    let mut section = String::new();

    section.push_str("# User-Aggregated Metrics\n\n");
    section.push_str(&table_row(AUTHOR_COLUMNS));
    section.push_str(&table_row(AUTHOR_COLUMNS.map(|_| "---")));

    for (author, stats) in &report.authors {
        section.push_str(&table_row([
            author.clone(),
            format_optional(stats.average_time_to_first_response().as_ref()),
            format_optional(stats.average_time_to_close().as_ref()),
            stats.total_items.to_string(),
            stats.comments.to_string(),
        ]));
    }
    section.push('\n');

    section
}

/// Generate the per-item detail table.
fn generate_items_section(report: &MetricsReport, columns: &ColumnSet) -> String {
    let mut section = String::new();

    section.push_str("# Individual Metrics\n\n");
    section.push_str(&table_row(columns.iter().map(|c| c.to_string())));
    section.push_str(&table_row(columns.iter().map(|_| "---")));

    for item in &report.items {
        section.push_str(&table_row(columns.iter().map(|c| item_cell(item, c))));
    }

    section
}

fn item_cell(item: &Item, column: &Column) -> String {
    match column {
        Column::Title => item.escaped_title(),
        Column::Url => item.html_url.clone(),
        Column::Author => item.author_login().unwrap_or("None").to_string(),
        Column::TimeToFirstResponse => format_optional(item.time_to_first_response.as_ref()),
        Column::TimeToClose => format_optional(item.time_to_close.as_ref()),
        Column::TimeToAnswer => format_optional(item.time_to_answer.as_ref()),
        Column::Label(label) => format_optional(item.label_metrics.get(label)),
    }
}

/// Generate the report footer.
fn generate_footer(search_query: Option<&str>) -> String {
    let mut footer = String::new();

    footer.push_str(
        "\n_This report was generated with the [Issue Metrics Action](https://github.com/github/issue-metrics)_\n",
    );
    if let Some(query) = search_query {
        footer.push_str(&format!(
            "Search query used to find these items: `{}`\n",
            query
        ));
    }

    footer
}

/// Per-author row of the JSON report.
#[derive(Debug, Serialize)]
struct AuthorSummary {
    #[serde(with = "optional_seconds")]
    average_time_to_first_response: Option<Duration>,
    #[serde(with = "optional_seconds")]
    average_time_to_close: Option<Duration>,
    #[serde(with = "optional_seconds")]
    average_time_to_answer: Option<Duration>,
    total_items: usize,
    comments: usize,
}

impl From<&AuthorStats> for AuthorSummary {
    fn from(stats: &AuthorStats) -> Self {
        Self {
            average_time_to_first_response: stats.average_time_to_first_response(),
            average_time_to_close: stats.average_time_to_close(),
            average_time_to_answer: stats.average_time_to_answer(),
            total_items: stats.total_items,
            comments: stats.comments,
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    search_query: Option<&'a str>,
    counts: &'a ItemCounts,
    overall: &'a OverallStats,
    authors: IndexMap<&'a str, AuthorSummary>,
}

/// Generate a JSON report of the aggregated statistics.
pub fn generate_json_report(report: &MetricsReport) -> Result<String> {
    let json = JsonReport {
        search_query: report.search_query.as_deref(),
        counts: &report.counts,
        overall: &report.overall,
        authors: report
            .authors
            .iter()
            .map(|(author, stats)| (author.as_str(), AuthorSummary::from(stats)))
            .collect(),
    };
    serde_json::to_string_pretty(&json).map_err(Into::into)
}

/// Write a rendered report to a file in one write.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    info!("Wrote issue metrics to {}", path.display());
    Ok(())
}
