//! Data models for the metrics pipeline.
//!
//! This module contains the input records (items, pull requests, review
//! comments) and the derived statistics produced by the aggregators.

use crate::duration::{self, label_seconds, optional_seconds, seconds};
use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Whether an item is still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    #[default]
    Open,
    Closed,
}

/// Kind of account that left a review comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuthorKind {
    #[default]
    User,
    Bot,
}

/// A review left on a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewComment {
    /// Login of the reviewer.
    pub author: String,
    /// Human or automated account.
    #[serde(default)]
    pub author_type: AuthorKind,
    /// When the review was submitted.
    pub submitted_at: DateTime<Utc>,
}

impl ReviewComment {
    /// Trimmed reviewer login, or `None` when blank.
    pub fn author_login(&self) -> Option<&str> {
        Some(self.author.trim()).filter(|login| !login.is_empty())
    }
}

/// Pull-request details attached to an item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PullRequest {
    /// When the pull request left draft state, if it ever was a draft.
    #[serde(default)]
    pub ready_for_review_at: Option<DateTime<Utc>>,
    /// Reviews submitted on the pull request.
    #[serde(default)]
    pub review_comments: Vec<ReviewComment>,
}

/// A tracked issue, pull request, or discussion with precomputed durations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub html_url: String,
    /// Login of the item author. Required by the aggregators.
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub state: ItemState,
    #[serde(default, with = "optional_seconds")]
    pub time_to_first_response: Option<Duration>,
    #[serde(default, with = "optional_seconds")]
    pub time_to_close: Option<Duration>,
    #[serde(default, with = "optional_seconds")]
    pub time_to_answer: Option<Duration>,
    /// Time spent in each label, keyed by label name.
    #[serde(default, with = "label_seconds")]
    pub label_metrics: IndexMap<String, Duration>,
    /// Present only for pull requests.
    #[serde(default)]
    pub pull_request: Option<PullRequest>,
}

impl Item {
    /// Creates an open item with no durations.
    #[cfg(test)]
    pub fn new(title: impl ToString, html_url: impl ToString, author: impl ToString) -> Self {
        Self {
            title: title.to_string(),
            html_url: html_url.to_string(),
            author: Some(author.to_string()),
            state: ItemState::Open,
            time_to_first_response: None,
            time_to_close: None,
            time_to_answer: None,
            label_metrics: IndexMap::new(),
            pull_request: None,
        }
    }

    /// The author login, if present and non-blank.
    pub fn author_login(&self) -> Option<&str> {
        self.author
            .as_deref()
            .map(str::trim)
            .filter(|login| !login.is_empty())
    }

    /// Title made safe for a markdown table cell.
    pub fn escaped_title(&self) -> String {
        self.title.replace('|', "&#124;").trim().to_string()
    }
}

/// Average, median and 90th percentile of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricStats {
    #[serde(with = "seconds")]
    pub average: Duration,
    #[serde(with = "seconds")]
    pub median: Duration,
    #[serde(with = "seconds")]
    pub p90: Duration,
}

/// Statistics over the whole item collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverallStats {
    pub time_to_first_response: Option<MetricStats>,
    pub time_to_close: Option<MetricStats>,
    pub time_to_answer: Option<MetricStats>,
    /// One entry per tracked label, in tracking order.
    pub time_in_labels: IndexMap<String, Option<MetricStats>>,
}

/// Open/closed tallies for the count table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ItemCounts {
    pub open: usize,
    pub closed: usize,
    pub total: usize,
}

impl ItemCounts {
    pub fn from_items(items: &[Item]) -> Self {
        items.iter().fold(Self::default(), |mut acc, item| {
            match item.state {
                ItemState::Open => acc.open += 1,
                ItemState::Closed => acc.closed += 1,
            }
            acc.total += 1;
            acc
        })
    }
}

/// Running totals for one author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorStats {
    pub total_time_to_first_response: Duration,
    pub total_time_to_close: Duration,
    pub total_time_to_answer: Duration,
    pub first_response_count: usize,
    pub close_count: usize,
    pub answer_count: usize,
    /// Items authored, whatever durations they carry.
    pub total_items: usize,
    /// Qualifying review comments left on other people's pull requests.
    pub comments: usize,
}

impl Default for AuthorStats {
    fn default() -> Self {
        Self {
            total_time_to_first_response: Duration::zero(),
            total_time_to_close: Duration::zero(),
            total_time_to_answer: Duration::zero(),
            first_response_count: 0,
            close_count: 0,
            answer_count: 0,
            total_items: 0,
            comments: 0,
        }
    }
}

impl AuthorStats {
    pub fn average_time_to_first_response(&self) -> Option<Duration> {
        floor_average(&self.total_time_to_first_response, self.first_response_count)
    }

    pub fn average_time_to_close(&self) -> Option<Duration> {
        floor_average(&self.total_time_to_close, self.close_count)
    }

    pub fn average_time_to_answer(&self) -> Option<Duration> {
        floor_average(&self.total_time_to_answer, self.answer_count)
    }
}

/// Whole-second floor of `total / count`, or `None` when nothing was counted.
fn floor_average(total: &Duration, count: usize) -> Option<Duration> {
    if count == 0 {
        return None;
    }
    let divisor = count as i64 * 1_000_000;
    Some(Duration::seconds(
        duration::as_micros(total).div_euclid(divisor),
    ))
}

/// Per-author statistics in first-encountered order.
pub type AuthorStatsMap = IndexMap<String, AuthorStats>;

/// Inputs and derived statistics for one report run.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub items: Vec<Item>,
    /// Labels whose durations are tracked, in column order.
    pub labels: Vec<String>,
    pub overall: OverallStats,
    pub counts: ItemCounts,
    pub authors: AuthorStatsMap,
    pub search_query: Option<String>,
}
