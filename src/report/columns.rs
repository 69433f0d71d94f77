//! Report column selection.

use crate::config::ColumnsConfig;
use std::fmt;

/// A column of the per-item detail table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Title,
    Url,
    Author,
    TimeToFirstResponse,
    TimeToClose,
    TimeToAnswer,
    /// Time spent in the named label.
    Label(String),
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Title => write!(f, "Title"),
            Column::Url => write!(f, "URL"),
            Column::Author => write!(f, "Author"),
            Column::TimeToFirstResponse => write!(f, "Time to first response"),
            Column::TimeToClose => write!(f, "Time to close"),
            Column::TimeToAnswer => write!(f, "Time to answer"),
            Column::Label(label) => write!(f, "Time spent in {}", label),
        }
    }
}

/// Ordered set of enabled columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    columns: Vec<Column>,
}

impl ColumnSet {
    /// Title and URL are always shown; everything else can be hidden.
    pub fn from_config(config: &ColumnsConfig) -> Self {
        let mut columns = vec![Column::Title, Column::Url];

        if !config.hide_author {
            columns.push(Column::Author);
        }
        if !config.hide_time_to_first_response {
            columns.push(Column::TimeToFirstResponse);
        }
        if !config.hide_time_to_close {
            columns.push(Column::TimeToClose);
        }
        if !config.hide_time_to_answer {
            columns.push(Column::TimeToAnswer);
        }
        if !config.hide_label_metrics {
            columns.extend(config.labels.iter().cloned().map(Column::Label));
        }

        Self { columns }
    }

    pub fn contains(&self, column: &Column) -> bool {
        self.columns.contains(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether any duration column (metric or label) is enabled.
    pub fn has_duration_columns(&self) -> bool {
        self.columns
            .iter()
            .any(|c| !matches!(c, Column::Title | Column::Url | Column::Author))
    }
}
