//! Error types for the metrics pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading items or aggregating metrics.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// An item is missing a field the aggregators cannot work without.
    #[error("Missing required field `{field}` on item {item}")]
    MissingField { field: &'static str, item: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid item data in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, MetricsError>;
