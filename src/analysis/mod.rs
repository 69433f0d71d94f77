//! Analysis modules.
//!
//! Both aggregators are pure functions of the item collection; neither
//! writes any output.

pub mod by_author;
pub mod overall;

pub use by_author::aggregate_by_author;
pub use overall::compute_overall_stats;

use crate::error::Result;
use crate::models::{Item, ItemCounts, MetricsReport};
use tracing::info;

/// Run both aggregators over the items and bundle the results for rendering.
pub fn build_report(
    items: Vec<Item>,
    labels: Vec<String>,
    search_query: Option<String>,
) -> Result<MetricsReport> {
    let authors = aggregate_by_author(&items)?;
    let overall = compute_overall_stats(&items, &labels);
    let counts = ItemCounts::from_items(&items);

    info!(
        "Aggregated {} items ({} open, {} closed) from {} contributors",
        counts.total,
        counts.open,
        counts.closed,
        authors.len()
    );

    Ok(MetricsReport {
        items,
        labels,
        overall,
        counts,
        authors,
        search_query,
    })
}
