//! Overall statistics across the whole item collection.
//!
//! Every metric is reduced to an average, a median and a 90th percentile.
//! The percentile uses the nearest-rank method: the value at 1-based rank
//! `ceil(0.9 * n)` of the sorted sample.

use crate::duration::as_micros;
use crate::models::{Item, MetricStats, OverallStats};
use chrono::Duration;
use indexmap::IndexMap;
use tracing::debug;

/// Compute overall statistics for the three duration metrics and each label.
pub fn compute_overall_stats(items: &[Item], labels: &[String]) -> OverallStats {
    let time_in_labels: IndexMap<String, Option<MetricStats>> = labels
        .iter()
        .map(|label| {
            let stats = metric_stats(items.iter().filter_map(|i| i.label_metrics.get(label)));
            (label.clone(), stats)
        })
        .collect();

    let stats = OverallStats {
        time_to_first_response: metric_stats(
            items.iter().filter_map(|i| i.time_to_first_response.as_ref()),
        ),
        time_to_close: metric_stats(items.iter().filter_map(|i| i.time_to_close.as_ref())),
        time_to_answer: metric_stats(items.iter().filter_map(|i| i.time_to_answer.as_ref())),
        time_in_labels,
    };

    debug!(
        "Overall stats over {} items ({} labels tracked)",
        items.len(),
        labels.len()
    );
    stats
}

/// Reduce a sample of durations to its summary, or `None` for an empty sample.
pub fn metric_stats<'a>(values: impl Iterator<Item = &'a Duration>) -> Option<MetricStats> {
    let mut micros: Vec<i64> = values.map(as_micros).collect();
    if micros.is_empty() {
        return None;
    }
    micros.sort_unstable();

    let n = micros.len();
    let sum: i128 = micros.iter().map(|&m| m as i128).sum();
    let average = (sum / n as i128) as i64;

    let median = if n % 2 == 0 {
        let (low, high) = (micros[n / 2 - 1] as i128, micros[n / 2] as i128);
        ((low + high) / 2) as i64
    } else {
        micros[n / 2]
    };

    Some(MetricStats {
        average: Duration::microseconds(average),
        median: Duration::microseconds(median),
        p90: Duration::microseconds(micros[p90_rank(n) - 1]),
    })
}

/// 1-based nearest rank of the 90th percentile, `ceil(9n / 10)`.
fn p90_rank(n: usize) -> usize {
    ((9 * n + 9) / 10).clamp(1, n)
}
