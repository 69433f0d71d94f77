//! Per-author aggregation.
//!
//! Items are grouped by their author. Review comments on pull requests are
//! credited to the reviewer who left them, so reviewers who never authored
//! an item still get a row.

use crate::error::{MetricsError, Result};
use crate::models::{AuthorKind, AuthorStatsMap, Item, ReviewComment};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Aggregate per-author totals, counts, and qualifying review comments.
///
/// Fails with [`MetricsError::MissingField`] on the first item without an
/// author, or on a review comment with a blank reviewer login.
pub fn aggregate_by_author(items: &[Item]) -> Result<AuthorStatsMap> {
    let mut authors = AuthorStatsMap::new();

    for item in items {
        let author = item
            .author_login()
            .ok_or_else(|| MetricsError::MissingField {
                field: "author",
                item: item.html_url.clone(),
            })?;

        let stats = authors.entry(author.to_string()).or_default();
        if let Some(d) = item.time_to_first_response {
            stats.total_time_to_first_response = stats.total_time_to_first_response + d;
            stats.first_response_count += 1;
        }
        if let Some(d) = item.time_to_close {
            stats.total_time_to_close = stats.total_time_to_close + d;
            stats.close_count += 1;
        }
        if let Some(d) = item.time_to_answer {
            stats.total_time_to_answer = stats.total_time_to_answer + d;
            stats.answer_count += 1;
        }
        stats.total_items += 1;

        let Some(pull_request) = &item.pull_request else {
            continue;
        };
        for comment in &pull_request.review_comments {
            let reviewer = comment
                .author_login()
                .ok_or_else(|| MetricsError::MissingField {
                    field: "review_comments.author",
                    item: item.html_url.clone(),
                })?;
            if is_ignored_comment(author, comment, pull_request.ready_for_review_at) {
                debug!("Skipping review by {} on {}", reviewer, item.html_url);
                continue;
            }
            authors.entry(reviewer.to_string()).or_default().comments += 1;
        }
    }

    debug!("Aggregated {} items across {} authors", items.len(), authors.len());
    Ok(authors)
}

/// A review does not count when a bot left it, when the item author left it,
/// or when it was submitted before the pull request was ready for review.
pub fn is_ignored_comment(
    item_author: &str,
    comment: &ReviewComment,
    ready_for_review_at: Option<DateTime<Utc>>,
) -> bool {
    comment.author_type == AuthorKind::Bot
        || comment.author_login() == Some(item_author.trim())
        || ready_for_review_at.is_some_and(|ready| comment.submitted_at < ready)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PullRequest;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    fn review(author: &str, kind: AuthorKind, hour: u32) -> ReviewComment {
        ReviewComment {
            author: author.to_string(),
            author_type: kind,
            submitted_at: at(hour),
        }
    }

    fn pull_request_item(author: &str, ready: Option<u32>, reviews: Vec<ReviewComment>) -> Item {
        let mut item = Item::new("PR", format!("https://example.com/{}", author), author);
        item.pull_request = Some(PullRequest {
            ready_for_review_at: ready.map(at),
            review_comments: reviews,
        });
        item
    }

    #[test]
    fn test_close_averages_by_author() {
        let mut a1 = Item::new("a1", "u1", "alice");
        a1.time_to_close = Some(Duration::hours(2));
        let mut a2 = Item::new("a2", "u2", "alice");
        a2.time_to_close = Some(Duration::hours(4));
        let b1 = Item::new("b1", "u3", "bob");

        let authors = aggregate_by_author(&[a1, a2, b1]).unwrap();

        assert_eq!(authors["alice"].average_time_to_close(), Some(Duration::hours(3)));
        assert_eq!(authors["alice"].total_items, 2);
        assert_eq!(authors["bob"].average_time_to_close(), None);
        assert_eq!(authors["bob"].total_items, 1);
    }

    #[test]
    fn test_self_comment_ignored_and_reviewer_credited() {
        let item = pull_request_item(
            "alice",
            Some(10),
            vec![
                review("alice", AuthorKind::User, 11),
                review("carol", AuthorKind::User, 12),
            ],
        );

        let authors = aggregate_by_author(&[item]).unwrap();

        assert_eq!(authors["alice"].comments, 0);
        assert_eq!(authors["carol"].comments, 1);
        assert_eq!(authors["carol"].total_items, 0);
    }

    #[test]
    fn test_bot_and_early_comments_ignored() {
        let item = pull_request_item(
            "alice",
            Some(10),
            vec![
                review("dependabot[bot]", AuthorKind::Bot, 12),
                review("carol", AuthorKind::User, 9),
                review("dave", AuthorKind::User, 10),
            ],
        );

        let authors = aggregate_by_author(&[item]).unwrap();

        assert!(!authors.contains_key("dependabot[bot]"));
        assert!(!authors.contains_key("carol"));
        assert_eq!(authors["dave"].comments, 1);
    }

    #[test]
    fn test_comments_count_without_ready_timestamp() {
        let item = pull_request_item("alice", None, vec![review("carol", AuthorKind::User, 1)]);
        let authors = aggregate_by_author(&[item]).unwrap();
        assert_eq!(authors["carol"].comments, 1);
    }

    #[test]
    fn test_reviewer_who_also_authors_keeps_both_tallies() {
        let pr = pull_request_item("alice", None, vec![review("bob", AuthorKind::User, 1)]);
        let own = Item::new("bob's issue", "u9", "bob");

        let authors = aggregate_by_author(&[pr, own]).unwrap();

        assert_eq!(authors["bob"].comments, 1);
        assert_eq!(authors["bob"].total_items, 1);
        assert_eq!(authors.keys().collect::<Vec<_>>(), vec!["alice", "bob"]);
    }

    #[test]
    fn test_total_items_sum_matches_input() {
        let items = vec![
            pull_request_item("alice", None, vec![review("zed", AuthorKind::User, 1)]),
            Item::new("x", "u1", "bob"),
            Item::new("y", "u2", "alice"),
        ];
        let authors = aggregate_by_author(&items).unwrap();
        let total: usize = authors.values().map(|s| s.total_items).sum();
        assert_eq!(total, items.len());
    }

    #[test]
    fn test_missing_author_fails() {
        let mut item = Item::new("t", "https://example.com/7", "alice");
        item.author = None;

        let err = aggregate_by_author(&[item]).unwrap_err();
        match err {
            MetricsError::MissingField { field, item } => {
                assert_eq!(field, "author");
                assert_eq!(item, "https://example.com/7");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_blank_reviewer_login_fails() {
        let item = pull_request_item("alice", None, vec![review("  ", AuthorKind::User, 1)]);

        let err = aggregate_by_author(&[item]).unwrap_err();
        match err {
            MetricsError::MissingField { field, item } => {
                assert_eq!(field, "review_comments.author");
                assert_eq!(item, "https://example.com/alice");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_reviewer_login_is_trimmed() {
        let items = vec![
            pull_request_item("alice", None, vec![review(" alice ", AuthorKind::User, 1)]),
            pull_request_item("bob", None, vec![review("carol ", AuthorKind::User, 1)]),
            Item::new("c", "u1", "carol"),
        ];

        let authors = aggregate_by_author(&items).unwrap();

        assert_eq!(
            authors.keys().collect::<Vec<_>>(),
            vec!["alice", "bob", "carol"]
        );
        assert_eq!(authors["alice"].comments, 0);
        assert_eq!(authors["carol"].comments, 1);
        assert_eq!(authors["carol"].total_items, 1);
    }

    #[test]
    fn test_counts_never_exceed_total_items() {
        let mut a = Item::new("a", "u1", "alice");
        a.time_to_first_response = Some(Duration::minutes(5));
        let b = Item::new("b", "u2", "alice");

        let authors = aggregate_by_author(&[a, b]).unwrap();
        let alice = &authors["alice"];
        assert!(alice.first_response_count <= alice.total_items);
        assert_eq!(
            alice.average_time_to_first_response(),
            Some(Duration::minutes(5))
        );
    }
}
