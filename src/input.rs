//! Loading items from disk.

use crate::error::{MetricsError, Result};
use crate::models::Item;
use std::path::Path;
use tracing::debug;

/// Read a JSON array of items.
pub fn load_items(path: &Path) -> Result<Vec<Item>> {
    let content = std::fs::read_to_string(path).map_err(|source| MetricsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let items: Vec<Item> = serde_json::from_str(&content).map_err(|source| MetricsError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Loaded {} items from {}", items.len(), path.display());
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthorKind, ItemState};
    use chrono::Duration;

    const FIXTURE: &str = include_str!("../fixtures/items.json");

    #[test]
    fn test_load_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, FIXTURE).unwrap();

        let items = load_items(&path).unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].author_login(), Some("alice"));
        assert_eq!(items[0].time_to_first_response, Some(Duration::hours(1)));
        assert_eq!(items[1].state, ItemState::Closed);

        let pr = items[1].pull_request.as_ref().unwrap();
        assert!(pr.ready_for_review_at.is_some());
        assert_eq!(pr.review_comments.len(), 3);
        assert_eq!(pr.review_comments[2].author_type, AuthorKind::Bot);
    }

    #[test]
    fn test_missing_file() {
        let err = load_items(Path::new("/no/such/items.json")).unwrap_err();
        assert!(matches!(err, MetricsError::Io { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, r#"[{"title": "no url"}]"#).unwrap();

        let err = load_items(&path).unwrap_err();
        assert!(matches!(err, MetricsError::Json { .. }));
        assert!(err.to_string().contains("items.json"));
    }
}
