//! Tag and category occurrence counts
//!
//! Counts are derived from the full normalized catalog, before any filter
//! is applied, and rebuilt from scratch whenever the catalog changes.

use crate::catalog::{CategorySet, Entry, GroupIndex};
use std::collections::HashMap;

/// Occurrences per tag or category id
pub type TagCounts = HashMap<String, usize>;

/// Count configured-category memberships and tag occurrences
///
/// Each configured category is counted first by group membership; every tag
/// on every entry then adds one to its own key.
#[must_use]
pub fn compute_counts(entries: &[Entry], groups: &GroupIndex, categories: &CategorySet) -> TagCounts {
    let mut counts = TagCounts::new();

    for category in categories.configured() {
        let members = entries
            .iter()
            .filter(|entry| groups.contains(&category.id, &entry.path))
            .count();
        counts.insert(category.id.clone(), members);
    }

    for tag in entries.iter().flat_map(|entry| &entry.tags) {
        *counts.entry(tag.clone()).or_default() += 1;
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FilterIndex, TagDef};
    use crate::testing::entry;
    use serde_json::json;

    #[test]
    fn test_tag_counts() {
        let entries = vec![
            entry("a.png", "A", "x").with_tags(&["Female", "Cute"]),
            entry("b.png", "B", "x").with_tags(&["Female"]),
            entry("c.png", "C", "x"),
        ];

        let counts = compute_counts(&entries, &GroupIndex::default(), &CategorySet::default());
        assert_eq!(counts.get("Female"), Some(&2));
        assert_eq!(counts.get("Cute"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_category_counts_ignore_separators() {
        let filters: FilterIndex = serde_json::from_value(json!({
            "pony": ["a\\one.png", "b/two.png", "not/listed.png"]
        }))
        .unwrap();
        let groups = GroupIndex::build(&filters);
        let categories = CategorySet::new(vec![
            TagDef::new("pony", "Pony", "#ffffff"),
            TagDef::new("empty", "Empty", "#000000"),
        ]);
        let entries = vec![
            entry("a/one.png", "One", "x"),
            entry("b\\two.png", "Two", "x"),
            entry("c/three.png", "Three", "x"),
        ];

        let counts = compute_counts(&entries, &groups, &categories);
        assert_eq!(counts.get("pony"), Some(&2));
        assert_eq!(counts.get("empty"), Some(&0));
    }

    #[test]
    fn test_empty_catalog() {
        assert!(compute_counts(&[], &GroupIndex::default(), &CategorySet::default()).is_empty());
    }
}
