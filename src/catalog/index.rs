//! Group membership lookups
//!
//! The filter index stores groups as lists of raw paths. Querying membership
//! against those lists directly is quadratic and has to re-normalize the
//! separators on every comparison, so `GroupIndex` normalizes every list once
//! into a set of forward-slash paths.

use super::path;
use super::types::{FilterIndex, NSFW_CATEGORY, NSFW_GROUP, TagDef};
use std::collections::{HashMap, HashSet};

/// Normalized group membership, built once per fetched dataset
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    groups: HashMap<String, HashSet<String>>,
}

impl GroupIndex {
    /// Build the index from every list-valued group of a filter index
    #[must_use]
    pub fn build(filters: &FilterIndex) -> Self {
        let groups = filters
            .groups
            .keys()
            .map(|group| {
                let members = filters.group_paths(group).map(path::to_forward).collect();
                (group.clone(), members)
            })
            .collect();

        Self { groups }
    }

    /// Whether `card_path` is listed in `group`, separators ignored
    #[must_use]
    pub fn contains(&self, group: &str, card_path: &str) -> bool {
        self.groups
            .get(group)
            .is_some_and(|members| members.contains(&path::to_forward(card_path)))
    }

    /// Whether `card_path` is listed in the reserved NSFW group
    #[must_use]
    pub fn is_nsfw(&self, card_path: &str) -> bool {
        self.contains(NSFW_GROUP, card_path)
    }

    /// Whether `card_path` belongs to a category, with the `NSFW`
    /// pseudo-category resolving to the reserved NSFW group
    #[must_use]
    pub fn in_category(&self, category: &str, card_path: &str) -> bool {
        if category == NSFW_CATEGORY {
            self.is_nsfw(card_path)
        } else {
            self.contains(category, card_path)
        }
    }
}

/// The closed set of host-configured categories
///
/// `NSFW` is always recognized as a category id for filtering, whether or
/// not the host configured it, but only configured categories are listed,
/// counted and attached to entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet {
    configured: Vec<TagDef>,
}

impl CategorySet {
    #[must_use]
    pub const fn new(configured: Vec<TagDef>) -> Self {
        Self { configured }
    }

    /// Whether `id` names a category rather than a regular tag
    #[must_use]
    pub fn is_category(&self, id: &str) -> bool {
        id == NSFW_CATEGORY || self.configured.iter().any(|category| category.id == id)
    }

    /// Host-configured categories, in configuration order
    #[must_use]
    pub fn configured(&self) -> &[TagDef] {
        &self.configured
    }

    /// Ids of the configured categories a card belongs to
    #[must_use]
    pub fn memberships(&self, groups: &GroupIndex, card_path: &str) -> Vec<String> {
        self.configured
            .iter()
            .filter(|category| groups.contains(&category.id, card_path))
            .map(|category| category.id.clone())
            .collect()
    }
}
