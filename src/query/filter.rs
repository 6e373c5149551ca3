//! Include/exclude filtering
//!
//! A `FilterPlan` is compiled once from the query state and then tested
//! against each entry. An entry survives only if it passes every predicate:
//!
//! 1. NSFW gate: with NSFW hidden, entries in the `nsfw` group are dropped
//!    regardless of any tag selection.
//! 2. Included categories: if `NSFW` is among them, only `nsfw`-group
//!    entries are kept and the other included categories are ignored;
//!    otherwise an entry must belong to at least one included category.
//! 3. Included tags: an entry must carry all of them.
//! 4. Excluded tags: an entry carrying any of them is dropped.
//! 5. Excluded categories: an entry in any of them is dropped.
//!
//! Ids that name a category are always treated as categories, never as
//! regular tags. Tag comparisons ignore case; category ids do not.

use super::state::QueryState;
use crate::catalog::{CategorySet, Entry, GroupIndex, NSFW_CATEGORY};

/// Predicates compiled from a `QueryState`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPlan {
    hide_nsfw: bool,
    nsfw_only: bool,
    included_categories: Vec<String>,
    included_tags: Vec<String>,
    excluded_tags: Vec<String>,
    excluded_categories: Vec<String>,
}

impl FilterPlan {
    /// Split the state's selections into category and tag predicates
    #[must_use]
    pub fn compile(state: &QueryState, categories: &CategorySet) -> Self {
        let (included_categories, included_tags): (Vec<String>, Vec<String>) = state
            .selected_tags()
            .iter()
            .cloned()
            .partition(|id| categories.is_category(id));

        let (excluded_categories, excluded_tags): (Vec<String>, Vec<String>) = state
            .excluded_tags()
            .iter()
            .cloned()
            .partition(|id| categories.is_category(id));

        Self {
            hide_nsfw: !state.show_nsfw(),
            nsfw_only: included_categories.iter().any(|id| id == NSFW_CATEGORY),
            included_categories,
            included_tags: included_tags.iter().map(|t| t.to_lowercase()).collect(),
            excluded_tags: excluded_tags.iter().map(|t| t.to_lowercase()).collect(),
            excluded_categories,
        }
    }

    /// Whether the plan lets every entry through
    #[must_use]
    pub fn is_pass_through(&self) -> bool {
        *self == Self::default()
    }

    /// Test one entry against every predicate
    #[must_use]
    pub fn admits(&self, entry: &Entry, groups: &GroupIndex) -> bool {
        self.passes_nsfw_gate(entry, groups)
            && self.passes_included_categories(entry, groups)
            && self.passes_included_tags(entry)
            && self.passes_excluded_tags(entry)
            && self.passes_excluded_categories(entry, groups)
    }

    fn passes_nsfw_gate(&self, entry: &Entry, groups: &GroupIndex) -> bool {
        !(self.hide_nsfw && groups.is_nsfw(&entry.path))
    }

    fn passes_included_categories(&self, entry: &Entry, groups: &GroupIndex) -> bool {
        if self.included_categories.is_empty() {
            return true;
        }
        if self.nsfw_only {
            return groups.is_nsfw(&entry.path);
        }
        self.included_categories
            .iter()
            .any(|category| groups.contains(category, &entry.path))
    }

    fn passes_included_tags(&self, entry: &Entry) -> bool {
        self.included_tags.iter().all(|tag| entry.has_tag_lowered(tag))
    }

    fn passes_excluded_tags(&self, entry: &Entry) -> bool {
        !self.excluded_tags.iter().any(|tag| entry.has_tag_lowered(tag))
    }

    fn passes_excluded_categories(&self, entry: &Entry, groups: &GroupIndex) -> bool {
        !self
            .excluded_categories
            .iter()
            .any(|category| groups.in_category(category, &entry.path))
    }
}

/// Keep the entries admitted by the state's filters, in their original order
#[must_use]
pub fn apply<'a>(
    mut entries: Vec<&'a Entry>,
    state: &QueryState,
    groups: &GroupIndex,
    categories: &CategorySet,
) -> Vec<&'a Entry> {
    let plan = FilterPlan::compile(state, categories);
    if !plan.is_pass_through() {
        entries.retain(|entry| plan.admits(entry, groups));
    }
    entries
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod filter_tests;
