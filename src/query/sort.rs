//! Result ordering
//!
//! Every ordering is stable, so entries comparing equal keep the order they
//! had after filtering and searching.

use super::state::SortKey;
use crate::catalog::Entry;
use chrono::{DateTime, Utc};
use std::cmp::{Ordering, Reverse};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Sort entries by `key`
///
/// Dates sort newest first with unparsable dates last; names and authors
/// sort alphabetically ignoring case and accents.
#[must_use]
pub fn apply(mut entries: Vec<&Entry>, key: SortKey) -> Vec<&Entry> {
    match key {
        SortKey::DateUpdated => entries.sort_by_key(|entry| newest_first(entry.date_updated)),
        SortKey::DateCreated => entries.sort_by_key(|entry| newest_first(entry.date_created)),
        SortKey::Name => entries.sort_by(|a, b| collate(&a.name, &b.name)),
        SortKey::Author => entries.sort_by(|a, b| collate(&a.author, &b.author)),
    }
    entries
}

/// `None` orders after every date
fn newest_first(date: Option<DateTime<Utc>>) -> (bool, Reverse<Option<DateTime<Utc>>>) {
    (date.is_none(), Reverse(date))
}

/// Alphabetical comparison
///
/// Letters compare by their base form first, so `É` sorts with `E`. Ties
/// are broken by accents, then lowercase before uppercase.
fn collate(a: &str, b: &str) -> Ordering {
    base_key(a)
        .cmp(&base_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// Lowercased text with diacritics stripped
fn base_key(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
