//! Catalog data structures
//!
//! - `Dataset`: the raw pair of resources as fetched (cards + filter index)
//! - `FilterIndex`: group path lists and the per-card tag map
//! - `Entry`: a normalized, validated card ready for querying
//! - `TagDef`: display definition shared by tags and categories

use super::path;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Reserved filter-index group listing every NSFW card
pub const NSFW_GROUP: &str = "nsfw";

/// Synthetic category id that resolves to [`NSFW_GROUP`]
pub const NSFW_CATEGORY: &str = "NSFW";

/// Raw cards resource, keyed by raw card path, in upstream order
pub type RawEntries = Map<String, Value>;

/// Raw filter resource
///
/// The upstream document is a single object: `tags` maps raw card paths to
/// their tag lists, every other key is a group id (category or `nsfw`) whose
/// value is a list of raw card paths. Group values that are not lists are
/// kept verbatim and simply contribute no paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterIndex {
    /// Tags attached to each card, keyed by raw path
    ///
    /// Non-string list elements and non-list values are dropped on parse.
    #[serde(default, deserialize_with = "string_lists")]
    pub tags: HashMap<String, Vec<String>>,

    /// Group id -> list of raw card paths
    #[serde(flatten)]
    pub groups: HashMap<String, Value>,
}

impl FilterIndex {
    /// Tags for a card path, looked up under the forward-slash spelling
    /// first and the backslash spelling second
    #[must_use]
    pub fn tags_for(&self, card_path: &str) -> &[String] {
        self.tags
            .get(&path::to_forward(card_path))
            .or_else(|| self.tags.get(&path::to_backward(card_path)))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Raw paths listed under a group id; empty when the group is absent
    pub fn group_paths(&self, group: &str) -> impl Iterator<Item = &str> {
        self.groups
            .get(group)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }
}

fn string_lists<'de, D>(deserializer: D) -> Result<HashMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(HashMap::new());
    };

    Ok(map
        .into_iter()
        .map(|(card_path, tags)| {
            let tags = match tags {
                Value::Array(items) => items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(tag) => Some(tag),
                        _ => None,
                    })
                    .collect(),
                _ => Vec::new(),
            };
            (card_path, tags)
        })
        .collect())
}

/// The raw dataset pair, replaced wholesale on every fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub entries: RawEntries,
    pub filters: FilterIndex,
}

impl Dataset {
    #[must_use]
    pub const fn new(entries: RawEntries, filters: FilterIndex) -> Self {
        Self { entries, filters }
    }
}

/// A normalized catalog card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Raw dataset key, unique per card
    pub path: String,
    pub name: String,
    pub author: String,
    /// Empty when the card has no description
    pub description: String,
    pub image_url: Option<String>,
    /// `None` when the upstream value could not be parsed as a timestamp
    pub date_created: Option<DateTime<Utc>>,
    /// `None` when the upstream value could not be parsed as a timestamp
    pub date_updated: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    /// Ids of configured categories this card belongs to
    pub categories: Vec<String>,
    pub personality: Option<String>,
    pub scenario: Option<String>,
    pub greetings: Vec<String>,
}

impl Entry {
    /// Case-insensitive tag membership; `lowered` must already be lowercase
    #[must_use]
    pub fn has_tag_lowered(&self, lowered: &str) -> bool {
        self.tags.iter().any(|tag| tag.to_lowercase() == lowered)
    }

    /// Whether the card has a non-blank description
    #[must_use]
    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

/// Display definition for a tag or a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDef {
    pub id: String,
    pub label: String,
    /// CSS-style `#RRGGBB` color
    pub color: String,
}

impl TagDef {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: color.into(),
        }
    }
}
