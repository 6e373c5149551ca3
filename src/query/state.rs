//! Session query state
//!
//! `QueryState` holds every user selection that shapes a query: included and
//! excluded tags, NSFW visibility, the search term and field, the sort key,
//! and the page. It lives for the duration of a browse session and is passed
//! explicitly into every query.
//!
//! The tag sets are only reachable through the toggle methods, which keep
//! them disjoint: adding an id to one set always removes it from the other.

use crate::config::Settings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Field(s) a search term is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    #[default]
    Name,
    Description,
    Author,
    /// Name or author
    Any,
}

impl SearchField {
    pub const ALL: [Self; 4] = [Self::Name, Self::Description, Self::Author, Self::Any];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Author => "author",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown search field '{s}' (expected name, description, author or any)"))
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    /// Most recently updated first
    #[default]
    #[serde(rename = "dateupdate")]
    DateUpdated,
    /// Most recently created first
    #[serde(rename = "datecreate")]
    DateCreated,
    /// Name, A-Z
    #[serde(rename = "name")]
    Name,
    /// Author, A-Z
    #[serde(rename = "author")]
    Author,
}

impl SortKey {
    pub const ALL: [Self; 4] = [Self::DateUpdated, Self::DateCreated, Self::Name, Self::Author];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DateUpdated => "dateupdate",
            Self::DateCreated => "datecreate",
            Self::Name => "name",
            Self::Author => "author",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DateUpdated => "Latest Updated",
            Self::DateCreated => "Latest Created",
            Self::Name => "Name (A-Z)",
            Self::Author => "Author (A-Z)",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown sort key '{s}' (expected dateupdate, datecreate, name or author)"))
    }
}

/// Page sizes offered to the user
pub const ALLOWED_PAGE_SIZES: [usize; 4] = [10, 20, 30, 50];

/// A page size from [`ALLOWED_PAGE_SIZES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(usize);

impl PageSize {
    pub const DEFAULT: Self = Self(30);

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for PageSize {
    type Error = String;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        if ALLOWED_PAGE_SIZES.contains(&size) {
            Ok(Self(size))
        } else {
            Err(format!("page size must be one of {ALLOWED_PAGE_SIZES:?}, got {size}"))
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let size: usize = s.parse().map_err(|_| format!("invalid page size '{s}'"))?;
        Self::try_from(size)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mutable per-session query selections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    selected_tags: BTreeSet<String>,
    excluded_tags: BTreeSet<String>,
    show_nsfw: bool,
    search_term: String,
    search_field: SearchField,
    sort_key: SortKey,
    page: usize,
    page_size: PageSize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            selected_tags: BTreeSet::new(),
            excluded_tags: BTreeSet::new(),
            show_nsfw: true,
            search_term: String::new(),
            search_field: SearchField::default(),
            sort_key: SortKey::default(),
            page: 1,
            page_size: PageSize::default(),
        }
    }
}

impl QueryState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh state seeded from the persisted settings
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            show_nsfw: settings.show_nsfw,
            sort_key: settings.default_sort,
            page_size: settings.page_size(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn selected_tags(&self) -> &BTreeSet<String> {
        &self.selected_tags
    }

    #[must_use]
    pub const fn excluded_tags(&self) -> &BTreeSet<String> {
        &self.excluded_tags
    }

    #[must_use]
    pub const fn show_nsfw(&self) -> bool {
        self.show_nsfw
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    #[must_use]
    pub const fn search_field(&self) -> SearchField {
        self.search_field
    }

    #[must_use]
    pub const fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Whether any include or exclude selection is active
    #[must_use]
    pub fn has_tag_filters(&self) -> bool {
        !self.selected_tags.is_empty() || !self.excluded_tags.is_empty()
    }

    /// Include `id`, or stop including it if it already is
    pub fn toggle_include(&mut self, id: &str) {
        if !self.selected_tags.remove(id) {
            self.include(id);
        }
        self.page = 1;
    }

    /// Exclude `id`, or stop excluding it if it already is
    pub fn toggle_exclude(&mut self, id: &str) {
        if !self.excluded_tags.remove(id) {
            self.exclude(id);
        }
        self.page = 1;
    }

    /// Include `id`, removing it from the excluded set
    pub fn include(&mut self, id: &str) {
        self.excluded_tags.remove(id);
        self.selected_tags.insert(id.to_string());
        self.page = 1;
    }

    /// Exclude `id`, removing it from the selected set
    pub fn exclude(&mut self, id: &str) {
        self.selected_tags.remove(id);
        self.excluded_tags.insert(id.to_string());
        self.page = 1;
    }

    /// Drop `id` from both sets, e.g. after its custom tag was deleted
    pub fn forget_tag(&mut self, id: &str) {
        let removed = self.selected_tags.remove(id) | self.excluded_tags.remove(id);
        if removed {
            self.page = 1;
        }
    }

    /// Clear every include and exclude selection
    pub fn clear_filters(&mut self) {
        self.selected_tags.clear();
        self.excluded_tags.clear();
        self.page = 1;
    }

    pub fn set_show_nsfw(&mut self, show: bool) {
        self.show_nsfw = show;
        self.page = 1;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.page = 1;
    }

    pub fn set_search_field(&mut self, field: SearchField) {
        self.search_field = field;
        self.page = 1;
    }

    /// Change the sort key; the current page is kept
    pub const fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
    }

    pub const fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
        self.page = 1;
    }

    /// Request a page; values below 1 become 1
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub const fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }
}
