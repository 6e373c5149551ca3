//! Query orchestration
//!
//! `QueryEngine` owns the dataset source, the cache and the normalized
//! catalog derived from the cached dataset. Each `execute` call runs the
//! full pipeline:
//!
//! 1. Resolve the dataset through the cache (may fetch)
//! 2. Normalize it and count tags, only when the dataset changed
//! 3. Filter, search and sort over borrowed entries
//! 4. Paginate, cloning only the entries on the returned page
//!
//! Normalization is memoized per fetched dataset, so cards without dates
//! keep the same default timestamp across queries and repeated calls with an
//! unchanged state return identical pages.

use super::counts::{TagCounts, compute_counts};
use super::paginate;
use super::state::QueryState;
use super::{filter, search, sort};
use crate::catalog::{CategorySet, Dataset, Entry, GroupIndex, normalize};
use crate::fetch::{DatasetCache, DatasetSource, FetchError};
use chrono::Utc;
use rand::Rng;
use rand::seq::SliceRandom;
use std::sync::Arc;
use tracing::debug;

/// Normalized view of one fetched dataset
#[derive(Debug)]
pub struct Catalog {
    dataset: Arc<Dataset>,
    pub groups: GroupIndex,
    /// Valid entries in upstream order
    pub entries: Vec<Entry>,
    /// Counts over the full catalog, before any filtering
    pub tag_counts: TagCounts,
}

impl Catalog {
    /// Normalize a dataset and derive its group index and counts
    #[must_use]
    pub fn build(dataset: Arc<Dataset>, categories: &CategorySet) -> Self {
        let groups = GroupIndex::build(&dataset.filters);
        let entries = normalize(&dataset, &groups, categories, Utc::now());
        let tag_counts = compute_counts(&entries, &groups, categories);

        debug!(
            raw = dataset.entries.len(),
            valid = entries.len(),
            tags = tag_counts.len(),
            "Normalized catalog"
        );

        Self {
            dataset,
            groups,
            entries,
            tag_counts,
        }
    }

    /// Look up an entry by its exact path
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.path == path)
    }
}

/// One page of query results plus the metadata needed to render it
#[derive(Debug, Clone)]
pub struct QueryPage {
    pub items: Vec<Entry>,
    /// Effective page after clamping
    pub page: usize,
    pub total_pages: usize,
    /// Matches across all pages
    pub total_matched: usize,
    /// Catalog the page was drawn from
    pub catalog: Arc<Catalog>,
}

impl QueryPage {
    #[must_use]
    pub fn tag_counts(&self) -> &TagCounts {
        &self.catalog.tag_counts
    }
}

/// Run filter, search, sort and pagination over a catalog
///
/// Returns the page and the number of matches before pagination. If the
/// requested page is empty while other pages have matches, the last valid
/// page is returned instead.
#[must_use]
pub fn run_query(
    catalog: &Catalog,
    state: &QueryState,
    categories: &CategorySet,
) -> (paginate::Page<Entry>, usize) {
    let matched: Vec<&Entry> = catalog.entries.iter().collect();
    let matched = filter::apply(matched, state, &catalog.groups, categories);
    let matched = search::apply(matched, state.search_term(), state.search_field());
    let matched = sort::apply(matched, state.sort_key());

    let page_size = state.page_size().get();
    let mut page = paginate::apply(&matched, state.page(), page_size);

    if page.items.is_empty() && !matched.is_empty() && state.page() > 1 {
        let last_page = matched.len().div_ceil(page_size);
        debug!(requested = state.page(), last_page, "Requested page was empty, retrying");
        page = paginate::apply(&matched, last_page, page_size);
    }

    let page = paginate::Page {
        items: page.items.into_iter().cloned().collect(),
        page: page.page,
        total_pages: page.total_pages,
    };
    (page, matched.len())
}

/// Composes dataset resolution with the query pipeline
#[derive(Debug)]
pub struct QueryEngine<S> {
    source: S,
    cache: DatasetCache,
    categories: CategorySet,
    caching_enabled: bool,
    catalog: Option<Arc<Catalog>>,
}

impl<S: DatasetSource> QueryEngine<S> {
    /// Engine with an empty cache and caching enabled
    pub fn new(source: S, categories: CategorySet) -> Self {
        Self::with_cache(source, categories, DatasetCache::new())
    }

    /// Engine starting from an existing (e.g. persisted) cache
    pub const fn with_cache(source: S, categories: CategorySet, cache: DatasetCache) -> Self {
        Self {
            source,
            cache,
            categories,
            caching_enabled: true,
            catalog: None,
        }
    }

    pub const fn set_caching_enabled(&mut self, enabled: bool) {
        self.caching_enabled = enabled;
    }

    #[must_use]
    pub const fn categories(&self) -> &CategorySet {
        &self.categories
    }

    #[must_use]
    pub const fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    pub const fn cache_mut(&mut self) -> &mut DatasetCache {
        &mut self.cache
    }

    /// Drop the cached dataset and the catalog derived from it
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.catalog = None;
    }

    /// Catalog of the most recent load, if any
    #[must_use]
    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_deref()
    }

    /// Resolve the dataset and return its normalized catalog
    ///
    /// The catalog is rebuilt only when the cache hands out a different
    /// dataset than last time.
    ///
    /// # Errors
    ///
    /// Propagates the `FetchError` of a failed fetch unchanged.
    pub async fn load(&mut self, force_reload: bool) -> Result<Arc<Catalog>, FetchError> {
        let dataset = self
            .cache
            .get_or_fetch(&self.source, force_reload, self.caching_enabled)
            .await?;

        if let Some(catalog) = &self.catalog
            && Arc::ptr_eq(&catalog.dataset, &dataset)
        {
            return Ok(Arc::clone(catalog));
        }

        let catalog = Arc::new(Catalog::build(dataset, &self.categories));
        self.catalog = Some(Arc::clone(&catalog));
        Ok(catalog)
    }

    /// Run a query and write the effective page back into `state`
    ///
    /// # Errors
    ///
    /// Only dataset resolution can fail; its `FetchError` is returned
    /// unchanged and `state` is left as it was.
    pub async fn execute(
        &mut self,
        state: &mut QueryState,
        force_reload: bool,
    ) -> Result<QueryPage, FetchError> {
        let catalog = self.load(force_reload).await?;
        let (page, total_matched) = run_query(&catalog, state, &self.categories);

        state.set_page(page.page);
        debug!(
            page = page.page,
            total_pages = page.total_pages,
            total_matched,
            "Query executed"
        );

        Ok(QueryPage {
            items: page.items,
            page: page.page,
            total_pages: page.total_pages,
            total_matched,
            catalog,
        })
    }

    /// Look up an entry by exact path in the current catalog
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the dataset has to be fetched and fails.
    pub async fn find_entry(&mut self, path: &str) -> Result<Option<Entry>, FetchError> {
        let catalog = self.load(false).await?;
        Ok(catalog.find(path).cloned())
    }

    /// Pick a uniformly random entry from the full, unfiltered catalog
    ///
    /// Returns `Ok(None)` when the catalog has no valid entries.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the dataset has to be fetched and fails.
    pub async fn random_entry<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Option<Entry>, FetchError> {
        let catalog = self.load(false).await?;
        Ok(catalog.entries.choose(rng).cloned())
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
