//! Time-bounded dataset cache
//!
//! Holds the last fetched dataset together with its fetch time. A cached
//! dataset is served while it is younger than the TTL, caching is enabled
//! and no reload was requested; anything else goes back to the source and
//! replaces the cached pair wholesale.
//!
//! Since every CLI invocation is a new process, the cache can also be
//! persisted to `~/.cache/cardcat/dataset.json`. The file is versioned; a
//! corrupted or outdated file is treated as an empty cache.

use super::DatasetSource;
use super::error::FetchError;
use crate::catalog::Dataset;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// How long a fetched dataset stays fresh
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

const CACHE_FILENAME: &str = "dataset.json";
const CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone)]
struct Cached {
    dataset: Arc<Dataset>,
    fetched_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct CacheFileRef<'a> {
    version: u32,
    fetched_at: DateTime<Utc>,
    dataset: &'a Dataset,
}

#[derive(Deserialize)]
struct CacheFile {
    version: u32,
    fetched_at: DateTime<Utc>,
    dataset: Dataset,
}

/// Last fetched dataset plus its freshness timestamp
#[derive(Debug, Clone)]
pub struct DatasetCache {
    slot: Option<Cached>,
    ttl: Duration,
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetCache {
    /// Empty cache with the standard TTL
    #[must_use]
    pub const fn new() -> Self {
        Self::with_ttl(CACHE_TTL)
    }

    /// Empty cache with a custom TTL
    #[must_use]
    pub const fn with_ttl(ttl: Duration) -> Self {
        Self { slot: None, ttl }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// When the cached dataset was fetched; `None` when empty
    #[must_use]
    pub fn last_fetch_time(&self) -> Option<DateTime<Utc>> {
        self.slot.as_ref().map(|cached| cached.fetched_at)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Whether a cached dataset exists and is younger than the TTL at `now`
    ///
    /// A fetch time in the future (clock moved backwards) counts as fresh.
    #[must_use]
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        self.slot.as_ref().is_some_and(|cached| {
            now.signed_duration_since(cached.fetched_at)
                .to_std()
                .map_or(true, |age| age < self.ttl)
        })
    }

    /// Drop the cached dataset so the next request fetches
    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// Store a freshly fetched dataset, replacing whatever was cached
    pub fn store(&mut self, dataset: Dataset, fetched_at: DateTime<Utc>) -> Arc<Dataset> {
        let dataset = Arc::new(dataset);
        self.slot = Some(Cached {
            dataset: Arc::clone(&dataset),
            fetched_at,
        });
        dataset
    }

    /// Return the cached dataset or fetch a new one
    ///
    /// # Errors
    ///
    /// Propagates the source's `FetchError` unchanged; the cache is left
    /// untouched on failure.
    pub async fn get_or_fetch<S: DatasetSource>(
        &mut self,
        source: &S,
        force_reload: bool,
        caching_enabled: bool,
    ) -> Result<Arc<Dataset>, FetchError> {
        self.get_or_fetch_at(source, force_reload, caching_enabled, Utc::now())
            .await
    }

    /// [`get_or_fetch`](Self::get_or_fetch) with an explicit clock reading
    ///
    /// # Errors
    ///
    /// Propagates the source's `FetchError` unchanged.
    pub async fn get_or_fetch_at<S: DatasetSource>(
        &mut self,
        source: &S,
        force_reload: bool,
        caching_enabled: bool,
        now: DateTime<Utc>,
    ) -> Result<Arc<Dataset>, FetchError> {
        if caching_enabled
            && !force_reload
            && self.is_fresh_at(now)
            && let Some(cached) = &self.slot
        {
            debug!(fetched_at = %cached.fetched_at, "Serving dataset from cache");
            return Ok(Arc::clone(&cached.dataset));
        }

        debug!(force_reload, caching_enabled, "Fetching dataset");
        let dataset = source.fetch().await?;
        Ok(self.store(dataset, now))
    }

    /// Default location of the persisted cache file
    ///
    /// Returns `None` if the cache directory cannot be determined.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::cache_dir().map(|d| d.join("cardcat").join(CACHE_FILENAME))
    }

    /// Load a persisted cache
    ///
    /// Returns an empty cache if the file is missing, unreadable, corrupted,
    /// or written by an incompatible version.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let mut cache = Self::new();

        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(_) => return cache,
        };

        match serde_json::from_slice::<CacheFile>(&data) {
            Ok(file) if file.version == CACHE_VERSION => {
                cache.store(file.dataset, file.fetched_at);
            }
            Ok(file) => {
                debug!(version = file.version, "Ignoring dataset cache from another version");
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring corrupted dataset cache");
            }
        }

        cache
    }

    /// Persist the cached dataset; an empty cache removes the file
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory or file cannot be written.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let Some(cached) = &self.slot else {
            return Self::remove_file(path);
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = CacheFileRef {
            version: CACHE_VERSION,
            fetched_at: cached.fetched_at,
            dataset: &cached.dataset,
        };
        let data = serde_json::to_vec(&file).map_err(std::io::Error::other)?;
        std::fs::write(path, data)
    }

    /// Delete a persisted cache file; a missing file is not an error
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file exists but cannot be removed.
    pub fn remove_file(path: &Path) -> std::io::Result<()> {
        match std::fs::remove_file(path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
