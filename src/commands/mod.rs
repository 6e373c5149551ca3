//! Command implementations
//!
//! Each command is a module with an execute function that takes the shared
//! `AppContext` plus its parsed CLI args.

pub mod browse;
pub mod cache;
pub mod config;
pub mod download;
pub mod random;
pub mod search;
pub mod show;
pub mod tag;
pub mod tags;

use crate::cli::QueryArgs;
use crate::config::Settings;
use crate::fetch::{DatasetCache, HttpSource};
use crate::notify::ConsoleNotifier;
use crate::query::{QueryEngine, QueryState};
use crate::Result;
use std::path::PathBuf;
use tracing::{debug, warn};

/// State shared by every command of one invocation
#[derive(Debug)]
pub struct AppContext {
    pub settings: Settings,
    pub settings_path: PathBuf,
    pub quiet: bool,
}

impl AppContext {
    /// Load settings from `settings_path`, or from the default location
    ///
    /// # Errors
    ///
    /// Returns `CardcatError::Config` if the settings cannot be loaded.
    pub fn load(settings_path: Option<PathBuf>, quiet: bool) -> Result<Self> {
        let settings_path = match settings_path {
            Some(path) => path,
            None => Settings::config_path()?,
        };
        let settings = Settings::load_from(&settings_path)?;
        debug!(path = %settings_path.display(), "Loaded settings");

        Ok(Self {
            settings,
            settings_path,
            quiet,
        })
    }

    /// Write the current settings back to disk
    ///
    /// # Errors
    ///
    /// Returns `CardcatError::Config` if the file cannot be written.
    pub fn save_settings(&self) -> Result<()> {
        Ok(self.settings.save_to(&self.settings_path)?)
    }

    #[must_use]
    pub const fn notifier(&self) -> ConsoleNotifier {
        ConsoleNotifier::new(self.quiet)
    }

    /// Fresh query state from the settings with the CLI options applied
    #[must_use]
    pub fn query_state(&self, args: &QueryArgs) -> QueryState {
        let mut state = QueryState::from_settings(&self.settings);
        args.apply_to(&mut state);
        state
    }

    /// Query engine over the configured endpoint
    ///
    /// With caching enabled the engine starts from the persisted dataset
    /// cache, if there is one.
    ///
    /// # Errors
    ///
    /// Returns `CardcatError::Fetch` if the HTTP client cannot be built.
    pub fn engine(&self) -> Result<QueryEngine<HttpSource>> {
        let source = HttpSource::new(&self.settings.api_endpoint)?;
        let cache = match DatasetCache::default_path() {
            Some(path) if self.settings.cache_enabled => DatasetCache::load(&path),
            _ => DatasetCache::new(),
        };

        let mut engine = QueryEngine::with_cache(source, self.settings.category_set(), cache);
        engine.set_caching_enabled(self.settings.cache_enabled);
        Ok(engine)
    }

    /// Persist the engine's dataset cache for the next invocation
    ///
    /// Failures are logged and otherwise ignored.
    pub fn persist_cache(&self, engine: &QueryEngine<HttpSource>) {
        if !self.settings.cache_enabled {
            return;
        }
        if let Some(path) = DatasetCache::default_path()
            && let Err(e) = engine.cache().save(&path)
        {
            warn!(path = %path.display(), error = %e, "Failed to persist dataset cache");
        }
    }
}
