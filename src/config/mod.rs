//! Settings store for cardcat
//!
//! Settings live in a TOML file in the user's config directory
//! (`~/.config/cardcat/config.toml` on Linux). The file is created with
//! defaults on first use. Keys missing from an existing file are filled in
//! with their defaults and written back; keys that are present are never
//! replaced.

use crate::catalog::{CategorySet, TagDef};
use crate::query::{PageSize, SortKey};
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Base URL of the upstream card repository
pub const DEFAULT_API_ENDPOINT: &str = "https://raw.githubusercontent.com/mia13165/Cards/refs/heads/main";

/// Keys accepted by [`Settings::set`]
pub const SETTABLE_KEYS: [&str; 8] = [
    "find_count",
    "default_sort",
    "show_nsfw",
    "cache_enabled",
    "auto_load_tags",
    "show_tag_count",
    "api_endpoint",
    "download_dir",
];

/// Persisted user settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Results per page; one of the allowed page sizes
    pub find_count: usize,

    /// Sort key for new sessions
    pub default_sort: SortKey,

    /// Whether NSFW cards are visible in new sessions
    pub show_nsfw: bool,

    /// Reuse a fetched dataset for up to five minutes
    pub cache_enabled: bool,

    /// Load tag counts together with the first query
    pub auto_load_tags: bool,

    /// Show occurrence counts next to tags
    pub show_tag_count: bool,

    /// Base URL serving `cards.json` and `filters.json`
    pub api_endpoint: String,

    /// Where downloaded cards are saved; defaults to the local data dir
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,

    /// User-defined tags, in creation order
    pub custom_tags: Vec<TagDef>,

    /// Categories backed by a group of the same id in the filter resource
    pub categories: Vec<TagDef>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            find_count: PageSize::DEFAULT.get(),
            default_sort: SortKey::default(),
            show_nsfw: true,
            cache_enabled: true,
            auto_load_tags: true,
            show_tag_count: true,
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            download_dir: None,
            custom_tags: Vec::new(),
            categories: Vec::new(),
        }
    }
}

impl Settings {
    /// Get the path to the default settings file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("cardcat").join("config.toml"))
    }

    /// Load settings from `path`, creating the file with defaults if needed
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "Creating default settings");
            let settings = Self::default();
            settings.save_to(path)?;
            return Ok(settings);
        }

        let text = fs::read_to_string(path)
            .map_err(|e| ConfigError::Message(format!("Failed to read config file: {e}")))?;
        let settings = Self::from_toml_str(&text)?;

        if has_missing_keys(&text, &settings) {
            debug!(path = %path.display(), "Writing back missing settings keys");
            settings.save_to(path)?;
        }

        Ok(settings)
    }

    /// Parse settings from TOML text, defaulting missing keys
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the text is not valid TOML for these settings.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Save settings to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the settings
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// The configured page size, or the default if it is not an allowed size
    #[must_use]
    pub fn page_size(&self) -> PageSize {
        PageSize::try_from(self.find_count).unwrap_or_else(|e| {
            warn!(find_count = self.find_count, "{e}; using {}", PageSize::DEFAULT);
            PageSize::DEFAULT
        })
    }

    /// Directory downloaded cards are saved to
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no directory is configured and the local
    /// data directory cannot be determined.
    pub fn download_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.download_dir {
            return Ok(dir.clone());
        }
        dirs::data_local_dir()
            .map(|dir| dir.join("cardcat").join("cards"))
            .ok_or_else(|| ConfigError::Message("Could not determine data directory".to_string()))
    }

    /// The configured categories as a lookup set
    #[must_use]
    pub fn category_set(&self) -> CategorySet {
        CategorySet::new(self.categories.clone())
    }

    /// Set one scalar key from its string form
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown key or a value that does not
    /// parse for that key. Tag lists are managed by the tag commands and
    /// cannot be set here.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |e: String| ConfigError::Message(format!("Invalid value for '{key}': {e}"));

        match key {
            "find_count" => {
                let size: PageSize = value.parse().map_err(invalid)?;
                self.find_count = size.get();
            }
            "default_sort" => self.default_sort = value.parse().map_err(invalid)?,
            "show_nsfw" => self.show_nsfw = parse_bool(value).map_err(invalid)?,
            "cache_enabled" => self.cache_enabled = parse_bool(value).map_err(invalid)?,
            "auto_load_tags" => self.auto_load_tags = parse_bool(value).map_err(invalid)?,
            "show_tag_count" => self.show_tag_count = parse_bool(value).map_err(invalid)?,
            "api_endpoint" => {
                let endpoint = value.trim().trim_end_matches('/');
                if endpoint.is_empty() {
                    return Err(invalid("endpoint cannot be empty".to_string()));
                }
                self.api_endpoint = endpoint.to_string();
            }
            "download_dir" => {
                self.download_dir = (!value.trim().is_empty()).then(|| PathBuf::from(value.trim()));
            }
            _ => {
                return Err(ConfigError::Message(format!(
                    "Unknown setting '{key}' (expected one of: {})",
                    SETTABLE_KEYS.join(", ")
                )));
            }
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(format!("expected true or false, got '{other}'")),
    }
}

/// Whether `text` lacks any key that `settings` would serialize
fn has_missing_keys(text: &str, settings: &Settings) -> bool {
    let Ok(present) = text.parse::<toml::Table>() else {
        return false;
    };
    let Ok(toml::Value::Table(expected)) = toml::Value::try_from(settings) else {
        return false;
    };
    expected.keys().any(|key| !present.contains_key(key))
}
