//! Card downloads
//!
//! A download resolves an entry by exact path in the current catalog,
//! fetches its image and hands the bytes to a `CardImporter` together with a
//! suggested filename. Every outcome is reported through a `Notifier`.
//!
//! Batch downloads run sequentially and never stop early: a failed entry is
//! notified, recorded in the `DownloadReport`, and the next entry proceeds.

pub mod error;

pub use error::DownloadError;

use crate::catalog::{Entry, path};
use crate::notify::Notifier;
use crate::query::Catalog;
use byte_unit::{Byte, UnitType};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Destination for downloaded card files
pub trait CardImporter {
    /// Store `bytes` under (a variant of) `filename`, returning where it went
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::Io` if the bytes cannot be stored.
    fn import(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, DownloadError>;
}

/// Imports cards as files in a directory
///
/// An existing file is never overwritten; a numeric suffix is added to the
/// file stem instead (`card.png`, `card (1).png`, ...).
#[derive(Debug, Clone)]
pub struct DirectoryImporter {
    dir: PathBuf,
}

impl DirectoryImporter {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn free_path(&self, filename: &str) -> PathBuf {
        let candidate = self.dir.join(filename);
        if !candidate.exists() {
            return candidate;
        }

        let name = Path::new(filename);
        let stem = name.file_stem().map_or_else(|| filename.into(), |s| s.to_string_lossy());
        let ext = name.extension().map(|e| e.to_string_lossy());

        (1..)
            .map(|n| match &ext {
                Some(ext) => self.dir.join(format!("{stem} ({n}).{ext}")),
                None => self.dir.join(format!("{stem} ({n})")),
            })
            .find(|path| !path.exists())
            .unwrap_or(candidate)
    }
}

impl CardImporter for DirectoryImporter {
    fn import(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, DownloadError> {
        std::fs::create_dir_all(&self.dir)?;
        let target = self.free_path(filename);
        std::fs::write(&target, bytes)?;
        Ok(target)
    }
}

/// A successfully imported card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Imported {
    pub path: String,
    pub name: String,
    pub location: PathBuf,
    pub bytes: u64,
}

impl Imported {
    /// Size in human-readable binary units, e.g. `1.5 KiB`
    #[must_use]
    pub fn size(&self) -> String {
        format_size(self.bytes)
    }
}

/// Outcome of a batch download, in request order
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub imported: Vec<Imported>,
    pub failed: Vec<(String, DownloadError)>,
}

impl DownloadReport {
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.imported.iter().map(|card| card.bytes).sum()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Format a byte count in binary units
#[must_use]
pub fn format_size(bytes: u64) -> String {
    Byte::from_u64(bytes)
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}

/// Fetches card images and passes them to an importer
#[derive(Debug)]
pub struct Downloader<I, N> {
    client: Client,
    importer: I,
    notifier: N,
}

impl<I: CardImporter, N: Notifier> Downloader<I, N> {
    pub const fn new(client: Client, importer: I, notifier: N) -> Self {
        Self {
            client,
            importer,
            notifier,
        }
    }

    #[must_use]
    pub const fn importer(&self) -> &I {
        &self.importer
    }

    /// Download one card by exact path
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the card is unknown, has no image, the
    /// request fails, or the importer cannot store it. The failure is also
    /// sent to the notifier.
    pub async fn download(&self, catalog: &Catalog, card_path: &str) -> Result<Imported, DownloadError> {
        let result = match catalog.find(card_path) {
            Some(entry) => self.fetch_and_import(entry).await,
            None => Err(DownloadError::NotFound(card_path.to_string())),
        };

        match &result {
            Ok(card) => {
                info!(path = %card.path, location = %card.location.display(), bytes = card.bytes, "Card downloaded");
                self.notifier
                    .success(&format!("Downloaded {} ({})", card.name, card.size()));
            }
            Err(e) => {
                warn!(path = card_path, error = %e, "Card download failed");
                self.notifier.error(&format!("Failed to download card: {e}"));
            }
        }

        result
    }

    /// Download several cards one after another
    ///
    /// Failures do not stop the batch; they are collected in the report.
    pub async fn download_batch(&self, catalog: &Catalog, card_paths: &[String]) -> DownloadReport {
        let mut report = DownloadReport::default();

        for card_path in card_paths {
            match self.download(catalog, card_path).await {
                Ok(card) => report.imported.push(card),
                Err(e) => report.failed.push((card_path.clone(), e)),
            }
        }

        debug!(
            imported = report.imported.len(),
            failed = report.failed.len(),
            "Batch download finished"
        );
        report
    }

    async fn fetch_and_import(&self, entry: &Entry) -> Result<Imported, DownloadError> {
        let url = entry
            .image_url
            .as_deref()
            .ok_or_else(|| DownloadError::MissingImage(entry.path.clone()))?;

        let bytes = self.fetch_image(url).await?;
        let location = self.importer.import(&bytes, path::file_name(&entry.path))?;

        Ok(Imported {
            path: entry.path.clone(),
            name: entry.name.clone(),
            location,
            bytes: bytes.len() as u64,
        })
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let transport = |source| DownloadError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await.map_err(transport)?.to_vec())
    }
}


#[cfg(test)]
#[path = "download_tests.rs"]
mod download_tests;
