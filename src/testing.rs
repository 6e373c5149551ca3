//! Testing utilities for cardcat
//!
//! Fixture builders for entries and datasets, in-memory dataset sources,
//! and recording collaborators for downloads and notifications.
//!
//! Only available when compiled with `cfg(test)`.

use crate::catalog::{Dataset, Entry, FilterIndex, GroupIndex};
use crate::download::{CardImporter, DownloadError};
use crate::fetch::{DatasetSource, FetchError, Resource};
use crate::notify::{NoticeLevel, Notifier};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::cell::Cell;
use std::path::PathBuf;
use std::sync::Mutex;

/// Minimal valid entry with no tags, description or dates
pub fn entry(path: &str, name: &str, author: &str) -> Entry {
    Entry {
        path: path.to_string(),
        name: name.to_string(),
        author: author.to_string(),
        description: String::new(),
        image_url: None,
        date_created: None,
        date_updated: None,
        tags: Vec::new(),
        categories: Vec::new(),
        personality: None,
        scenario: None,
        greetings: Vec::new(),
    }
}

impl Entry {
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(ToString::to_string).collect();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub const fn with_updated(mut self, date: Option<DateTime<Utc>>) -> Self {
        self.date_updated = date;
        self
    }

    pub const fn with_created(mut self, date: Option<DateTime<Utc>>) -> Self {
        self.date_created = date;
        self
    }

    pub fn with_image(mut self, url: &str) -> Self {
        self.image_url = Some(url.to_string());
        self
    }
}

/// Build a group index from a filter-resource JSON document
///
/// # Panics
/// Panics if `filters` is not a valid filter document.
pub fn group_index(filters: Value) -> GroupIndex {
    let filters: FilterIndex = serde_json::from_value(filters).expect("invalid filter index");
    GroupIndex::build(&filters)
}

/// Borrow every entry, as the query stages expect
pub fn refs(entries: &[Entry]) -> Vec<&Entry> {
    entries.iter().collect()
}

/// Names of the given entries, in order
pub fn names<'a>(entries: &[&'a Entry]) -> Vec<&'a str> {
    entries.iter().map(|entry| entry.name.as_str()).collect()
}

/// Small dataset covering the interesting normalization cases
///
/// Valid cards: Alice, Bob (backslash path, `pony` group), Spicy (NSFW) and
/// Undated (no dates). Two invalid cards are dropped by normalization.
pub fn sample_dataset() -> Dataset {
    let entries = json!({
        "cards/alice.png": {
            "name": "Alice",
            "author": "anon",
            "description": "A curious girl",
            "image_url": "https://example.invalid/alice.png",
            "datecreate": "2023-01-01",
            "dateupdate": "2024-03-10T00:00:00Z"
        },
        "cards\\bob.png": {
            "name": "Bob",
            "author": "mia",
            "dateupdate": "2024-03-05 10:00:00"
        },
        "cards/spicy.png": {
            "name": "Spicy",
            "author": "anon",
            "dateupdate": "2024-01-01"
        },
        "cards/broken.png": { "name": "Broken", "author": "anon", "error": true },
        "cards/nameless.png": { "author": "anon" },
        "cards/undated.png": { "name": "Undated", "author": "anon" }
    });
    let filters = json!({
        "tags": {
            "cards/alice.png": ["Female", "Fantasy"],
            "cards/bob.png": ["Male"],
            "cards\\spicy.png": ["Female", "NSFW"]
        },
        "nsfw": ["cards\\spicy.png"],
        "pony": ["cards/bob.png"]
    });

    Dataset::new(
        serde_json::from_value(entries).expect("invalid entries"),
        serde_json::from_value(filters).expect("invalid filters"),
    )
}

/// In-memory source that counts how often it was asked to fetch
pub struct CountingSource {
    dataset: Dataset,
    fetches: Cell<usize>,
}

impl CountingSource {
    pub const fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            fetches: Cell::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.get()
    }
}

impl DatasetSource for CountingSource {
    async fn fetch(&self) -> Result<Dataset, FetchError> {
        self.fetches.set(self.fetches.get() + 1);
        Ok(self.dataset.clone())
    }
}

/// Source whose cards resource always answers with an HTTP error
pub struct FailingSource {
    status: u16,
}

impl FailingSource {
    pub const fn new(status: u16) -> Self {
        Self { status }
    }
}

impl DatasetSource for FailingSource {
    async fn fetch(&self) -> Result<Dataset, FetchError> {
        Err(FetchError::Status {
            resource: Resource::Cards,
            status: self.status,
        })
    }
}

/// Notifier that keeps every notice for later inspection
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl RecordingNotifier {
    pub fn levels(&self) -> Vec<NoticeLevel> {
        self.notices.lock().unwrap().iter().map(|(level, _)| *level).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices.lock().unwrap().iter().map(|(_, msg)| msg.clone()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.notices.lock().unwrap().push((level, message.to_string()));
    }
}

/// Importer that keeps imported files in memory
#[derive(Default)]
pub struct MemoryImporter {
    files: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryImporter {
    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files.lock().unwrap().clone()
    }
}

impl CardImporter for MemoryImporter {
    fn import(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, DownloadError> {
        self.files
            .lock()
            .unwrap()
            .push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CategorySet, normalize};

    #[test]
    fn test_sample_dataset_normalizes_to_four_cards() {
        let dataset = sample_dataset();
        let groups = GroupIndex::build(&dataset.filters);
        let entries = normalize(&dataset, &groups, &CategorySet::default(), Utc::now());

        assert_eq!(
            refs(&entries).iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
            vec!["Alice", "Bob", "Spicy", "Undated"]
        );
    }

    #[tokio::test]
    async fn test_counting_source() {
        let source = CountingSource::new(Dataset::default());
        source.fetch().await.unwrap();
        source.fetch().await.unwrap();
        assert_eq!(source.fetches(), 2);
    }
}
