//! Download errors
//!
//! - **`NotFound`**: no entry with the requested path in the catalog
//! - **`MissingImage`**: the entry has no image URL to download from
//! - **`Status`**: the image request answered with a non-success status
//! - **`Transport`**: the image request never produced a response
//! - **`Io`**: the importer could not store the downloaded bytes

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("No card with path '{0}'")]
    NotFound(String),

    #[error("Card '{0}' has no image URL")]
    MissingImage(String),

    #[error("Failed to download {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to download {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to save card: {0}")]
    Io(#[from] std::io::Error),
}
