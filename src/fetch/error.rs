//! Dataset fetch errors
//!
//! - **`Status`**: a remote resource answered with a non-success status
//! - **`Parse`**: a response body was not the expected JSON document
//! - **`Transport`**: the request never produced a response
//! - **`Client`**: the HTTP client could not be constructed

use std::fmt;
use thiserror::Error;

/// The two remote resources that make up a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// The cards index
    Cards,
    /// The filter/tag index
    Filters,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cards => f.write_str("cards"),
            Self::Filters => f.write_str("filters"),
        }
    }
}

/// Errors raised while resolving the remote dataset
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch {resource}: HTTP {status}")]
    Status { resource: Resource, status: u16 },

    #[error("Failed to parse {resource}: {source}")]
    Parse {
        resource: Resource,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to fetch {resource}: {source}")]
    Transport {
        resource: Resource,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// The resource that failed, if the error is tied to one
    #[must_use]
    pub const fn resource(&self) -> Option<Resource> {
        match self {
            Self::Status { resource, .. }
            | Self::Parse { resource, .. }
            | Self::Transport { resource, .. } => Some(*resource),
            Self::Client(_) => None,
        }
    }
}
