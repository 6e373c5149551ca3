//! Cardcat - a terminal browser for a remote character card catalog
//!
//! This library fetches the card and filter indexes of a card repository,
//! normalizes them into a queryable catalog, and runs filter, search, sort
//! and pagination over it. A time-bounded cache keeps repeated queries off
//! the network.

use thiserror::Error;

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod download;
pub mod fetch;
pub mod notify;
pub mod output;
pub mod query;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum CardcatError {
    /// Dataset fetch error
    #[error(transparent)]
    Fetch(#[from] fetch::FetchError),
    /// Card download error
    #[error(transparent)]
    Download(#[from] download::DownloadError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, CardcatError>;
