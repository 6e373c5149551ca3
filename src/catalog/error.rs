//! Error types for tag registry operations

use thiserror::Error;

/// Errors raised when editing the custom tag list
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    /// The name matches a predefined tag (case-insensitive)
    #[error("Tag '{0}' already exists in the predefined tags")]
    Predefined(String),

    /// The name matches an existing custom tag (case-insensitive)
    #[error("Tag '{0}' already exists in your custom tags")]
    Duplicate(String),
}
