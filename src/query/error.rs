//! Search term errors
//!
//! These never reach the user: a regex literal that fails with either error
//! is matched as plain text instead.
//!
//! - **`InvalidFlags`**: unknown or repeated flags, or `u` combined with `v`
//! - **`Regex`**: the pattern itself does not compile

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid regex flags: '{0}'")]
    InvalidFlags(String),

    #[error("Invalid regex: {0}")]
    Regex(#[from] fancy_regex::Error),
}
