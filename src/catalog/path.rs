//! Card path normalization
//!
//! Card paths come from the upstream repository and may use either `/` or `\`
//! as the separator, sometimes both in the same dataset. Every comparison
//! between two card paths goes through this module so that the two spellings
//! are always interchangeable.
//!
//! The canonical form uses forward slashes.

/// Rewrite every backslash as a forward slash
#[must_use]
pub fn to_forward(path: &str) -> String {
    path.replace('\\', "/")
}

/// Rewrite every forward slash as a backslash
#[must_use]
pub fn to_backward(path: &str) -> String {
    path.replace('/', "\\")
}

/// Last component of a card path, used as the suggested filename on import
///
/// Falls back to the whole path when it has no separator, and to `card.png`
/// when the path ends with a separator.
#[must_use]
pub fn file_name(path: &str) -> &str {
    match path.rsplit(is_separator).next() {
        Some("") | None => "card.png",
        Some(name) => name,
    }
}

const fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}
