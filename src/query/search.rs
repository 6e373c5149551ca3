//! Search term matching
//!
//! A search term is either a delimited regular expression literal,
//! `/<pattern>/<flags>`, or plain text. Plain text is a case-insensitive
//! substring match. A regex literal that fails to compile is not an error:
//! the whole term, delimiters included, is matched as plain text instead.
//!
//! Supported flags are `g i m s u v y`:
//! - `i` case-insensitive, `m` multi-line anchors, `s` dot matches newline
//! - `u` and `v` select unicode mode, which is always on; using both fails
//! - `y` anchors the match at the start of the field
//! - `g` has no effect on a single test
//!
//! A repeated flag also fails compilation. Lookaround and backreferences
//! are supported.

use super::error::SearchError;
use super::state::SearchField;
use crate::catalog::Entry;
use fancy_regex::Regex;
use tracing::debug;

const FLAG_CHARS: &str = "gimsuvy";

/// How a term is tested against a field's text
#[derive(Debug, Clone)]
pub enum Matcher {
    Regex(Regex),
    /// Lowercased needle
    Substring(String),
}

impl Matcher {
    /// Build the matcher for a non-empty term
    #[must_use]
    pub fn for_term(term: &str) -> Self {
        match split_regex_literal(term) {
            Some((pattern, flags)) => match try_compile(pattern, flags) {
                Ok(regex) => Self::Regex(regex),
                Err(e) => {
                    debug!(term, error = %e, "Regex search failed to compile, matching literally");
                    Self::Substring(term.to_lowercase())
                }
            },
            None => Self::Substring(term.to_lowercase()),
        }
    }

    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Regex(regex) => regex.is_match(text).unwrap_or_else(|e| {
                debug!(error = %e, "Regex match aborted, treating as no match");
                false
            }),
            Self::Substring(needle) => text.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// Parsed regex literal flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegexFlags {
    pub ignore_case: bool,
    pub multi_line: bool,
    pub dot_all: bool,
    pub sticky: bool,
}

impl RegexFlags {
    /// Parse a flag string such as `"im"`
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidFlags` for unknown or repeated flags, or
    /// when `u` and `v` are combined.
    pub fn parse(flags: &str) -> Result<Self, SearchError> {
        let mut parsed = Self::default();
        let mut seen = String::new();

        for flag in flags.chars() {
            if !FLAG_CHARS.contains(flag) || seen.contains(flag) {
                return Err(SearchError::InvalidFlags(flags.to_string()));
            }
            seen.push(flag);

            match flag {
                'i' => parsed.ignore_case = true,
                'm' => parsed.multi_line = true,
                's' => parsed.dot_all = true,
                'y' => parsed.sticky = true,
                _ => {}
            }
        }

        if seen.contains('u') && seen.contains('v') {
            return Err(SearchError::InvalidFlags(flags.to_string()));
        }

        Ok(parsed)
    }
}

/// Compile a regex literal's pattern and flags
///
/// # Errors
///
/// Returns `SearchError` if the flags are invalid or the pattern does not
/// compile.
pub fn try_compile(pattern: &str, flags: &str) -> Result<Regex, SearchError> {
    let flags = RegexFlags::parse(flags)?;

    let mut source = String::new();
    let inline: String = [
        (flags.ignore_case, 'i'),
        (flags.multi_line, 'm'),
        (flags.dot_all, 's'),
    ]
    .iter()
    .filter_map(|&(on, c)| on.then_some(c))
    .collect();
    if !inline.is_empty() {
        source.push_str(&format!("(?{inline})"));
    }
    if flags.sticky {
        source.push_str(&format!(r"\A(?:{pattern})"));
    } else {
        source.push_str(pattern);
    }

    Ok(Regex::new(&source)?)
}

/// Split `/<pattern>/<flags>` into pattern and flags
///
/// The pattern must be non-empty and contain no line breaks, and the flags
/// may only use the supported flag characters (repeats are allowed here and
/// rejected at compile time). The closing delimiter is the last `/`.
#[must_use]
pub fn split_regex_literal(term: &str) -> Option<(&str, &str)> {
    let (pattern, flags) = term.strip_prefix('/')?.rsplit_once('/')?;

    let valid = !pattern.is_empty()
        && !pattern.contains(['\n', '\r', '\u{2028}', '\u{2029}'])
        && flags.chars().all(|c| FLAG_CHARS.contains(c));

    valid.then_some((pattern, flags))
}

impl SearchField {
    /// Test an entry's field(s) with `test`
    ///
    /// `Description` never matches an entry without a description; `Any`
    /// matches on name or author.
    pub fn matches(self, entry: &Entry, test: impl Fn(&str) -> bool) -> bool {
        match self {
            Self::Name => test(&entry.name),
            Self::Description => !entry.description.is_empty() && test(&entry.description),
            Self::Author => test(&entry.author),
            Self::Any => test(&entry.name) || test(&entry.author),
        }
    }
}

/// Keep the entries matching `term` in `field`, in their original order
///
/// An empty term keeps everything, except that searching descriptions with
/// an empty term keeps only entries with a non-blank description.
#[must_use]
pub fn apply<'a>(mut entries: Vec<&'a Entry>, term: &str, field: SearchField) -> Vec<&'a Entry> {
    if term.is_empty() {
        if field == SearchField::Description {
            entries.retain(|entry| entry.has_description());
        }
        return entries;
    }

    let matcher = Matcher::for_term(term);
    entries.retain(|entry| field.matches(entry, |text| matcher.is_match(text)));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{entry, names, refs};

    fn people() -> Vec<Entry> {
        vec![
            entry("a.png", "Alice", "Zed").with_description("A curious girl"),
            entry("b.png", "Bob", "alice_fan"),
            entry("c.png", "amy", "Carl").with_description("   "),
        ]
    }

    #[test]
    fn test_plain_substring_is_case_insensitive() {
        let entries = people();
        assert_eq!(names(&apply(refs(&entries), "ali", SearchField::Name)), vec!["Alice"]);
        assert_eq!(names(&apply(refs(&entries), "ALI", SearchField::Author)), vec!["Bob"]);
    }

    #[test]
    fn test_any_matches_name_or_author() {
        let entries = people();
        assert_eq!(
            names(&apply(refs(&entries), "ali", SearchField::Any)),
            vec!["Alice", "Bob"]
        );
    }

    #[test]
    fn test_regex_literal_with_flags() {
        let entries = people();
        assert_eq!(
            names(&apply(refs(&entries), "/^A/i", SearchField::Name)),
            vec!["Alice", "amy"]
        );
        assert_eq!(names(&apply(refs(&entries), "/^A/", SearchField::Name)), vec!["Alice"]);
    }

    #[test]
    fn test_invalid_regex_falls_back_to_literal() {
        let entries = vec![
            entry("a.png", "x/(unclosed/ y", "a"),
            entry("b.png", "unclosed", "a"),
        ];
        assert_eq!(
            names(&apply(refs(&entries), "/(unclosed/", SearchField::Name)),
            vec!["x/(unclosed/ y"]
        );
    }

    #[test]
    fn test_repeated_flag_falls_back_to_literal() {
        let entries = vec![entry("a.png", "Alice", "a"), entry("b.png", "see /ali/ii", "a")];
        assert_eq!(
            names(&apply(refs(&entries), "/ali/ii", SearchField::Name)),
            vec!["see /ali/ii"]
        );
    }

    #[test]
    fn test_description_search_skips_missing_descriptions() {
        let entries = people();
        assert_eq!(
            names(&apply(refs(&entries), "curious", SearchField::Description)),
            vec!["Alice"]
        );
        assert_eq!(
            names(&apply(refs(&entries), "/.*/", SearchField::Description)),
            vec!["Alice", "amy"]
        );
    }

    #[test]
    fn test_empty_term() {
        let entries = people();
        assert_eq!(apply(refs(&entries), "", SearchField::Name).len(), 3);
        assert_eq!(
            names(&apply(refs(&entries), "", SearchField::Description)),
            vec!["Alice"]
        );
    }

    #[test]
    fn test_split_regex_literal() {
        assert_eq!(split_regex_literal("/abc/"), Some(("abc", "")));
        assert_eq!(split_regex_literal("/a/b/gi"), Some(("a/b", "gi")));
        assert_eq!(split_regex_literal("/a/ii"), Some(("a", "ii")));
        assert_eq!(split_regex_literal("//i"), None);
        assert_eq!(split_regex_literal("/abc"), None);
        assert_eq!(split_regex_literal("abc/"), None);
        assert_eq!(split_regex_literal("/a/x"), None);
        assert_eq!(split_regex_literal("/a\nb/"), None);
    }

    #[test]
    fn test_regex_flags() {
        let flags = RegexFlags::parse("imsy").unwrap();
        assert!(flags.ignore_case && flags.multi_line && flags.dot_all && flags.sticky);
        assert_eq!(RegexFlags::parse("g").unwrap(), RegexFlags::default());
        assert!(RegexFlags::parse("ii").is_err());
        assert!(RegexFlags::parse("uv").is_err());
        assert!(RegexFlags::parse("x").is_err());
    }

    #[test]
    fn test_sticky_anchors_at_start() {
        let regex = try_compile("li", "y").unwrap();
        assert!(!regex.is_match("Alice").unwrap());
        assert!(regex.is_match("lilac").unwrap());

        let regex = try_compile("a|li", "y").unwrap();
        assert!(regex.is_match("alice").unwrap());
        assert!(!regex.is_match("Blip").unwrap());
    }

    #[test]
    fn test_lookaround_and_backreferences() {
        let entries = vec![entry("a.png", "Applejack", "a"), entry("b.png", "Apple", "a")];
        assert_eq!(
            names(&apply(refs(&entries), "/^Apple(?!$)/", SearchField::Name)),
            vec!["Applejack"]
        );

        let regex = try_compile("(?<=Apple)jack", "i").unwrap();
        assert!(regex.is_match("APPLEJACK").unwrap());
        assert!(!regex.is_match("jack").unwrap());

        let regex = try_compile(r"(\w)\1", "").unwrap();
        assert!(regex.is_match("Applejack").unwrap());
        assert!(!regex.is_match("Rarity").unwrap());
    }

    #[test]
    fn test_malformed_pattern_is_a_compile_error() {
        assert!(try_compile("(unclosed", "").is_err());
    }
}
