//! Raw card normalization
//!
//! Turns the raw cards resource into `Entry` values. Invalid cards (not an
//! object, missing a name or author, or carrying a truthy `error` marker) are
//! dropped here so that no later stage needs to guard against them.

use super::index::{CategorySet, GroupIndex};
use super::types::{Dataset, Entry};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};

/// Normalize every valid card of a dataset, in upstream order
///
/// `now` is the default for missing timestamps; pass the same instant for
/// the whole dataset so that cards without dates compare equal.
#[must_use]
pub fn normalize(
    dataset: &Dataset,
    groups: &GroupIndex,
    categories: &CategorySet,
    now: DateTime<Utc>,
) -> Vec<Entry> {
    dataset
        .entries
        .iter()
        .filter_map(|(path, value)| {
            let fields = value.as_object()?;
            normalize_entry(path, fields, dataset, groups, categories, now)
        })
        .collect()
}

fn normalize_entry(
    path: &str,
    fields: &Map<String, Value>,
    dataset: &Dataset,
    groups: &GroupIndex,
    categories: &CategorySet,
    now: DateTime<Utc>,
) -> Option<Entry> {
    if fields.get("error").is_some_and(is_truthy) {
        return None;
    }

    let name = non_empty_str(fields, "name")?;
    let author = non_empty_str(fields, "author")?;

    let updated_raw = fields.get("dateupdate").filter(|v| is_truthy(v));
    let created_raw = fields
        .get("datecreate")
        .filter(|v| is_truthy(v))
        .or(updated_raw);

    Some(Entry {
        path: path.to_string(),
        name: name.to_string(),
        author: author.to_string(),
        description: non_empty_str(fields, "description").unwrap_or_default().to_string(),
        image_url: non_empty_str(fields, "image_url").map(str::to_string),
        date_created: created_raw.map_or(Some(now), parse_timestamp),
        date_updated: updated_raw.map_or(Some(now), parse_timestamp),
        tags: dataset.filters.tags_for(path).to_vec(),
        categories: categories.memberships(groups, path),
        personality: non_empty_str(fields, "personality").map(str::to_string),
        scenario: non_empty_str(fields, "scenario").map(str::to_string),
        greetings: greetings(fields.get("greetings")),
    })
}

fn non_empty_str<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// JSON truthiness: `null`, `false`, `0`, `""` are falsy, everything else truthy
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn greetings(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Parse an upstream timestamp
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD`, and integer epoch
/// milliseconds. Returns `None` for anything else.
#[must_use]
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    s.parse::<i64>()
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod normalize_tests;
