//! Output formatting for CLI display
//!
//! Pure string builders for entries, result pages, tag lists and the card
//! preview. Nothing here prints; the command handlers decide where output
//! goes. Quiet mode reduces every line to its bare identifier so output
//! stays scriptable.

use crate::catalog::{Entry, TagDef};
use crate::query::{QueryPage, QueryState, TagCounts};
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};

const DESCRIPTION_PREVIEW_CHARS: usize = 120;

/// Format a timestamp for display; unparsable dates show as `unknown`
#[must_use]
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map_or_else(|| "unknown".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

/// One result line: name, author and tags, with the path dimmed below
#[must_use]
pub fn entry_line(entry: &Entry, quiet: bool) -> String {
    if quiet {
        return entry.path.clone();
    }

    let mut line = format!("  {} by {}", entry.name.bold(), entry.author.cyan());
    if !entry.tags.is_empty() {
        line.push_str(&format!(" [{}]", entry.tags.join(", ")));
    }
    line.push_str(&format!("\n    {}", entry.path.dimmed()));

    let excerpt = description_excerpt(entry);
    if !excerpt.is_empty() {
        line.push_str(&format!("\n    {}", excerpt.italic()));
    }
    line
}

/// Header line for a page of results
#[must_use]
pub fn page_header(page: &QueryPage, state: &QueryState) -> String {
    let mut header = format!(
        "Page {}/{} · {} match{} · sorted by {}",
        page.page,
        page.total_pages,
        page.total_matched,
        if page.total_matched == 1 { "" } else { "es" },
        state.sort_key().label()
    );

    if !state.search_term().is_empty() {
        header.push_str(&format!(" · {} ~ \"{}\"", state.search_field(), state.search_term()));
    }
    if state.has_tag_filters() {
        header.push_str(&format!(" · {}", filter_summary(state)));
    }
    if !state.show_nsfw() {
        header.push_str(" · NSFW hidden");
    }
    header
}

/// Active selections as `+included -excluded`
fn filter_summary(state: &QueryState) -> String {
    let included = state.selected_tags().iter().map(|id| format!("+{id}"));
    let excluded = state.excluded_tags().iter().map(|id| format!("-{id}"));
    included.chain(excluded).collect::<Vec<_>>().join(" ")
}

/// Render a full result page
#[must_use]
pub fn page(page: &QueryPage, state: &QueryState, quiet: bool) -> String {
    let lines: Vec<String> = page.items.iter().map(|entry| entry_line(entry, quiet)).collect();
    if quiet {
        return lines.join("\n");
    }

    let mut out = page_header(page, state).bold().to_string();
    if lines.is_empty() {
        out.push_str("\n  (no matching cards)");
    } else {
        out.push('\n');
        out.push_str(&lines.join("\n"));
    }
    out
}

/// Format a tag with its occurrence count
#[must_use]
pub fn tag_with_count(tag: &str, count: Option<usize>, quiet: bool) -> String {
    match (quiet, count) {
        (true, _) => tag.to_string(),
        (false, Some(count)) => format!("{tag} ({count})"),
        (false, None) => tag.to_string(),
    }
}

/// Paint `text` with a `#RRGGBB` color; other color strings leave it plain
#[must_use]
pub fn paint(text: &str, color: &str) -> ColoredString {
    match parse_hex_color(color) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// A titled list of tag definitions
///
/// Included ids are marked `+`, excluded ids `-`. Counts are shown only
/// when `counts` is given.
#[must_use]
pub fn tag_list(
    title: &str,
    tags: &[TagDef],
    counts: Option<&TagCounts>,
    state: Option<&QueryState>,
    quiet: bool,
) -> String {
    if quiet {
        return tags.iter().map(|tag| tag.id.as_str()).collect::<Vec<_>>().join("\n");
    }

    let mut out = format!("{}:", title.bold());
    if tags.is_empty() {
        out.push_str("\n  (none)");
        return out;
    }

    for tag in tags {
        let marker = match state {
            Some(state) if state.selected_tags().contains(&tag.id) => "+".green(),
            Some(state) if state.excluded_tags().contains(&tag.id) => "-".red(),
            _ => " ".normal(),
        };
        let count = counts.map(|counts| counts.get(&tag.id).copied().unwrap_or(0));
        let label = tag_with_count(&tag.label, count, false);
        out.push_str(&format!("\n {marker} {}", paint(&label, &tag.color)));
    }
    out
}

/// Truncate to at most `max` characters, marking the cut with `…`
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

/// Detailed multi-line view of one card
#[must_use]
pub fn preview(entry: &Entry) -> String {
    let mut out = format!("{}\n", entry.name.bold());
    out.push_str(&format!("Author:   {}\n", entry.author.cyan()));
    out.push_str(&format!("Path:     {}\n", entry.path));
    out.push_str(&format!("Created:  {}\n", format_date(entry.date_created)));
    out.push_str(&format!("Updated:  {}\n", format_date(entry.date_updated)));

    if !entry.tags.is_empty() {
        out.push_str(&format!("Tags:     {}\n", entry.tags.join(", ")));
    }
    if !entry.categories.is_empty() {
        out.push_str(&format!("Category: {}\n", entry.categories.join(", ")));
    }
    if let Some(url) = &entry.image_url {
        out.push_str(&format!("Image:    {}\n", url.dimmed()));
    }

    if entry.has_description() {
        out.push_str(&format!("\n{}\n{}\n", "Description".underline(), entry.description.trim()));
    }
    if let Some(personality) = &entry.personality {
        out.push_str(&format!("\n{}\n{}\n", "Personality".underline(), personality.trim()));
    }
    if let Some(scenario) = &entry.scenario {
        out.push_str(&format!("\n{}\n{}\n", "Scenario".underline(), scenario.trim()));
    }
    if let Some(first) = entry.greetings.first() {
        let title = match entry.greetings.len() {
            1 => "Greeting".to_string(),
            n => format!("Greeting (1 of {n})"),
        };
        out.push_str(&format!("\n{}\n{}\n", title.underline(), first.trim()));
    }

    out.trim_end().to_string()
}

/// Short one-line description excerpt, empty when there is none
#[must_use]
pub fn description_excerpt(entry: &Entry) -> String {
    if entry.has_description() {
        truncate(&entry.description.replace('\n', " "), DESCRIPTION_PREVIEW_CHARS)
    } else {
        String::new()
    }
}
