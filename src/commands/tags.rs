//! Tags command - list categories, predefined and custom tags

use super::AppContext;
use crate::{Result, catalog::tags::predefined_tags, output, query::TagCounts};

/// Execute the tags listing command
///
/// Counts come from the full catalog and are only fetched when the
/// `show_tag_count` setting is on and `--no-counts` was not given.
///
/// # Errors
/// Returns an error if counts are wanted and the dataset cannot be fetched
pub async fn execute(ctx: &AppContext, no_counts: bool) -> Result<()> {
    let counts = if no_counts || !ctx.settings.show_tag_count {
        None
    } else {
        Some(load_counts(ctx).await?)
    };
    let counts = counts.as_ref();

    let sections = [
        ("Categories", ctx.settings.categories.clone()),
        ("Tags", predefined_tags()),
        ("Custom tags", ctx.settings.custom_tags.clone()),
    ];

    let rendered: Vec<String> = sections
        .iter()
        .filter(|(_, tags)| !ctx.quiet || !tags.is_empty())
        .map(|(title, tags)| output::tag_list(title, tags, counts, None, ctx.quiet))
        .collect();

    println!("{}", rendered.join(if ctx.quiet { "\n" } else { "\n\n" }));
    Ok(())
}

async fn load_counts(ctx: &AppContext) -> Result<TagCounts> {
    let mut engine = ctx.engine()?;
    let catalog = engine.load(false).await?;
    ctx.persist_cache(&engine);
    Ok(catalog.tag_counts.clone())
}
