//! Random command - preview a card picked from the whole catalog

use super::AppContext;
use crate::{Result, notify::Notifier, output};

/// Execute the random command
///
/// # Errors
/// Returns an error if the dataset cannot be fetched
pub async fn execute(ctx: &AppContext) -> Result<()> {
    let mut engine = ctx.engine()?;
    let entry = engine.random_entry(&mut rand::thread_rng()).await?;
    ctx.persist_cache(&engine);

    match entry {
        Some(entry) if ctx.quiet => println!("{}", entry.path),
        Some(entry) => println!("{}", output::preview(&entry)),
        None => ctx.notifier().error("No cards available for random selection"),
    }
    Ok(())
}
