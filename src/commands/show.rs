//! Show command - preview one card by path

use super::AppContext;
use crate::{CardcatError, Result, output};

/// Execute the show command
///
/// # Errors
/// Returns an error if the dataset cannot be fetched or no card has `path`
pub async fn execute(ctx: &AppContext, path: &str) -> Result<()> {
    let mut engine = ctx.engine()?;
    let entry = engine.find_entry(path).await?;
    ctx.persist_cache(&engine);

    let entry = entry.ok_or_else(|| CardcatError::InvalidInput(format!("No card with path '{path}'")))?;
    if ctx.quiet {
        println!("{}", entry.path);
    } else {
        println!("{}", output::preview(&entry));
    }
    Ok(())
}
