//! Search command - run one query and print a page

use super::AppContext;
use crate::{Result, cli::QueryArgs, output};

/// Execute the search command
///
/// # Errors
/// Returns an error if the dataset cannot be fetched
pub async fn execute(ctx: &AppContext, args: &QueryArgs) -> Result<()> {
    let mut engine = ctx.engine()?;
    let mut state = ctx.query_state(args);

    let page = engine.execute(&mut state, args.reload).await?;
    ctx.persist_cache(&engine);

    println!("{}", output::page(&page, &state, ctx.quiet));
    Ok(())
}
