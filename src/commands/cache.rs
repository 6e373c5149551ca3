//! Cache command - dataset cache maintenance

use super::AppContext;
use crate::{Result, cli::CacheCommands, fetch::DatasetCache, notify::Notifier};

/// Execute the cache command
///
/// # Errors
/// Returns an error if the persisted cache exists but cannot be removed
pub fn execute(ctx: &AppContext, command: &CacheCommands) -> Result<()> {
    match command {
        CacheCommands::Clear => {
            if let Some(path) = DatasetCache::default_path() {
                DatasetCache::remove_file(&path)?;
            }
            ctx.notifier().success("Cache cleared successfully");
        }
    }
    Ok(())
}
