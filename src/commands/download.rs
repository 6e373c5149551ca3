//! Download command - save cards into the download directory

use super::AppContext;
use crate::download::{DirectoryImporter, Downloader, format_size};
use crate::fetch::build_client;
use crate::{CardcatError, Result};
use std::path::Path;

/// Execute the download command
///
/// Every path is attempted even if an earlier one fails.
///
/// # Errors
/// Returns an error if the dataset cannot be fetched or any download failed
pub async fn execute(ctx: &AppContext, paths: &[String], output: Option<&Path>) -> Result<()> {
    let mut engine = ctx.engine()?;
    let catalog = engine.load(false).await?;
    ctx.persist_cache(&engine);

    let dir = match output {
        Some(dir) => dir.to_path_buf(),
        None => ctx.settings.download_dir()?,
    };
    let downloader = Downloader::new(build_client()?, DirectoryImporter::new(dir), ctx.notifier());
    let report = downloader.download_batch(&catalog, paths).await;

    if ctx.quiet {
        for card in &report.imported {
            println!("{}", card.location.display());
        }
    } else if paths.len() > 1 {
        println!(
            "Downloaded {} of {} cards ({}) to {}",
            report.imported.len(),
            paths.len(),
            format_size(report.total_bytes()),
            downloader.importer().dir().display()
        );
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(CardcatError::InvalidInput(format!(
            "{} of {} downloads failed",
            report.failed.len(),
            paths.len()
        )))
    }
}
