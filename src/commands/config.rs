//! Config command - inspect and change settings

use super::AppContext;
use crate::{CardcatError, Result, cli::ConfigCommands, notify::Notifier};

/// Execute the config command
///
/// # Errors
/// Returns an error if the settings cannot be serialized, a value is
/// invalid, or the settings file cannot be written
pub fn execute(ctx: &mut AppContext, command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let text = toml::to_string_pretty(&ctx.settings)
                .map_err(|e| CardcatError::InvalidInput(format!("Failed to serialize settings: {e}")))?;
            print!("{text}");
        }
        ConfigCommands::Path => println!("{}", ctx.settings_path.display()),
        ConfigCommands::Set { key, value } => {
            ctx.settings.set(key, value)?;
            ctx.save_settings()?;
            ctx.notifier().success(&format!("Set {key} = {value}"));
        }
    }
    Ok(())
}
