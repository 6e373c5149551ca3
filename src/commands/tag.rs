//! Tag command - custom tag registry

use super::AppContext;
use crate::{
    Result,
    catalog::{TagDef, tags},
    cli::TagCommands,
    notify::Notifier,
    output,
};

/// Execute the custom tag command
///
/// # Errors
/// Returns an error if the settings file cannot be written
pub fn execute(ctx: &mut AppContext, command: &TagCommands) -> Result<()> {
    let notifier = ctx.notifier();

    match command {
        TagCommands::Add { name } => {
            if add_tag(&mut ctx.settings.custom_tags, name, &notifier).is_some() {
                ctx.save_settings()?;
            }
        }
        TagCommands::Remove { id } => {
            if remove_tag(&mut ctx.settings.custom_tags, id, &notifier) {
                ctx.save_settings()?;
            }
        }
        TagCommands::List => {
            println!(
                "{}",
                output::tag_list("Custom tags", &ctx.settings.custom_tags, None, None, ctx.quiet)
            );
        }
    }
    Ok(())
}

/// Add a custom tag and notify the outcome
///
/// Blank names are ignored without a notice.
pub fn add_tag(custom: &mut Vec<TagDef>, name: &str, notifier: &impl Notifier) -> Option<TagDef> {
    match tags::add_custom_tag(custom, name) {
        Ok(Some(tag)) => {
            notifier.success(&format!("Added custom tag: {}", tag.id));
            Some(tag)
        }
        Ok(None) => None,
        Err(e) => {
            notifier.warning(&e.to_string());
            None
        }
    }
}

/// Remove a custom tag and notify the outcome
pub fn remove_tag(custom: &mut Vec<TagDef>, id: &str, notifier: &impl Notifier) -> bool {
    let removed = tags::remove_custom_tag(custom, id);
    if removed {
        notifier.success(&format!("Removed custom tag: {id}"));
    } else {
        notifier.warning(&format!("No custom tag '{id}'"));
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoticeLevel;
    use crate::testing::RecordingNotifier;

    #[test]
    fn test_add_notifies_success() {
        let notifier = RecordingNotifier::default();
        let mut custom = Vec::new();

        let tag = add_tag(&mut custom, "  Kirin ", &notifier).unwrap();

        assert_eq!(tag.id, "Kirin");
        assert_eq!(custom.len(), 1);
        assert_eq!(notifier.messages(), vec!["Added custom tag: Kirin"]);
    }

    #[test]
    fn test_add_duplicates_warn() {
        let notifier = RecordingNotifier::default();
        let mut custom = Vec::new();
        add_tag(&mut custom, "Kirin", &notifier);

        assert!(add_tag(&mut custom, "kirin", &notifier).is_none());
        assert!(add_tag(&mut custom, "nsfw", &notifier).is_none());

        assert_eq!(custom.len(), 1);
        assert_eq!(
            notifier.levels(),
            vec![NoticeLevel::Success, NoticeLevel::Warning, NoticeLevel::Warning]
        );
    }

    #[test]
    fn test_blank_name_is_silent() {
        let notifier = RecordingNotifier::default();
        let mut custom = Vec::new();

        assert!(add_tag(&mut custom, "   ", &notifier).is_none());
        assert!(notifier.levels().is_empty());
    }

    #[test]
    fn test_remove_notifies() {
        let notifier = RecordingNotifier::default();
        let mut custom = vec![TagDef::new("Kirin", "Kirin", "#123456")];

        assert!(remove_tag(&mut custom, "Kirin", &notifier));
        assert!(!remove_tag(&mut custom, "Kirin", &notifier));
        assert_eq!(
            notifier.messages(),
            vec!["Removed custom tag: Kirin", "No custom tag 'Kirin'"]
        );
    }
}
