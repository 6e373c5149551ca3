//! Predefined and custom tag definitions
//!
//! The predefined set ships with the client. Custom tags are user-added,
//! persisted in the settings file, and share the same shape. Tag identity is
//! case-insensitive for duplicate detection but the spelling the user typed
//! is kept for display and filtering.

use super::error::TagError;
use super::types::TagDef;
use rand::Rng;

const PREDEFINED: &[(&str, &str, &str)] = &[
    ("Female", "Female", "#ffb6c1"),
    ("NSFW", "NSFW", "#ff6b6b"),
    ("OC", "OC", "#ffc182"),
    ("Roleplay", "Roleplay", "#e2b5ff"),
    ("Human", "Human", "#d4a373"),
    ("Fantasy", "Fantasy", "#98e8e8"),
    ("anypov", "AnyPOV", "#a8e4ff"),
    ("Romance", "Romance", "#ff9ecd"),
    ("Male", "Male", "#7ba7ff"),
    ("Scenario", "Scenario", "#ffd351"),
    ("Cute", "Cute", "#ffe066"),
    ("Dominant", "Dominant", "#ff8080"),
    ("Love", "Love", "#dda5dd"),
    ("SFW <-> NSFW", "SFW <-> NSFW", "#9ed5ff"),
    ("English", "English", "#c8a4ff"),
    ("Submissive", "Submissive", "#90b890"),
    ("Original Character", "Original Character", "#ffb3b3"),
    ("Loli", "Loli", "#b3997a"),
];

/// The predefined tag set, in display order
#[must_use]
pub fn predefined_tags() -> Vec<TagDef> {
    PREDEFINED
        .iter()
        .map(|(id, label, color)| TagDef::new(*id, *label, *color))
        .collect()
}

/// Whether `name` matches a predefined tag id, ignoring case
#[must_use]
pub fn is_predefined(name: &str) -> bool {
    let lowered = name.to_lowercase();
    PREDEFINED.iter().any(|(id, _, _)| id.to_lowercase() == lowered)
}

/// Add a custom tag
///
/// The name is trimmed first. A blank name is ignored and yields `Ok(None)`.
///
/// # Errors
///
/// Returns `TagError::Predefined` if the name collides with a predefined tag
/// and `TagError::Duplicate` if it collides with an existing custom tag.
pub fn add_custom_tag(custom: &mut Vec<TagDef>, name: &str) -> Result<Option<TagDef>, TagError> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }

    if is_predefined(name) {
        return Err(TagError::Predefined(name.to_string()));
    }

    let lowered = name.to_lowercase();
    if custom.iter().any(|tag| tag.id.to_lowercase() == lowered) {
        return Err(TagError::Duplicate(name.to_string()));
    }

    let tag = TagDef::new(name, name, random_color(&mut rand::thread_rng()));
    custom.push(tag.clone());
    Ok(Some(tag))
}

/// Remove a custom tag by exact id
///
/// Returns `true` if a tag was removed.
pub fn remove_custom_tag(custom: &mut Vec<TagDef>, id: &str) -> bool {
    let before = custom.len();
    custom.retain(|tag| tag.id != id);
    custom.len() != before
}

/// Random `#RRGGBB` color for a new custom tag
pub fn random_color(rng: &mut impl Rng) -> String {
    format!("#{:06X}", rng.gen_range(0..=0x00FF_FFFF_u32))
}
