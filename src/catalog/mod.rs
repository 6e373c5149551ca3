//! Card catalog model
//!
//! Everything that describes the data itself, independent of how it is
//! fetched or queried:
//!
//! - **types**: raw `Dataset`/`FilterIndex` and normalized `Entry`
//! - **path**: separator-insensitive card path handling
//! - **index**: normalized group membership and the category set
//! - **tags**: predefined tags and the custom tag registry
//! - **normalize**: raw dataset -> validated entries

pub mod error;
pub mod index;
pub mod normalize;
pub mod path;
pub mod tags;
pub mod types;

pub use error::TagError;
pub use index::{CategorySet, GroupIndex};
pub use normalize::normalize;
pub use types::{Dataset, Entry, FilterIndex, NSFW_CATEGORY, NSFW_GROUP, RawEntries, TagDef};
