//! Query pipeline
//!
//! Turns a normalized catalog plus the session's `QueryState` into one page
//! of results. Each stage is a pure function over borrowed entries:
//!
//! - **counts**: tag and category occurrence counts over the full catalog
//! - **filter**: include/exclude tags and categories, NSFW visibility
//! - **search**: regex literal or substring search over one field
//! - **sort**: stable ordering by date, name or author
//! - **paginate**: page slicing with clamping
//!
//! `engine` composes them with dataset resolution.

pub mod counts;
pub mod engine;
pub mod error;
pub mod filter;
pub mod paginate;
pub mod search;
pub mod sort;
pub mod state;

pub use counts::{TagCounts, compute_counts};
pub use engine::{Catalog, QueryEngine, QueryPage, run_query};
pub use error::SearchError;
pub use paginate::Page;
pub use state::{ALLOWED_PAGE_SIZES, PageSize, QueryState, SearchField, SortKey};
