//! Remote dataset retrieval
//!
//! `DatasetSource` is the seam between the query engine and the network:
//! the engine only ever asks a source for a fresh `Dataset`, and
//! `DatasetCache` decides when that is necessary. `HttpSource` is the
//! production implementation; tests substitute in-memory sources.

pub mod cache;
pub mod error;
pub mod http;

pub use cache::{CACHE_TTL, DatasetCache};
pub use error::{FetchError, Resource};
pub use http::{HttpSource, build_client};

use crate::catalog::Dataset;
use std::future::Future;

/// Something that can produce the raw dataset pair
pub trait DatasetSource {
    /// Retrieve both resources
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if either resource cannot be retrieved or parsed.
    fn fetch(&self) -> impl Future<Output = Result<Dataset, FetchError>>;
}
