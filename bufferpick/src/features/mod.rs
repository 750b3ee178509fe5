//! Feature data sources and the initial feature load.
//!
//! # Sources
//!
//! - [`HttpFeatureSource`] queries the data service over HTTP
//! - [`FileFeatureSource`] reads a GeoJSON file from disk
//! - [`StaticFeatureSource`] serves a fixed response (headless runs, tests)
//!
//! The [`FeatureLoader`] awaits the map, fetches once, and adds the result as
//! a layer. A failed fetch raises one alert and leaves the map untouched.

mod file;
mod http;
mod loader;
mod types;

pub use file::FileFeatureSource;
pub use http::HttpFeatureSource;
pub use loader::{FeatureLoader, LoadOutcome, FEATURE_LAYER_ID, LOAD_FAILURE_MESSAGE};
pub use types::{
    ExtentQuery, Feature, FeatureCollection, FeatureGeometry, FeatureProperties, FetchError,
    GeoBounds,
};

use std::future::Future;
use std::pin::Pin;

use parking_lot::Mutex;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Source of the initial feature collection.
///
/// Dyn-compatible so the loader can hold an `Arc<dyn FeatureSource>`.
pub trait FeatureSource: Send + Sync {
    /// Fetches the features inside the query extent.
    fn fetch_features_for_extent<'a>(
        &'a self,
        query: &'a ExtentQuery,
    ) -> BoxFuture<'a, Result<FeatureCollection, FetchError>>;

    /// Source name for logs.
    fn name(&self) -> &str;
}

/// Source returning a preset response and recording the queries it saw.
pub struct StaticFeatureSource {
    response: Result<FeatureCollection, String>,
    queries: Mutex<Vec<ExtentQuery>>,
}

impl StaticFeatureSource {
    /// Always succeeds with `collection`.
    pub fn new(collection: FeatureCollection) -> Self {
        Self {
            response: Ok(collection),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Always succeeds with an empty collection.
    pub fn empty() -> Self {
        Self::new(FeatureCollection::empty())
    }

    /// Always fails with an HTTP error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Number of fetches issued.
    pub fn fetch_count(&self) -> usize {
        self.queries.lock().len()
    }

    /// Queries received, in order.
    pub fn queries(&self) -> Vec<ExtentQuery> {
        self.queries.lock().clone()
    }
}

impl FeatureSource for StaticFeatureSource {
    fn fetch_features_for_extent<'a>(
        &'a self,
        query: &'a ExtentQuery,
    ) -> BoxFuture<'a, Result<FeatureCollection, FetchError>> {
        Box::pin(async move {
            self.queries.lock().push(query.clone());
            self.response.clone().map_err(FetchError::Http)
        })
    }

    fn name(&self) -> &str {
        "static"
    }
}
