//! File-backed feature source.

use std::path::{Path, PathBuf};

use super::{BoxFuture, ExtentQuery, FeatureCollection, FeatureSource, FetchError};

/// Reads a GeoJSON feature collection from disk on every fetch.
///
/// The extent is ignored; the file is assumed to already be scoped.
pub struct FileFeatureSource {
    path: PathBuf,
}

impl FileFeatureSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeatureSource for FileFeatureSource {
    fn fetch_features_for_extent<'a>(
        &'a self,
        _query: &'a ExtentQuery,
    ) -> BoxFuture<'a, Result<FeatureCollection, FetchError>> {
        Box::pin(async move {
            let bytes = tokio::fs::read(&self.path)
                .await
                .map_err(|source| FetchError::Io {
                    path: self.path.clone(),
                    source,
                })?;
            FeatureCollection::from_slice(&bytes)
        })
    }

    fn name(&self) -> &str {
        "file"
    }
}
