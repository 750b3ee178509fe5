//! HTTP feature source.

use std::time::Duration;

use tracing::debug;

use super::{BoxFuture, ExtentQuery, FeatureCollection, FeatureSource, FetchError};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches features from the data service with a GET request.
///
/// The extent, when present, is sent as `bbox=minLon,minLat,maxLon,maxLat`.
pub struct HttpFeatureSource {
    client: reqwest::Client,
    url: String,
}

impl HttpFeatureSource {
    /// Creates a source for `url` with the default timeout.
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(url, DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a source for `url` with a custom timeout.
    pub fn with_timeout(url: impl Into<String>, timeout_secs: u64) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FetchError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Builds the request URL for a query.
    fn request_url(&self, query: &ExtentQuery) -> String {
        match &query.bbox {
            Some(bbox) => {
                let separator = if self.url.contains('?') { '&' } else { '?' };
                format!("{}{}bbox={}", self.url, separator, bbox.to_bbox_string())
            }
            None => self.url.clone(),
        }
    }
}

impl FeatureSource for HttpFeatureSource {
    fn fetch_features_for_extent<'a>(
        &'a self,
        query: &'a ExtentQuery,
    ) -> BoxFuture<'a, Result<FeatureCollection, FetchError>> {
        Box::pin(async move {
            let url = self.request_url(query);
            debug!(url = %url, "Fetching features");

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| FetchError::Http(format!("Request failed: {}", e)))?;

            if !response.status().is_success() {
                return Err(FetchError::Http(format!(
                    "HTTP {} from {}",
                    response.status(),
                    url
                )));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| FetchError::Http(format!("Failed to read response: {}", e)))?;

            FeatureCollection::from_slice(&body)
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}
