//! Data service types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors returned by a feature source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport or HTTP status failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body was not a valid feature collection.
    #[error("Failed to decode feature collection: {0}")]
    Decode(String),

    /// Local file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl GeoBounds {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Formats as `minLon,minLat,maxLon,maxLat`.
    pub fn to_bbox_string(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }

    /// Parses `minLon,minLat,maxLon,maxLat`.
    pub fn parse_bbox(s: &str) -> Option<Self> {
        let values: Vec<f64> = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        match values.as_slice() {
            [min_lon, min_lat, max_lon, max_lat] if min_lon <= max_lon && min_lat <= max_lat => {
                Some(Self::new(*min_lon, *min_lat, *max_lon, *max_lat))
            }
            _ => None,
        }
    }
}

/// Parameters of a feature request.
///
/// An empty query asks the service for its default extent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtentQuery {
    pub bbox: Option<GeoBounds>,
}

impl ExtentQuery {
    pub fn with_bbox(bbox: GeoBounds) -> Self {
        Self { bbox: Some(bbox) }
    }
}

/// Feature geometry as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

/// Feature properties; `id` is always present, anything else is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: FeatureGeometry,
    pub properties: FeatureProperties,
}

/// A GeoJSON feature collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// An empty collection.
    pub fn empty() -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    /// Decodes a collection from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, FetchError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature ids in order.
    pub fn ids(&self) -> Vec<&str> {
        self.features
            .iter()
            .map(|f| f.properties.id.as_str())
            .collect()
    }
}
