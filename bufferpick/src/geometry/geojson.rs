//! GeoJSON `Polygon` serialization.

use serde::{Deserialize, Serialize};

use super::{GeoPoint, GeometryError, Polygon};

/// GeoJSON geometry type tag for polygons.
pub const POLYGON_TYPE: &str = "Polygon";

/// A GeoJSON `Polygon` geometry object.
///
/// Serializes as `{"type":"Polygon","coordinates":[[[lon,lat],...]]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonGeoJson {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

impl PolygonGeoJson {
    /// Serializes to a compact JSON string.
    pub fn to_json_string(&self) -> Result<String, GeometryError> {
        serde_json::to_string(self).map_err(|e| GeometryError::GeoJson(e.to_string()))
    }

    /// Parses a GeoJSON polygon string, rejecting other geometry types.
    pub fn parse(json: &str) -> Result<Self, GeometryError> {
        let parsed: Self =
            serde_json::from_str(json).map_err(|e| GeometryError::GeoJson(e.to_string()))?;
        if parsed.kind != POLYGON_TYPE {
            return Err(GeometryError::GeoJson(format!(
                "expected {} geometry, got {}",
                POLYGON_TYPE, parsed.kind
            )));
        }
        Ok(parsed)
    }

    /// Number of positions in the exterior ring.
    pub fn exterior_len(&self) -> usize {
        self.coordinates.first().map_or(0, Vec::len)
    }

    /// Mean of the exterior ring's distinct vertices.
    pub fn exterior_centroid(&self) -> Option<GeoPoint> {
        let ring = self.coordinates.first()?;
        // Skip the closing vertex so it is not counted twice.
        let distinct = &ring[..ring.len().saturating_sub(1)];
        if distinct.is_empty() {
            return None;
        }
        let n = distinct.len() as f64;
        let (lon, lat) = distinct
            .iter()
            .fold((0.0, 0.0), |(lon, lat), p| (lon + p[0], lat + p[1]));
        Some(GeoPoint::new(lon / n, lat / n))
    }
}

impl From<&Polygon> for PolygonGeoJson {
    fn from(polygon: &Polygon) -> Self {
        Self {
            kind: POLYGON_TYPE.to_string(),
            coordinates: polygon
                .rings()
                .iter()
                .map(|ring| ring.iter().map(GeoPoint::to_position).collect())
                .collect(),
        }
    }
}
