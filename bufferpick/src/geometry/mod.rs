//! Geographic primitives and buffer geometry.
//!
//! Coordinates are WGS84 longitude/latitude in degrees. Circle construction
//! happens in Web Mercator (planar) or on the sphere (geodesic); the resulting
//! rings are always expressed back in longitude/latitude.

mod circle;
mod geojson;

pub use circle::{
    circle_polygon, haversine_distance, CircleMode, BUFFER_VERTEX_COUNT, MAX_VERTEX_COUNT,
};
pub use geojson::PolygonGeoJson;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum latitude representable in Web Mercator.
pub const MAX_LAT: f64 = 85.05112878;

/// Minimum latitude representable in Web Mercator.
pub const MIN_LAT: f64 = -85.05112878;

/// Maximum longitude.
pub const MAX_LON: f64 = 180.0;

/// Minimum longitude.
pub const MIN_LON: f64 = -180.0;

/// WGS84 semi-major axis, used as the sphere radius for Web Mercator and
/// geodesic calculations.
pub const EARTH_RADIUS_METERS: f64 = 6_378_137.0;

/// Scale applied before truncating emitted coordinates (4 decimal places).
pub const COORDINATE_SCALE: f64 = 10_000.0;

/// Errors produced while building geometry.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    /// Radius is not a positive, finite number of meters.
    #[error("Invalid radius: {0} (must be a positive number of meters)")]
    InvalidRadius(f64),

    /// Too few vertices to form a polygon.
    #[error("Invalid vertex count: {0} (need at least 3)")]
    TooFewVertices(usize),

    /// More vertices than a buffer ring is allowed to carry.
    #[error("Invalid vertex count: {0} (at most {max})", max = MAX_VERTEX_COUNT)]
    TooManyVertices(usize),

    /// Center has non-finite or out-of-range coordinates.
    #[error("Invalid center: ({longitude}, {latitude})")]
    InvalidCenter { longitude: f64, latitude: f64 },

    /// GeoJSON could not be produced or parsed.
    #[error("GeoJSON error: {0}")]
    GeoJson(String),
}

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
    /// Latitude in degrees
    pub latitude: f64,
}

impl GeoPoint {
    /// Creates a point from longitude and latitude, in that order.
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Returns true if both coordinates are finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (MIN_LON..=MAX_LON).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }

    /// Returns the point as a GeoJSON position `[lon, lat]`.
    pub fn to_position(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Returns the point with both coordinates truncated to 4 decimals.
    pub fn truncated(&self) -> Self {
        Self::new(
            truncate_coordinate(self.longitude),
            truncate_coordinate(self.latitude),
        )
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.longitude, self.latitude)
    }
}

/// A polygon made of closed rings of WGS84 positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    rings: Vec<Vec<GeoPoint>>,
}

impl Polygon {
    /// Creates a polygon from rings. Each ring should repeat its first vertex
    /// as its last.
    pub fn new(rings: Vec<Vec<GeoPoint>>) -> Self {
        Self { rings }
    }

    /// The polygon rings.
    pub fn rings(&self) -> &[Vec<GeoPoint>] {
        &self.rings
    }

    /// Total number of positions across all rings, closing vertices included.
    pub fn position_count(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }

    /// Converts the polygon into its GeoJSON representation.
    pub fn to_geojson(&self) -> PolygonGeoJson {
        PolygonGeoJson::from(self)
    }
}

/// Truncates a coordinate toward zero at 4 decimal places.
///
/// This is a lossy reduction: `25.01389999` becomes `25.0138` and
/// `-25.00385` becomes `-25.0038`. Only values handed to the host are
/// truncated; geometry keeps full precision.
#[inline]
pub fn truncate_coordinate(value: f64) -> f64 {
    (value * COORDINATE_SCALE).trunc() / COORDINATE_SCALE
}

/// Normalizes a point into the map's coordinate domain.
///
/// Longitude is wrapped into [-180, 180] and latitude is clamped to the
/// Web Mercator limits. Points already inside the domain are returned
/// unchanged.
pub fn normalize(point: GeoPoint) -> GeoPoint {
    let longitude = if (MIN_LON..=MAX_LON).contains(&point.longitude) {
        point.longitude
    } else {
        let wrapped = (point.longitude + 180.0).rem_euclid(360.0) - 180.0;
        // rem_euclid maps +180 onto -180; keep the eastern edge.
        if wrapped == MIN_LON && point.longitude > 0.0 {
            MAX_LON
        } else {
            wrapped
        }
    };

    GeoPoint::new(longitude, point.latitude.clamp(MIN_LAT, MAX_LAT))
}

/// Projects a WGS84 point to Web Mercator meters.
pub fn to_web_mercator(point: GeoPoint) -> (f64, f64) {
    let x = EARTH_RADIUS_METERS * point.longitude.to_radians();
    let lat = point.latitude.clamp(MIN_LAT, MAX_LAT).to_radians();
    let y = EARTH_RADIUS_METERS * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();
    (x, y)
}

/// Converts Web Mercator meters back to a WGS84 point.
pub fn from_web_mercator(x: f64, y: f64) -> GeoPoint {
    let longitude = (x / EARTH_RADIUS_METERS).to_degrees();
    let latitude = (2.0 * (y / EARTH_RADIUS_METERS).exp().atan() - std::f64::consts::FRAC_PI_2)
        .to_degrees();
    GeoPoint::new(longitude, latitude)
}
