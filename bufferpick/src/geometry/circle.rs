//! Circle discretization.
//!
//! Builds the buffer polygon around a center point. Two construction modes
//! are supported:
//!
//! - **Planar**: the circle is drawn in Web Mercator meters, matching a map
//!   whose spatial reference is Web Mercator. Ground distance shrinks with
//!   latitude by `cos(lat)`.
//! - **Geodesic**: every vertex is the spherical destination point at the
//!   given distance, so ground distance is uniform.
//!
//! Vertices start due east of the center and proceed counter-clockwise, as
//! required for GeoJSON exterior rings. The ring is closed by repeating the
//! first vertex.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::{
    from_web_mercator, to_web_mercator, GeoPoint, GeometryError, Polygon, EARTH_RADIUS_METERS,
};

/// Number of distinct vertices used to approximate the buffer circle.
pub const BUFFER_VERTEX_COUNT: usize = 100;

/// Upper bound on distinct vertices per circle.
pub const MAX_VERTEX_COUNT: usize = 10_000;

/// How the circle is constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircleMode {
    /// Circle in Web Mercator meters.
    #[default]
    Planar,
    /// Circle of constant great-circle distance.
    Geodesic,
}

impl CircleMode {
    /// Parse from a configuration string.
    pub fn from_config_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "planar" => Some(CircleMode::Planar),
            "geodesic" => Some(CircleMode::Geodesic),
            _ => None,
        }
    }

    /// Configuration string for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            CircleMode::Planar => "planar",
            CircleMode::Geodesic => "geodesic",
        }
    }
}

/// Builds a single-ring polygon approximating a circle.
///
/// # Arguments
///
/// * `center` - Circle center (WGS84)
/// * `radius_meters` - Radius in meters, must be positive and finite
/// * `vertices` - Number of distinct vertices (3 to [`MAX_VERTEX_COUNT`])
/// * `mode` - Planar (Web Mercator) or geodesic construction
///
/// # Returns
///
/// A polygon with one ring of `vertices + 1` positions.
pub fn circle_polygon(
    center: GeoPoint,
    radius_meters: f64,
    vertices: usize,
    mode: CircleMode,
) -> Result<Polygon, GeometryError> {
    if !(radius_meters.is_finite() && radius_meters > 0.0) {
        return Err(GeometryError::InvalidRadius(radius_meters));
    }
    if vertices < 3 {
        return Err(GeometryError::TooFewVertices(vertices));
    }
    if vertices > MAX_VERTEX_COUNT {
        return Err(GeometryError::TooManyVertices(vertices));
    }
    if !(center.longitude.is_finite() && center.latitude.is_finite()) {
        return Err(GeometryError::InvalidCenter {
            longitude: center.longitude,
            latitude: center.latitude,
        });
    }

    let mut ring = Vec::with_capacity(vertices + 1);
    match mode {
        CircleMode::Planar => {
            let (cx, cy) = to_web_mercator(center);
            for i in 0..vertices {
                let angle = TAU * i as f64 / vertices as f64;
                ring.push(from_web_mercator(
                    cx + radius_meters * angle.cos(),
                    cy + radius_meters * angle.sin(),
                ));
            }
        }
        CircleMode::Geodesic => {
            for i in 0..vertices {
                let angle = TAU * i as f64 / vertices as f64;
                // Counter-clockwise from east is clockwise from north.
                let bearing = std::f64::consts::FRAC_PI_2 - angle;
                ring.push(destination_point(center, bearing, radius_meters));
            }
        }
    }
    ring.push(ring[0]);

    Ok(Polygon::new(vec![ring]))
}

/// Spherical destination point from `start` along `bearing` (radians,
/// clockwise from north) for `distance` meters.
fn destination_point(start: GeoPoint, bearing: f64, distance: f64) -> GeoPoint {
    let delta = distance / EARTH_RADIUS_METERS;
    let phi1 = start.latitude.to_radians();
    let lambda1 = start.longitude.to_radians();

    let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * bearing.cos()).asin();
    let lambda2 = lambda1
        + (bearing.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());

    GeoPoint::new(lambda2.to_degrees(), phi2.to_degrees())
}

/// Great-circle distance between two points in meters.
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = phi2 - phi1;
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}
