//! Buffer command - print the buffer polygon around a point.

use bufferpick::geometry::{circle_polygon, CircleMode, GeoPoint, GeometryError};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the buffer command.
pub struct BufferArgs {
    pub lon: f64,
    pub lat: f64,
    pub radius: Option<f64>,
    pub vertices: Option<usize>,
    pub geodesic: bool,
}

/// Run the buffer command.
pub fn run(runner: &CliRunner, args: BufferArgs) -> Result<(), CliError> {
    let picker = &runner.config().picker;
    let radius = args.radius.unwrap_or(picker.radius_meters);
    let vertices = args.vertices.unwrap_or(picker.vertex_count);
    // CLI flag wins, then config
    let mode = if args.geodesic {
        CircleMode::Geodesic
    } else {
        picker.circle_mode
    };

    println!("{}", buffer_geojson(args.lon, args.lat, radius, vertices, mode)?);
    Ok(())
}

/// Builds the buffer polygon and serializes it.
pub fn buffer_geojson(
    lon: f64,
    lat: f64,
    radius: f64,
    vertices: usize,
    mode: CircleMode,
) -> Result<String, CliError> {
    let center = GeoPoint::new(lon, lat);
    if !center.is_valid() {
        return Err(CliError::Geometry(GeometryError::InvalidCenter {
            longitude: lon,
            latitude: lat,
        }));
    }
    let polygon = circle_polygon(center, radius, vertices, mode)?;
    Ok(polygon.to_geojson().to_json_string()?)
}
