//! Map and view configuration.
//!
//! Callers describe what they want to change in `MapOptions` / `ViewOptions`;
//! every field is optional. `resolve()` produces the settings handed to the
//! engine, taking the caller's value where one is set and the named default
//! otherwise.

use crate::geometry::GeoPoint;

use super::ProvisionError;

/// Default basemap identifier.
pub const DEFAULT_BASEMAP: &str = "arcgis-dark-gray";

/// Default view center (Taipei).
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(121.464, 25.0138);

/// Default zoom level.
pub const DEFAULT_ZOOM: f64 = 13.0;

/// Default minimum zoom level.
pub const DEFAULT_MIN_ZOOM: f64 = 12.0;

/// Default maximum zoom level.
pub const DEFAULT_MAX_ZOOM: f64 = 20.0;

/// Caller overrides for map construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapOptions {
    /// Basemap identifier.
    pub basemap: Option<String>,
}

impl MapOptions {
    /// Set the basemap.
    pub fn with_basemap(mut self, basemap: impl Into<String>) -> Self {
        self.basemap = Some(basemap.into());
        self
    }

    /// Merges the overrides over the defaults.
    pub fn resolve(&self) -> MapSettings {
        MapSettings {
            basemap: self
                .basemap
                .clone()
                .unwrap_or_else(|| DEFAULT_BASEMAP.to_string()),
        }
    }
}

/// Resolved map settings.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub basemap: String,
}

/// Caller overrides for view construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewOptions {
    /// Initial center.
    pub center: Option<GeoPoint>,
    /// Initial zoom level.
    pub zoom: Option<f64>,
    /// Lowest zoom the user may reach.
    pub min_zoom: Option<f64>,
    /// Highest zoom the user may reach.
    pub max_zoom: Option<f64>,
}

impl ViewOptions {
    /// Set the initial center.
    pub fn with_center(mut self, center: GeoPoint) -> Self {
        self.center = Some(center);
        self
    }

    /// Set the initial zoom.
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    /// Set the zoom constraints.
    pub fn with_zoom_bounds(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = Some(min_zoom);
        self.max_zoom = Some(max_zoom);
        self
    }

    /// Merges the overrides over the default viewport.
    ///
    /// The zoom is clamped into the resolved bounds.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::InvalidCenter` for an out-of-range center and
    /// `ProvisionError::InvalidZoomBounds` when the bounds are not finite or
    /// the minimum exceeds the maximum.
    pub fn resolve(&self) -> Result<ViewSettings, ProvisionError> {
        let center = self.center.unwrap_or(DEFAULT_CENTER);
        if !center.is_valid() {
            return Err(ProvisionError::InvalidCenter {
                longitude: center.longitude,
                latitude: center.latitude,
            });
        }

        let min_zoom = self.min_zoom.unwrap_or(DEFAULT_MIN_ZOOM);
        let max_zoom = self.max_zoom.unwrap_or(DEFAULT_MAX_ZOOM);
        if !(min_zoom.is_finite() && max_zoom.is_finite()) || min_zoom > max_zoom {
            return Err(ProvisionError::InvalidZoomBounds { min_zoom, max_zoom });
        }

        let zoom = self.zoom.unwrap_or(DEFAULT_ZOOM);
        if !zoom.is_finite() {
            return Err(ProvisionError::InvalidZoom(zoom));
        }

        Ok(ViewSettings {
            center,
            zoom: zoom.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
        })
    }
}

/// Resolved view settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    pub center: GeoPoint,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}
