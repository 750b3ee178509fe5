//! Picker configuration.

use crate::engine::{PictureMarkerSymbol, SimpleFillSymbol};
use crate::geometry::{CircleMode, BUFFER_VERTEX_COUNT, MAX_VERTEX_COUNT};

use super::PickerError;

/// Buffer radius used until the host sets one.
pub const DEFAULT_RADIUS_METERS: f64 = 50.0;

/// How the picker builds and draws the Graphic Pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerConfig {
    /// Initial buffer radius in meters
    pub initial_radius_meters: f64,
    /// Distinct vertices of the circle ring
    pub vertex_count: usize,
    /// Circle construction
    pub circle_mode: CircleMode,
    /// Symbol for the picked point
    pub point_symbol: PictureMarkerSymbol,
    /// Symbol for the buffer circle
    pub circle_symbol: SimpleFillSymbol,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            initial_radius_meters: DEFAULT_RADIUS_METERS,
            vertex_count: BUFFER_VERTEX_COUNT,
            circle_mode: CircleMode::default(),
            point_symbol: PictureMarkerSymbol::default(),
            circle_symbol: SimpleFillSymbol::default(),
        }
    }
}

impl PickerConfig {
    pub fn with_initial_radius(mut self, meters: f64) -> Self {
        self.initial_radius_meters = meters;
        self
    }

    pub fn with_vertex_count(mut self, count: usize) -> Self {
        self.vertex_count = count;
        self
    }

    pub fn with_circle_mode(mut self, mode: CircleMode) -> Self {
        self.circle_mode = mode;
        self
    }

    pub fn with_point_symbol(mut self, symbol: PictureMarkerSymbol) -> Self {
        self.point_symbol = symbol;
        self
    }

    pub fn with_circle_symbol(mut self, symbol: SimpleFillSymbol) -> Self {
        self.circle_symbol = symbol;
        self
    }

    /// Checks the radius and vertex count.
    pub fn validate(&self) -> Result<(), PickerError> {
        validate_radius(self.initial_radius_meters)?;
        if !(3..=MAX_VERTEX_COUNT).contains(&self.vertex_count) {
            return Err(PickerError::InvalidVertexCount(self.vertex_count));
        }
        Ok(())
    }
}

/// A radius must be positive and finite.
pub(crate) fn validate_radius(meters: f64) -> Result<(), PickerError> {
    if meters.is_finite() && meters > 0.0 {
        Ok(())
    } else {
        Err(PickerError::InvalidRadius(meters))
    }
}
