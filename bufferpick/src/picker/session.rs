//! Picker session state.

use crate::geometry::GeoPoint;

/// Picking mode plus the last accepted center and the current radius.
///
/// `center` is only set by an accepted click. Radius changes never move it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerSession {
    pub active: bool,
    pub center: Option<GeoPoint>,
    pub radius_meters: f64,
}

impl PickerSession {
    /// An inactive session with no center.
    pub fn new(radius_meters: f64) -> Self {
        Self {
            active: false,
            center: None,
            radius_meters,
        }
    }

    pub fn has_center(&self) -> bool {
        self.center.is_some()
    }
}
