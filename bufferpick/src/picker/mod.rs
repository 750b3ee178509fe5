//! Picker-buffer synchronization.
//!
//! While picking is active, every click on the view places a point marker and
//! a circular buffer around it (the Graphic Pair), replacing any previous
//! pair, and reports the picked coordinates and the buffer polygon to the
//! host. Changing the radius redraws only the circle.
//!
//! # States
//!
//! ```text
//!            set_active(true)                 click
//! Inactive ───────────────────► Active ──────────────────► Active + center
//!    ▲      (attach listener       │  ◄──── click / radius ────┘
//!    │       once view exists)     │
//!    └──────── set_active(false) ──┘  (detach listener)
//! ```
//!
//! Rapid clicks are resolved last-write-wins: each click takes a generation
//! number and a click whose generation is no longer current when it is ready
//! to apply is dropped without touching the map or emitting anything.

mod config;
mod session;
mod synchronizer;

pub use config::{PickerConfig, DEFAULT_RADIUS_METERS};
pub use session::PickerSession;
pub use synchronizer::PickerSynchronizer;

use thiserror::Error;

use crate::geometry::{GeoPoint, GeometryError};

/// Id of the layer holding the picked point marker.
pub const BUFFER_POINT_LAYER_ID: &str = "bufferPointLayer";

/// Id of the layer holding the buffer circle.
pub const BUFFER_CIRCLE_LAYER_ID: &str = "bufferCircleLayer";

/// Errors from picker operations.
#[derive(Debug, Error, PartialEq)]
pub enum PickerError {
    /// Radius not positive or not finite.
    #[error("Invalid buffer radius: {0} m")]
    InvalidRadius(f64),

    /// Too few vertices for a circle.
    #[error("Invalid vertex count: {0} (need 3 to {max})", max = crate::geometry::MAX_VERTEX_COUNT)]
    InvalidVertexCount(usize),

    /// Circle construction or serialization failed.
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Activation requires a Tokio runtime to run click handling on.
    #[error("No Tokio runtime available to handle clicks")]
    NoRuntime,
}

/// Result of [`PickerSynchronizer::set_active`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The view existed and the click listener is attached.
    Attached,
    /// Activated; the listener attaches when the view is published.
    AwaitingView,
    /// Deactivated; any attached listener was removed.
    Detached,
    /// Already in the requested state.
    Unchanged,
}

/// Result of [`PickerSynchronizer::handle_click`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// Picking was inactive; nothing happened.
    Ignored,
    /// A newer click superseded this one before it applied.
    Stale { generation: u64 },
    /// The Graphic Pair was replaced and both events emitted.
    Applied { generation: u64, center: GeoPoint },
}

/// Result of [`PickerSynchronizer::set_radius`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadiusOutcome {
    /// Same radius as before.
    Unchanged,
    /// Radius stored; no point picked yet so nothing to redraw.
    NoCenter,
    /// Radius stored; the circle layer was missing so nothing was redrawn.
    NoCircle,
    /// Circle rebuilt around the existing center.
    Rebuilt { radius_meters: f64 },
}
