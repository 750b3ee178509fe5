//! Map engine abstraction.
//!
//! The rendering engine is an external collaborator. This module defines the
//! narrow capability surface the core relies on:
//!
//! - [`MapEngine`] constructs maps and views
//! - [`MapHandle`] manages the layers of one map
//! - [`ViewHandle`] delivers clicks and normalizes points for one view
//!
//! Handles are shared as `Arc<dyn ...>` so they can be published through a
//! [`ResourceBroker`](crate::broker::ResourceBroker) and cloned cheaply by
//! every consumer.
//!
//! [`InMemoryEngine`] is a headless implementation used by the CLI and tests.

mod layer;
mod memory;
mod symbols;

pub use layer::{FeatureLayer, Geometry, Graphic, Layer, LayerContent};
pub use memory::{InMemoryEngine, InMemoryMap, InMemoryView, MapOperation};
pub use symbols::{Color, FillStyle, PictureMarkerSymbol, SimpleFillSymbol, SimpleLineSymbol, Symbol};

use std::sync::Arc;

use crate::geometry::GeoPoint;
use crate::provision::{MapSettings, ViewSettings};

/// Shared handle to a map.
pub type SharedMap = Arc<dyn MapHandle>;

/// Shared handle to a view.
pub type SharedView = Arc<dyn ViewHandle>;

/// Callback invoked for every click on a view.
pub type ClickHandler = Arc<dyn Fn(ClickEvent) + Send + Sync>;

/// Identifies an attached click listener so it can be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Position on the rendering surface in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// A click delivered by a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    /// Where the click landed on the surface.
    pub screen: ScreenPoint,
    /// The engine's geographic reading of the click position.
    pub map_point: GeoPoint,
}

impl ClickEvent {
    /// Creates a click at a geographic point with no screen position.
    pub fn at(map_point: GeoPoint) -> Self {
        Self {
            screen: ScreenPoint::default(),
            map_point,
        }
    }
}

/// The hosting surface a view is bound to (a DOM element, a window, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    id: String,
    width: u32,
    height: u32,
}

impl Surface {
    /// Creates a surface description.
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }

    /// Surface identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Surface size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Layer management for a single map.
pub trait MapHandle: Send + Sync {
    /// Adds a layer on top of the existing ones.
    fn add_layer(&self, layer: Layer);

    /// Removes every layer whose id is listed. Unknown ids are ignored.
    fn remove_layers(&self, ids: &[&str]);

    /// Returns a copy of the first layer with the given id.
    fn find_layer(&self, id: &str) -> Option<Layer>;

    /// Ids of all layers, bottom to top.
    fn layer_ids(&self) -> Vec<String>;
}

/// Interaction surface of a single view.
pub trait ViewHandle: Send + Sync {
    /// Attaches a click listener.
    fn on_click(&self, handler: ClickHandler) -> ListenerId;

    /// Detaches a click listener. Returns false if it was not attached.
    fn remove_listener(&self, id: ListenerId) -> bool;

    /// Converts a clicked point into the view's coordinate domain.
    fn normalize(&self, point: GeoPoint) -> GeoPoint;

    /// Current view center.
    fn center(&self) -> GeoPoint;

    /// Current zoom level.
    fn zoom(&self) -> f64;
}

/// Factory for maps and views.
pub trait MapEngine: Send + Sync {
    /// Creates a map from resolved settings.
    fn create_map(&self, settings: &MapSettings) -> SharedMap;

    /// Creates a view bound to `map` and rendered into `surface`.
    fn create_view(&self, map: &SharedMap, settings: &ViewSettings, surface: &Surface)
        -> SharedView;

    /// Engine name for logs.
    fn name(&self) -> &str;
}
