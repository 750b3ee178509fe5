//! Headless in-memory map engine.
//!
//! Keeps layers in a vector, records every add/remove in an operation log,
//! and dispatches clicks synchronously to attached listeners. Nothing is
//! drawn. The CLI uses it to run picker sessions without a display, and the
//! tests use the operation log to check layer replacement order.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::geometry::{normalize, GeoPoint};
use crate::provision::{MapSettings, ViewSettings};

use super::{
    ClickEvent, ClickHandler, Layer, ListenerId, MapEngine, MapHandle, SharedMap, SharedView,
    Surface, ViewHandle,
};

/// A recorded layer mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapOperation {
    Add(String),
    Remove(Vec<String>),
}

/// Map that stores layers in memory.
pub struct InMemoryMap {
    settings: MapSettings,
    layers: Mutex<Vec<Layer>>,
    operations: Mutex<Vec<MapOperation>>,
}

impl InMemoryMap {
    /// Creates an empty map.
    pub fn new(settings: MapSettings) -> Self {
        Self {
            settings,
            layers: Mutex::new(Vec::new()),
            operations: Mutex::new(Vec::new()),
        }
    }

    /// Settings the map was created with.
    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    /// Number of layers with the given id.
    pub fn count_layers(&self, id: &str) -> usize {
        self.layers.lock().iter().filter(|l| l.id == id).count()
    }

    /// Total number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.lock().len()
    }

    /// Copy of the operation log.
    pub fn operations(&self) -> Vec<MapOperation> {
        self.operations.lock().clone()
    }

    /// Clears the operation log.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }
}

impl MapHandle for InMemoryMap {
    fn add_layer(&self, layer: Layer) {
        trace!(layer = %layer.id, "Adding layer");
        self.operations
            .lock()
            .push(MapOperation::Add(layer.id.clone()));
        self.layers.lock().push(layer);
    }

    fn remove_layers(&self, ids: &[&str]) {
        self.operations.lock().push(MapOperation::Remove(
            ids.iter().map(|id| id.to_string()).collect(),
        ));
        self.layers
            .lock()
            .retain(|layer| !ids.contains(&layer.id.as_str()));
    }

    fn find_layer(&self, id: &str) -> Option<Layer> {
        self.layers.lock().iter().find(|l| l.id == id).cloned()
    }

    fn layer_ids(&self) -> Vec<String> {
        self.layers.lock().iter().map(|l| l.id.clone()).collect()
    }
}

/// View that dispatches clicks to listeners on the calling thread.
pub struct InMemoryView {
    map: SharedMap,
    settings: ViewSettings,
    surface: Surface,
    listeners: Mutex<Vec<(ListenerId, ClickHandler)>>,
    next_listener: AtomicU64,
}

impl InMemoryView {
    /// Creates a view over `map`.
    pub fn new(map: SharedMap, settings: ViewSettings, surface: Surface) -> Self {
        Self {
            map,
            settings,
            surface,
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(1),
        }
    }

    /// Simulates a click, invoking every attached listener in attach order.
    ///
    /// Returns the number of listeners that received the event.
    pub fn click(&self, event: ClickEvent) -> usize {
        // Snapshot so handlers may attach or detach listeners themselves.
        let handlers: Vec<ClickHandler> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// The map this view renders.
    pub fn map(&self) -> &SharedMap {
        &self.map
    }

    /// Settings the view was created with.
    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    /// Surface the view is bound to.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

impl ViewHandle for InMemoryView {
    fn on_click(&self, handler: ClickHandler) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, handler));
        trace!(listener = id.0, "Click listener attached");
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(listener, _)| *listener != id);
        listeners.len() != before
    }

    fn normalize(&self, point: GeoPoint) -> GeoPoint {
        normalize(point)
    }

    fn center(&self) -> GeoPoint {
        self.settings.center
    }

    fn zoom(&self) -> f64 {
        self.settings.zoom
    }
}

/// Engine producing [`InMemoryMap`] and [`InMemoryView`] instances.
///
/// Keeps typed handles to the most recently created map and view so callers
/// can drive them directly.
#[derive(Default)]
pub struct InMemoryEngine {
    maps_created: AtomicUsize,
    views_created: AtomicUsize,
    last_map: Mutex<Option<Arc<InMemoryMap>>>,
    last_view: Mutex<Option<Arc<InMemoryView>>>,
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of maps created so far.
    pub fn maps_created(&self) -> usize {
        self.maps_created.load(Ordering::SeqCst)
    }

    /// Number of views created so far.
    pub fn views_created(&self) -> usize {
        self.views_created.load(Ordering::SeqCst)
    }

    /// The most recently created map.
    pub fn map(&self) -> Option<Arc<InMemoryMap>> {
        self.last_map.lock().clone()
    }

    /// The most recently created view.
    pub fn view(&self) -> Option<Arc<InMemoryView>> {
        self.last_view.lock().clone()
    }
}

impl MapEngine for InMemoryEngine {
    fn create_map(&self, settings: &MapSettings) -> SharedMap {
        let map = Arc::new(InMemoryMap::new(settings.clone()));
        self.maps_created.fetch_add(1, Ordering::SeqCst);
        *self.last_map.lock() = Some(Arc::clone(&map));
        map
    }

    fn create_view(
        &self,
        map: &SharedMap,
        settings: &ViewSettings,
        surface: &Surface,
    ) -> SharedView {
        let view = Arc::new(InMemoryView::new(
            Arc::clone(map),
            settings.clone(),
            surface.clone(),
        ));
        self.views_created.fetch_add(1, Ordering::SeqCst);
        *self.last_view.lock() = Some(Arc::clone(&view));
        view
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
