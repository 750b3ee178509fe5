//! Map/view provisioning.
//!
//! The [`MapViewProvisioner`] owns the lifecycle of exactly one map and one
//! view. Each object is published to its own [`ResourceBroker`] immediately
//! after construction, so consumers that asked early are released in
//! registration order. Provisioning again once the objects exist is a no-op.
//!
//! # Lifecycle
//!
//! ```text
//! provision(None)        ──► SurfaceUnavailable   (nothing created)
//! provision(Some(s))     ──► create map ─► publish ─► create view ─► publish
//! provision(Some(s)) x2  ──► AlreadyProvisioned
//! ```

mod options;

pub use options::{
    MapOptions, MapSettings, ViewOptions, ViewSettings, DEFAULT_BASEMAP, DEFAULT_CENTER,
    DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_ZOOM,
};

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info};

use crate::broker::ResourceBroker;
use crate::engine::{MapEngine, SharedMap, SharedView, Surface};

/// Broker name used for the map.
pub const MAP_BROKER_NAME: &str = "map";

/// Broker name used for the view.
pub const VIEW_BROKER_NAME: &str = "view";

/// Errors from resolving provisioning configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ProvisionError {
    /// View center outside WGS84 bounds.
    #[error("Invalid view center: ({longitude}, {latitude})")]
    InvalidCenter { longitude: f64, latitude: f64 },

    /// Zoom bounds not finite or inverted.
    #[error("Invalid zoom bounds: min {min_zoom} > max {max_zoom}")]
    InvalidZoomBounds { min_zoom: f64, max_zoom: f64 },

    /// Zoom level not finite.
    #[error("Invalid zoom level: {0}")]
    InvalidZoom(f64),
}

/// Result of a provisioning attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// No surface mounted yet; nothing was created.
    SurfaceUnavailable,
    /// At least one object was created and published.
    Created { map: bool, view: bool },
    /// Map and view already existed.
    AlreadyProvisioned,
}

/// Creates and publishes the map/view pair.
pub struct MapViewProvisioner {
    engine: Arc<dyn MapEngine>,
    map_settings: MapSettings,
    view_settings: ViewSettings,
    map_broker: Arc<ResourceBroker<SharedMap>>,
    view_broker: Arc<ResourceBroker<SharedView>>,
    map: Mutex<Option<SharedMap>>,
    view: Mutex<Option<SharedView>>,
}

impl MapViewProvisioner {
    /// Creates a provisioner with its own pair of brokers.
    pub fn new(
        engine: Arc<dyn MapEngine>,
        map_options: &MapOptions,
        view_options: &ViewOptions,
    ) -> Result<Self, ProvisionError> {
        Self::with_brokers(
            engine,
            map_options,
            view_options,
            Arc::new(ResourceBroker::new(MAP_BROKER_NAME)),
            Arc::new(ResourceBroker::new(VIEW_BROKER_NAME)),
        )
    }

    /// Creates a provisioner publishing into the given brokers.
    pub fn with_brokers(
        engine: Arc<dyn MapEngine>,
        map_options: &MapOptions,
        view_options: &ViewOptions,
        map_broker: Arc<ResourceBroker<SharedMap>>,
        view_broker: Arc<ResourceBroker<SharedView>>,
    ) -> Result<Self, ProvisionError> {
        Ok(Self {
            engine,
            map_settings: map_options.resolve(),
            view_settings: view_options.resolve()?,
            map_broker,
            view_broker,
            map: Mutex::new(None),
            view: Mutex::new(None),
        })
    }

    /// Creates whatever is still missing and publishes it.
    ///
    /// Without a mounted surface nothing happens; waiting consumers stay
    /// queued until a later call succeeds.
    pub fn provision(&self, surface: Option<&Surface>) -> ProvisionOutcome {
        let Some(surface) = surface else {
            debug!("Surface not mounted, deferring map/view creation");
            return ProvisionOutcome::SurfaceUnavailable;
        };

        let (map, created_map) = {
            let mut slot = self.map.lock();
            match slot.as_ref() {
                Some(map) => (Arc::clone(map), false),
                None => {
                    let map = self.engine.create_map(&self.map_settings);
                    *slot = Some(Arc::clone(&map));
                    (map, true)
                }
            }
        };
        if created_map {
            info!(
                engine = self.engine.name(),
                basemap = %self.map_settings.basemap,
                "Map created"
            );
            self.map_broker.publish(Arc::clone(&map));
        }

        let created_view = {
            let mut slot = self.view.lock();
            match slot.as_ref() {
                Some(_) => None,
                None => {
                    let view = self
                        .engine
                        .create_view(&map, &self.view_settings, surface);
                    *slot = Some(Arc::clone(&view));
                    Some(view)
                }
            }
        };
        let created_view = match created_view {
            Some(view) => {
                info!(
                    surface = surface.id(),
                    zoom = self.view_settings.zoom,
                    "View created"
                );
                self.view_broker.publish(view);
                true
            }
            None => false,
        };

        if created_map || created_view {
            ProvisionOutcome::Created {
                map: created_map,
                view: created_view,
            }
        } else {
            debug!("Map and view already provisioned");
            ProvisionOutcome::AlreadyProvisioned
        }
    }

    /// Broker resolving to the map.
    pub fn map_broker(&self) -> &Arc<ResourceBroker<SharedMap>> {
        &self.map_broker
    }

    /// Broker resolving to the view.
    pub fn view_broker(&self) -> &Arc<ResourceBroker<SharedView>> {
        &self.view_broker
    }

    /// The map, if created.
    pub fn map(&self) -> Option<SharedMap> {
        self.map.lock().clone()
    }

    /// The view, if created.
    pub fn view(&self) -> Option<SharedView> {
        self.view.lock().clone()
    }

    /// Resolved map settings.
    pub fn map_settings(&self) -> &MapSettings {
        &self.map_settings
    }

    /// Resolved view settings.
    pub fn view_settings(&self) -> &ViewSettings {
        &self.view_settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::InMemoryEngine;
    use futures::FutureExt;

    fn provisioner() -> (Arc<InMemoryEngine>, MapViewProvisioner) {
        let engine = Arc::new(InMemoryEngine::new());
        let provisioner = MapViewProvisioner::new(
            engine.clone(),
            &MapOptions::default(),
            &ViewOptions::default(),
        )
        .unwrap();
        (engine, provisioner)
    }

    #[test]
    fn test_no_surface_creates_nothing() {
        let (engine, provisioner) = provisioner();
        assert_eq!(
            provisioner.provision(None),
            ProvisionOutcome::SurfaceUnavailable
        );
        assert_eq!(engine.maps_created(), 0);
        assert!(!provisioner.map_broker().is_published());
    }

    #[test]
    fn test_provision_creates_and_publishes_both() {
        let (engine, provisioner) = provisioner();
        let surface = Surface::new("map", 800, 600);

        assert_eq!(
            provisioner.provision(Some(&surface)),
            ProvisionOutcome::Created {
                map: true,
                view: true
            }
        );
        assert_eq!(engine.maps_created(), 1);
        assert_eq!(engine.views_created(), 1);
        assert!(provisioner.map_broker().is_published());
        assert!(provisioner.view_broker().is_published());
    }

    #[test]
    fn test_reprovision_is_noop() {
        let (engine, provisioner) = provisioner();
        let surface = Surface::new("map", 800, 600);

        provisioner.provision(Some(&surface));
        let map = provisioner.map().unwrap();
        assert_eq!(
            provisioner.provision(Some(&Surface::new("other", 10, 10))),
            ProvisionOutcome::AlreadyProvisioned
        );

        assert_eq!(engine.maps_created(), 1);
        assert_eq!(engine.views_created(), 1);
        assert!(Arc::ptr_eq(&map, &provisioner.map().unwrap()));
        assert_eq!(engine.view().unwrap().surface().id(), "map");
    }

    #[test]
    fn test_early_waiters_released_on_provision() {
        let (_engine, provisioner) = provisioner();
        let map_waiter = provisioner.map_broker().wait();
        let view_waiter = provisioner.view_broker().wait();

        provisioner.provision(None);
        provisioner.provision(Some(&Surface::new("map", 800, 600)));

        let map = map_waiter.now_or_never().expect("map published");
        let view = view_waiter.now_or_never().expect("view published");
        assert!(Arc::ptr_eq(&map, &provisioner.map().unwrap()));
        assert!(Arc::ptr_eq(&view, &provisioner.view().unwrap()));
    }

    #[test]
    fn test_map_published_before_view_created() {
        let (engine, provisioner) = provisioner();
        let seen = Arc::new(Mutex::new(None));
        let observed = Arc::clone(&seen);
        let engine_seen = Arc::clone(&engine);
        provisioner.map_broker().when_ready(move |_| {
            *observed.lock() = Some(engine_seen.views_created());
        });

        provisioner.provision(Some(&Surface::new("map", 800, 600)));
        assert_eq!(*seen.lock(), Some(0));
    }

    #[test]
    fn test_caller_options_reach_engine() {
        let engine = Arc::new(InMemoryEngine::new());
        let provisioner = MapViewProvisioner::new(
            engine.clone(),
            &MapOptions::default().with_basemap("satellite"),
            &ViewOptions::default().with_zoom(16.0),
        )
        .unwrap();
        provisioner.provision(Some(&Surface::new("map", 800, 600)));

        assert_eq!(engine.map().unwrap().settings().basemap, "satellite");
        let view = engine.view().unwrap();
        assert_eq!(view.settings().zoom, 16.0);
        assert_eq!(view.settings().min_zoom, DEFAULT_MIN_ZOOM);
    }

    #[test]
    fn test_invalid_view_options_fail_construction() {
        let engine = Arc::new(InMemoryEngine::new());
        let result = MapViewProvisioner::new(
            engine,
            &MapOptions::default(),
            &ViewOptions::default().with_zoom_bounds(5.0, 1.0),
        );
        assert!(result.is_err());
    }
}
