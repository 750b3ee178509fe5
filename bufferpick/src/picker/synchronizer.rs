//! Keeps the Graphic Pair in step with clicks and radius changes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::broker::ResourceBroker;
use crate::engine::{
    ClickEvent, ClickHandler, Geometry, Graphic, Layer, ListenerId, SharedMap, SharedView, Symbol,
};
use crate::events::HostEvents;
use crate::geometry::{circle_polygon, GeoPoint, GeometryError, Polygon};

use super::config::validate_radius;
use super::{
    ActivationOutcome, ClickOutcome, PickerConfig, PickerError, PickerSession, RadiusOutcome,
    BUFFER_CIRCLE_LAYER_ID, BUFFER_POINT_LAYER_ID,
};

struct ListenerState {
    /// Bumped on every activation change; a pending attach only proceeds if
    /// its epoch is still current.
    epoch: u64,
    attached: Option<(SharedView, ListenerId)>,
}

/// Owns the picker session and the Graphic Pair on the map.
///
/// Map and view are only ever reached through their brokers. Host callbacks
/// are invoked while the session lock is held so that emission order matches
/// the order changes were applied; a [`HostEvents`] implementation must not
/// call back into the synchronizer synchronously.
pub struct PickerSynchronizer {
    map_broker: Arc<ResourceBroker<SharedMap>>,
    view_broker: Arc<ResourceBroker<SharedView>>,
    events: Arc<dyn HostEvents>,
    config: PickerConfig,
    session: Mutex<PickerSession>,
    generation: AtomicU64,
    listener: Mutex<ListenerState>,
}

impl PickerSynchronizer {
    /// Creates an inactive synchronizer.
    pub fn new(
        map_broker: Arc<ResourceBroker<SharedMap>>,
        view_broker: Arc<ResourceBroker<SharedView>>,
        events: Arc<dyn HostEvents>,
        config: PickerConfig,
    ) -> Result<Self, PickerError> {
        config.validate()?;
        Ok(Self {
            map_broker,
            view_broker,
            events,
            session: Mutex::new(PickerSession::new(config.initial_radius_meters)),
            config,
            generation: AtomicU64::new(0),
            listener: Mutex::new(ListenerState {
                epoch: 0,
                attached: None,
            }),
        })
    }

    /// Turns picking on or off.
    ///
    /// Activation attaches the click listener as soon as the view is
    /// published; clicks it receives are handled on the Tokio runtime that
    /// was current when this was called. Deactivation detaches it.
    pub fn set_active(self: &Arc<Self>, active: bool) -> Result<ActivationOutcome, PickerError> {
        let runtime = {
            let mut session = self.session.lock();
            if session.active == active {
                return Ok(ActivationOutcome::Unchanged);
            }
            let runtime = if active {
                Some(Handle::try_current().map_err(|_| PickerError::NoRuntime)?)
            } else {
                None
            };
            session.active = active;
            runtime
        };

        let Some(runtime) = runtime else {
            let attached = {
                let mut listener = self.listener.lock();
                listener.epoch += 1;
                listener.attached.take()
            };
            if let Some((view, id)) = attached {
                view.remove_listener(id);
                info!(listener = id.0, "Picker deactivated, click listener detached");
            } else {
                info!("Picker deactivated");
            }
            return Ok(ActivationOutcome::Detached);
        };

        let epoch = {
            let mut listener = self.listener.lock();
            listener.epoch += 1;
            listener.epoch
        };

        let this = Arc::downgrade(self);
        self.view_broker.when_ready(move |view| {
            if let Some(this) = this.upgrade() {
                this.attach_listener(view, epoch, runtime);
            }
        });

        if self.is_listening() {
            Ok(ActivationOutcome::Attached)
        } else {
            debug!("Picker activated, waiting for view");
            Ok(ActivationOutcome::AwaitingView)
        }
    }

    fn attach_listener(self: Arc<Self>, view: SharedView, epoch: u64, runtime: Handle) {
        let mut listener = self.listener.lock();
        if listener.epoch != epoch || listener.attached.is_some() {
            debug!(epoch, "Activation superseded, listener not attached");
            return;
        }

        let weak: Weak<Self> = Arc::downgrade(&self);
        let handler: ClickHandler = Arc::new(move |event: ClickEvent| {
            let Some(this) = weak.upgrade() else {
                return;
            };
            runtime.spawn(async move {
                if let Err(e) = this.handle_click(event).await {
                    warn!(error = %e, "Click handling failed");
                }
            });
        });

        let id = view.on_click(handler);
        listener.attached = Some((view, id));
        info!(listener = id.0, "Picker activated, click listener attached");
    }

    /// Handles one click on the view.
    ///
    /// While active, the clicked point is normalized through the view and
    /// becomes the new center. The previous Graphic Pair is removed before
    /// the new circle and point layers are added, then the truncated
    /// coordinates and the buffer GeoJSON are emitted.
    ///
    /// A click at a non-finite point is rejected before it takes a
    /// generation, so it never supersedes a pending valid click.
    pub async fn handle_click(&self, event: ClickEvent) -> Result<ClickOutcome, PickerError> {
        if !self.session.lock().active {
            debug!("Picker inactive, click ignored");
            return Ok(ClickOutcome::Ignored);
        }

        let point = event.map_point;
        if !(point.longitude.is_finite() && point.latitude.is_finite()) {
            return Err(GeometryError::InvalidCenter {
                longitude: point.longitude,
                latitude: point.latitude,
            }
            .into());
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let view = self.view_broker.wait().await;
        let center = view.normalize(event.map_point);
        let map = self.map_broker.wait().await;

        let mut session = self.session.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Superseded click discarded");
            return Ok(ClickOutcome::Stale { generation });
        }

        let polygon = self.build_circle(center, session.radius_meters)?;
        let geojson = polygon.to_geojson().to_json_string()?;

        session.center = Some(center);
        map.remove_layers(&[BUFFER_POINT_LAYER_ID, BUFFER_CIRCLE_LAYER_ID]);
        map.add_layer(self.circle_layer(polygon));
        map.add_layer(self.point_layer(center));

        let picked = center.truncated();
        self.events.on_map_pick(picked.longitude, picked.latitude);
        self.events.on_geojson_change(&geojson);

        info!(
            generation,
            longitude = picked.longitude,
            latitude = picked.latitude,
            radius = session.radius_meters,
            "Point picked"
        );
        Ok(ClickOutcome::Applied { generation, center })
    }

    /// Changes the buffer radius.
    ///
    /// With a picked center, only the circle layer is rebuilt and the new
    /// GeoJSON is emitted. The point layer is left alone.
    pub fn set_radius(&self, radius_meters: f64) -> Result<RadiusOutcome, PickerError> {
        validate_radius(radius_meters)?;

        let mut session = self.session.lock();
        if session.radius_meters == radius_meters {
            return Ok(RadiusOutcome::Unchanged);
        }
        session.radius_meters = radius_meters;

        let Some(center) = session.center else {
            debug!(radius = radius_meters, "No point picked yet, radius stored");
            return Ok(RadiusOutcome::NoCenter);
        };
        // A center only exists after the map was awaited, so it is published.
        let Some(map) = self.map_broker.get() else {
            return Ok(RadiusOutcome::NoCircle);
        };
        if map.find_layer(BUFFER_CIRCLE_LAYER_ID).is_none() {
            debug!("Circle layer missing, nothing to rebuild");
            return Ok(RadiusOutcome::NoCircle);
        }

        let polygon = self.build_circle(center, radius_meters)?;
        let geojson = polygon.to_geojson().to_json_string()?;

        map.remove_layers(&[BUFFER_CIRCLE_LAYER_ID]);
        map.add_layer(self.circle_layer(polygon));
        self.events.on_geojson_change(&geojson);

        info!(radius = radius_meters, "Buffer circle rebuilt");
        Ok(RadiusOutcome::Rebuilt { radius_meters })
    }

    fn build_circle(&self, center: GeoPoint, radius_meters: f64) -> Result<Polygon, PickerError> {
        Ok(circle_polygon(
            center,
            radius_meters,
            self.config.vertex_count,
            self.config.circle_mode,
        )?)
    }

    fn circle_layer(&self, polygon: Polygon) -> Layer {
        Layer::graphics(
            BUFFER_CIRCLE_LAYER_ID,
            vec![Graphic::new(
                Geometry::Polygon(polygon),
                Symbol::SimpleFill(self.config.circle_symbol.clone()),
            )],
        )
    }

    fn point_layer(&self, center: GeoPoint) -> Layer {
        Layer::graphics(
            BUFFER_POINT_LAYER_ID,
            vec![Graphic::new(
                Geometry::Point(center),
                Symbol::PictureMarker(self.config.point_symbol.clone()),
            )],
        )
    }

    /// Snapshot of the session.
    pub fn session(&self) -> PickerSession {
        *self.session.lock()
    }

    /// True while a click listener is attached to the view.
    pub fn is_listening(&self) -> bool {
        self.listener.lock().attached.is_some()
    }

    /// Generation of the most recent accepted click (0 before any).
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{InMemoryEngine, InMemoryMap, InMemoryView, MapHandle, MapOperation, Surface};
    use crate::events::{ChannelEvents, HostEvent};
    use crate::geometry::{haversine_distance, PolygonGeoJson};
    use crate::provision::{MapOptions, MapViewProvisioner, ViewOptions};
    use tokio::sync::mpsc::UnboundedReceiver;

    const PICK: GeoPoint = GeoPoint::new(121.464, 25.0138);

    struct Harness {
        engine: Arc<InMemoryEngine>,
        provisioner: MapViewProvisioner,
        picker: Arc<PickerSynchronizer>,
        rx: UnboundedReceiver<HostEvent>,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_config(PickerConfig::default())
        }

        fn with_config(config: PickerConfig) -> Self {
            let engine = Arc::new(InMemoryEngine::new());
            let provisioner = MapViewProvisioner::new(
                engine.clone(),
                &MapOptions::default(),
                &ViewOptions::default(),
            )
            .unwrap();
            let (events, rx) = ChannelEvents::new();
            let picker = Arc::new(
                PickerSynchronizer::new(
                    Arc::clone(provisioner.map_broker()),
                    Arc::clone(provisioner.view_broker()),
                    Arc::new(events),
                    config,
                )
                .unwrap(),
            );
            Self {
                engine,
                provisioner,
                picker,
                rx,
            }
        }

        fn mount(&self) {
            self.provisioner
                .provision(Some(&Surface::new("map", 800, 600)));
        }

        fn map(&self) -> Arc<InMemoryMap> {
            self.engine.map().unwrap()
        }

        fn view(&self) -> Arc<InMemoryView> {
            self.engine.view().unwrap()
        }

        fn drain(&mut self) -> Vec<HostEvent> {
            let mut events = Vec::new();
            while let Ok(event) = self.rx.try_recv() {
                events.push(event);
            }
            events
        }
    }

    fn geojson_of(event: &HostEvent) -> PolygonGeoJson {
        match event {
            HostEvent::GeojsonChange(json) => PolygonGeoJson::parse(json).unwrap(),
            other => panic!("expected geojson event, got {:?}", other),
        }
    }

    fn first_vertex_distance(geojson: &PolygonGeoJson, center: GeoPoint) -> f64 {
        let [lon, lat] = geojson.coordinates[0][0];
        haversine_distance(center, GeoPoint::new(lon, lat))
    }

    #[tokio::test]
    async fn test_click_while_inactive_is_ignored() {
        let mut h = Harness::new();
        h.mount();

        let outcome = h.picker.handle_click(ClickEvent::at(PICK)).await.unwrap();

        assert_eq!(outcome, ClickOutcome::Ignored);
        assert_eq!(h.map().layer_count(), 0);
        assert!(h.drain().is_empty());
        assert_eq!(h.picker.current_generation(), 0);
    }

    #[tokio::test]
    async fn test_first_click_creates_pair_and_emits_once() {
        let mut h = Harness::new();
        h.mount();
        h.picker.set_active(true).unwrap();

        let outcome = h.picker.handle_click(ClickEvent::at(PICK)).await.unwrap();
        assert_eq!(
            outcome,
            ClickOutcome::Applied {
                generation: 1,
                center: PICK
            }
        );

        let map = h.map();
        assert_eq!(map.count_layers(BUFFER_POINT_LAYER_ID), 1);
        assert_eq!(map.count_layers(BUFFER_CIRCLE_LAYER_ID), 1);

        let events = h.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            HostEvent::MapPick {
                longitude: 121.464,
                latitude: 25.0138
            }
        );
        let geojson = geojson_of(&events[1]);
        assert_eq!(geojson.coordinates.len(), 1);
        assert_eq!(geojson.exterior_len(), 101);

        let centroid = geojson.exterior_centroid().unwrap();
        assert!(haversine_distance(centroid, PICK) < 0.5);
        // Planar circle in Web Mercator: ground radius shrinks with cos(lat).
        let expected = 50.0 * PICK.latitude.to_radians().cos();
        assert!((first_vertex_distance(&geojson, PICK) - expected).abs() < 0.5);

        assert_eq!(h.picker.session().center, Some(PICK));
    }

    #[tokio::test]
    async fn test_click_removes_before_adding() {
        let h = Harness::new();
        h.mount();
        h.picker.set_active(true).unwrap();

        h.picker.handle_click(ClickEvent::at(PICK)).await.unwrap();

        assert_eq!(
            h.map().operations(),
            vec![
                MapOperation::Remove(vec![
                    BUFFER_POINT_LAYER_ID.to_string(),
                    BUFFER_CIRCLE_LAYER_ID.to_string()
                ]),
                MapOperation::Add(BUFFER_CIRCLE_LAYER_ID.to_string()),
                MapOperation::Add(BUFFER_POINT_LAYER_ID.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_every_click_leaves_exactly_one_pair() {
        let mut h = Harness::new();
        h.mount();
        h.picker.set_active(true).unwrap();

        for i in 0..5 {
            let point = GeoPoint::new(121.46 + i as f64 * 0.001, 25.01);
            h.picker.handle_click(ClickEvent::at(point)).await.unwrap();

            let map = h.map();
            assert_eq!(map.count_layers(BUFFER_POINT_LAYER_ID), 1);
            assert_eq!(map.count_layers(BUFFER_CIRCLE_LAYER_ID), 1);
            assert_eq!(
                map.find_layer(BUFFER_POINT_LAYER_ID)
                    .unwrap()
                    .first_graphic()
                    .unwrap()
                    .as_point(),
                Some(point)
            );
        }
        assert_eq!(h.drain().len(), 10, "Pick and GeoJSON for every click");
    }

    #[tokio::test]
    async fn test_emitted_coordinates_are_truncated() {
        let mut h = Harness::new();
        h.mount();
        h.picker.set_active(true).unwrap();

        let point = GeoPoint::new(121.46395001, -25.00385);
        h.picker.handle_click(ClickEvent::at(point)).await.unwrap();

        let events = h.drain();
        assert_eq!(
            events[0],
            HostEvent::MapPick {
                longitude: 121.4639,
                latitude: -25.0038
            }
        );
        // Geometry keeps full precision.
        assert_eq!(h.picker.session().center, Some(point));
        let geojson = geojson_of(&events[1]);
        let centroid = geojson.exterior_centroid().unwrap();
        assert!(haversine_distance(centroid, point) < 0.5);
    }

    #[tokio::test]
    async fn test_radius_change_rebuilds_only_circle() {
        let mut h = Harness::new();
        h.mount();
        h.picker.set_active(true).unwrap();
        h.picker.handle_click(ClickEvent::at(PICK)).await.unwrap();
        let before = h.drain();
        let small = geojson_of(&before[1]);

        let map = h.map();
        let point_before = map.find_layer(BUFFER_POINT_LAYER_ID).unwrap();
        map.clear_operations();

        assert_eq!(
            h.picker.set_radius(100.0).unwrap(),
            RadiusOutcome::Rebuilt {
                radius_meters: 100.0
            }
        );

        assert_eq!(
            map.operations(),
            vec![
                MapOperation::Remove(vec![BUFFER_CIRCLE_LAYER_ID.to_string()]),
                MapOperation::Add(BUFFER_CIRCLE_LAYER_ID.to_string()),
            ]
        );
        assert_eq!(map.find_layer(BUFFER_POINT_LAYER_ID).unwrap(), point_before);
        assert_eq!(map.count_layers(BUFFER_CIRCLE_LAYER_ID), 1);

        let events = h.drain();
        assert_eq!(events.len(), 1, "Only the GeoJSON is re-emitted");
        let large = geojson_of(&events[0]);
        assert_eq!(large.exterior_len(), 101);
        assert!(first_vertex_distance(&large, PICK) > first_vertex_distance(&small, PICK) * 1.9);
        let centroid = large.exterior_centroid().unwrap();
        assert!(haversine_distance(centroid, PICK) < 0.5);
        assert_eq!(h.picker.session().center, Some(PICK));
    }

    #[tokio::test]
    async fn test_radius_change_without_center_is_noop() {
        let mut h = Harness::new();
        h.mount();

        assert_eq!(h.picker.set_radius(100.0).unwrap(), RadiusOutcome::NoCenter);
        assert!(h.map().operations().is_empty());
        assert!(h.drain().is_empty());
        assert_eq!(h.picker.session().radius_meters, 100.0);
    }

    #[tokio::test]
    async fn test_radius_stored_before_first_click_is_used() {
        let mut h = Harness::new();
        h.mount();
        h.picker.set_radius(200.0).unwrap();
        h.picker.set_active(true).unwrap();

        h.picker.handle_click(ClickEvent::at(PICK)).await.unwrap();

        let geojson = geojson_of(&h.drain()[1]);
        let expected = 200.0 * PICK.latitude.to_radians().cos();
        assert!((first_vertex_distance(&geojson, PICK) - expected).abs() < 1.0);
    }

    #[tokio::test]
    async fn test_radius_with_missing_circle_layer_returns_early() {
        let mut h = Harness::new();
        h.mount();
        h.picker.set_active(true).unwrap();
        h.picker.handle_click(ClickEvent::at(PICK)).await.unwrap();
        h.drain();

        h.map().remove_layers(&[BUFFER_CIRCLE_LAYER_ID]);
        h.map().clear_operations();

        assert_eq!(h.picker.set_radius(80.0).unwrap(), RadiusOutcome::NoCircle);
        assert!(h.map().operations().is_empty());
        assert!(h.drain().is_empty());
    }

    #[tokio::test]
    async fn test_same_radius_is_unchanged() {
        let mut h = Harness::new();
        h.mount();
        h.picker.set_active(true).unwrap();
        h.picker.handle_click(ClickEvent::at(PICK)).await.unwrap();
        h.drain();

        assert_eq!(h.picker.set_radius(50.0).unwrap(), RadiusOutcome::Unchanged);
        assert!(h.drain().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_radius_is_rejected() {
        let h = Harness::new();
        assert_eq!(
            h.picker.set_radius(-5.0),
            Err(PickerError::InvalidRadius(-5.0))
        );
        assert_eq!(h.picker.session().radius_meters, 50.0);
    }

    #[tokio::test]
    async fn test_stale_click_is_discarded() {
        let mut h = Harness::new();
        h.picker.set_active(true).unwrap();

        let first = {
            let picker = Arc::clone(&h.picker);
            tokio::spawn(async move {
                picker
                    .handle_click(ClickEvent::at(GeoPoint::new(121.0, 25.0)))
                    .await
            })
        };
        let second = {
            let picker = Arc::clone(&h.picker);
            tokio::spawn(async move { picker.handle_click(ClickEvent::at(PICK)).await })
        };
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        h.mount();

        assert_eq!(
            first.await.unwrap().unwrap(),
            ClickOutcome::Stale { generation: 1 }
        );
        assert_eq!(
            second.await.unwrap().unwrap(),
            ClickOutcome::Applied {
                generation: 2,
                center: PICK
            }
        );

        let map = h.map();
        assert_eq!(map.count_layers(BUFFER_POINT_LAYER_ID), 1);
        assert_eq!(
            map.find_layer(BUFFER_POINT_LAYER_ID)
                .unwrap()
                .first_graphic()
                .unwrap()
                .as_point(),
            Some(PICK)
        );
        assert_eq!(h.drain().len(), 2, "Only the winning click emits");
    }

    #[tokio::test]
    async fn test_invalid_click_does_not_supersede_pending_click() {
        let mut h = Harness::new();
        h.picker.set_active(true).unwrap();

        let valid = {
            let picker = Arc::clone(&h.picker);
            tokio::spawn(async move { picker.handle_click(ClickEvent::at(PICK)).await })
        };
        tokio::task::yield_now().await;

        let invalid = h
            .picker
            .handle_click(ClickEvent::at(GeoPoint::new(f64::NAN, 25.0)))
            .await;
        assert!(matches!(
            invalid,
            Err(PickerError::Geometry(GeometryError::InvalidCenter { .. }))
        ));
        assert_eq!(h.picker.current_generation(), 1);

        h.mount();

        assert_eq!(
            valid.await.unwrap().unwrap(),
            ClickOutcome::Applied {
                generation: 1,
                center: PICK
            }
        );
        assert_eq!(h.map().count_layers(BUFFER_POINT_LAYER_ID), 1);
        assert_eq!(h.map().count_layers(BUFFER_CIRCLE_LAYER_ID), 1);
        let events = h.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            HostEvent::MapPick {
                longitude: 121.464,
                latitude: 25.0138
            }
        );
    }

    #[tokio::test]
    async fn test_activation_before_view_attaches_on_publish() {
        let mut h = Harness::new();

        assert_eq!(
            h.picker.set_active(true).unwrap(),
            ActivationOutcome::AwaitingView
        );
        assert!(!h.picker.is_listening());

        h.mount();
        assert!(h.picker.is_listening());
        assert_eq!(h.view().listener_count(), 1);

        assert_eq!(h.view().click(ClickEvent::at(PICK)), 1);
        let event = h.rx.recv().await.unwrap();
        assert_eq!(
            event,
            HostEvent::MapPick {
                longitude: 121.464,
                latitude: 25.0138
            }
        );
        assert!(matches!(
            h.rx.recv().await.unwrap(),
            HostEvent::GeojsonChange(_)
        ));
    }

    #[tokio::test]
    async fn test_activation_with_view_attaches_immediately() {
        let h = Harness::new();
        h.mount();
        assert_eq!(h.picker.set_active(true).unwrap(), ActivationOutcome::Attached);
        assert_eq!(h.picker.set_active(true).unwrap(), ActivationOutcome::Unchanged);
        assert_eq!(h.view().listener_count(), 1);
    }

    #[tokio::test]
    async fn test_deactivation_detaches_listener() {
        let mut h = Harness::new();
        h.mount();
        h.picker.set_active(true).unwrap();

        assert_eq!(
            h.picker.set_active(false).unwrap(),
            ActivationOutcome::Detached
        );
        assert!(!h.picker.is_listening());
        assert_eq!(h.view().listener_count(), 0);
        assert_eq!(h.view().click(ClickEvent::at(PICK)), 0);

        tokio::task::yield_now().await;
        assert!(h.drain().is_empty());
        assert_eq!(h.map().layer_count(), 0);
    }

    #[tokio::test]
    async fn test_reactivation_attaches_single_listener() {
        let h = Harness::new();
        h.mount();
        for _ in 0..3 {
            h.picker.set_active(true).unwrap();
            h.picker.set_active(false).unwrap();
        }
        h.picker.set_active(true).unwrap();
        assert_eq!(h.view().listener_count(), 1);
    }

    #[tokio::test]
    async fn test_toggle_before_view_does_not_attach() {
        let h = Harness::new();
        h.picker.set_active(true).unwrap();
        h.picker.set_active(false).unwrap();

        h.mount();
        assert!(!h.picker.is_listening());
        assert_eq!(h.view().listener_count(), 0);
    }

    #[tokio::test]
    async fn test_pick_keeps_graphics_after_deactivation() {
        let h = Harness::new();
        h.mount();
        h.picker.set_active(true).unwrap();
        h.picker.handle_click(ClickEvent::at(PICK)).await.unwrap();
        h.picker.set_active(false).unwrap();

        assert_eq!(h.map().count_layers(BUFFER_POINT_LAYER_ID), 1);
        assert_eq!(h.picker.session().center, Some(PICK));
    }

    #[test]
    fn test_activation_requires_runtime() {
        let h = Harness::new();
        assert_eq!(h.picker.set_active(true), Err(PickerError::NoRuntime));
        assert!(!h.picker.session().active);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = PickerSynchronizer::new(
            Arc::new(ResourceBroker::new("map")),
            Arc::new(ResourceBroker::new("view")),
            Arc::new(ChannelEvents::new().0),
            PickerConfig::default().with_vertex_count(1),
        );
        assert!(matches!(result, Err(PickerError::InvalidVertexCount(1))));
    }
}
