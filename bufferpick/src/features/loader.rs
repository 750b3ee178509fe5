//! One-shot initial feature load.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::broker::ResourceBroker;
use crate::engine::{Layer, SharedMap};
use crate::events::HostEvents;

use super::{ExtentQuery, FeatureSource};

/// Id of the layer holding fetched features.
pub const FEATURE_LAYER_ID: &str = "featureLayer";

/// Alert shown when the initial fetch fails.
pub const LOAD_FAILURE_MESSAGE: &str = "failed to load data, contact developers";

/// Result of [`FeatureLoader::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Features were added to the map as one layer.
    Loaded { features: usize },
    /// The fetch failed; the alert was raised and the map is untouched.
    Failed,
    /// A load already ran for this mount.
    AlreadyStarted,
}

/// Fetches the initial features once the map exists.
///
/// The extent sent to the source is the fixed [`ExtentQuery`] given at
/// construction (normally the `[data] bbox` setting, empty when unset). It is
/// not derived from the view's visible area, and the load is not repeated
/// when the view pans or zooms.
pub struct FeatureLoader {
    map_broker: Arc<ResourceBroker<SharedMap>>,
    source: Arc<dyn FeatureSource>,
    events: Arc<dyn HostEvents>,
    query: ExtentQuery,
    started: AtomicBool,
}

impl FeatureLoader {
    pub fn new(
        map_broker: Arc<ResourceBroker<SharedMap>>,
        source: Arc<dyn FeatureSource>,
        events: Arc<dyn HostEvents>,
        query: ExtentQuery,
    ) -> Self {
        Self {
            map_broker,
            source,
            events,
            query,
            started: AtomicBool::new(false),
        }
    }

    /// Awaits the map, fetches the configured extent, and adds the feature
    /// layer.
    ///
    /// Only the first call does anything. There is no retry: a failure raises
    /// a single alert and leaves the map as it was.
    pub async fn load(&self) -> LoadOutcome {
        if self.started.swap(true, Ordering::SeqCst) {
            debug!("Feature load already started, skipping");
            return LoadOutcome::AlreadyStarted;
        }

        let map = self.map_broker.wait().await;
        debug!(source = self.source.name(), "Map ready, fetching features");

        match self.source.fetch_features_for_extent(&self.query).await {
            Ok(collection) => {
                let features = collection.len();
                map.add_layer(Layer::features(FEATURE_LAYER_ID, collection));
                info!(source = self.source.name(), features, "Features loaded");
                LoadOutcome::Loaded { features }
            }
            Err(e) => {
                warn!(source = self.source.name(), error = %e, "Feature fetch failed");
                self.events.on_alert(LOAD_FAILURE_MESSAGE, true);
                LoadOutcome::Failed
            }
        }
    }

    /// True once [`load`](Self::load) has been called.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{InMemoryEngine, InMemoryMap, LayerContent, MapEngine, MapHandle};
    use crate::events::{ChannelEvents, HostEvent};
    use crate::features::{FeatureCollection, GeoBounds, StaticFeatureSource};
    use crate::provision::MapOptions;
    use std::time::Duration;

    const SAMPLE: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","geometry":{"type":"Point","coordinates":[121.46,25.01]},"properties":{"id":"a1"}},
        {"type":"Feature","geometry":{"type":"Point","coordinates":[121.47,25.02]},"properties":{"id":"a2"}}
    ]}"#;

    fn published_map() -> (Arc<ResourceBroker<SharedMap>>, Arc<InMemoryMap>) {
        let engine = InMemoryEngine::new();
        let map = engine.create_map(&MapOptions::default().resolve());
        let broker = Arc::new(ResourceBroker::new("map"));
        broker.publish(map);
        (broker, engine.map().unwrap())
    }

    #[tokio::test]
    async fn test_success_adds_feature_layer() {
        let (broker, map) = published_map();
        let source = Arc::new(StaticFeatureSource::new(
            FeatureCollection::from_slice(SAMPLE.as_bytes()).unwrap(),
        ));
        let (events, mut rx) = ChannelEvents::new();
        let loader = FeatureLoader::new(
            broker,
            source.clone(),
            Arc::new(events),
            ExtentQuery::default(),
        );

        assert_eq!(loader.load().await, LoadOutcome::Loaded { features: 2 });

        let layer = map.find_layer(FEATURE_LAYER_ID).unwrap();
        match layer.content {
            LayerContent::Features(features) => {
                assert_eq!(features.collection.ids(), vec!["a1", "a2"])
            }
            other => panic!("unexpected layer content: {:?}", other),
        }
        assert_eq!(source.fetch_count(), 1);
        assert!(rx.try_recv().is_err(), "No alert on success");
    }

    #[tokio::test]
    async fn test_failure_alerts_once_and_adds_nothing() {
        let (broker, map) = published_map();
        let (events, mut rx) = ChannelEvents::new();
        let loader = FeatureLoader::new(
            broker,
            Arc::new(StaticFeatureSource::failing("HTTP 500")),
            Arc::new(events),
            ExtentQuery::default(),
        );

        assert_eq!(loader.load().await, LoadOutcome::Failed);

        assert_eq!(map.layer_count(), 0);
        assert!(map.operations().is_empty());
        assert_eq!(
            rx.try_recv().unwrap(),
            HostEvent::Alert {
                message: LOAD_FAILURE_MESSAGE.to_string(),
                is_error: true
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_second_load_is_noop() {
        let (broker, map) = published_map();
        let source = Arc::new(StaticFeatureSource::empty());
        let (events, _rx) = ChannelEvents::new();
        let loader = FeatureLoader::new(
            broker,
            source.clone(),
            Arc::new(events),
            ExtentQuery::default(),
        );

        loader.load().await;
        assert_eq!(loader.load().await, LoadOutcome::AlreadyStarted);
        assert_eq!(source.fetch_count(), 1);
        assert_eq!(map.count_layers(FEATURE_LAYER_ID), 1);
    }

    #[tokio::test]
    async fn test_waits_for_map_before_fetching() {
        let broker: Arc<ResourceBroker<SharedMap>> = Arc::new(ResourceBroker::new("map"));
        let source = Arc::new(StaticFeatureSource::empty());
        let (events, _rx) = ChannelEvents::new();
        let loader = Arc::new(FeatureLoader::new(
            Arc::clone(&broker),
            source.clone(),
            Arc::new(events),
            ExtentQuery::default(),
        ));

        let task = {
            let loader = Arc::clone(&loader);
            tokio::spawn(async move { loader.load().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(source.fetch_count(), 0, "No fetch before the map exists");

        let engine = InMemoryEngine::new();
        broker.publish(engine.create_map(&MapOptions::default().resolve()));

        assert_eq!(task.await.unwrap(), LoadOutcome::Loaded { features: 0 });
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_query_reaches_source() {
        let (broker, _map) = published_map();
        let source = Arc::new(StaticFeatureSource::empty());
        let (events, _rx) = ChannelEvents::new();
        let query = ExtentQuery::with_bbox(GeoBounds::new(121.4, 25.0, 121.5, 25.1));
        let loader = FeatureLoader::new(broker, source.clone(), Arc::new(events), query.clone());

        loader.load().await;
        assert_eq!(source.queries(), vec![query]);
    }
}
