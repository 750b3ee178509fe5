//! Application bootstrap implementation.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::info;

use super::config::AppConfig;
use super::error::AppError;
use crate::broker::ResourceBroker;
use crate::engine::{ClickEvent, MapEngine, SharedMap, SharedView, Surface};
use crate::events::HostEvents;
use crate::features::{FeatureLoader, FeatureSource, LoadOutcome};
use crate::geometry::GeoPoint;
use crate::picker::{ActivationOutcome, ClickOutcome, PickerSynchronizer, RadiusOutcome};
use crate::provision::{MapViewProvisioner, ProvisionOutcome};

/// The provisioner, feature loader and picker sharing one map/view pair.
pub struct PickerApp {
    provisioner: MapViewProvisioner,
    loader: Arc<FeatureLoader>,
    picker: Arc<PickerSynchronizer>,
    config: AppConfig,
}

impl PickerApp {
    /// Wires the components. Nothing is created on the engine until
    /// [`mount`](Self::mount).
    ///
    /// # Errors
    ///
    /// Returns an error if the view or picker configuration is invalid.
    pub fn new(
        engine: Arc<dyn MapEngine>,
        source: Arc<dyn FeatureSource>,
        events: Arc<dyn HostEvents>,
        config: AppConfig,
    ) -> Result<Self, AppError> {
        let provisioner = MapViewProvisioner::new(engine, &config.map, &config.view)?;

        let loader = Arc::new(FeatureLoader::new(
            Arc::clone(provisioner.map_broker()),
            source,
            Arc::clone(&events),
            config.extent.clone(),
        ));

        let picker = Arc::new(PickerSynchronizer::new(
            Arc::clone(provisioner.map_broker()),
            Arc::clone(provisioner.view_broker()),
            events,
            config.picker.clone(),
        )?);

        Ok(Self {
            provisioner,
            loader,
            picker,
            config,
        })
    }

    /// Provisions the map and view on `surface` and starts the feature load.
    ///
    /// The load runs once per app; mounting again returns a handle to a task
    /// that reports [`LoadOutcome::AlreadyStarted`].
    pub fn mount(&self, surface: &Surface) -> Result<JoinHandle<LoadOutcome>, AppError> {
        let runtime = Handle::try_current().map_err(|_| AppError::NoRuntime)?;

        let outcome = self.provisioner.provision(Some(surface));
        if let ProvisionOutcome::Created { .. } = outcome {
            info!(surface = surface.id(), "Mounted");
        }

        let loader = Arc::clone(&self.loader);
        Ok(runtime.spawn(async move { loader.load().await }))
    }

    /// Turns picking on or off.
    pub fn set_picker_active(&self, active: bool) -> Result<ActivationOutcome, AppError> {
        Ok(self.picker.set_active(active)?)
    }

    /// Changes the buffer radius in meters.
    pub fn set_buffer_radius(&self, radius_meters: f64) -> Result<RadiusOutcome, AppError> {
        Ok(self.picker.set_radius(radius_meters)?)
    }

    /// Picks `point` as if the user clicked it on the view.
    pub async fn click(&self, point: GeoPoint) -> Result<ClickOutcome, AppError> {
        Ok(self.picker.handle_click(ClickEvent::at(point)).await?)
    }

    pub fn map_broker(&self) -> &Arc<ResourceBroker<SharedMap>> {
        self.provisioner.map_broker()
    }

    pub fn view_broker(&self) -> &Arc<ResourceBroker<SharedView>> {
        self.provisioner.view_broker()
    }

    pub fn provisioner(&self) -> &MapViewProvisioner {
        &self.provisioner
    }

    pub fn picker(&self) -> &Arc<PickerSynchronizer> {
        &self.picker
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
