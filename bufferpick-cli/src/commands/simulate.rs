//! Simulate command - run a headless picker session.
//!
//! Mounts the in-memory engine, loads features, activates picking, clicks
//! once through the view and optionally changes the radius, printing every
//! host event as it arrives.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bufferpick::app::{AppConfig, PickerApp};
use bufferpick::config::ConfigFile;
use bufferpick::engine::{ClickEvent, InMemoryEngine, Surface};
use bufferpick::events::{ChannelEvents, HostEvent};
use bufferpick::features::{
    FeatureSource, FileFeatureSource, HttpFeatureSource, LoadOutcome, StaticFeatureSource,
};
use bufferpick::geometry::GeoPoint;
use bufferpick::picker::RadiusOutcome;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// How long to wait for an expected event.
const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Arguments for the simulate command.
pub struct SimulateArgs {
    pub lon: f64,
    pub lat: f64,
    pub radius: Option<f64>,
    pub new_radius: Option<f64>,
    pub features: Option<PathBuf>,
    pub url: Option<String>,
}

/// Run the simulate command.
pub fn run(runner: &CliRunner, args: SimulateArgs) -> Result<(), CliError> {
    let runtime = runner.runtime()?;
    runtime.block_on(simulate(runner.config(), args))
}

/// Picks the feature source: CLI file, CLI url, config file, config url,
/// otherwise no features.
fn resolve_source(
    config: &ConfigFile,
    features: Option<PathBuf>,
    url: Option<String>,
) -> Result<Arc<dyn FeatureSource>, CliError> {
    if let Some(path) = features {
        return Ok(Arc::new(FileFeatureSource::new(path)));
    }
    if let Some(url) = url {
        return Ok(Arc::new(HttpFeatureSource::with_timeout(
            url,
            config.data.timeout_secs,
        )?));
    }
    if let Some(path) = &config.data.file {
        return Ok(Arc::new(FileFeatureSource::new(path.clone())));
    }
    if let Some(url) = &config.data.url {
        return Ok(Arc::new(HttpFeatureSource::with_timeout(
            url.clone(),
            config.data.timeout_secs,
        )?));
    }
    Ok(Arc::new(StaticFeatureSource::empty()))
}

async fn simulate(config: &ConfigFile, args: SimulateArgs) -> Result<(), CliError> {
    let source = resolve_source(config, args.features, args.url)?;
    let source_name = source.name().to_string();

    let mut app_config = AppConfig::from_config_file(config);
    if let Some(radius) = args.radius {
        app_config.picker = app_config.picker.with_initial_radius(radius);
    }

    let engine = Arc::new(InMemoryEngine::new());
    let (events, mut rx) = ChannelEvents::new();
    let app = PickerApp::new(engine.clone(), source, Arc::new(events), app_config)?;

    let load = app.mount(&Surface::new("headless", 1280, 720))?;
    let outcome = load
        .await
        .map_err(|e| CliError::Simulation(format!("feature load task failed: {}", e)))?;
    match outcome {
        LoadOutcome::Loaded { features } => {
            info!(source = %source_name, features, "Features loaded");
        }
        LoadOutcome::Failed => print_event(&next_event(&mut rx).await?),
        LoadOutcome::AlreadyStarted => {}
    }

    app.set_picker_active(true)?;
    let view = engine
        .view()
        .ok_or_else(|| CliError::Simulation("view was not created".to_string()))?;
    let point = GeoPoint::new(args.lon, args.lat);
    if view.click(ClickEvent::at(point)) == 0 {
        return Err(CliError::Simulation("no click listener attached".to_string()));
    }
    // Pick coordinates, then the buffer polygon.
    print_event(&next_event(&mut rx).await?);
    print_event(&next_event(&mut rx).await?);

    if let Some(radius) = args.new_radius {
        if let RadiusOutcome::Rebuilt { .. } = app.set_buffer_radius(radius)? {
            print_event(&next_event(&mut rx).await?);
        }
    }

    Ok(())
}

async fn next_event(rx: &mut UnboundedReceiver<HostEvent>) -> Result<HostEvent, CliError> {
    tokio::time::timeout(EVENT_TIMEOUT, rx.recv())
        .await
        .map_err(|_| CliError::Simulation("timed out waiting for host event".to_string()))?
        .ok_or_else(|| CliError::Simulation("host event channel closed".to_string()))
}

fn print_event(event: &HostEvent) {
    println!("{}", format_event(event));
}

fn format_event(event: &HostEvent) -> String {
    match event {
        HostEvent::MapPick {
            longitude,
            latitude,
        } => format!("{} {} {}", event.kind(), longitude, latitude),
        HostEvent::GeojsonChange(json) => format!("{} {}", event.kind(), json),
        HostEvent::Alert { message, is_error } => {
            let level = if *is_error { "error" } else { "info" };
            format!("{} [{}] {}", event.kind(), level, message)
        }
    }
}
