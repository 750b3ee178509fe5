//! BufferPick - point picking with circular buffer geometry
//!
//! This library coordinates a lazily provisioned map/view pair with an
//! interactive picker: a user clicks a point, a circular buffer of configurable
//! radius is drawn around it, and the buffer polygon is handed to the host
//! application as GeoJSON.
//!
//! # Architecture
//!
//! ```text
//!                  ┌──────────────────────┐
//!                  │  MapViewProvisioner  │ creates exactly one map + view
//!                  └──────────┬───────────┘
//!                  publish    │    publish
//!             ┌───────────────┴───────────────┐
//!             ▼                               ▼
//!   ResourceBroker<SharedMap>       ResourceBroker<SharedView>
//!        │            │                       │
//!        ▼            ▼                       ▼
//!  FeatureLoader   PickerSynchronizer ◄───────┘
//!        │            │
//!        ▼            ▼
//!     on_alert    on_map_pick / on_geojson_change   (HostEvents)
//! ```
//!
//! The rendering engine and the data service are collaborators behind the
//! [`engine::MapEngine`] and [`features::FeatureSource`] traits. A headless
//! [`engine::InMemoryEngine`] is provided for tools and tests.

pub mod app;
pub mod broker;
pub mod config;
pub mod engine;
pub mod events;
pub mod features;
pub mod geometry;
pub mod logging;
pub mod picker;
pub mod provision;

/// Crate version, as declared in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
