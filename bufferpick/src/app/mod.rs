//! Application bootstrap.
//!
//! [`PickerApp`] wires the components together around one shared pair of
//! brokers:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        PickerApp                         │
//! │                                                          │
//! │  MapViewProvisioner ──publish──► map broker, view broker │
//! │  FeatureLoader      ◄──await─── map broker               │
//! │  PickerSynchronizer ◄──await─── map broker, view broker  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use bufferpick::app::{AppConfig, PickerApp};
//!
//! let app = PickerApp::new(engine, source, events, AppConfig::default())?;
//! let load = app.mount(&surface)?;
//! app.set_picker_active(true)?;
//! app.set_buffer_radius(100.0)?;
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::PickerApp;
pub use config::AppConfig;
pub use error::AppError;
