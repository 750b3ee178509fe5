//! Output events delivered to the host application.
//!
//! The core never reaches into host state. Everything it has to say goes
//! through a [`HostEvents`] implementation handed to it at construction.

use tokio::sync::mpsc;
use tracing::warn;

/// Receiver side of the host event stream.
pub trait HostEvents: Send + Sync {
    /// A point was picked. Coordinates are already truncated to 4 decimals.
    fn on_map_pick(&self, longitude: f64, latitude: f64);

    /// The buffer polygon changed. `geojson` is a serialized `Polygon`.
    fn on_geojson_change(&self, geojson: &str);

    /// A user-facing message.
    fn on_alert(&self, message: &str, is_error: bool);
}

/// An event as a value, for hosts that consume a stream.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    MapPick { longitude: f64, latitude: f64 },
    GeojsonChange(String),
    Alert { message: String, is_error: bool },
}

impl HostEvent {
    /// Short event name for logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            HostEvent::MapPick { .. } => "map_pick",
            HostEvent::GeojsonChange(_) => "geojson_change",
            HostEvent::Alert { .. } => "alert",
        }
    }
}

/// Forwards events into an unbounded channel.
///
/// Sending never blocks. Events emitted after the receiver is dropped are
/// discarded with a warning.
#[derive(Clone)]
pub struct ChannelEvents {
    tx: mpsc::UnboundedSender<HostEvent>,
}

impl ChannelEvents {
    /// Creates the sender and its receiving end.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HostEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: HostEvent) {
        if let Err(e) = self.tx.send(event) {
            warn!(event = e.0.kind(), "Host event receiver dropped");
        }
    }
}

impl HostEvents for ChannelEvents {
    fn on_map_pick(&self, longitude: f64, latitude: f64) {
        self.send(HostEvent::MapPick {
            longitude,
            latitude,
        });
    }

    fn on_geojson_change(&self, geojson: &str) {
        self.send(HostEvent::GeojsonChange(geojson.to_string()));
    }

    fn on_alert(&self, message: &str, is_error: bool) {
        self.send(HostEvent::Alert {
            message: message.to_string(),
            is_error,
        });
    }
}
