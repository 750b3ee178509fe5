//! Application configuration for [`PickerApp`](super::PickerApp).

use crate::config::ConfigFile;
use crate::features::ExtentQuery;
use crate::picker::PickerConfig;
use crate::provision::{MapOptions, ViewOptions};

/// Everything needed to wire the application.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    /// Map overrides.
    pub map: MapOptions,

    /// View overrides.
    pub view: ViewOptions,

    /// Picker behavior and symbols.
    pub picker: PickerConfig,

    /// Fixed extent of the initial feature fetch, independent of the view.
    pub extent: ExtentQuery,
}

impl AppConfig {
    /// Create application config from the configuration file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            map: config.to_map_options(),
            view: config.to_view_options(),
            picker: config.to_picker_config(),
            extent: config.extent_query(),
        }
    }

    pub fn with_map(mut self, map: MapOptions) -> Self {
        self.map = map;
        self
    }

    pub fn with_view(mut self, view: ViewOptions) -> Self {
        self.view = view;
        self
    }

    pub fn with_picker(mut self, picker: PickerConfig) -> Self {
        self.picker = picker;
        self
    }

    pub fn with_extent(mut self, extent: ExtentQuery) -> Self {
        self.extent = extent;
        self
    }
}
