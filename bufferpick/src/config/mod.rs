//! INI configuration file.
//!
//! The file lives at `<config dir>/bufferpick/config.ini`:
//!
//! ```ini
//! [map]
//! basemap = arcgis-dark-gray
//!
//! [view]
//! center_lon = 121.464
//! center_lat = 25.0138
//! zoom = 13
//! min_zoom = 12
//! max_zoom = 20
//!
//! [picker]
//! radius_meters = 50
//! vertex_count = 100
//! circle_mode = planar
//!
//! [data]
//! url = http://localhost:8080/apr/extent
//! file =
//! bbox =
//! timeout_secs = 30
//!
//! [logging]
//! level = info
//! directory =
//! ```
//!
//! Missing keys and empty values fall back to defaults. Values that are
//! present but do not parse are errors.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::{Ini, Properties};
use thiserror::Error;
use tracing::debug;

use crate::features::{ExtentQuery, GeoBounds};
use crate::geometry::{CircleMode, GeoPoint, BUFFER_VERTEX_COUNT, MAX_VERTEX_COUNT};
use crate::logging::{LoggingConfig, DEFAULT_LOG_FILE, DEFAULT_LOG_LEVEL};
use crate::picker::{PickerConfig, DEFAULT_RADIUS_METERS};
use crate::provision::{MapOptions, ViewOptions};

/// Default data service request timeout in seconds.
pub const DEFAULT_DATA_TIMEOUT_SECS: u64 = 30;

/// Errors reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value for {section}.{key}: '{value}'")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },

    #[error("Incomplete setting {section}.{key}: {reason}")]
    Incomplete {
        section: String,
        key: String,
        reason: String,
    },
}

/// Returns the path of the configuration file.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bufferpick")
        .join("config.ini")
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapSection {
    pub basemap: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewSection {
    pub center: Option<GeoPoint>,
    pub zoom: Option<f64>,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickerSection {
    pub radius_meters: f64,
    pub vertex_count: usize,
    pub circle_mode: CircleMode,
}

impl Default for PickerSection {
    fn default() -> Self {
        Self {
            radius_meters: DEFAULT_RADIUS_METERS,
            vertex_count: BUFFER_VERTEX_COUNT,
            circle_mode: CircleMode::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataSection {
    /// Data service endpoint.
    pub url: Option<String>,
    /// Local GeoJSON file, used instead of `url` when set.
    pub file: Option<PathBuf>,
    pub bbox: Option<GeoBounds>,
    pub timeout_secs: u64,
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            url: None,
            file: None,
            bbox: None,
            timeout_secs: DEFAULT_DATA_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSection {
    pub level: String,
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            directory: None,
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub map: MapSection,
    pub view: ViewSection,
    pub picker: PickerSection,
    pub data: DataSection,
    pub logging: LoggingSection,
}

impl ConfigFile {
    /// Loads from the default location, or returns defaults if no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_file_path();
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Loads from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ini(&ini)?;
        debug!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    /// Saves to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Saves to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        self.to_ini().write_to_file(path).map_err(write_error)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("map")) {
            config.map.basemap = string_value(section, "basemap");
        }

        if let Some(section) = ini.section(Some("view")) {
            let lon: Option<f64> = parse_value(section, "view", "center_lon")?;
            let lat: Option<f64> = parse_value(section, "view", "center_lat")?;
            config.view.center = match (lon, lat) {
                (Some(lon), Some(lat)) => Some(GeoPoint::new(lon, lat)),
                (None, None) => None,
                (Some(_), None) => {
                    return Err(incomplete("view", "center_lat", "center_lon is set"))
                }
                (None, Some(_)) => {
                    return Err(incomplete("view", "center_lon", "center_lat is set"))
                }
            };
            config.view.zoom = parse_value(section, "view", "zoom")?;
            config.view.min_zoom = parse_value(section, "view", "min_zoom")?;
            config.view.max_zoom = parse_value(section, "view", "max_zoom")?;
        }

        if let Some(section) = ini.section(Some("picker")) {
            if let Some(radius) = parse_value(section, "picker", "radius_meters")? {
                config.picker.radius_meters = radius;
            }
            if let Some(count) = parse_value::<usize>(section, "picker", "vertex_count")? {
                if !(3..=MAX_VERTEX_COUNT).contains(&count) {
                    return Err(invalid("picker", "vertex_count", &count.to_string()));
                }
                config.picker.vertex_count = count;
            }
            if let Some(mode) = string_value(section, "circle_mode") {
                config.picker.circle_mode = CircleMode::from_config_str(&mode)
                    .ok_or_else(|| invalid("picker", "circle_mode", &mode))?;
            }
        }

        if let Some(section) = ini.section(Some("data")) {
            config.data.url = string_value(section, "url");
            config.data.file = string_value(section, "file").map(PathBuf::from);
            if let Some(bbox) = string_value(section, "bbox") {
                config.data.bbox =
                    Some(GeoBounds::parse_bbox(&bbox).ok_or_else(|| invalid("data", "bbox", &bbox))?);
            }
            if let Some(secs) = parse_value(section, "data", "timeout_secs")? {
                config.data.timeout_secs = secs;
            }
        }

        if let Some(section) = ini.section(Some("logging")) {
            if let Some(level) = string_value(section, "level") {
                config.logging.level = level;
            }
            config.logging.directory = string_value(section, "directory").map(PathBuf::from);
        }

        Ok(config)
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("map"))
            .set("basemap", self.map.basemap.clone().unwrap_or_default());

        let (lon, lat) = match self.view.center {
            Some(center) => (center.longitude.to_string(), center.latitude.to_string()),
            None => (String::new(), String::new()),
        };
        ini.with_section(Some("view"))
            .set("center_lon", lon)
            .set("center_lat", lat)
            .set("zoom", optional_number(self.view.zoom))
            .set("min_zoom", optional_number(self.view.min_zoom))
            .set("max_zoom", optional_number(self.view.max_zoom));

        ini.with_section(Some("picker"))
            .set("radius_meters", self.picker.radius_meters.to_string())
            .set("vertex_count", self.picker.vertex_count.to_string())
            .set("circle_mode", self.picker.circle_mode.as_str());

        ini.with_section(Some("data"))
            .set("url", self.data.url.clone().unwrap_or_default())
            .set(
                "file",
                self.data
                    .file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            )
            .set(
                "bbox",
                self.data
                    .bbox
                    .map(|b| b.to_bbox_string())
                    .unwrap_or_default(),
            )
            .set("timeout_secs", self.data.timeout_secs.to_string());

        ini.with_section(Some("logging"))
            .set("level", self.logging.level.clone())
            .set(
                "directory",
                self.logging
                    .directory
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            );

        ini
    }

    /// Map options with the configured overrides.
    pub fn to_map_options(&self) -> MapOptions {
        MapOptions {
            basemap: self.map.basemap.clone(),
        }
    }

    /// View options with the configured overrides.
    pub fn to_view_options(&self) -> ViewOptions {
        ViewOptions {
            center: self.view.center,
            zoom: self.view.zoom,
            min_zoom: self.view.min_zoom,
            max_zoom: self.view.max_zoom,
        }
    }

    /// Picker configuration with default symbols.
    pub fn to_picker_config(&self) -> PickerConfig {
        PickerConfig::default()
            .with_initial_radius(self.picker.radius_meters)
            .with_vertex_count(self.picker.vertex_count)
            .with_circle_mode(self.picker.circle_mode)
    }

    pub fn to_logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.logging.level.clone(),
            directory: self.logging.directory.clone(),
            file_name: DEFAULT_LOG_FILE.to_string(),
        }
    }

    /// Query for the initial feature fetch.
    pub fn extent_query(&self) -> ExtentQuery {
        ExtentQuery {
            bbox: self.data.bbox,
        }
    }
}

/// Non-empty trimmed value of `key`.
fn string_value(section: &Properties, key: &str) -> Option<String> {
    section
        .get(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_value<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match string_value(section, key) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| invalid(section_name, key, &raw)),
        None => Ok(None),
    }
}

fn optional_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn invalid(section: &str, key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn incomplete(section: &str, key: &str, reason: &str) -> ConfigError {
    ConfigError::Incomplete {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provision::{DEFAULT_MIN_ZOOM, DEFAULT_ZOOM};
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_config_path_ends_with_app_dir() {
        let path = config_file_path();
        assert!(path.ends_with("bufferpick/config.ini"));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let file = write_config("");
        let config = ConfigFile::load_from(file.path()).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_full_file() {
        let file = write_config(
            "[map]\nbasemap = satellite\n\
             [view]\ncenter_lon = 120.5\ncenter_lat = 24.1\nzoom = 15\n\
             [picker]\nradius_meters = 120\nvertex_count = 64\ncircle_mode = geodesic\n\
             [data]\nurl = http://localhost:8080/apr/extent\nbbox = 121.4,25.0,121.5,25.1\n\
             [logging]\nlevel = debug\ndirectory = /tmp/bufferpick\n",
        );
        let config = ConfigFile::load_from(file.path()).unwrap();

        assert_eq!(config.map.basemap.as_deref(), Some("satellite"));
        assert_eq!(config.view.center, Some(GeoPoint::new(120.5, 24.1)));
        assert_eq!(config.view.zoom, Some(15.0));
        assert_eq!(config.view.min_zoom, None);
        assert_eq!(config.picker.radius_meters, 120.0);
        assert_eq!(config.picker.vertex_count, 64);
        assert_eq!(config.picker.circle_mode, CircleMode::Geodesic);
        assert_eq!(
            config.data.url.as_deref(),
            Some("http://localhost:8080/apr/extent")
        );
        assert_eq!(
            config.data.bbox,
            Some(GeoBounds::new(121.4, 25.0, 121.5, 25.1))
        );
        assert_eq!(config.data.timeout_secs, DEFAULT_DATA_TIMEOUT_SECS);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.logging.directory,
            Some(PathBuf::from("/tmp/bufferpick"))
        );
    }

    #[test]
    fn test_vertex_count_out_of_range_is_error() {
        for count in ["2", "18446744073709551615"] {
            let file = write_config(&format!("[picker]\nvertex_count = {}\n", count));
            let err = ConfigFile::load_from(file.path()).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue { ref key, ref value, .. }
                    if key == "vertex_count" && value == count
            ));
        }
    }

    #[test]
    fn test_invalid_number_is_error() {
        let file = write_config("[picker]\nradius_meters = wide\n");
        let err = ConfigFile::load_from(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key == "radius_meters"
        ));
        assert!(err.to_string().contains("picker.radius_meters"));
    }

    #[test]
    fn test_invalid_circle_mode_is_error() {
        let file = write_config("[picker]\ncircle_mode = spiral\n");
        assert!(matches!(
            ConfigFile::load_from(file.path()),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_half_center_is_error() {
        let file = write_config("[view]\ncenter_lon = 121.0\n");
        assert!(matches!(
            ConfigFile::load_from(file.path()),
            Err(ConfigError::Incomplete { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ConfigFile::load_from(&dir.path().join("absent.ini")),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.map.basemap = Some("streets".to_string());
        config.view.center = Some(GeoPoint::new(121.5, 25.05));
        config.view.max_zoom = Some(18.0);
        config.picker.radius_meters = 75.5;
        config.data.file = Some(PathBuf::from("/data/apr.geojson"));
        config.save_to(&path).unwrap();

        assert_eq!(ConfigFile::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_conversions_keep_unset_fields_unset() {
        let mut config = ConfigFile::default();
        config.view.zoom = Some(16.0);

        let view = config.to_view_options().resolve().unwrap();
        assert_eq!(view.zoom, 16.0);
        assert_eq!(view.min_zoom, DEFAULT_MIN_ZOOM);

        let view = ConfigFile::default().to_view_options().resolve().unwrap();
        assert_eq!(view.zoom, DEFAULT_ZOOM);

        let picker = config.to_picker_config();
        assert_eq!(picker.initial_radius_meters, DEFAULT_RADIUS_METERS);
        assert_eq!(picker.vertex_count, BUFFER_VERTEX_COUNT);

        assert_eq!(config.to_logging_config(), LoggingConfig::default());
        assert_eq!(config.extent_query(), ExtentQuery::default());
    }
}
