//! CLI error types.

use std::fmt;

use bufferpick::app::AppError;
use bufferpick::config::ConfigError;
use bufferpick::features::FetchError;
use bufferpick::geometry::GeometryError;
use bufferpick::logging::LoggingError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded or was invalid.
    Config(String),

    /// Logging could not be set up.
    Logging(LoggingError),

    /// Application wiring or picker operation failed.
    App(AppError),

    /// Buffer geometry could not be built.
    Geometry(GeometryError),

    /// Feature source could not be created.
    Source(FetchError),

    /// Failed to create the Tokio runtime.
    Runtime(String),

    /// The headless session did not behave as expected.
    Simulation(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Logging(e) => write!(f, "Logging error: {}", e),
            CliError::App(e) => write!(f, "{}", e),
            CliError::Geometry(e) => write!(f, "Geometry error: {}", e),
            CliError::Source(e) => write!(f, "Feature source error: {}", e),
            CliError::Runtime(msg) => write!(f, "Failed to create Tokio runtime: {}", msg),
            CliError::Simulation(msg) => write!(f, "Simulation failed: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Logging(e) => Some(e),
            CliError::App(e) => Some(e),
            CliError::Geometry(e) => Some(e),
            CliError::Source(e) => Some(e),
            CliError::Config(_) | CliError::Runtime(_) | CliError::Simulation(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::App(e)
    }
}

impl From<GeometryError> for CliError {
    fn from(e: GeometryError) -> Self {
        CliError::Geometry(e)
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError::Source(e)
    }
}
