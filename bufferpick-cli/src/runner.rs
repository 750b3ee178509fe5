//! Shared setup for CLI commands.

use std::path::Path;

use bufferpick::config::ConfigFile;
use bufferpick::logging::{init_logging, WorkerGuard};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::error::CliError;

/// Loaded configuration plus the logging guard, kept for the command's run.
pub struct CliRunner {
    config: ConfigFile,
    _log_guard: Option<WorkerGuard>,
}

impl CliRunner {
    /// Loads the configuration and installs logging.
    ///
    /// `--verbose` overrides the configured level with `debug`.
    pub fn new(config_path: Option<&Path>, verbose: bool) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let mut logging = config.to_logging_config();
        if verbose {
            logging.level = "debug".to_string();
        }
        let log_guard = init_logging(&logging)?;

        debug!(version = bufferpick::VERSION, "CLI started");
        Ok(Self {
            config,
            _log_guard: log_guard,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Creates a multi-threaded runtime for async commands.
    pub fn runtime(&self) -> Result<Runtime, CliError> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::Runtime(e.to_string()))
    }
}
