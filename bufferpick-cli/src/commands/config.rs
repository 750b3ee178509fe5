//! Configuration CLI commands.

use clap::Subcommand;
use bufferpick::config::{config_file_path, ConfigFile};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the resolved configuration
    Show,
}

/// Run a config subcommand.
pub fn run(runner: &CliRunner, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", config_file_path().display());
            Ok(())
        }
        ConfigCommands::Show => {
            print!("{}", render(runner.config())?);
            Ok(())
        }
    }
}

fn or_default(value: Option<String>) -> String {
    value.unwrap_or_else(|| "(default)".to_string())
}

fn or_unset(value: Option<String>) -> String {
    value.unwrap_or_else(|| "(not set)".to_string())
}

/// Formats the effective settings, defaults applied.
fn render(config: &ConfigFile) -> Result<String, CliError> {
    let map = config.to_map_options().resolve();
    let view = config
        .to_view_options()
        .resolve()
        .map_err(|e| CliError::Config(e.to_string()))?;
    let picker = config.to_picker_config();
    let logging = config.to_logging_config();

    let mut out = String::new();
    out.push_str("[map]\n");
    out.push_str(&format!("  basemap = {}\n", map.basemap));
    out.push_str("\n[view]\n");
    out.push_str(&format!("  center = {}\n", view.center));
    out.push_str(&format!("  zoom = {}\n", view.zoom));
    out.push_str(&format!("  zoom bounds = [{}, {}]\n", view.min_zoom, view.max_zoom));
    out.push_str("\n[picker]\n");
    out.push_str(&format!("  radius_meters = {}\n", picker.initial_radius_meters));
    out.push_str(&format!("  vertex_count = {}\n", picker.vertex_count));
    out.push_str(&format!("  circle_mode = {}\n", picker.circle_mode.as_str()));
    out.push_str("\n[data]\n");
    out.push_str(&format!("  url = {}\n", or_unset(config.data.url.clone())));
    out.push_str(&format!(
        "  file = {}\n",
        or_unset(config.data.file.as_ref().map(|p| p.display().to_string()))
    ));
    out.push_str(&format!(
        "  bbox = {}\n",
        or_default(config.data.bbox.map(|b| b.to_bbox_string()))
    ));
    out.push_str(&format!("  timeout_secs = {}\n", config.data.timeout_secs));
    out.push_str("\n[logging]\n");
    out.push_str(&format!("  level = {}\n", logging.level));
    out.push_str(&format!(
        "  file = {}\n",
        or_unset(logging.log_file_path().map(|p| p.display().to_string()))
    ));
    Ok(out)
}
