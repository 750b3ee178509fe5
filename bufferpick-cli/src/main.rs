//! BufferPick CLI - headless front end for the picker library.
//!
//! Computes buffer polygons and runs picker sessions against the in-memory
//! map engine, printing the events a host application would receive.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::buffer::BufferArgs;
use commands::config::ConfigCommands;
use commands::simulate::SimulateArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Debug, Parser)]
#[command(name = "bufferpick", version, about = "Pick points and compute circular buffers")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this configuration file instead of the default one
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the GeoJSON buffer polygon around a point
    Buffer {
        /// Center longitude
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Center latitude
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Radius in meters (default: from config)
        #[arg(long)]
        radius: Option<f64>,

        /// Number of distinct circle vertices (default: from config)
        #[arg(long)]
        vertices: Option<usize>,

        /// Build a geodesic circle instead of a Web Mercator one
        #[arg(long)]
        geodesic: bool,
    },

    /// Run a headless picker session and print every host event
    Simulate {
        /// Longitude to click
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Latitude to click
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Buffer radius in meters before the click (default: from config)
        #[arg(long)]
        radius: Option<f64>,

        /// Change the radius to this value after the click
        #[arg(long)]
        new_radius: Option<f64>,

        /// GeoJSON feature collection to load instead of the data service
        #[arg(long, value_name = "FILE")]
        features: Option<PathBuf>,

        /// Data service URL (default: from config)
        #[arg(long)]
        url: Option<String>,
    },

    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let runner = CliRunner::new(cli.config.as_deref(), cli.verbose)?;

    match cli.command {
        Commands::Buffer {
            lon,
            lat,
            radius,
            vertices,
            geodesic,
        } => commands::buffer::run(
            &runner,
            BufferArgs {
                lon,
                lat,
                radius,
                vertices,
                geodesic,
            },
        ),
        Commands::Simulate {
            lon,
            lat,
            radius,
            new_radius,
            features,
            url,
        } => commands::simulate::run(
            &runner,
            SimulateArgs {
                lon,
                lat,
                radius,
                new_radius,
                features,
                url,
            },
        ),
        Commands::Config { command } => commands::config::run(&runner, command),
    }
}
