//! Configuration management for the plrailmap tools.
//!
//! Handles:
//! - Command-line argument parsing
//! - Exception table search directories

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::generate::DEFAULT_FIRST_REF;
use crate::gtfs::{DEFAULT_MAX_DISTANCE_KM, KeyMode};

/// Map document read when `--input` is not given
pub const DEFAULT_INPUT: &str = "plrailmap.osm";

/// Command-line arguments for the plrailmap tools
#[derive(Debug, Parser)]
#[command(name = "plrailmap")]
#[command(about = "Validation and conversion tools for the PLRailMap dataset")]
#[command(version)]
pub struct Args {
    /// Log level
    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Check the map document against the dataset rules
    Verify {
        #[arg(long, default_value = DEFAULT_INPUT)]
        input: PathBuf,
        /// Exception table overriding the user and built-in ones
        #[arg(long)]
        exceptions: Option<PathBuf>,
        /// Print station and stop position nodes not used by any rail line
        #[arg(long)]
        list_dangling: bool,
    },
    /// Check that every station of GTFS feeds exists in the map
    CompareGtfs {
        #[arg(long, default_value = DEFAULT_INPUT)]
        input: PathBuf,
        /// Station code matched against GTFS stop ids
        #[arg(long, value_enum, default_value_t = KeyMode::Auto)]
        key: KeyMode,
        /// Matches farther than this are reported as warnings
        #[arg(long, default_value_t = DEFAULT_MAX_DISTANCE_KM)]
        max_distance_km: f64,
        /// GTFS stops.txt files
        #[arg(required = true)]
        stops: Vec<PathBuf>,
    },
    /// Generate OSM station nodes from a CSV list
    CsvToOsm {
        /// Id of the first generated node, later ones count down
        #[arg(
            short = 'r',
            long = "ref",
            default_value_t = DEFAULT_FIRST_REF,
            allow_negative_numbers = true
        )]
        first_ref: i64,
        /// CSV file, stdin if absent
        #[arg(long)]
        input: Option<PathBuf>,
        /// OSM file, stdout if absent
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Export stations and platforms as JSON
    StationsJson {
        #[arg(long, default_value = DEFAULT_INPUT)]
        input: PathBuf,
        /// JSON file, stdout if absent
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,
    /// Directories searched for a user exception table
    pub exception_dirs: Vec<PathBuf>,
    /// Log level
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let mut exception_dirs = Vec::new();

        // Default user config directory
        if let Some(config_dir) = dirs::config_dir() {
            exception_dirs.push(config_dir.join("plrailmap"));
        }

        Ok(Config {
            command: args.command,
            exception_dirs,
            log_level: args.log_level,
        })
    }
}
