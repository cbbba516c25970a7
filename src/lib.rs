//! PLRailMap tools
//!
//! Validation and conversion tools for the PLRailMap railway station dataset.
//!
//! This library provides:
//! - A single-pass loader from OSM XML to typed stations, platforms, stop positions and bus stops
//! - The validation rule engine and its plain-text report
//! - GTFS comparison, CSV-to-OSM generation and JSON export
//! - Configuration management

pub mod cli;
pub mod config;
pub mod export;
pub mod generate;
pub mod geo;
pub mod gtfs;
pub mod loader;
pub mod model;
pub mod report;
pub mod util;
pub mod validation;

// Re-exports for a clean public API
pub use config::Config;
pub use loader::{LoadError, load, load_path, load_str};
pub use model::{BusStop, Dataset, Platform, Station, StopPosition};
pub use validation::{ExceptionTable, ValidationReport, validate_dataset};
