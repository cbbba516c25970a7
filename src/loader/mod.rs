//! Feature Loader
//!
//! Reads an OSM document once, front to back, and reconstructs the typed
//! dataset. Knows nothing about the validation rules.

pub mod classify;
pub mod error;
pub mod reader;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub use classify::{Feature, RAIL_LINE_VALUES, classify_node, is_rail_line};
pub use error::{FeatureKind, LoadError};
pub use reader::{FeatureReader, ParserState, RESERVED_MARKER};

use crate::model::Dataset;

/// Load a dataset from any buffered source
pub fn load<R: BufRead>(source: R) -> Result<Dataset, LoadError> {
    let dataset = FeatureReader::new(source).read_to_end()?;
    log::info!(
        "Loaded {} stations, {} platforms, {} stop positions, {} bus stops ({} dangling nodes)",
        dataset.stations.len(),
        dataset.platform_count(),
        dataset.stop_position_count(),
        dataset.bus_stop_count(),
        dataset.dangling.len()
    );
    Ok(dataset)
}

/// Load a dataset from an OSM file on disk
pub fn load_path(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Reading {}", path.display());
    load(BufReader::new(file))
}

/// Load a dataset from an in-memory document
pub fn load_str(document: &str) -> Result<Dataset, LoadError> {
    load(document.as_bytes())
}
