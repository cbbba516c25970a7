//! GTFS comparison
//!
//! Checks that every station of a GTFS `stops.txt` feed exists in the map,
//! and flags matches that are suspiciously far away.

use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

use crate::geo::{Position, distance};
use crate::model::{Dataset, Station};

/// Default distance above which a match is reported as far away
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 1000.0;

/// Prefix of feed file names that use international codes as stop ids
const IBNR_FEED_PREFIX: &str = "kw";

/// Which station code GTFS stop ids are matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeyMode {
    /// Pick by feed file name
    Auto,
    Pkpplk,
    Ibnr,
}

impl KeyMode {
    /// Resolve `Auto` for a given feed file
    pub fn for_file(self, path: &Path) -> KeyMode {
        match self {
            KeyMode::Auto => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_lowercase())
                    .unwrap_or_default();
                if name.starts_with(IBNR_FEED_PREFIX) {
                    KeyMode::Ibnr
                } else {
                    KeyMode::Pkpplk
                }
            }
            other => other,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StopRow {
    stop_id: String,
    stop_name: String,
    stop_lat: f64,
    stop_lon: f64,
    #[serde(default)]
    location_type: Option<String>,
    #[serde(default)]
    parent_station: Option<String>,
}

impl StopRow {
    /// Stations, and stops that do not belong to any station
    fn is_main(&self) -> bool {
        self.location_type.as_deref() == Some("1")
            || self.parent_station.as_deref().unwrap_or_default().is_empty()
    }
}

/// A station read from a GTFS feed
#[derive(Debug, Clone, PartialEq)]
pub struct GtfsStation {
    pub id: String,
    pub name: String,
    pub position: Position,
}

/// Read the main rows of a `stops.txt` file
pub fn load_gtfs_stations<R: Read>(source: R) -> Result<Vec<GtfsStation>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);
    let mut stations = Vec::new();

    for (index, row) in reader.deserialize::<StopRow>().enumerate() {
        let row = row.with_context(|| format!("Invalid stops.txt row {}", index + 1))?;
        if row.is_main() {
            stations.push(GtfsStation {
                id: row.stop_id,
                name: row.stop_name,
                position: Position::new(row.stop_lat, row.stop_lon),
            });
        }
    }

    Ok(stations)
}

pub fn load_gtfs_file(path: &Path) -> Result<Vec<GtfsStation>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open GTFS stops file {}", path.display()))?;
    load_gtfs_stations(io::BufReader::new(file))
        .with_context(|| format!("Failed to read GTFS stops file {}", path.display()))
}

/// A GTFS station whose match lies far from it
#[derive(Debug, Clone, PartialEq)]
pub struct FarAwayMatch {
    pub station: GtfsStation,
    pub distance_km: f64,
}

/// Result of comparing one feed against the map
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Comparison {
    pub file: PathBuf,
    pub missing: Vec<GtfsStation>,
    pub far_away: Vec<FarAwayMatch>,
}

impl Comparison {
    /// Far-away matches are warnings only
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.far_away.is_empty()
    }
}

/// Stations keyed the way a feed's stop ids are
pub fn station_lookup(dataset: &Dataset, key: KeyMode) -> BTreeMap<&str, &Station> {
    match key {
        KeyMode::Ibnr => dataset.stations_by_ibnr(),
        KeyMode::Pkpplk | KeyMode::Auto => dataset.stations_by_pkpplk(),
    }
}

/// Compare GTFS stations against map stations keyed by stop id
pub fn compare_stations(
    lookup: &BTreeMap<&str, &Station>,
    gtfs_stations: Vec<GtfsStation>,
    max_distance_km: f64,
) -> Comparison {
    let mut comparison = Comparison::default();

    for gtfs_station in gtfs_stations {
        let Some(station) = lookup.get(gtfs_station.id.as_str()) else {
            comparison.missing.push(gtfs_station);
            continue;
        };

        let distance_km = distance(station.position, gtfs_station.position) / 1000.0;
        if distance_km > max_distance_km {
            comparison.far_away.push(FarAwayMatch {
                station: gtfs_station,
                distance_km,
            });
        }
    }

    comparison
}

/// Load a feed file and compare it with the dataset
pub fn compare_file(
    dataset: &Dataset,
    path: &Path,
    key: KeyMode,
    max_distance_km: f64,
) -> Result<Comparison> {
    let key = key.for_file(path);
    let gtfs_stations = load_gtfs_file(path)?;
    log::info!(
        "Comparing {} GTFS stations from {} by {:?}",
        gtfs_stations.len(),
        path.display(),
        key
    );

    let lookup = station_lookup(dataset, key);
    let mut comparison = compare_stations(&lookup, gtfs_stations, max_distance_km);
    comparison.file = path.to_path_buf();
    Ok(comparison)
}

pub fn render_comparison<W: Write>(comparison: &Comparison, out: &mut W) -> io::Result<()> {
    writeln!(out, "Comparing {}", comparison.file.display())?;

    for station in &comparison.missing {
        writeln!(
            out,
            "❌ Missing from PLRailMap: {} (id: {}; pos: {:.5} {:.5})",
            station.name, station.id, station.position.lat, station.position.lon
        )?;
    }

    for far in &comparison.far_away {
        writeln!(
            out,
            "⚠️ Far-away match: {} is {:.3} km away from PLRailMap station",
            far.station.name, far.distance_km
        )?;
    }

    if comparison.is_clean() {
        writeln!(
            out,
            "✅ All stations from {} are in PLRailMap",
            comparison.file.display()
        )?;
    }

    Ok(())
}
