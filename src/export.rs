//! Station JSON export
//!
//! Serializes stations and their platforms into the JSON document consumed by
//! downstream apps, keyed by registry code.

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::model::{Dataset, Platform, Station};
use crate::util::osm_list;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationJson {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub code_pkpplk: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_ibnr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_pkpplk_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_ztmw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wheelchair: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<PlatformJson>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformJson {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_hints: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codes_ztmw: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wheelchair: Option<String>,
}

/// Tag value, treating empty values as absent
fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

impl From<&Station> for StationJson {
    fn from(station: &Station) -> Self {
        Self {
            name: station.name.clone(),
            lat: station.position.lat,
            lon: station.position.lon,
            code_pkpplk: station.pkpplk.clone(),
            code_ibnr: non_empty(station.ibnr.as_deref()),
            code_pkpplk_2: non_empty(station.tag("ref:2")),
            code_ztmw: non_empty(station.tag("ref:ztmw")),
            wheelchair: non_empty(station.tag("wheelchair")),
            platforms: Vec::new(),
        }
    }
}

impl From<&Platform> for PlatformJson {
    fn from(platform: &Platform) -> Self {
        Self {
            name: platform.name.clone(),
            lat: platform.position.lat,
            lon: platform.position.lon,
            direction_hints: non_empty(platform.tag("direction")).map(|v| osm_list(&v)),
            codes_ztmw: non_empty(platform.tag("ref:ztmw")).map(|v| osm_list(&v)),
            wheelchair: non_empty(platform.tag("wheelchair")),
        }
    }
}

/// Build the export document. Platforms of unknown stations are skipped.
pub fn stations_to_json(dataset: &Dataset) -> BTreeMap<String, StationJson> {
    let mut stations: BTreeMap<String, StationJson> = dataset
        .stations
        .iter()
        .map(|s| (s.pkpplk.clone(), StationJson::from(s)))
        .collect();

    for (station_ref, platforms) in &dataset.platforms {
        match stations.get_mut(station_ref) {
            Some(station) => station.platforms.extend(platforms.iter().map(PlatformJson::from)),
            None => log::warn!(
                "Skipping {} platforms of unknown station {}",
                platforms.len(),
                station_ref
            ),
        }
    }

    stations
}

/// Write the export document as pretty-printed JSON
pub fn write_stations_json<W: Write>(dataset: &Dataset, mut sink: W) -> Result<()> {
    let document = stations_to_json(dataset);
    serde_json::to_writer_pretty(&mut sink, &document)?;
    writeln!(sink)?;
    sink.flush()?;
    log::info!("Exported {} stations", document.len());
    Ok(())
}
