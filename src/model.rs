//! Domain Model
//!
//! Typed entities reconstructed from the map document.
//! No parsing or validation logic - pure data representation.

use std::collections::{BTreeMap, BTreeSet};

use crate::geo::Position;

/// All OSM tags of a feature, key to value
pub type Tags = BTreeMap<String, String>;

/// A railway station (`railway=station`)
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// OSM node id
    pub id: String,
    pub name: String,
    /// PKP PLK registry code (`ref`), the canonical cross-reference key
    pub pkpplk: String,
    /// International station code (`ref:ibnr`)
    pub ibnr: Option<String>,
    pub position: Position,
    pub tags: Tags,
}

impl Station {
    /// Look up an auxiliary tag
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

/// A platform (`public_transport=platform`)
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub id: String,
    pub name: String,
    /// Registry code of the owning station (`ref:station`)
    pub station: String,
    pub position: Position,
    pub tags: Tags,
}

impl Platform {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

/// A stop position (`public_transport=stop_position`)
#[derive(Debug, Clone, PartialEq)]
pub struct StopPosition {
    pub id: String,
    pub station: String,
    /// Empty, [`TOWARDS_FALLBACK`], or a `;`-list of registry codes
    pub towards: String,
    /// Platforms served from this stop position
    pub platforms: Vec<String>,
    pub position: Position,
}

/// Sentinel `towards` value of the default stop position of a station
pub const TOWARDS_FALLBACK: &str = "fallback";

impl StopPosition {
    pub fn is_fallback(&self) -> bool {
        self.towards == TOWARDS_FALLBACK
    }
}

/// A bus stop (`highway=bus_stop`)
#[derive(Debug, Clone, PartialEq)]
pub struct BusStop {
    pub id: String,
    pub station: String,
    pub direction: Vec<String>,
    pub position: Position,
}

/// Everything the loader reconstructs from one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Stations in document order
    pub stations: Vec<Station>,
    /// Platforms keyed by owning station registry code
    pub platforms: BTreeMap<String, Vec<Platform>>,
    /// Stop positions keyed by owning station registry code
    pub stop_positions: BTreeMap<String, Vec<StopPosition>>,
    /// Bus stops keyed by owning station registry code
    pub bus_stops: BTreeMap<String, Vec<BusStop>>,
    /// Station and stop position node ids not used by any rail line
    pub dangling: BTreeSet<String>,
}

impl Dataset {
    /// Stations keyed by registry code. Stations without a code are left out.
    pub fn stations_by_pkpplk(&self) -> BTreeMap<&str, &Station> {
        self.stations
            .iter()
            .filter(|s| !s.pkpplk.is_empty())
            .map(|s| (s.pkpplk.as_str(), s))
            .collect()
    }

    /// Stations keyed by international code. Stations without one are left out.
    pub fn stations_by_ibnr(&self) -> BTreeMap<&str, &Station> {
        self.stations
            .iter()
            .filter_map(|s| match s.ibnr.as_deref() {
                Some(ibnr) if !ibnr.is_empty() => Some((ibnr, s)),
                _ => None,
            })
            .collect()
    }

    pub fn platform_count(&self) -> usize {
        self.platforms.values().map(Vec::len).sum()
    }

    pub fn stop_position_count(&self) -> usize {
        self.stop_positions.values().map(Vec::len).sum()
    }

    pub fn bus_stop_count(&self) -> usize {
        self.bus_stops.values().map(Vec::len).sum()
    }
}
