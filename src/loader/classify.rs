//! Feature classification
//!
//! Turns the tags accumulated for a closed node or way into domain meaning.

use crate::geo::Position;
use crate::loader::error::{FeatureKind, LoadError};
use crate::model::{BusStop, Platform, Station, StopPosition, Tags};
use crate::util::osm_list;

/// `railway` values of ways that anchor stations to the rail network
pub const RAIL_LINE_VALUES: &[&str] = &["rail", "light_rail", "narrow_gauge", "subway", "tram"];

/// A node recognised as one of the domain entities
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Station(Station),
    Platform(Platform),
    StopPosition(StopPosition),
    BusStop(BusStop),
}

impl Feature {
    /// True for nodes that must be anchored to a rail line
    pub fn is_rail_anchored(&self) -> bool {
        matches!(self, Feature::Station(_) | Feature::StopPosition(_))
    }
}

/// Classify a closed node. Untagged or unrelated nodes yield `None`.
pub fn classify_node(id: &str, position: Position, tags: Tags) -> Result<Option<Feature>, LoadError> {
    let tag = |key: &str| tags.get(key).map(String::as_str);

    if tag("railway") == Some("station") {
        let name = required(&tags, FeatureKind::Station, id, "name")?;
        let pkpplk = required(&tags, FeatureKind::Station, id, "ref")?;
        let ibnr = tags.get("ref:ibnr").filter(|v| !v.is_empty()).cloned();
        return Ok(Some(Feature::Station(Station {
            id: id.to_string(),
            name,
            pkpplk,
            ibnr,
            position,
            tags,
        })));
    }

    match tag("public_transport") {
        Some("platform") => {
            let name = required(&tags, FeatureKind::Platform, id, "name")?;
            let station = required(&tags, FeatureKind::Platform, id, "ref:station")?;
            return Ok(Some(Feature::Platform(Platform {
                id: id.to_string(),
                name,
                station,
                position,
                tags,
            })));
        }
        Some("stop_position") => {
            let station = required(&tags, FeatureKind::StopPosition, id, "ref:station")?;
            return Ok(Some(Feature::StopPosition(StopPosition {
                id: id.to_string(),
                station,
                towards: tag("towards").unwrap_or_default().to_string(),
                platforms: osm_list(tag("platforms").unwrap_or_default()),
                position,
            })));
        }
        _ => {}
    }

    if tag("highway") == Some("bus_stop") {
        let station = required(&tags, FeatureKind::BusStop, id, "ref:station")?;
        return Ok(Some(Feature::BusStop(BusStop {
            id: id.to_string(),
            station,
            direction: osm_list(tag("direction").unwrap_or_default()),
            position,
        })));
    }

    Ok(None)
}

/// True if a way with these tags is a rail line
pub fn is_rail_line(tags: &Tags) -> bool {
    tags.get("railway")
        .is_some_and(|value| RAIL_LINE_VALUES.contains(&value.as_str()))
}

fn required(
    tags: &Tags,
    kind: FeatureKind,
    id: &str,
    key: &'static str,
) -> Result<String, LoadError> {
    tags.get(key).cloned().ok_or_else(|| LoadError::MissingTag {
        kind,
        feature: id.to_string(),
        key,
    })
}
