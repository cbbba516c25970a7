//! Fatal loader errors.
//!
//! These describe documents that are structurally unusable. Data-quality
//! problems on a well-formed document are reported by the rule engine instead.

use std::path::PathBuf;

use thiserror::Error;

/// Kind of feature being classified, used in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Station,
    Platform,
    StopPosition,
    BusStop,
}

impl std::fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FeatureKind::Station => "station",
            FeatureKind::Platform => "platform",
            FeatureKind::StopPosition => "stop position",
            FeatureKind::BusStop => "bus stop",
        };
        f.write_str(name)
    }
}

/// Errors that abort loading a document
#[derive(Error, Debug)]
pub enum LoadError {
    /// The document could not be opened.
    #[error("Cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The XML itself is broken.
    #[error("XML error at byte {position}: {source}")]
    Xml {
        position: u64,
        source: quick_xml::Error,
    },

    /// An element attribute is malformed.
    #[error("Malformed attribute at byte {position}: {source}")]
    Attribute {
        position: u64,
        source: quick_xml::events::attributes::AttrError,
    },

    /// A tag key uses the reserved marker.
    #[error("Tag key '{key}' on feature {feature} starts with the reserved '_' marker")]
    ReservedTagKey { feature: String, key: String },

    /// A classified feature lacks a tag its type requires.
    #[error("{kind} {feature} is missing the required '{key}' tag")]
    MissingTag {
        kind: FeatureKind,
        feature: String,
        key: &'static str,
    },

    /// An element lacks a structural attribute such as `id` or `lat`.
    #[error("<{element}> element is missing the '{attribute}' attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// A node coordinate is not a number.
    #[error("Node {feature} has an invalid {axis} value '{value}'")]
    InvalidCoordinate {
        feature: String,
        axis: &'static str,
        value: String,
    },
}
