//! Single-pass OSM reader
//!
//! Pulls events from quick-xml and keeps only the state of the element that
//! is currently open, so memory does not grow with the size of the document
//! beyond the reconstructed dataset itself.

use std::collections::BTreeSet;
use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::geo::Position;
use crate::loader::classify::{Feature, classify_node, is_rail_line};
use crate::loader::error::LoadError;
use crate::model::{Dataset, Tags};

/// Tag keys starting with this are rejected
pub const RESERVED_MARKER: char = '_';

/// Which kind of feature is currently open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Idle,
    InPoint,
    InLine,
}

/// Accumulators for the feature currently being read
#[derive(Debug)]
struct ParseContext {
    state: ParserState,
    feature_id: String,
    position: Position,
    tags: Tags,
    node_refs: Vec<String>,
}

impl ParseContext {
    fn new() -> Self {
        Self {
            state: ParserState::Idle,
            feature_id: String::new(),
            position: Position::default(),
            tags: Tags::new(),
            node_refs: Vec::new(),
        }
    }

    fn open_point(&mut self, id: String, position: Position) {
        self.state = ParserState::InPoint;
        self.feature_id = id;
        self.position = position;
        self.tags.clear();
    }

    fn open_line(&mut self, id: String) {
        self.state = ParserState::InLine;
        self.feature_id = id;
        self.tags.clear();
        self.node_refs.clear();
    }

    fn add_tag(&mut self, key: String, value: String) -> Result<(), LoadError> {
        if key.starts_with(RESERVED_MARKER) {
            return Err(LoadError::ReservedTagKey {
                feature: self.feature_id.clone(),
                key,
            });
        }
        self.tags.insert(key, value);
        Ok(())
    }
}

/// Streaming reader producing a [`Dataset`]
pub struct FeatureReader<R: BufRead> {
    reader: Reader<R>,
    context: ParseContext,
    dataset: Dataset,
    /// Nodes already listed by a rail line, in case the line precedes them
    anchored: BTreeSet<String>,
}

impl<R: BufRead> FeatureReader<R> {
    pub fn new(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        let config = reader.config_mut();
        config.trim_text(true);
        config.expand_empty_elements = true;

        Self {
            reader,
            context: ParseContext::new(),
            dataset: Dataset::default(),
            anchored: BTreeSet::new(),
        }
    }

    /// Current parser state, mostly useful in tests
    pub fn state(&self) -> ParserState {
        self.context.state
    }

    /// Read the whole document and return the reconstructed dataset
    pub fn read_to_end(mut self) -> Result<Dataset, LoadError> {
        let mut buf = Vec::new();
        loop {
            let event = self
                .reader
                .read_event_into(&mut buf)
                .map_err(|source| LoadError::Xml {
                    position: self.reader.buffer_position(),
                    source,
                })?;

            match event {
                Event::Start(element) => self.start_element(&element)?,
                Event::End(element) => {
                    let name = element.name();
                    self.end_element(name.as_ref())?;
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(self.dataset)
    }

    fn start_element(&mut self, element: &BytesStart) -> Result<(), LoadError> {
        match element.name().as_ref() {
            b"node" => {
                let id = self.required_attribute(element, "node", "id")?;
                let lat = self.required_attribute(element, "node", "lat")?;
                let lon = self.required_attribute(element, "node", "lon")?;
                let position = Position::new(
                    parse_coordinate(&id, "lat", lat)?,
                    parse_coordinate(&id, "lon", lon)?,
                );
                self.context.open_point(id, position);
            }
            b"way" => {
                let id = self.required_attribute(element, "way", "id")?;
                self.context.open_line(id);
            }
            b"tag" if self.context.state != ParserState::Idle => {
                let key = self.required_attribute(element, "tag", "k")?;
                let value = self.required_attribute(element, "tag", "v")?;
                self.context.add_tag(key, value)?;
            }
            b"nd" if self.context.state == ParserState::InLine => {
                let node_ref = self.required_attribute(element, "nd", "ref")?;
                self.context.node_refs.push(node_ref);
            }
            _ => {}
        }
        Ok(())
    }

    fn end_element(&mut self, name: &[u8]) -> Result<(), LoadError> {
        match (name, self.context.state) {
            (b"node", ParserState::InPoint) => {
                self.context.state = ParserState::Idle;
                let tags = std::mem::take(&mut self.context.tags);
                let feature = classify_node(&self.context.feature_id, self.context.position, tags)?;
                if let Some(feature) = feature {
                    self.add_feature(feature);
                }
            }
            (b"way", ParserState::InLine) => {
                self.context.state = ParserState::Idle;
                if is_rail_line(&self.context.tags) {
                    for node_ref in self.context.node_refs.drain(..) {
                        self.dataset.dangling.remove(&node_ref);
                        self.anchored.insert(node_ref);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn add_feature(&mut self, feature: Feature) {
        if feature.is_rail_anchored() && !self.anchored.contains(&self.context.feature_id) {
            self.dataset
                .dangling
                .insert(self.context.feature_id.clone());
        }

        match feature {
            Feature::Station(station) => {
                log::debug!("station {} ({})", station.pkpplk, station.name);
                self.dataset.stations.push(station);
            }
            Feature::Platform(platform) => self
                .dataset
                .platforms
                .entry(platform.station.clone())
                .or_default()
                .push(platform),
            Feature::StopPosition(stop) => self
                .dataset
                .stop_positions
                .entry(stop.station.clone())
                .or_default()
                .push(stop),
            Feature::BusStop(stop) => self
                .dataset
                .bus_stops
                .entry(stop.station.clone())
                .or_default()
                .push(stop),
        }
    }

    fn required_attribute(
        &self,
        element: &BytesStart,
        element_name: &'static str,
        attribute: &'static str,
    ) -> Result<String, LoadError> {
        for attr in element.attributes() {
            let attr = attr.map_err(|source| LoadError::Attribute {
                position: self.reader.buffer_position(),
                source,
            })?;
            if attr.key.as_ref() == attribute.as_bytes() {
                let value = attr
                    .decode_and_unescape_value(self.reader.decoder())
                    .map_err(|e| LoadError::Xml {
                        position: self.reader.buffer_position(),
                        source: quick_xml::Error::from(e),
                    })?;
                return Ok(value.into_owned());
            }
        }

        Err(LoadError::MissingAttribute {
            element: element_name,
            attribute,
        })
    }
}

fn parse_coordinate(id: &str, axis: &'static str, value: String) -> Result<f64, LoadError> {
    value.trim().parse().map_err(|_| LoadError::InvalidCoordinate {
        feature: id.to_string(),
        axis,
        value,
    })
}
