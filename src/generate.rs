//! CSV to OSM generator
//!
//! Turns a plain list of stations into new OSM nodes ready to be merged into
//! the map in an editor. Every generated node is marked for verification.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use serde::Deserialize;

/// First id handed out; subsequent nodes count down from here
pub const DEFAULT_FIRST_REF: i64 = -999_000;

const GENERATOR: &str = "plrailmap-tools csv-to-osm";

/// One input row: `id,name,lat,lon[,ibnr]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StationRow {
    /// Registry code
    pub id: String,
    pub name: String,
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub ibnr: Option<String>,
}

pub fn read_rows<R: Read>(source: R) -> Result<Vec<StationRow>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(source);
    reader
        .deserialize::<StationRow>()
        .enumerate()
        .map(|(index, row)| row.with_context(|| format!("Invalid station row {}", index + 1)))
        .collect()
}

/// Write an OSM document with one station node per row. Returns the node count.
pub fn write_osm<W: Write>(rows: &[StationRow], first_ref: i64, sink: W) -> Result<usize> {
    let mut xml = Writer::new_with_indent(sink, b' ', 2);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("osm");
    root.push_attribute(("version", "0.6"));
    root.push_attribute(("generator", GENERATOR));
    xml.write_event(Event::Start(root))?;

    let mut next_ref = first_ref;
    for row in rows {
        let id = next_ref.to_string();
        let mut node = BytesStart::new("node");
        node.push_attribute(("id", id.as_str()));
        node.push_attribute(("action", "modify"));
        node.push_attribute(("visible", "true"));
        node.push_attribute(("version", "1"));
        node.push_attribute(("lat", row.lat.as_str()));
        node.push_attribute(("lon", row.lon.as_str()));
        xml.write_event(Event::Start(node))?;

        write_tag(&mut xml, "railway", "station")?;
        write_tag(&mut xml, "name", &row.name)?;
        write_tag(&mut xml, "ref", &row.id)?;
        if let Some(ibnr) = row.ibnr.as_deref().filter(|v| !v.is_empty()) {
            write_tag(&mut xml, "ref:ibnr", ibnr)?;
        }
        write_tag(&mut xml, "fixme", "verify")?;

        xml.write_event(Event::End(BytesEnd::new("node")))?;
        next_ref -= 1;
    }

    xml.write_event(Event::End(BytesEnd::new("osm")))?;
    xml.get_mut().flush()?;

    log::info!("Generated {} station nodes", rows.len());
    Ok(rows.len())
}

/// Read CSV rows and write them as OSM nodes
pub fn csv_to_osm<R: Read, W: Write>(source: R, sink: W, first_ref: i64) -> Result<usize> {
    let rows = read_rows(source)?;
    write_osm(&rows, first_ref, sink)
}

fn write_tag<W: Write>(xml: &mut Writer<W>, key: &str, value: &str) -> Result<()> {
    let mut tag = BytesStart::new("tag");
    tag.push_attribute(("k", key));
    tag.push_attribute(("v", value));
    xml.write_event(Event::Empty(tag))?;
    Ok(())
}
