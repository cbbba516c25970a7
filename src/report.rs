//! Plain-text rendering of validation reports.

use std::io::{self, Write};

use crate::validation::{GroupReport, StationSummary, Subject, ValidationReport};

/// Columns of the duplicate station table
pub const STATION_COLUMNS: [&str; 4] = ["node", "pkpplk", "ibnr", "name"];

const SUCCESS_MARKER: &str = "✅";
const FAILURE_MARKER: &str = "❌";
const INDENT: &str = "    ";

/// Write every group of a report, in order
pub fn render_report<W: Write>(report: &ValidationReport, out: &mut W) -> io::Result<()> {
    for group in &report.groups {
        render_group(group, out)?;
    }
    Ok(())
}

pub fn render_group<W: Write>(group: &GroupReport, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", group.group.description())?;

    if group.is_valid() {
        return writeln!(out, "{} {}", SUCCESS_MARKER, group.group.success_message());
    }

    writeln!(out, "{} {}:", FAILURE_MARKER, group.group.failure_message())?;

    let mut table_header_written = false;
    let mut current_station: Option<&StationSummary> = None;

    for issue in &group.issues {
        match &issue.subject {
            Subject::Stations(members) => {
                if !table_header_written {
                    writeln!(out, "{}", STATION_COLUMNS.join("\t"))?;
                    table_header_written = true;
                }
                for member in members {
                    writeln!(out, "{}", station_row(member))?;
                }
                current_station = None;
            }
            Subject::Station(station) => {
                if current_station != Some(station) {
                    writeln!(out, "Issues in {} ({}):", station.pkpplk, station.name)?;
                    current_station = Some(station);
                }
                writeln!(out, "{}{}", INDENT, issue.message)?;
            }
            Subject::UnknownStation(_) => {
                writeln!(out, "{}", issue.message)?;
                current_station = None;
            }
        }
    }

    Ok(())
}

/// Render a report into a string
pub fn render_to_string(report: &ValidationReport) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail
    let _ = render_report(report, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

fn station_row(station: &StationSummary) -> String {
    [
        station.id.as_str(),
        station.pkpplk.as_str(),
        station.ibnr.as_deref().unwrap_or_default(),
        station.name.as_str(),
    ]
    .join("\t")
}
