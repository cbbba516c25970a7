//! Station rule groups: uniqueness of codes and names, optional attributes.

use crate::model::Station;
use crate::util::group_by;
use crate::validation::attributes::{check_station_ztmw, check_wheelchair};
use crate::validation::engine::{GroupReport, RuleContext, StationSummary, Subject};
use crate::validation::exceptions::DuplicateCheck;

/// Every registry code is used by one station only
pub fn check_unique_pkpplk(context: &RuleContext, report: &mut GroupReport) {
    let groups = group_by(context.dataset.stations.iter(), |s| s.pkpplk.clone());
    for (pkpplk, group) in groups {
        if group.len() > 1 {
            report_duplicates(report, &group, format!("PKP PLK id {} is shared", pkpplk));
        }
    }
}

/// Every name is used by one station only, save for sanctioned groups
pub fn check_unique_names(context: &RuleContext, report: &mut GroupReport) {
    let groups = group_by(context.dataset.stations.iter(), |s| s.name.clone());
    for (name, group) in groups {
        if group.len() < 2 {
            continue;
        }
        if let Some(rule) = context.exceptions.sanctioning(DuplicateCheck::Name, &group) {
            log::debug!("Duplicate name {} allowed by exception {}", name, rule.id);
            continue;
        }
        report_duplicates(report, &group, format!("Name {} is shared", name));
    }
}

/// Every declared international code is used by one station only, save for sanctioned groups
pub fn check_unique_ibnr(context: &RuleContext, report: &mut GroupReport) {
    let with_ibnr = context
        .dataset
        .stations
        .iter()
        .filter_map(|s| s.ibnr.as_deref().map(|ibnr| (ibnr, s)));
    let groups = group_by(with_ibnr, |(ibnr, _)| *ibnr);

    for (ibnr, entries) in groups {
        if entries.len() < 2 {
            continue;
        }
        let group: Vec<&Station> = entries.into_iter().map(|(_, s)| s).collect();
        if let Some(rule) = context.exceptions.sanctioning(DuplicateCheck::Ibnr, &group) {
            log::debug!("Duplicate IBNR {} allowed by exception {}", ibnr, rule.id);
            continue;
        }
        report_duplicates(report, &group, format!("IBNR code {} is shared", ibnr));
    }
}

/// `wheelchair` and `ref:ztmw` have valid formats
pub fn check_attributes(context: &RuleContext, report: &mut GroupReport) {
    for station in &context.dataset.stations {
        let issues: Vec<String> = [
            check_wheelchair(station.tag("wheelchair"))
                .map(|value| format!("Invalid wheelchair value: {}", value)),
            check_station_ztmw(station.tag("ref:ztmw")),
        ]
        .into_iter()
        .flatten()
        .collect();

        report.add_for_station(station, issues);
    }
}

fn report_duplicates(report: &mut GroupReport, group: &[&Station], message: String) {
    let members = group.iter().map(|s| StationSummary::from(*s)).collect();
    report.add(Subject::Stations(members), message);
}
