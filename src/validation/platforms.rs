//! Platform rule group.

use crate::geo::{describe_distance, distance};
use crate::model::{Platform, Station};
use crate::util::{group_by, osm_list, sorted_list};
use crate::validation::attributes::{check_wheelchair, invalid_stop_ztmw_codes};
use crate::validation::engine::{GroupReport, MAX_DISTANCE_M, RuleContext, Subject};
use crate::validation::hints::check_hints;

pub fn check_platforms(context: &RuleContext, report: &mut GroupReport) {
    for (station_ref, platforms) in &context.dataset.platforms {
        let Some(station) = context.station(station_ref) else {
            report.add(
                Subject::UnknownStation(station_ref.clone()),
                format!(
                    "Invalid reference to station {} from platforms: {}",
                    station_ref,
                    sorted_ids(platforms)
                ),
            );
            continue;
        };

        let issues = station_platform_issues(station, platforms);
        report.add_for_station(station, issues);
    }
}

fn station_platform_issues(station: &Station, platforms: &[Platform]) -> Vec<String> {
    let mut issues = Vec::new();

    for (name, duplicates) in group_by(platforms.iter(), |p| p.name.clone()) {
        if duplicates.len() > 1 {
            issues.push(format!(
                "Platform name {} reused by nodes: {}",
                name,
                sorted_ids(duplicates.iter().copied())
            ));
        }
    }

    let hints: Vec<String> = platforms
        .iter()
        .flat_map(|p| osm_list(p.tag("direction").unwrap_or_default()))
        .collect();
    issues.extend(
        check_hints(hints.iter().map(String::as_str))
            .into_iter()
            .map(|violation| violation.to_string()),
    );

    for platform in platforms {
        let meters = distance(station.position, platform.position);
        if meters.is_nan() || meters > MAX_DISTANCE_M {
            issues.push(format!(
                "Platform {}: is {} away from the station node",
                platform.name,
                describe_distance(meters)
            ));
        }

        for code in invalid_stop_ztmw_codes(platform.tag("ref:ztmw")) {
            issues.push(format!(
                "Platform {}: invalid ZTM Warszawa code: {}",
                platform.name, code
            ));
        }

        if let Some(value) = check_wheelchair(platform.tag("wheelchair")) {
            issues.push(format!(
                "Platform {}: invalid wheelchair value: {}",
                platform.name, value
            ));
        }
    }

    issues
}

fn sorted_ids<'a, I>(platforms: I) -> String
where
    I: IntoIterator<Item = &'a Platform>,
{
    sorted_list(platforms.into_iter().map(|p| p.id.as_str()))
}
