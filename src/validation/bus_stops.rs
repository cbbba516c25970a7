//! Bus stop rule group.

use crate::model::BusStop;
use crate::util::sorted_list;
use crate::validation::engine::{GroupReport, RuleContext, Subject};
use crate::validation::hints::{WILDCARD, check_hints};

pub fn check_bus_stops(context: &RuleContext, report: &mut GroupReport) {
    for (station_ref, stops) in &context.dataset.bus_stops {
        let Some(station) = context.station(station_ref) else {
            report.add(
                Subject::UnknownStation(station_ref.clone()),
                format!(
                    "Invalid reference to station {} from bus stops: {}",
                    station_ref,
                    sorted_list(stops.iter().map(|s| s.id.as_str()))
                ),
            );
            continue;
        };

        report.add_for_station(station, bus_stop_issues(stops));
    }
}

fn bus_stop_issues(stops: &[BusStop]) -> Vec<String> {
    let mut issues = Vec::new();

    match stops {
        [single] => {
            let wildcard_only = single.direction.iter().all(|hint| hint == WILDCARD);
            if !wildcard_only {
                issues.push(format!(
                    "Bus stop {}: the only bus stop of a station may use only the {} hint, got {}",
                    single.id,
                    WILDCARD,
                    single.direction.join(";")
                ));
            }
        }
        _ => {
            for stop in stops.iter().filter(|s| s.direction.is_empty()) {
                issues.push(format!("Bus stop {}: missing direction hints", stop.id));
            }
        }
    }

    let hints = stops.iter().flat_map(|s| s.direction.iter().map(String::as_str));
    issues.extend(check_hints(hints).into_iter().map(|v| v.to_string()));

    issues
}
