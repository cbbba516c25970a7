//! Stop position rule group.

use crate::geo::{describe_distance, distance};
use crate::model::{Station, StopPosition};
use crate::util::{osm_list, sorted_list};
use crate::validation::engine::{GroupReport, MAX_DISTANCE_M, RuleContext, Subject};

pub fn check_stop_positions(context: &RuleContext, report: &mut GroupReport) {
    for (station_ref, stops) in &context.dataset.stop_positions {
        let Some(station) = context.station(station_ref) else {
            report.add(
                Subject::UnknownStation(station_ref.clone()),
                format!(
                    "Invalid reference to station {} from stop positions: {}",
                    station_ref,
                    sorted_list(stops.iter().map(|s| s.id.as_str()))
                ),
            );
            continue;
        };

        let issues = station_stop_issues(context, station, stops);
        report.add_for_station(station, issues);
    }
}

fn station_stop_issues(
    context: &RuleContext,
    station: &Station,
    stops: &[StopPosition],
) -> Vec<String> {
    let mut issues = Vec::new();

    for stop in stops {
        let meters = distance(station.position, stop.position);
        if meters.is_nan() || meters > MAX_DISTANCE_M {
            issues.push(format!(
                "Stop position {}: is {} away from the station node",
                stop.id,
                describe_distance(meters)
            ));
        }

        if stop.platforms.is_empty() {
            issues.push(format!("Stop position {}: no platforms are served", stop.id));
        }

        if !stop.is_fallback() {
            let unknown: Vec<String> = osm_list(&stop.towards)
                .into_iter()
                .filter(|code| context.station(code).is_none())
                .collect();
            if !unknown.is_empty() {
                issues.push(format!(
                    "Stop position {}: towards unknown stations: {}",
                    stop.id,
                    unknown.join(", ")
                ));
            }
        }
    }

    let fallbacks = stops.iter().filter(|s| s.is_fallback()).count();
    if fallbacks != 1 {
        issues.push(format!(
            "Expected exactly one stop position with towards=fallback, found {}",
            fallbacks
        ));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Position;
    use crate::model::{Dataset, Tags};
    use crate::validation::engine::RuleGroup;
    use crate::validation::exceptions::ExceptionTable;

    fn station(pkpplk: &str) -> Station {
        Station {
            id: format!("n{}", pkpplk),
            name: format!("Station {}", pkpplk),
            pkpplk: pkpplk.to_string(),
            ibnr: None,
            position: Position::new(52.0, 21.0),
            tags: Tags::new(),
        }
    }

    fn stop(id: &str, towards: &str) -> StopPosition {
        StopPosition {
            id: id.to_string(),
            station: "100".to_string(),
            towards: towards.to_string(),
            platforms: vec!["1".to_string()],
            position: Position::new(52.0002, 21.0),
        }
    }

    fn check(stops: Vec<StopPosition>) -> GroupReport {
        let mut dataset = Dataset {
            stations: vec![station("100"), station("200")],
            ..Default::default()
        };
        dataset.stop_positions.insert("100".to_string(), stops);
        let exceptions = ExceptionTable::empty();
        let context = RuleContext::new(&dataset, &exceptions);
        let mut report = GroupReport::new(RuleGroup::StopPositions);
        check_stop_positions(&context, &mut report);
        report
    }

    #[test]
    fn test_valid_stop_positions() {
        let report = check(vec![stop("10", "fallback"), stop("11", "200"), stop("12", "")]);
        assert!(report.is_valid(), "{:?}", report.messages());
    }

    #[test]
    fn test_no_fallback() {
        let report = check(vec![stop("10", "200")]);
        assert_eq!(
            report.messages(),
            vec!["Expected exactly one stop position with towards=fallback, found 0"]
        );
    }

    #[test]
    fn test_two_fallbacks() {
        let report = check(vec![stop("10", "fallback"), stop("11", "fallback")]);
        assert_eq!(
            report.messages(),
            vec!["Expected exactly one stop position with towards=fallback, found 2"]
        );
    }

    #[test]
    fn test_unknown_towards_entries() {
        let report = check(vec![stop("10", "fallback"), stop("11", "200;300;400")]);
        assert_eq!(
            report.messages(),
            vec!["Stop position 11: towards unknown stations: 300, 400"]
        );
    }

    #[test]
    fn test_no_platforms_and_too_far() {
        let mut lonely = stop("10", "fallback");
        lonely.platforms.clear();
        lonely.position = Position::new(52.01, 21.0);

        let report = check(vec![lonely]);
        let messages = report.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("Stop position 10: is "));
        assert_eq!(messages[1], "Stop position 10: no platforms are served");
    }

    #[test]
    fn test_unknown_station_is_one_issue() {
        let mut dataset = Dataset::default();
        dataset
            .stop_positions
            .insert("404".to_string(), vec![stop("2", "fallback"), stop("1", "")]);
        let exceptions = ExceptionTable::empty();
        let context = RuleContext::new(&dataset, &exceptions);
        let mut report = GroupReport::new(RuleGroup::StopPositions);
        check_stop_positions(&context, &mut report);

        assert_eq!(
            report.messages(),
            vec!["Invalid reference to station 404 from stop positions: 1, 2"]
        );
        assert_eq!(
            report.issues[0].subject,
            Subject::UnknownStation("404".to_string())
        );
    }
}
