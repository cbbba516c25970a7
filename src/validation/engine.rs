//! Validation Engine
//!
//! Runs the rule groups over a loaded dataset and collects their issues.
//! The dataset is only read; every group writes to its own report.

use std::collections::BTreeMap;

use crate::model::{Dataset, Station};
use crate::validation::exceptions::ExceptionTable;
use crate::validation::{bus_stops, platforms, stations, stop_positions};

/// Maximum distance in metres between a station and its platforms or stop positions
pub const MAX_DISTANCE_M: f64 = 100.0;

/// The rule groups, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleGroup {
    UniquePkpplk,
    UniqueNames,
    UniqueIbnr,
    StationAttributes,
    Platforms,
    StopPositions,
    BusStops,
}

impl RuleGroup {
    pub const ALL: [RuleGroup; 7] = [
        RuleGroup::UniquePkpplk,
        RuleGroup::UniqueNames,
        RuleGroup::UniqueIbnr,
        RuleGroup::StationAttributes,
        RuleGroup::Platforms,
        RuleGroup::StopPositions,
        RuleGroup::BusStops,
    ];

    /// What the group checks, shown before its result
    pub fn description(self) -> &'static str {
        match self {
            RuleGroup::UniquePkpplk => "Checking uniqueness of PKP PLK IDs",
            RuleGroup::UniqueNames => "Checking uniqueness of names",
            RuleGroup::UniqueIbnr => "Checking uniqueness of IBNR codes",
            RuleGroup::StationAttributes => "Checking optional attributes",
            RuleGroup::Platforms => "Checking platforms",
            RuleGroup::StopPositions => "Checking stop positions",
            RuleGroup::BusStops => "Checking bus stops",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            RuleGroup::UniquePkpplk => "PKP PLK ids are unique",
            RuleGroup::UniqueNames => "Station names are unique",
            RuleGroup::UniqueIbnr => "IBNR codes are unique",
            RuleGroup::StationAttributes => "Optional attributes are OK",
            RuleGroup::Platforms => "Platforms are OK",
            RuleGroup::StopPositions => "Stop positions are OK",
            RuleGroup::BusStops => "Bus stops are OK",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            RuleGroup::UniquePkpplk => "Found duplicate PKP PLK ids",
            RuleGroup::UniqueNames => "Found duplicate names",
            RuleGroup::UniqueIbnr => "Found duplicate IBNR codes",
            RuleGroup::StationAttributes => "Found invalid optional attributes",
            RuleGroup::Platforms => "Found invalid platforms",
            RuleGroup::StopPositions => "Found invalid stop positions",
            RuleGroup::BusStops => "Found invalid bus stops",
        }
    }
}

/// Identifying columns of a station, as shown in reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationSummary {
    pub id: String,
    pub pkpplk: String,
    pub ibnr: Option<String>,
    pub name: String,
}

impl From<&Station> for StationSummary {
    fn from(station: &Station) -> Self {
        Self {
            id: station.id.clone(),
            pkpplk: station.pkpplk.clone(),
            ibnr: station.ibnr.clone(),
            name: station.name.clone(),
        }
    }
}

/// What an issue is attributed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// Stations sharing a value that must be unique
    Stations(Vec<StationSummary>),
    /// A single station, or features belonging to it
    Station(StationSummary),
    /// A registry code referenced by features but not defined by any station
    UnknownStation(String),
}

/// A single data-quality problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub subject: Subject,
    pub message: String,
}

/// Outcome of one rule group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupReport {
    pub group: RuleGroup,
    pub issues: Vec<Issue>,
}

impl GroupReport {
    pub fn new(group: RuleGroup) -> Self {
        Self {
            group,
            issues: Vec::new(),
        }
    }

    pub fn add(&mut self, subject: Subject, message: String) {
        self.issues.push(Issue { subject, message });
    }

    /// Attribute a batch of messages to one station
    pub fn add_for_station(&mut self, station: &Station, messages: Vec<String>) {
        for message in messages {
            self.add(Subject::Station(station.into()), message);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issue messages, in order
    pub fn messages(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.message.as_str()).collect()
    }
}

/// Outcome of every rule group, in declaration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    pub groups: Vec<GroupReport>,
}

impl ValidationReport {
    /// True only if every group passed
    pub fn is_valid(&self) -> bool {
        self.groups.iter().all(GroupReport::is_valid)
    }

    pub fn group(&self, group: RuleGroup) -> Option<&GroupReport> {
        self.groups.iter().find(|g| g.group == group)
    }

    pub fn issue_count(&self) -> usize {
        self.groups.iter().map(|g| g.issues.len()).sum()
    }
}

/// Read-only inputs shared by all rule groups
pub struct RuleContext<'a> {
    pub dataset: &'a Dataset,
    pub exceptions: &'a ExceptionTable,
    /// Stations keyed by registry code
    pub stations: BTreeMap<&'a str, &'a Station>,
}

impl<'a> RuleContext<'a> {
    pub fn new(dataset: &'a Dataset, exceptions: &'a ExceptionTable) -> Self {
        Self {
            dataset,
            exceptions,
            stations: dataset.stations_by_pkpplk(),
        }
    }

    pub fn station(&self, pkpplk: &str) -> Option<&'a Station> {
        self.stations.get(pkpplk).copied()
    }
}

/// Run a single rule group
pub fn run_group(group: RuleGroup, context: &RuleContext) -> GroupReport {
    let mut report = GroupReport::new(group);

    match group {
        RuleGroup::UniquePkpplk => stations::check_unique_pkpplk(context, &mut report),
        RuleGroup::UniqueNames => stations::check_unique_names(context, &mut report),
        RuleGroup::UniqueIbnr => stations::check_unique_ibnr(context, &mut report),
        RuleGroup::StationAttributes => stations::check_attributes(context, &mut report),
        RuleGroup::Platforms => platforms::check_platforms(context, &mut report),
        RuleGroup::StopPositions => stop_positions::check_stop_positions(context, &mut report),
        RuleGroup::BusStops => bus_stops::check_bus_stops(context, &mut report),
    }

    log::debug!("{:?}: {} issues", group, report.issues.len());
    report
}

/// Validate a whole dataset. Every group runs regardless of earlier failures.
pub fn validate_dataset(dataset: &Dataset, exceptions: &ExceptionTable) -> ValidationReport {
    let context = RuleContext::new(dataset, exceptions);
    let groups = RuleGroup::ALL
        .iter()
        .map(|group| run_group(*group, &context))
        .collect();

    ValidationReport { groups }
}
