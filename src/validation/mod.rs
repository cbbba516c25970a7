//! Validation Engine
//!
//! Rule groups over a loaded dataset, separated from parsing and presentation.

pub mod attributes;
pub mod bus_stops;
pub mod engine;
pub mod exceptions;
pub mod hints;
pub mod platforms;
pub mod stations;
pub mod stop_positions;

pub use engine::{
    GroupReport, Issue, MAX_DISTANCE_M, RuleContext, RuleGroup, StationSummary, Subject,
    ValidationReport, run_group, validate_dataset,
};
pub use exceptions::{DuplicateCheck, ExceptionRule, ExceptionTable, GroupMatcher};
pub use hints::{HintViolation, check_hints};
