//! Direction hint rules
//!
//! Shared by platforms and bus stops. Hints from all features of one station
//! are checked together, as a multiset.

use std::fmt;

use crate::util::count_ordered;

/// Served in every direction
pub const WILDCARD: &str = "*";
/// Trains terminate here in one direction
pub const TERMINUS: &str = "T";
pub const HEADINGS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

pub fn is_heading(hint: &str) -> bool {
    HEADINGS.contains(&hint)
}

pub fn is_valid_hint(hint: &str) -> bool {
    hint == WILDCARD || hint == TERMINUS || is_heading(hint)
}

/// A broken direction hint rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintViolation {
    /// Token outside the vocabulary
    Invalid(String),
    /// Wildcard used together with this heading
    WildcardWithHeading(String),
    /// Token used more than once
    Repeated { hint: String, count: usize },
    /// Terminus without a wildcard or any heading
    TerminusAlone,
    /// No wildcard and fewer than two distinct headings
    SingleHeading,
}

impl fmt::Display for HintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HintViolation::Invalid(hint) => write!(f, "Invalid direction hint used: {}", hint),
            HintViolation::WildcardWithHeading(hint) => {
                write!(f, "Station uses both the {} and {} hints", WILDCARD, hint)
            }
            HintViolation::Repeated { hint, count } => {
                write!(f, "Hint {} used {} times", hint, count)
            }
            HintViolation::TerminusAlone => write!(f, "Only the {} hint is present", TERMINUS),
            HintViolation::SingleHeading => write!(f, "Only one heading hint is used"),
        }
    }
}

/// Check the hints collected across one station's platforms or bus stops
pub fn check_hints<'a, I>(hints: I) -> Vec<HintViolation>
where
    I: IntoIterator<Item = &'a str>,
{
    let counts = count_ordered(hints);
    let mut violations = Vec::new();
    if counts.is_empty() {
        return violations;
    }

    let wildcard_used = counts.iter().any(|(hint, _)| *hint == WILDCARD);

    for (hint, count) in &counts {
        if !is_valid_hint(hint) {
            violations.push(HintViolation::Invalid(hint.to_string()));
        } else if wildcard_used && is_heading(hint) {
            violations.push(HintViolation::WildcardWithHeading(hint.to_string()));
        } else if *count > 1 {
            violations.push(HintViolation::Repeated {
                hint: hint.to_string(),
                count: *count,
            });
        }
    }

    let headings_used = counts.iter().filter(|(hint, _)| is_heading(hint)).count();
    let terminus_used = counts.iter().any(|(hint, _)| *hint == TERMINUS);

    if terminus_used && !wildcard_used && headings_used == 0 {
        violations.push(HintViolation::TerminusAlone);
    }

    if !wildcard_used && headings_used < 2 {
        violations.push(HintViolation::SingleHeading);
    }

    violations
}
