//! Format checks for optional attributes shared by stations and platforms.

use std::sync::LazyLock;

use regex::Regex;

use crate::util::osm_list;

/// ZTM Warszawa code of a stop group (`ref:ztmw` on stations)
static ZTMW_STATION_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]9[0-9][0-9]$").expect("valid regex"));

/// ZTM Warszawa code of a single stop (`ref:ztmw` on platforms)
static ZTMW_STOP_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]9[0-9]{4}$").expect("valid regex"));

/// `wheelchair` must be `yes` or `no` when present. Returns the offending value.
pub fn check_wheelchair(value: Option<&str>) -> Option<&str> {
    match value {
        None | Some("yes") | Some("no") => None,
        Some(other) => Some(other),
    }
}

/// A station's `ref:ztmw` must be a stop group code
pub fn check_station_ztmw(value: Option<&str>) -> Option<String> {
    let value = value?;
    if ZTMW_STATION_CODE.is_match(value) {
        None
    } else {
        Some(format!("Invalid ref:ztmw value: {}", value))
    }
}

/// Entries of a platform's `ref:ztmw` list that are not stop codes
pub fn invalid_stop_ztmw_codes(value: Option<&str>) -> Vec<String> {
    osm_list(value.unwrap_or_default())
        .into_iter()
        .filter(|code| !ZTMW_STOP_CODE.is_match(code))
        .collect()
}
