//! End-to-end tests: load a document, validate it, render the report
use std::fs;

use plrailmap_tools::loader::load_str;
use plrailmap_tools::report::render_to_string;
use plrailmap_tools::validation::{
    DuplicateCheck, ExceptionTable, RuleGroup, Subject, validate_dataset,
};
use tempfile::TempDir;

const NETWORK: &str = include_str!("fixtures/network.osm");

#[test]
fn test_fixture_is_valid_with_builtin_exceptions() {
    let dataset = load_str(NETWORK).expect("load fixture");
    let report = validate_dataset(&dataset, &ExceptionTable::builtin());

    for group in &report.groups {
        assert!(group.is_valid(), "{:?}: {:?}", group.group, group.messages());
    }
    assert!(report.is_valid());
}

#[test]
fn test_without_exceptions_warszawa_zachodnia_fails() {
    let dataset = load_str(NETWORK).expect("load fixture");
    let report = validate_dataset(&dataset, &ExceptionTable::empty());

    assert!(!report.is_valid());
    let names = report.group(RuleGroup::UniqueNames).expect("names group");
    assert_eq!(names.messages(), vec!["Name Warszawa Zachodnia is shared"]);
    let ibnr = report.group(RuleGroup::UniqueIbnr).expect("ibnr group");
    assert_eq!(ibnr.messages(), vec!["IBNR code 404 is shared"]);

    // Remaining groups are unaffected
    assert!(report.group(RuleGroup::Platforms).expect("platforms").is_valid());
}

#[test]
fn test_duplicate_registry_code_names_both_members() {
    let document = NETWORK.replace(r#"<tag k="ref" v="99999"/>"#, r#"<tag k="ref" v="33605"/>"#);
    let dataset = load_str(&document).expect("load document");
    let report = validate_dataset(&dataset, &ExceptionTable::builtin());

    let group = report.group(RuleGroup::UniquePkpplk).expect("pkpplk group");
    assert_eq!(group.issues.len(), 1);
    match &group.issues[0].subject {
        Subject::Stations(members) => {
            let ids: Vec<_> = members.iter().map(|m| m.id.as_str()).collect();
            assert_eq!(ids, vec!["100", "300"]);
        }
        other => panic!("Expected station group, got {:?}", other),
    }
}

#[test]
fn test_all_groups_run_after_failures() {
    let document = NETWORK
        .replace(r#"v="fallback""#, r#"v="33605""#)
        .replace(r#"<tag k="wheelchair" v="yes"/>"#, r#"<tag k="wheelchair" v="limited"/>"#)
        .replace(r#"<tag k="direction" v="E"/>"#, r#"<tag k="direction" v="W"/>"#);
    let dataset = load_str(&document).expect("load document");
    let report = validate_dataset(&dataset, &ExceptionTable::builtin());

    assert_eq!(report.groups.len(), RuleGroup::ALL.len());
    assert!(!report.group(RuleGroup::StationAttributes).expect("attrs").is_valid());
    assert_eq!(
        report.group(RuleGroup::Platforms).expect("platforms").messages(),
        vec!["Hint W used 2 times", "Only one heading hint is used"]
    );

    let stops = report.group(RuleGroup::StopPositions).expect("stops");
    assert_eq!(
        stops.messages(),
        vec![
            "Expected exactly one stop position with towards=fallback, found 0",
            "Expected exactly one stop position with towards=fallback, found 0",
        ]
    );
}

#[test]
fn test_unknown_station_reference() {
    let document = NETWORK.replace(
        r#"<tag k="ref:station" v="33506"/>"#,
        r#"<tag k="ref:station" v="11111"/>"#,
    );
    let dataset = load_str(&document).expect("load document");
    let report = validate_dataset(&dataset, &ExceptionTable::builtin());

    let stops = report.group(RuleGroup::StopPositions).expect("stops");
    assert_eq!(
        stops.messages(),
        vec!["Invalid reference to station 11111 from stop positions: 202"]
    );
    assert_eq!(
        stops.issues[0].subject,
        Subject::UnknownStation("11111".to_string())
    );
}

#[test]
fn test_rendered_report() {
    let dataset = load_str(NETWORK).expect("load fixture");
    let report = validate_dataset(&dataset, &ExceptionTable::empty());
    let text = render_to_string(&report);

    assert!(text.starts_with("Checking uniqueness of PKP PLK IDs\n✅ PKP PLK ids are unique\n"));
    assert!(text.contains("❌ Found duplicate names:\nnode\tpkpplk\tibnr\tname\n"));
    assert!(text.contains("200\t33506\t404\tWarszawa Zachodnia\n"));
    assert!(text.contains("201\t34868\t404\tWarszawa Zachodnia\n"));
    assert!(text.ends_with("Checking bus stops\n✅ Bus stops are OK\n"));
}

#[test]
fn test_user_exception_table() {
    let dir = TempDir::new().expect("create temp dir");
    fs::write(
        dir.path().join("exceptions.toml"),
        r#"
[[exception]]
id = "zachodnia-names"
check = "name"
reason = "Parent station and main stop share a name"
match = { all_ibnr = "404" }
"#,
    )
    .expect("write exception table");

    let table = ExceptionTable::resolve(None, &[dir.path().to_path_buf()]).expect("resolve table");
    assert_eq!(table.rules().len(), 1);
    assert_eq!(table.rules()[0].check, DuplicateCheck::Name);
    assert_eq!(
        table.source(),
        Some(dir.path().join("exceptions.toml").as_path())
    );

    let dataset = load_str(NETWORK).expect("load fixture");
    let report = validate_dataset(&dataset, &table);
    assert!(report.group(RuleGroup::UniqueNames).expect("names").is_valid());
    assert!(!report.group(RuleGroup::UniqueIbnr).expect("ibnr").is_valid());
}

#[test]
fn test_explicit_exception_file_must_exist() {
    let dir = TempDir::new().expect("create temp dir");
    let missing = dir.path().join("nope.toml");
    assert!(ExceptionTable::resolve(Some(&missing), &[]).is_err());
}

#[test]
fn test_no_user_table_falls_back_to_builtin() {
    let dir = TempDir::new().expect("create temp dir");
    let table = ExceptionTable::resolve(None, &[dir.path().to_path_buf()]).expect("resolve table");
    assert!(table.source().is_none());
    assert_eq!(table.rules().len(), ExceptionTable::builtin().rules().len());
}
