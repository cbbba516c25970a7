//! Tests for the GTFS comparison, CSV generator, JSON export and command dispatch
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use plrailmap_tools::cli;
use plrailmap_tools::config::{Args, Config};
use plrailmap_tools::generate::{DEFAULT_FIRST_REF, csv_to_osm};
use plrailmap_tools::gtfs::{KeyMode, compare_file};
use plrailmap_tools::loader::load_str;

use clap::Parser;
use tempfile::TempDir;

const NETWORK: &str = include_str!("fixtures/network.osm");

#[test]
fn test_generated_nodes_load_as_stations() {
    let csv = "id,name,lat,lon,ibnr\n\
               100,Alpha,52.1,21.0,5100\n\
               200,Beta,52.2,21.1,\n";
    let mut osm = Vec::new();
    csv_to_osm(csv.as_bytes(), &mut osm, DEFAULT_FIRST_REF).expect("generate");

    let document = String::from_utf8(osm).expect("utf-8 output");
    let dataset = load_str(&document).expect("generated document loads");

    assert_eq!(dataset.stations.len(), 2);
    assert_eq!(dataset.stations[0].id, "-999000");
    assert_eq!(dataset.stations[0].pkpplk, "100");
    assert_eq!(dataset.stations[0].ibnr.as_deref(), Some("5100"));
    assert_eq!(dataset.stations[0].tag("fixme"), Some("verify"));
    assert_eq!(dataset.stations[1].id, "-999001");
    assert_eq!(dataset.stations[1].ibnr, None);

    // Generated nodes are not part of any line yet
    assert_eq!(dataset.dangling.len(), 2);
}

#[test]
fn test_compare_gtfs_files() {
    let dir = TempDir::new().expect("create temp dir");
    let dataset = load_str(NETWORK).expect("load fixture");

    let pkpplk_feed = dir.path().join("stops.txt");
    fs::write(
        &pkpplk_feed,
        "stop_id,stop_name,stop_lat,stop_lon,location_type,parent_station\n\
         33605,Warszawa Centralna,52.2287,21.0034,1,\n\
         33605_1,Warszawa Centralna peron 1,52.2288,21.0035,0,33605\n\
         12345,Missing,50.0,20.0,,\n",
    )
    .expect("write feed");

    let comparison = compare_file(&dataset, &pkpplk_feed, KeyMode::Auto, 1000.0).expect("compare");
    assert!(!comparison.is_ok());
    assert_eq!(comparison.missing.len(), 1);
    assert_eq!(comparison.missing[0].id, "12345");

    let ibnr_feed = dir.path().join("kw_stops.txt");
    fs::write(
        &ibnr_feed,
        "stop_id,stop_name,stop_lat,stop_lon\n5100065,Warszawa Centralna,52.2287,21.0034\n",
    )
    .expect("write feed");

    let comparison = compare_file(&dataset, &ibnr_feed, KeyMode::Auto, 1000.0).expect("compare");
    assert!(comparison.is_clean());
}

#[test]
fn test_compare_gtfs_missing_file() {
    let dir = TempDir::new().expect("create temp dir");
    let dataset = load_str(NETWORK).expect("load fixture");
    let result = compare_file(&dataset, &dir.path().join("nope.txt"), KeyMode::Auto, 1000.0);
    assert!(result.is_err());
}

fn config(argv: &[&str]) -> Config {
    Config::from_args(Args::try_parse_from(argv).expect("valid arguments")).expect("create config")
}

#[test]
fn test_cli_csv_to_osm_writes_file() {
    let dir = TempDir::new().expect("create temp dir");
    let input = dir.path().join("stations.csv");
    let output = dir.path().join("stations.osm");
    fs::write(&input, "id,name,lat,lon\n300,Gamma,52.3,21.3\n").expect("write csv");

    let config = config(&[
        "plrailmap",
        "csv-to-osm",
        "--ref",
        "-10",
        "--input",
        input.to_str().expect("utf-8 path"),
        "--output",
        output.to_str().expect("utf-8 path"),
    ]);
    cli::run(config).expect("run csv-to-osm");

    let dataset = load_str(&fs::read_to_string(&output).expect("read output")).expect("load output");
    assert_eq!(dataset.stations[0].id, "-10");
    assert_eq!(dataset.stations[0].name, "Gamma");
}

#[test]
fn test_cli_stations_json_writes_file() {
    let dir = TempDir::new().expect("create temp dir");
    let input = dir.path().join("plrailmap.osm");
    let output: PathBuf = dir.path().join("stations.json");
    fs::write(&input, NETWORK).expect("write fixture");

    let config = config(&[
        "plrailmap",
        "stations-json",
        "--input",
        input.to_str().expect("utf-8 path"),
        "--output",
        output.to_str().expect("utf-8 path"),
    ]);
    cli::run(config).expect("run stations-json");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).expect("read output")).expect("json");
    assert_eq!(json["33605"]["name"], "Warszawa Centralna");
    assert_eq!(json["33605"]["code_ztmw"], "7900");
    assert_eq!(json["33605"]["platforms"].as_array().map(Vec::len), Some(2));
    assert!(json["99999"].get("platforms").is_none());
}

#[test]
fn test_cli_verify_missing_input_is_error() {
    let dir = TempDir::new().expect("create temp dir");
    let input = dir.path().join("missing.osm");
    let config = config(&[
        "plrailmap",
        "verify",
        "--input",
        input.to_str().expect("utf-8 path"),
    ]);
    assert!(cli::run(config).is_err());
}

fn run_verify(input: &Path) -> ExitCode {
    let config = config(&[
        "plrailmap",
        "verify",
        "--input",
        input.to_str().expect("utf-8 path"),
    ]);
    cli::run(config).expect("run verify")
}

#[test]
fn test_cli_verify_exit_status() {
    let dir = TempDir::new().expect("create temp dir");

    let good = dir.path().join("good.osm");
    fs::write(&good, NETWORK).expect("write fixture");
    assert_eq!(run_verify(&good), ExitCode::SUCCESS);

    // Neither station keeps its fallback stop position
    let broken = dir.path().join("broken.osm");
    fs::write(&broken, NETWORK.replace(r#"v="fallback""#, r#"v="""#)).expect("write fixture");
    assert_eq!(run_verify(&broken), ExitCode::FAILURE);
}

#[test]
fn test_cli_compare_gtfs_exit_status() {
    let dir = TempDir::new().expect("create temp dir");
    let input = dir.path().join("plrailmap.osm");
    fs::write(&input, NETWORK).expect("write fixture");

    let complete = dir.path().join("complete.txt");
    fs::write(
        &complete,
        "stop_id,stop_name,stop_lat,stop_lon\n33605,Warszawa Centralna,52.2287,21.0034\n",
    )
    .expect("write feed");
    let incomplete = dir.path().join("incomplete.txt");
    fs::write(
        &incomplete,
        "stop_id,stop_name,stop_lat,stop_lon\n12345,Missing,50.0,20.0\n",
    )
    .expect("write feed");

    let run_compare = |stops: &[&Path]| {
        let mut argv = vec![
            "plrailmap",
            "compare-gtfs",
            "--input",
            input.to_str().expect("utf-8 path"),
        ];
        argv.extend(stops.iter().map(|p| p.to_str().expect("utf-8 path")));
        cli::run(config(&argv)).expect("run compare-gtfs")
    };

    assert_eq!(run_compare(&[complete.as_path()]), ExitCode::SUCCESS);
    assert_eq!(
        run_compare(&[complete.as_path(), incomplete.as_path()]),
        ExitCode::FAILURE
    );
}
