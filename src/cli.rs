//! Command dispatch
//!
//! Runs one subcommand and maps its outcome to a process exit code.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};

use crate::config::{Command, Config};
use crate::gtfs::{self, KeyMode};
use crate::validation::{ExceptionTable, validate_dataset};
use crate::{export, generate, loader, report};

/// Run the configured command
pub fn run(config: Config) -> Result<ExitCode> {
    match config.command {
        Command::Verify {
            ref input,
            ref exceptions,
            list_dangling,
        } => verify(
            input,
            exceptions.as_deref(),
            &config.exception_dirs,
            list_dangling,
        ),
        Command::CompareGtfs {
            ref input,
            key,
            max_distance_km,
            ref stops,
        } => compare_gtfs(input, key, max_distance_km, stops),
        Command::CsvToOsm {
            first_ref,
            ref input,
            ref output,
        } => csv_to_osm(first_ref, input.as_deref(), output.as_deref()),
        Command::StationsJson {
            ref input,
            ref output,
        } => stations_json(input, output.as_deref()),
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn verify(
    input: &Path,
    exceptions: Option<&Path>,
    exception_dirs: &[PathBuf],
    list_dangling: bool,
) -> Result<ExitCode> {
    let table = ExceptionTable::resolve(exceptions, exception_dirs)?;
    let dataset = loader::load_path(input)?;
    let validation = validate_dataset(&dataset, &table);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::render_report(&validation, &mut out)?;

    if list_dangling {
        writeln!(out, "Nodes not used by any rail line:")?;
        for id in &dataset.dangling {
            writeln!(out, "    {}", id)?;
        }
    }

    if !validation.is_valid() {
        log::info!("Found {} issues", validation.issue_count());
    }
    Ok(exit_code(validation.is_valid()))
}

fn compare_gtfs(
    input: &Path,
    key: KeyMode,
    max_distance_km: f64,
    stops: &[PathBuf],
) -> Result<ExitCode> {
    let dataset = loader::load_path(input)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut ok = true;

    for path in stops {
        let comparison = gtfs::compare_file(&dataset, path, key, max_distance_km)?;
        gtfs::render_comparison(&comparison, &mut out)?;
        ok &= comparison.is_ok();
    }

    Ok(exit_code(ok))
}

fn csv_to_osm(first_ref: i64, input: Option<&Path>, output: Option<&Path>) -> Result<ExitCode> {
    let source: Box<dyn Read> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    generate::csv_to_osm(source, open_output(output)?, first_ref)?;
    Ok(ExitCode::SUCCESS)
}

fn stations_json(input: &Path, output: Option<&Path>) -> Result<ExitCode> {
    let dataset = loader::load_path(input)?;
    export::write_stations_json(&dataset, open_output(output)?)?;
    Ok(ExitCode::SUCCESS)
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}
