//! Validate an uploaded roster batch and report which rows can be imported.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use roster::config::RosterSettings;
use roster::domain::ports::RosterSource;
use roster::domain::{BatchReport, Record, RecordOperations, StudentRecord, UserRecord};
use roster::outbound::{JsonFileRosterSource, TracingNotificationSink};
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// Record variant held by the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    /// Professors and administrative users.
    User,
    /// Students enrolled in a group.
    Student,
}

/// `roster-validate` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "roster-validate",
    about = "Validate an uploaded roster batch against the schema and an existing roster",
    version
)]
struct CliArgs {
    /// JSON array of records to validate.
    #[arg(long = "input", value_name = "path")]
    input: PathBuf,
    /// Record variant held by the input file.
    #[arg(long = "kind", value_enum, default_value_t = KindArg::User)]
    kind: KindArg,
    /// Existing roster to check duplicates against. Falls back to
    /// `ROSTER_EXISTING_ROSTER_PATH` when omitted.
    #[arg(long = "existing", value_name = "path")]
    existing: Option<PathBuf>,
}

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    match run() {
        Ok(report) if report.is_clean() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(error) => {
            eprintln!("roster-validate: {error}");
            ExitCode::from(2)
        }
    }
}

fn run() -> io::Result<BatchReport> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = RosterSettings::load_from_iter([OsString::from("roster-validate")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;

    let report = validate(&args, &settings)?;
    let rendered = serde_json::to_string_pretty(&report)
        .map_err(|error| io::Error::other(format!("render report: {error}")))?;
    writeln!(io::stdout().lock(), "{rendered}")?;
    Ok(report)
}

fn validate(args: &CliArgs, settings: &RosterSettings) -> io::Result<BatchReport> {
    let existing = args
        .existing
        .as_deref()
        .or_else(|| settings.existing_roster_path());
    match args.kind {
        KindArg::User => validate_as::<UserRecord>(&args.input, existing, settings),
        KindArg::Student => validate_as::<StudentRecord>(&args.input, existing, settings),
    }
}

fn validate_as<R>(
    input: &Path,
    existing: Option<&Path>,
    settings: &RosterSettings,
) -> io::Result<BatchReport>
where
    R: Record + DeserializeOwned,
{
    let rows = load::<R>(input)?;
    let baseline = existing.map(load::<R>).transpose()?.unwrap_or_default();
    let page_size = settings
        .page_size()
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;

    let mut operations =
        RecordOperations::new(Arc::new(TracingNotificationSink), Arc::new(DefaultClock), page_size)
            .with_records(baseline);
    let report = operations.import_batch(rows);
    info!(
        kind = %R::KIND,
        total = report.total_rows(),
        accepted = report.accepted().len(),
        rejected = report.rejected().len(),
        pages = operations.total_pages(),
        "batch validated"
    );
    Ok(report)
}

fn load<R>(path: &Path) -> io::Result<Vec<R>>
where
    R: Record + DeserializeOwned,
{
    JsonFileRosterSource::<R>::new(path)
        .load()
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))
}
