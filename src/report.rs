use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use std::fs;

use text_diff::print_diff;
use vote_series::*;

use crate::args::Args;
use crate::report::config_reader::*;
use crate::report::io_common::*;

mod config_reader;
mod io_common;
mod io_csv;
mod io_fetch;
mod io_json;

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error processing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing CSV record"))]
    CsvWrite { source: csv::Error },
    #[snafu(display("Error flushing CSV output"))]
    CsvFlush { source: std::io::Error },
    #[snafu(display("CSV output is not valid UTF-8"))]
    CsvEncoding { source: std::string::FromUtf8Error },
    #[snafu(display("Timeseries of {state} could not be processed"))]
    Series {
        source: SeriesError,
        state: String,
    },
    #[snafu(display("Error creating the HTTP client"))]
    HttpClient { source: reqwest::Error },
    #[snafu(display("Error fetching {url}"))]
    Fetch { source: reqwest::Error, url: String },
    #[snafu(display("Request to {url} failed: {status}"))]
    HttpStatus { url: String, status: String },
    #[snafu(display("The URL template {template:?} has no {{state}} placeholder"))]
    InvalidUrlTemplate { template: String },
    #[snafu(display("Unknown state {state:?}"))]
    UnknownState { state: String },
    #[snafu(display("Unknown report schema {name:?}"))]
    UnknownSchema { name: String },
    #[snafu(display("Difference detected between the report and the reference {path}"))]
    ReferenceMismatch { path: String },
    #[snafu(display("{count} state(s) could not be processed: {names}"))]
    FailedStates { count: usize, names: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ReportResult<T> = Result<T, ReportError>;

/// The options of a run, once the configuration file and the command line are merged.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub rules: SeriesRules,
    pub schema: ReportSchema,
    pub states: Vec<String>,
    pub url_template: String,
    pub input_dir: Option<String>,
    pub output_dir: Option<String>,
}

fn build_settings(args: &Args, config: &ReportConfig) -> ReportResult<RunSettings> {
    let mut rules = match &config.rules {
        Some(rc) => rc.to_rules()?,
        None => SeriesRules::DEFAULT_RULES,
    };
    if let Some(policy) = &args.zero_votes {
        rules.zero_vote_policy = parse_zero_vote_policy(policy)?;
    }
    if args.strict_drops {
        rules.drop_comparison = DropComparison::Strict;
    }

    let schema_name = args
        .schema
        .clone()
        .or_else(|| config.report_schema.clone())
        .unwrap_or_else(|| ReportSchema::LATEST.name.to_string());
    let schema = ReportSchema::by_name(&schema_name).context(UnknownSchemaSnafu {
        name: schema_name.clone(),
    })?;

    let requested = args.state.clone().or_else(|| config.states.clone());
    let states = resolve_states(requested.as_deref())?;

    Ok(RunSettings {
        rules,
        schema,
        states,
        url_template: config
            .url_template
            .clone()
            .unwrap_or_else(|| io_fetch::DEFAULT_URL_TEMPLATE.to_string()),
        input_dir: args
            .input_dir
            .clone()
            .or_else(|| config.input_directory.clone()),
        output_dir: config.output_directory.clone(),
    })
}

/// Compares a report with a reference report, printing the differences.
pub fn check_reference(reference_path: &str, produced: &str) -> ReportResult<()> {
    let reference = fs::read_to_string(reference_path).context(OpeningFileSnafu {
        path: reference_path,
    })?;
    let reference = reference.replace("\r\n", "\n");
    if reference != produced {
        warn!("Found differences with the reference {}", reference_path);
        print_diff(reference.as_str(), produced, "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    Ok(())
}

/// Builds the report of one state.
///
/// The report is written to `out` (a file path, or the standard output when absent or
/// `stdout`). Nothing is written if the series cannot be processed.
pub fn run_state(
    input: &str,
    out: Option<&str>,
    reference: Option<&str>,
    settings: &RunSettings,
) -> ReportResult<SeriesReport> {
    let state = state_from_path(input);
    info!("Attempting to read timeseries {:?}", input);
    let samples = io_json::read_timeseries(input)?;
    let report = run_series_report(&samples, &settings.rules).context(SeriesSnafu {
        state: state.clone(),
    })?;
    info!(
        "{}: {} rows, {} dropped samples, {} rows with anomalies",
        state,
        report.rows.len(),
        report.dropped,
        report.anomalous_rows()
    );

    let csv_text = io_csv::render_report(&report.rows, &settings.schema)?;
    match out {
        None | Some("stdout") => print!("{}", csv_text),
        Some(path) => fs::write(path, &csv_text).context(WritingFileSnafu { path })?,
    }

    // The reference report, if provided for comparison
    if let Some(reference_p) = reference {
        check_reference(reference_p, &csv_text)?;
    }
    Ok(report)
}

/// Builds the reports of all the states of the settings.
///
/// A state that fails does not stop the others, the failures are reported at the end.
pub fn run_all_states(
    settings: &RunSettings,
    input_dir: &str,
    output_dir: &str,
) -> ReportResult<()> {
    fs::create_dir_all(output_dir).context(WritingFileSnafu { path: output_dir })?;
    let mut failed: Vec<String> = Vec::new();
    for state in settings.states.iter() {
        let input = state_input_path(input_dir, state);
        let output = state_output_path(output_dir, state);
        info!("update: {}", output);
        match run_state(&input, Some(&output), None, settings) {
            Ok(report) => debug!("{}: {} rows written", state, report.rows.len()),
            Err(e) => {
                warn!("{}: {}", state, e);
                failed.push(state.clone());
            }
        }
    }
    ensure!(
        failed.is_empty(),
        FailedStatesSnafu {
            count: failed.len(),
            names: failed.join(", "),
        }
    );
    Ok(())
}

/// Downloads the documents of all the states of the settings into `dir`.
pub fn download_all_states(settings: &RunSettings, dir: &str) -> ReportResult<()> {
    fs::create_dir_all(dir).context(WritingFileSnafu { path: dir })?;
    let fetcher = io_fetch::Fetcher::new(&settings.url_template)?;
    for state in settings.states.iter() {
        info!("downloading: {}", state);
        let out = fetcher.download(state, dir)?;
        debug!("downloaded {}", out);
    }
    Ok(())
}

pub fn run_from_args(args: &Args) -> ReportResult<()> {
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => ReportConfig::default(),
    };
    info!("config: {:?}", config);
    let settings = build_settings(args, &config)?;
    debug!("settings: {:?}", settings);

    if let Some(dir) = &args.download {
        download_all_states(&settings, dir)?;
    }

    if let Some(input) = &args.input {
        run_state(
            input,
            args.out.as_deref(),
            args.reference.as_deref(),
            &settings,
        )?;
        return Ok(());
    }

    if let Some(input_dir) = &settings.input_dir {
        if args.reference.is_some() {
            warn!("--reference is only used with --input, ignoring it");
        }
        let output_dir = args
            .out
            .clone()
            .or_else(|| settings.output_dir.clone())
            .unwrap_or_else(|| ".".to_string());
        return run_all_states(&settings, input_dir, &output_dir);
    }

    if args.download.is_none() {
        whatever!("Nothing to do: provide --input, --input-dir or --download")
    }
    Ok(())
}
