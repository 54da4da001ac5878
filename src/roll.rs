use log::{debug, info, warn};

use attendance_tally::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use text_diff::print_diff;

use crate::args::Args;
use crate::roll::config_reader::*;

pub mod config_reader;
mod export;
mod io_common;
mod io_csv;
mod io_excel;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum RollError {
    #[snafu(display("Error opening spreadsheet {path}"))]
    OpeningExcel {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("The spreadsheet {path} does not contain any worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("The spreadsheet {path} does not contain a worksheet named {name:?}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("The file {path} is empty: a header row is expected"))]
    MissingHeader { path: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Column {column:?} not found in {path} (columns: {found:?})"))]
    MissingColumn {
        column: String,
        path: String,
        found: Vec<String>,
    },
    #[snafu(display("Cannot read {path:?}: unknown provider {provider:?} (expected csv or xlsx)"))]
    UnknownProvider { provider: String, path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("No {what} provided (use the command line or the configuration file)"))]
    MissingInput { what: String },
    #[snafu(display("Invalid value {value:?} for option {name}"))]
    InvalidOption { name: String, value: String },
    #[snafu(display("Invalid rules: {source}"))]
    InvalidRules { source: TallyErrors },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing CSV file {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error writing spreadsheet {path}"))]
    XlsxWrite {
        source: rust_xlsxwriter::XlsxError,
        path: String,
    },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},
}

pub type RollResult<T> = Result<T, RollError>;
pub type BRollResult<T> = Result<T, Box<RollError>>;

/// Where the results of a run go.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RunOutputs {
    /// A file path or `stdout`. Nothing is written when absent.
    pub summary_path: Option<String>,
    pub export_path: Option<String>,
    pub reference_path: Option<String>,
}

fn read_source(source: &FileSource) -> BRollResult<io_common::RawTable> {
    let path = source.file_path.as_str();
    info!(
        "Attempting to read {:?}",
        io_common::simplify_file_name(path)
    );
    match source.provider_kind()? {
        Provider::Csv => io_csv::read_csv_table(path),
        Provider::Excel => io_excel::read_excel_table(path, source.excel_worksheet_name.as_deref()),
    }
}

pub fn read_roster(source: &FileSource) -> BRollResult<Vec<EnrollmentRecord>> {
    let table = read_source(source)?;
    let roster = io_common::roster_from_table(&table, &source.file_path, source)?;
    info!("Read {} enrolled participants", roster.len());
    Ok(roster)
}

pub fn read_attendance(source: &FileSource) -> BRollResult<Vec<String>> {
    let table = read_source(source)?;
    let names = io_common::attendance_from_table(&table, &source.file_path);
    info!("Read {} attendance entries", names.len());
    Ok(names)
}

fn log_results(records: &[ProcessedRecord]) {
    for r in records.iter() {
        info!(
            "{:>4} {:>7}% {:<8} {} <{}>",
            r.classes_attended,
            export::format_percent(r.attendance_percent),
            r.status.label(),
            r.full_name,
            r.email
        );
    }
    info!(
        "{} / {} approved",
        approved(records).len(),
        records.len()
    );
}

/// Reads both inputs, reconciles them, classifies the participants and
/// writes the requested outputs.
///
/// Nothing is written if any input cannot be read.
pub fn run_reconciliation(config: &RollConfig, outputs: &RunOutputs) -> BRollResult<Reconciliation> {
    let rules = config.rules.match_rules()?;
    let total_classes = config.rules.total_classes()?;
    let minimum_percent = config.rules.minimum_percent();
    info!(
        "rules: {:?} total classes: {} minimum percent: {}",
        rules, total_classes, minimum_percent
    );

    let roster = read_roster(config.roster_source()?)?;
    let attendance = read_attendance(config.attendance_source()?)?;

    let mut reconciliation = run_attendance_stats(&roster, &attendance, total_classes, &rules)
        .context(InvalidRulesSnafu {})?;
    reconciliation.records =
        classify(&reconciliation.records, minimum_percent).context(InvalidRulesSnafu {})?;
    log_results(&reconciliation.records);

    let summary_js = export::build_summary_js(
        &config.output_settings,
        total_classes,
        minimum_percent,
        &reconciliation,
    );
    let pretty_js_stats = serde_json::to_string_pretty(&summary_js).context(WritingJsonSnafu {})?;

    if let Some(p) = &outputs.summary_path {
        export::write_summary(p, &pretty_js_stats)?;
    }
    if let Some(p) = &outputs.export_path {
        export::write_results(p, &reconciliation.records)?;
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &outputs.reference_path {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(WritingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary {:?}", summary_p);
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            return Err(Box::new(RollError::ReferenceMismatch {}));
        }
        info!("The summary matches the reference {:?}", summary_p);
    }

    Ok(reconciliation)
}

pub fn run_roll_call(args: &Args) -> BRollResult<()> {
    let mut config = match &args.config {
        Some(p) => read_config(p)?,
        None => RollConfig::default(),
    };
    config.apply_args(args);
    debug!("run_roll_call: config: {:?}", config);

    let outputs = RunOutputs {
        summary_path: args
            .out
            .clone()
            .or_else(|| config.default_summary_path())
            .or_else(|| Some("stdout".to_string())),
        export_path: args.export.clone().or_else(|| config.default_export_path()),
        reference_path: args.reference.clone(),
    };
    run_reconciliation(&config, &outputs)?;
    Ok(())
}
