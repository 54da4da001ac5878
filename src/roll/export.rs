// Outputs: JSON summary, and export of the results as CSV or xlsx.

use rust_xlsxwriter::{Format, Workbook};
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;

use crate::roll::*;

pub const EXPORT_HEADER: [&str; 5] = [
    "Full Name",
    "Email",
    "Classes Attended",
    "Attendance (%)",
    "Status",
];

pub const EXPORT_SHEET_NAME: &str = "Attendance Results";

pub fn format_percent(p: f64) -> String {
    format!("{:.2}", p)
}

fn records_to_json(records: &[ProcessedRecord]) -> Vec<JSValue> {
    records
        .iter()
        .map(|r| {
            json!({
                "id": r.id.to_string(),
                "name": r.full_name,
                "email": r.email,
                "classesAttended": r.classes_attended.to_string(),
                "attendancePercent": format_percent(r.attendance_percent),
                "status": r.status.label(),
            })
        })
        .collect()
}

fn stats_to_json(stats: &MatchStats) -> JSValue {
    let mut m: JSMap<String, JSValue> = JSMap::new();
    for (k, v) in [
        ("entries", stats.entries),
        ("matched", stats.matched),
        ("unmatched", stats.unmatched),
        ("blank", stats.blank),
        ("ambiguous", stats.ambiguous),
    ] {
        m.insert(k.to_string(), json!(v.to_string()));
    }
    JSValue::Object(m)
}

pub fn build_summary_js(
    settings: &OutputSettings,
    total_classes: i64,
    minimum_percent: f64,
    reconciliation: &Reconciliation,
) -> JSValue {
    let c = OutputConfig {
        course: settings.course_name.clone(),
        date: settings.course_date.clone(),
        workload: settings.course_workload.clone(),
        total_classes: total_classes.to_string(),
        minimum_percent: format_percent(minimum_percent),
    };
    json!({
        "config": c,
        "results": records_to_json(&reconciliation.records),
        "stats": stats_to_json(&reconciliation.stats),
    })
}

/// Writes the summary to a file, or to the standard output for `stdout`.
pub fn write_summary(path: &str, pretty_js: &str) -> BRollResult<()> {
    if path == "stdout" {
        println!("{}", pretty_js);
        return Ok(());
    }
    info!("Writing summary to {:?}", path);
    fs::write(path, pretty_js).context(WritingOutputSnafu { path })?;
    Ok(())
}

/// Exports the results, as an Excel workbook when the path ends in `.xlsx`
/// and as CSV otherwise.
pub fn write_results(path: &str, records: &[ProcessedRecord]) -> BRollResult<()> {
    let is_xlsx = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false);
    if is_xlsx {
        write_results_xlsx(path, records)
    } else {
        write_results_csv(path, records)
    }
}

pub fn write_results_xlsx(path: &str, records: &[ProcessedRecord]) -> BRollResult<()> {
    info!("Exporting {} results to {:?}", records.len(), path);
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook
        .add_worksheet()
        .set_name(EXPORT_SHEET_NAME)
        .context(XlsxWriteSnafu { path })?;
    for (col, label) in EXPORT_HEADER.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *label, &header_format)
            .context(XlsxWriteSnafu { path })?;
    }
    for (idx, r) in records.iter().enumerate() {
        let row = (idx + 1) as u32;
        worksheet
            .write_string(row, 0, &r.full_name)
            .context(XlsxWriteSnafu { path })?;
        worksheet
            .write_string(row, 1, &r.email)
            .context(XlsxWriteSnafu { path })?;
        worksheet
            .write_number(row, 2, r.classes_attended as f64)
            .context(XlsxWriteSnafu { path })?;
        worksheet
            .write_string(row, 3, format_percent(r.attendance_percent))
            .context(XlsxWriteSnafu { path })?;
        worksheet
            .write_string(row, 4, r.status.label())
            .context(XlsxWriteSnafu { path })?;
    }
    workbook.save(path).context(XlsxWriteSnafu { path })?;
    Ok(())
}

pub fn write_results_csv(path: &str, records: &[ProcessedRecord]) -> BRollResult<()> {
    info!("Exporting {} results to {:?}", records.len(), path);
    let mut wtr = csv::Writer::from_path(path).context(CsvWriteSnafu { path })?;
    wtr.write_record(EXPORT_HEADER)
        .context(CsvWriteSnafu { path })?;
    for r in records.iter() {
        wtr.write_record([
            r.full_name.as_str(),
            r.email.as_str(),
            r.classes_attended.to_string().as_str(),
            format_percent(r.attendance_percent).as_str(),
            r.status.label(),
        ])
        .context(CsvWriteSnafu { path })?;
    }
    wtr.flush().context(WritingOutputSnafu { path })?;
    Ok(())
}
