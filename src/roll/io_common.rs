use std::path::Path;

use calamine::DataType;

use crate::roll::*;

/// The content of a sheet, as text.
///
/// The first non-empty row is the header. Rows that are entirely blank are
/// dropped; the line numbers of the remaining rows are kept for the logs.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<(usize, Vec<String>)>,
}

impl RawTable {
    pub fn from_rows(path: &str, rows: impl Iterator<Item = (usize, Vec<String>)>) -> BRollResult<RawTable> {
        let mut non_blank = rows.filter(|(_, row)| !is_blank_row(row));
        let (_, header) = non_blank.next().context(MissingHeaderSnafu { path })?;
        let header = header
            .iter()
            .enumerate()
            .map(|(idx, h)| {
                // Some spreadsheet programs start CSV exports with a byte order mark.
                if idx == 0 {
                    h.trim_start_matches('\u{feff}').to_string()
                } else {
                    h.clone()
                }
            })
            .collect();
        Ok(RawTable {
            header,
            rows: non_blank.collect(),
        })
    }
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|s| s.trim().is_empty())
}

/// Finds a column by its label. An exact match is preferred, then a match
/// that ignores case and surrounding whitespace.
pub fn find_column(header: &[String], label: &str) -> Option<usize> {
    header.iter().position(|h| h == label).or_else(|| {
        let wanted = label.trim().to_lowercase();
        header
            .iter()
            .position(|h| h.trim().to_lowercase() == wanted)
    })
}

/// The textual content of a cell. Error cells are treated as empty.
#[allow(unreachable_patterns)]
pub fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        // Whole numbers are written without the decimal part, as displayed by
        // spreadsheet programs.
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::DateTime(f) => f.to_string(),
        DataType::Error(_) => String::new(),
        DataType::Empty => String::new(),
        _ => String::new(),
    }
}

pub fn roster_from_table(
    table: &RawTable,
    path: &str,
    source: &FileSource,
) -> BRollResult<Vec<EnrollmentRecord>> {
    let name_idx = column_index(table, path, source.name_column())?;
    let email_idx = column_index(table, path, source.email_column())?;
    debug!(
        "roster_from_table: {}: name column {} email column {}",
        simplify_file_name(path),
        name_idx,
        email_idx
    );
    let res: Vec<EnrollmentRecord> = table
        .rows
        .iter()
        .map(|(lineno, row)| {
            let cell = |idx: usize| row.get(idx).cloned().unwrap_or_default();
            let record = EnrollmentRecord {
                full_name: cell(name_idx),
                email: cell(email_idx),
            };
            debug!("roster_from_table: line {}: {:?}", lineno, record);
            record
        })
        .collect();
    Ok(res)
}

/// The values of the first column. The label of that column does not matter.
pub fn attendance_from_table(table: &RawTable, path: &str) -> Vec<String> {
    debug!(
        "attendance_from_table: {}: reading column {:?}",
        simplify_file_name(path),
        table.header.first()
    );
    table
        .rows
        .iter()
        .map(|(_, row)| row.first().cloned().unwrap_or_default())
        .collect()
}

fn column_index(table: &RawTable, path: &str, label: &str) -> RollResult<usize> {
    find_column(&table.header, label).context(MissingColumnSnafu {
        column: label,
        path,
        found: table.header.clone(),
    })
}
