// Primitives for reading CSV files.

use crate::roll::{io_common::RawTable, *};

pub fn read_csv_table(path: &str) -> BRollResult<RawTable> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let mut rows: Vec<(usize, Vec<String>)> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        // Line numbers start at 1 to respect most conventions in the spreadsheet world.
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        let row: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        debug!("read_csv_table: lineno: {:?} row: {:?}", lineno, &row);
        rows.push((lineno, row));
    }
    RawTable::from_rows(path, rows.into_iter())
}
