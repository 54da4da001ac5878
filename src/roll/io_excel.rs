// Primitives for reading spreadsheets (xlsx, xls, ods).

use calamine::{open_workbook_auto, Reader};

use crate::roll::{
    io_common::{cell_to_string, RawTable},
    *,
};

/// Reads a worksheet as text: the one named `worksheet_name` if provided,
/// the first one otherwise.
pub fn read_excel_table(path: &str, worksheet_name: Option<&str>) -> BRollResult<RawTable> {
    debug!(
        "read_excel_table: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook = open_workbook_auto(path).context(OpeningExcelSnafu { path })?;

    let wrange = if let Some(name) = worksheet_name {
        workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?
            .context(OpeningExcelSnafu { path })?
    } else {
        debug!(
            "read_excel_table: using the first of {:?}",
            workbook.sheet_names()
        );
        workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?
    };

    let rows = wrange.rows().enumerate().map(|(idx, row)| {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        debug!("read_excel_table: idx: {:?} row: {:?}", idx, &cells);
        (idx + 1, cells)
    });
    RawTable::from_rows(path, rows)
}

/// Adds a worksheet filled with `rows`. Empty strings leave the cell empty
/// and cells that parse as numbers are written as numbers.
#[cfg(test)]
pub(crate) fn add_test_sheet(workbook: &mut rust_xlsxwriter::Workbook, name: &str, rows: &[&[&str]]) {
    let worksheet = workbook.add_worksheet().set_name(name).unwrap();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            match cell.parse::<f64>() {
                Ok(n) => worksheet.write_number(r as u32, c as u16, n).unwrap(),
                Err(_) => worksheet.write_string(r as u32, c as u16, *cell).unwrap(),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn strings(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    fn class_workbook(dir: &Path) -> String {
        let mut workbook = Workbook::new();
        add_test_sheet(
            &mut workbook,
            "Roster",
            &[
                &[],
                &["Nome Completo", "Email", "Turma"],
                &["Ana Silva", "a@x.com", "12"],
                &["", "", ""],
                &["Bruno Costa", "b@x.com", "B"],
            ],
        );
        add_test_sheet(
            &mut workbook,
            "Attendance",
            &[&["Participante"], &["ana silva"], &["Bruno Costa"]],
        );
        let path = dir.join("class.xlsx").display().to_string();
        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn first_worksheet_is_read_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = class_workbook(dir.path());
        let t = read_excel_table(&path, None).unwrap();
        assert_eq!(t.header, strings(&["Nome Completo", "Email", "Turma"]));
        let rows: Vec<Vec<String>> = t.rows.into_iter().map(|(_, r)| r).collect();
        assert_eq!(
            rows,
            vec![
                strings(&["Ana Silva", "a@x.com", "12"]),
                strings(&["Bruno Costa", "b@x.com", "B"]),
            ]
        );
    }

    #[test]
    fn named_worksheet_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = class_workbook(dir.path());
        let t = read_excel_table(&path, Some("Attendance")).unwrap();
        assert_eq!(t.header, strings(&["Participante"]));
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[1].1, strings(&["Bruno Costa"]));
    }

    #[test]
    fn missing_worksheet_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = class_workbook(dir.path());
        let res = read_excel_table(&path, Some("Presenças"));
        match res.map_err(|e| *e) {
            Err(RollError::MissingWorksheet { name, .. }) => assert_eq!(name, "Presenças"),
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn missing_workbook_is_an_error() {
        let res = read_excel_table("/this/file/does/not/exist.xlsx", None);
        assert!(matches!(res.map_err(|e| *e), Err(RollError::OpeningExcel { .. })));
    }

    #[test]
    fn garbage_is_an_error() {
        let f = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        std::fs::write(f.path(), "this is not a spreadsheet").unwrap();
        let path = f.path().display().to_string();
        let res = read_excel_table(&path, Some("Sheet1"));
        assert!(matches!(res.map_err(|e| *e), Err(RollError::OpeningExcel { .. })));
    }
}
