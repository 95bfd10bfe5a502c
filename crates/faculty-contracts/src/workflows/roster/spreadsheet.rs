use super::parser::RawRow;
use super::{RosterImport, RosterImportError};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use std::path::Path;

/// Reads the first worksheet of an Excel workbook, matching columns to
/// roster fields by header name. Cells are stringified the same way the
/// CSV path sees them, so validation behaves identically for both
/// formats.
pub(crate) fn parse_workbook<P: AsRef<Path>>(path: P) -> Result<RosterImport, RosterImportError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(RosterImportError::EmptyWorkbook)??;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(cells) => cells.iter().map(cell_text).collect(),
        None => return Err(RosterImportError::EmptyWorkbook),
    };

    let mut import = RosterImport::default();
    for (index, cells) in rows.enumerate() {
        let row = index + 1;
        let mut raw = RawRow::default();
        for (header, cell) in headers.iter().zip(cells) {
            let value = cell_text(cell);
            if !value.is_empty() {
                raw.set_field(header, value);
            }
        }
        if raw.is_blank() {
            continue;
        }
        match raw.validate(row) {
            Ok(record) => import.records.push(record),
            Err(err) => import.failures.push(err),
        }
    }
    Ok(import)
}

fn cell_text(cell: &Data) -> String {
    cell.as_string()
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}
