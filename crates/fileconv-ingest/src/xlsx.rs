//! Spreadsheet reader for Office Open XML workbooks.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use tracing::debug;

use fileconv_common::format_numeric;
use fileconv_model::{ConvertError, Result};

use crate::raw::{RawCell, RawTable, normalize_headers};

/// Read the first worksheet of an XLSX workbook. The first row is the header.
///
/// Blank rows between values are kept as all-missing rows; trailing blank
/// rows are dropped.
pub fn read_xlsx_bytes(file_name: &str, bytes: &[u8]) -> Result<RawTable> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|error| ConvertError::parse(file_name, format!("open workbook: {error}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ConvertError::parse(file_name, "workbook has no worksheets"))?
        .map_err(|error| ConvertError::parse(file_name, format!("read worksheet: {error}")))?;

    let mut rows_iter = range.rows();
    let header_cells = rows_iter
        .next()
        .ok_or_else(|| ConvertError::parse(file_name, "missing header row"))?;
    let raw_headers: Vec<String> = header_cells.iter().map(header_text).collect();
    let headers = normalize_headers(&raw_headers);

    let width = headers.len();
    let mut rows: Vec<Vec<RawCell>> = rows_iter
        .map(|row| {
            let mut cells: Vec<RawCell> = row.iter().map(raw_cell).collect();
            cells.resize(width, RawCell::Empty);
            cells
        })
        .collect();
    // Formatting can stretch the used range past the last value.
    while rows
        .last()
        .is_some_and(|cells| cells.iter().all(|cell| *cell == RawCell::Empty))
    {
        rows.pop();
    }
    debug!(file = %file_name, rows = rows.len(), columns = width, "read xlsx");
    Ok(RawTable { headers, rows })
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::Float(v) => format_numeric(*v),
        other => other.to_string(),
    }
}

fn raw_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty | Data::Error(_) => RawCell::Empty,
        Data::Int(v) => RawCell::Int(*v),
        Data::Float(v) => RawCell::Float(*v),
        Data::Bool(v) => RawCell::Bool(*v),
        Data::String(s) => RawCell::text(s),
        other => RawCell::text(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_is_a_parse_error() {
        let error = read_xlsx_bytes("broken.xlsx", b"not a zip archive").unwrap_err();
        assert_eq!(error.kind(), "ParseError");
    }

    #[test]
    fn cells_map_to_raw_values() {
        assert_eq!(raw_cell(&Data::Empty), RawCell::Empty);
        assert_eq!(raw_cell(&Data::Float(2.5)), RawCell::Float(2.5));
        assert_eq!(raw_cell(&Data::Bool(true)), RawCell::Bool(true));
        assert_eq!(
            raw_cell(&Data::String(" x ".to_string())),
            RawCell::Text(" x ".to_string())
        );
    }

    #[test]
    fn numeric_headers_have_no_trailing_zeros() {
        assert_eq!(header_text(&Data::Float(2024.0)), "2024");
        assert_eq!(header_text(&Data::String("id".to_string())), "id");
    }
}
