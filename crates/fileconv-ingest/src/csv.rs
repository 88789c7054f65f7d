//! Comma-delimited text reader.

use ::csv::ReaderBuilder;
use tracing::debug;

use fileconv_model::{ConvertError, Result};

use crate::raw::{RawCell, RawTable, normalize_headers};

/// Read UTF-8 CSV bytes with a header row.
///
/// Record lengths must match the header; blank lines are skipped.
pub fn read_csv_bytes(file_name: &str, bytes: &[u8]) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);
    let header_record = reader
        .headers()
        .map_err(|error| ConvertError::parse(file_name, error))?
        .clone();
    if header_record.is_empty() {
        return Err(ConvertError::parse(file_name, "missing header row"));
    }
    let raw_headers: Vec<String> = header_record.iter().map(str::to_string).collect();
    let headers = normalize_headers(&raw_headers);

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|error| {
            ConvertError::parse(file_name, format!("record {}: {error}", idx + 1))
        })?;
        rows.push(record.iter().map(RawCell::text).collect());
    }
    debug!(file = %file_name, rows = rows.len(), columns = headers.len(), "read csv");
    Ok(RawTable { headers, rows })
}
