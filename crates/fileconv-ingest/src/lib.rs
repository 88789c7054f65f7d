//! File ingestion for fileconv.
//!
//! An [`UploadedFile`] is dispatched on its extension to the CSV or XLSX
//! reader. Both readers produce a [`RawTable`] of untyped cells which
//! [`build_frame`] turns into a typed Polars `DataFrame`.

pub mod csv;
pub mod frame;
pub mod raw;
pub mod xlsx;

use polars::prelude::DataFrame;
use tracing::debug;

use fileconv_model::{ConvertError, FileFormat, IngestOptions, Result, UploadedFile};

pub use crate::csv::read_csv_bytes;
pub use crate::frame::{ColumnKind, build_frame, infer_column_kind};
pub use crate::raw::{RawCell, RawTable, normalize_headers};
pub use crate::xlsx::read_xlsx_bytes;

/// Parse an uploaded file into a table.
///
/// # Errors
///
/// `UnsupportedFormat` when the extension is not exactly `csv` or `xlsx`,
/// `Parse` when the content is not a table with a header row.
pub fn ingest(file: &UploadedFile, options: &IngestOptions) -> Result<DataFrame> {
    let format = file
        .format()
        .ok_or_else(|| ConvertError::UnsupportedFormat {
            file_name: file.name().to_string(),
            extension: file.extension().map(str::to_string),
        })?;
    let raw = match format {
        FileFormat::Csv => read_csv_bytes(file.name(), file.bytes())?,
        FileFormat::Xlsx => read_xlsx_bytes(file.name(), file.bytes())?,
    };
    let df = build_frame(file.name(), raw, options)?;
    debug!(
        file = %file.name(),
        format = %format,
        rows = df.height(),
        columns = df.width(),
        "ingested file"
    );
    Ok(df)
}
