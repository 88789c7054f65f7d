//! CSV serialization.

use ::csv::WriterBuilder;
use polars::prelude::{AnyValue, DataFrame};

use fileconv_common::any_to_string;
use fileconv_model::{ConvertError, FileFormat, Result};

use crate::ensure_exportable;

/// Write the header row and one line per row. No index column.
///
/// Missing cells are empty fields. A table without columns is written as an
/// empty header line followed by one empty line per row.
pub fn write_csv(df: &DataFrame) -> Result<Vec<u8>> {
    ensure_exportable(df, FileFormat::Csv)?;
    if df.width() == 0 {
        return Ok("\n".repeat(df.height() + 1).into_bytes());
    }
    let to_error = |error: ::csv::Error| ConvertError::serialization("csv", error);

    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    let header: Vec<&str> = df
        .get_columns()
        .iter()
        .map(|column| column.name().as_str())
        .collect();
    writer.write_record(&header).map_err(to_error)?;

    let mut record = Vec::with_capacity(df.width());
    for idx in 0..df.height() {
        record.clear();
        for column in df.get_columns() {
            record.push(any_to_string(column.get(idx).unwrap_or(AnyValue::Null)));
        }
        writer.write_record(&record).map_err(to_error)?;
    }
    writer
        .into_inner()
        .map_err(|error| ConvertError::serialization("csv", error.error()))
}
