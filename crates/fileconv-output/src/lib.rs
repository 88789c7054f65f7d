//! Export and chart output for fileconv tables.
//!
//! [`export_table`] serializes a projected table into CSV or XLSX bytes and
//! names the download after the uploaded file. [`chart_data`] picks the
//! numeric series for the optional bar chart.

pub mod chart;
pub mod csv;
pub mod xlsx;

use polars::prelude::{DataFrame, DataType};
use tracing::info;

use fileconv_common::is_numeric_dtype;
use fileconv_model::{ConvertError, ExportArtifact, FileFormat, Result, output_file_name};

pub use crate::chart::{ChartData, ChartSeries, MAX_CHART_SERIES, chart_data};
pub use crate::csv::write_csv;
pub use crate::xlsx::{MAX_XLSX_COLUMNS, MAX_XLSX_ROWS, MAX_XLSX_TEXT_CHARS, write_xlsx};

/// Serialize `df` for download as `format`.
///
/// The file name is `original_name` with its extension replaced.
pub fn export_table(
    df: &DataFrame,
    original_name: &str,
    format: FileFormat,
) -> Result<ExportArtifact> {
    let bytes = match format {
        FileFormat::Csv => write_csv(df)?,
        FileFormat::Xlsx => write_xlsx(df)?,
    };
    let file_name = output_file_name(original_name, format);
    info!(
        file = %original_name,
        output = %file_name,
        format = %format,
        bytes = bytes.len(),
        "exported table"
    );
    Ok(ExportArtifact {
        bytes,
        file_name,
        mime_type: format.mime_type(),
    })
}

/// Reject columns whose dtype has no cell representation.
pub(crate) fn ensure_exportable(df: &DataFrame, format: FileFormat) -> Result<()> {
    for column in df.get_columns() {
        let dtype = column.dtype();
        let supported = is_numeric_dtype(dtype)
            || matches!(dtype, DataType::Boolean | DataType::String | DataType::Null);
        if !supported {
            return Err(ConvertError::serialization(
                format.extension(),
                format!("column {} has unsupported type {dtype}", column.name()),
            ));
        }
    }
    Ok(())
}
