//! Supported tabular formats and the export artifact.

use std::fmt;

use serde::{Deserialize, Serialize};

/// MIME type for comma-separated values.
pub const CSV_MIME: &str = "text/csv";

/// MIME type for Office Open XML workbooks.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A tabular file format, used both for ingestion and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// Match an extension exactly. `CSV` is not `csv`.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => CSV_MIME,
            Self::Xlsx => XLSX_MIME,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Serialized table ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: &'static str,
}

/// Name of the download built from `original`.
///
/// Every occurrence of the original extension text is replaced, so
/// `csv_data.csv` becomes `xlsx_data.xlsx`. Names without an extension get
/// one appended.
pub fn output_file_name(original: &str, format: FileFormat) -> String {
    match original.rsplit_once('.') {
        Some((_, extension)) if !extension.is_empty() => {
            original.replace(extension, format.extension())
        }
        _ => format!("{original}.{}", format.extension()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_match_is_case_sensitive() {
        assert_eq!(FileFormat::from_extension("csv"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_extension("xlsx"), Some(FileFormat::Xlsx));
        assert_eq!(FileFormat::from_extension("CSV"), None);
        assert_eq!(FileFormat::from_extension("xls"), None);
    }

    #[test]
    fn output_name_replaces_every_extension_occurrence() {
        assert_eq!(output_file_name("data.csv", FileFormat::Xlsx), "data.xlsx");
        assert_eq!(output_file_name("data.xlsx", FileFormat::Csv), "data.csv");
        assert_eq!(
            output_file_name("csv_data.csv", FileFormat::Xlsx),
            "xlsx_data.xlsx"
        );
        assert_eq!(
            output_file_name("xlsx.report.xlsx", FileFormat::Csv),
            "csv.report.csv"
        );
        assert_eq!(output_file_name("a.b.csv", FileFormat::Csv), "a.b.csv");
        assert_eq!(output_file_name("noext", FileFormat::Csv), "noext.csv");
    }
}
