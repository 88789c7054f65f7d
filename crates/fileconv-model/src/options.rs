//! Per-file configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::format::FileFormat;

/// Tokens read as missing values unless `keep_default_na` is off.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Options for turning raw cells into a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Extra tokens treated as missing.
    pub na_values: Vec<String>,
    /// Whether [`DEFAULT_NA_VALUES`] apply. Empty cells are always missing.
    pub keep_default_na: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            na_values: Vec::new(),
            keep_default_na: true,
        }
    }
}

impl IngestOptions {
    #[must_use]
    pub fn with_na_values(mut self, values: Vec<String>) -> Self {
        self.na_values = values;
        self
    }

    #[must_use]
    pub fn with_default_na(mut self, enable: bool) -> Self {
        self.keep_default_na = enable;
        self
    }

    pub fn is_na(&self, value: &str) -> bool {
        value.is_empty()
            || (self.keep_default_na && DEFAULT_NA_VALUES.contains(&value))
            || self.na_values.iter().any(|token| token == value)
    }
}

/// Independent cleaning toggles. Duplicates are removed before filling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningOptions {
    pub remove_duplicates: bool,
    pub fill_missing_with_mean: bool,
}

impl CleaningOptions {
    pub fn is_noop(self) -> bool {
        !self.remove_duplicates && !self.fill_missing_with_mean
    }
}

/// Which columns survive projection.
///
/// Serialized as `null` for all columns or a list of names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<Vec<String>>", into = "Option<Vec<String>>")]
pub enum ColumnSelection {
    #[default]
    All,
    Only(Vec<String>),
}

impl ColumnSelection {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(names.into_iter().map(Into::into).collect())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<Option<Vec<String>>> for ColumnSelection {
    fn from(value: Option<Vec<String>>) -> Self {
        value.map_or(Self::All, Self::Only)
    }
}

impl From<ColumnSelection> for Option<Vec<String>> {
    fn from(value: ColumnSelection) -> Self {
        match value {
            ColumnSelection::All => None,
            ColumnSelection::Only(names) => Some(names),
        }
    }
}

/// Everything the user chose for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    #[serde(flatten)]
    pub cleaning: CleaningOptions,
    pub columns: ColumnSelection,
    pub show_chart: bool,
    /// Export target. `None` means no export was triggered.
    pub export: Option<FileFormat>,
}

/// Per-file configurations keyed by uploaded file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plan {
    pub files: BTreeMap<String, FileConfig>,
}

impl Plan {
    /// Configuration for `file_name`, falling back to `defaults`.
    pub fn config_for(&self, file_name: &str, defaults: &FileConfig) -> FileConfig {
        self.files
            .get(file_name)
            .cloned()
            .unwrap_or_else(|| defaults.clone())
    }
}
