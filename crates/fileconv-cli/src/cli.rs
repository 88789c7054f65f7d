//! CLI argument definitions for fileconv.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use fileconv_model::{CleaningOptions, ColumnSelection, FileConfig, FileFormat, IngestOptions};

#[derive(Parser)]
#[command(
    name = "fileconv",
    version,
    about = "Clean and convert CSV and XLSX files",
    long_about = "Clean and convert tabular files.\n\n\
                  Removes duplicate rows, fills missing numeric values with the column mean,\n\
                  keeps a subset of columns, charts numeric columns and exports CSV or XLSX."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include cell values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean the given files and optionally chart and export them.
    Convert(ConvertArgs),

    /// Show column types, null counts and a preview of each file.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// CSV or XLSX files to process.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Drop rows identical to an earlier row.
    #[arg(long = "remove-duplicates")]
    pub remove_duplicates: bool,

    /// Replace missing numeric values with the column mean.
    #[arg(long = "fill-missing")]
    pub fill_missing: bool,

    /// Keep only these columns (comma separated). Defaults to all columns.
    ///
    /// Names containing a comma, and an empty selection, can only be given
    /// through --plan ("columns": ["a,b"] or "columns": []).
    #[arg(long = "columns", value_name = "NAME", value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// Chart the first two numeric columns.
    #[arg(long = "chart")]
    pub chart: bool,

    /// Export the processed table in this format.
    #[arg(long = "to", value_enum, value_name = "FORMAT")]
    pub to: Option<FormatArg>,

    /// Directory for exported files (default: current directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Build exports without writing them.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// JSON file with per-file settings that replace the flags above.
    ///
    /// Shape: {"files": {"data.csv": {"remove_duplicates": true,
    /// "fill_missing_with_mean": false, "columns": ["a", "b"],
    /// "show_chart": true, "export": "xlsx"}}}
    #[arg(long = "plan", value_name = "PATH")]
    pub plan: Option<PathBuf>,

    /// Rows shown in each preview.
    #[arg(long = "preview-rows", value_name = "N", default_value_t = 5)]
    pub preview_rows: usize,

    /// Rows drawn in the chart.
    #[arg(long = "chart-rows", value_name = "N", default_value_t = 20)]
    pub chart_rows: usize,

    #[command(flatten)]
    pub ingest: IngestArgs,
}

impl ConvertArgs {
    /// Settings applied to files without a plan entry.
    pub fn default_config(&self) -> FileConfig {
        FileConfig {
            cleaning: CleaningOptions {
                remove_duplicates: self.remove_duplicates,
                fill_missing_with_mean: self.fill_missing,
            },
            columns: ColumnSelection::from(self.columns.clone()),
            show_chart: self.chart,
            export: self.to.map(FileFormat::from),
        }
    }
}

#[derive(Parser)]
pub struct InspectArgs {
    /// CSV or XLSX files to inspect.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Rows shown in each preview.
    #[arg(long = "preview-rows", value_name = "N", default_value_t = 5)]
    pub preview_rows: usize,

    #[command(flatten)]
    pub ingest: IngestArgs,
}

/// Parsing options shared by every subcommand.
#[derive(Args)]
pub struct IngestArgs {
    /// Extra cell text read as missing (repeatable).
    #[arg(long = "na-value", value_name = "TOKEN")]
    pub na_values: Vec<String>,

    /// Only treat empty cells and --na-value tokens as missing.
    #[arg(long = "no-default-na")]
    pub no_default_na: bool,
}

impl IngestArgs {
    pub fn options(&self) -> IngestOptions {
        IngestOptions::default()
            .with_na_values(self.na_values.clone())
            .with_default_na(!self.no_default_na)
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Csv,
    Xlsx,
}

impl From<FormatArg> for FileFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => FileFormat::Csv,
            FormatArg::Xlsx => FileFormat::Xlsx,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
