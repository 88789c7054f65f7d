//! Per-file orchestration: ingest, clean, project, chart, export.
//!
//! Each uploaded file runs in isolation. A failure is recorded on that
//! file's [`FileReport`] and never stops the remaining files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{error, info, info_span, trace};

use fileconv_ingest::ingest;
use fileconv_model::{
    ConvertError, ExportArtifact, FileConfig, IngestOptions, Plan, Result, UploadedFile,
};
use fileconv_output::{ChartData, chart_data, export_table};
use fileconv_transform::{Stage, process_observed};

use crate::logging::redact_cell;

/// Confirmation shown once a file has been exported.
pub const COMPLETE_MESSAGE: &str = "Processing complete!";

/// Settings shared by every file in one run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub ingest: IngestOptions,
    /// Rows kept in each preview.
    pub preview_rows: usize,
    /// Where artifacts are written. `None` builds them without writing.
    pub output_dir: Option<PathBuf>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            ingest: IngestOptions::default(),
            preview_rows: 5,
            output_dir: None,
        }
    }
}

/// A table snapshot taken after ingestion or after a stage.
#[derive(Debug, Clone)]
pub struct StagePreview {
    /// `None` for the freshly ingested table.
    pub stage: Option<Stage>,
    pub rows: usize,
    pub columns: usize,
    /// First rows of the table.
    pub preview: DataFrame,
}

impl StagePreview {
    fn capture(stage: Option<Stage>, df: &DataFrame, preview_rows: usize) -> Self {
        Self {
            stage,
            rows: df.height(),
            columns: df.width(),
            preview: df.head(Some(preview_rows)),
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        self.stage.map(Stage::message)
    }
}

/// A failure scoped to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub kind: &'static str,
    pub message: String,
}

impl From<&ConvertError> for FileFailure {
    fn from(error: &ConvertError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Everything rendered for one uploaded file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub file_name: String,
    pub config: FileConfig,
    pub stages: Vec<StagePreview>,
    pub chart: Option<ChartData>,
    pub artifact: Option<ExportArtifact>,
    pub written_to: Option<PathBuf>,
    pub failure: Option<FileFailure>,
}

impl FileReport {
    fn new(file_name: &str, config: FileConfig) -> Self {
        Self {
            file_name: file_name.to_string(),
            config,
            stages: Vec::new(),
            chart: None,
            artifact: None,
            written_to: None,
            failure: None,
        }
    }

    /// Report for a file that never made it past the upload boundary.
    pub fn failed(file_name: &str, config: FileConfig, error: &ConvertError) -> Self {
        let mut report = Self::new(file_name, config);
        report.failure = Some(FileFailure::from(error));
        report
    }

    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    /// The last snapshot, which is the projected table when the run succeeded.
    pub fn final_stage(&self) -> Option<&StagePreview> {
        self.stages.last()
    }
}

/// Read a path into an upload named after its file name.
pub fn read_upload(path: &Path) -> Result<UploadedFile> {
    let bytes = fs::read(path)?;
    Ok(UploadedFile::new(upload_name(path), bytes))
}

/// File name component of `path`, or the whole path when there is none.
pub fn upload_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or_else(|| path.display().to_string(), str::to_string)
}

/// Read and process every path with its plan entry or `defaults`.
///
/// Reports come back in the order of `paths`. A path that cannot be read
/// yields a failed report.
pub fn run_paths(
    paths: &[PathBuf],
    plan: &Plan,
    defaults: &FileConfig,
    settings: &RunSettings,
) -> Vec<FileReport> {
    paths
        .iter()
        .map(|path| {
            let name = upload_name(path);
            let config = plan.config_for(&name, defaults);
            match read_upload(path) {
                Ok(upload) => run_file(&upload, &config, settings),
                Err(err) => {
                    error!(file = %name, error = %err, "failed to read upload");
                    FileReport::failed(&name, config, &err)
                }
            }
        })
        .collect()
}

/// Run the whole pipeline for one file. Never fails; see [`FileReport::failure`].
pub fn run_file(upload: &UploadedFile, config: &FileConfig, settings: &RunSettings) -> FileReport {
    let span = info_span!("file", file = %upload.name());
    let _guard = span.enter();
    let start = Instant::now();
    let mut report = FileReport::new(upload.name(), config.clone());
    match run_stages(upload, config, settings, &mut report) {
        Ok(()) => info!(
            file = %upload.name(),
            duration_ms = start.elapsed().as_millis(),
            exported = report.artifact.is_some(),
            "file processed"
        ),
        Err(err) => {
            error!(file = %upload.name(), kind = err.kind(), error = %err, "file failed");
            report.failure = Some(FileFailure::from(&err));
        }
    }
    report
}

fn run_stages(
    upload: &UploadedFile,
    config: &FileConfig,
    settings: &RunSettings,
    report: &mut FileReport,
) -> Result<()> {
    let table = ingest(upload, &settings.ingest)?;
    info!(rows = table.height(), columns = table.width(), "ingest complete");
    trace_first_row(&table);
    report
        .stages
        .push(StagePreview::capture(None, &table, settings.preview_rows));

    let projected = process_observed(&table, config.cleaning, &config.columns, |stage, df| {
        report
            .stages
            .push(StagePreview::capture(Some(stage), df, settings.preview_rows));
    })?;

    if config.show_chart {
        report.chart = chart_data(&projected);
    }

    if let Some(format) = config.export {
        let artifact = export_table(&projected, upload.name(), format)?;
        if let Some(dir) = &settings.output_dir {
            let path = dir.join(&artifact.file_name);
            fs::write(&path, &artifact.bytes)?;
            info!(path = %path.display(), bytes = artifact.bytes.len(), "artifact written");
            report.written_to = Some(path);
        }
        report.artifact = Some(artifact);
    }
    Ok(())
}

fn trace_first_row(df: &DataFrame) {
    if df.height() == 0 {
        return;
    }
    let row: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| fileconv_common::cell_text(df, name.as_str(), 0))
        .collect();
    let joined = row.join(",");
    trace!(first_row = %redact_cell(&joined), "ingested row");
}
