//! Shared types for the fileconv pipeline.
//!
//! Everything that crosses a crate boundary lives here: the uploaded file,
//! the per-file configuration, the export artifact, and the error type.

pub mod error;
pub mod format;
pub mod options;
pub mod upload;

pub use error::{ConvertError, Result};
pub use format::{ExportArtifact, FileFormat, output_file_name};
pub use options::{
    CleaningOptions, ColumnSelection, DEFAULT_NA_VALUES, FileConfig, IngestOptions, Plan,
};
pub use upload::UploadedFile;
