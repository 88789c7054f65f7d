//! Subscriber setup for the `fileconv` binary.
//!
//! Library crates only emit `tracing` events. This module decides where they
//! go: stderr or an appended log file, in one of three layouts, filtered per
//! fileconv crate. Cell values reach the logs only when `--log-data` is set;
//! everything else goes through [`redact_cell`].
//!
//! Levels: `error` for a failed file, `info` for stage progress and counts,
//! `debug` for reader and writer details, `trace` for cell values.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

const FILECONV_CRATES: &[&str] = &[
    "fileconv",
    "fileconv_cli",
    "fileconv_common",
    "fileconv_ingest",
    "fileconv_model",
    "fileconv_output",
    "fileconv_transform",
];

static CELL_LOGGING: AtomicBool = AtomicBool::new(false);

/// Stands in for a cell value when `--log-data` is off.
pub const REDACTED: &str = "[REDACTED]";

/// `value` if cell logging was enabled at startup, [`REDACTED`] otherwise.
pub fn redact_cell(value: &str) -> &str {
    if CELL_LOGGING.load(Ordering::Relaxed) {
        value
    } else {
        REDACTED
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level applied to the fileconv crates. Dependencies stay at `warn`.
    pub level: LevelFilter,
    /// Prefer `RUST_LOG` when it is set.
    pub follow_rust_log: bool,
    pub ansi: bool,
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr.
    pub log_file: Option<PathBuf>,
    /// Allow cell values in trace events.
    pub log_data: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
            follow_rust_log: true,
            ansi: true,
            format: LogFormat::Pretty,
            log_file: None,
            log_data: false,
        }
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
///
/// # Panics
///
/// Panics if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    CELL_LOGGING.store(config.log_data, Ordering::Relaxed);
    let writer = open_writer(config)?;
    tracing_subscriber::registry()
        .with(fmt_layer(config, writer))
        .with(env_filter(config))
        .init();
    Ok(())
}

fn open_writer(config: &LogConfig) -> io::Result<BoxMakeWriter> {
    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Ok(BoxMakeWriter::new(Mutex::new(file)))
        }
        None => Ok(BoxMakeWriter::new(io::stderr)),
    }
}

/// Formatting layer for `config`. File logs carry timestamps; terminal logs don't.
fn fmt_layer(config: &LogConfig, writer: BoxMakeWriter) -> Box<dyn Layer<Registry> + Send + Sync> {
    let timestamps = config.log_file.is_some();
    let ansi = config.ansi && !timestamps;
    let layer = fmt::layer().with_writer(writer).with_target(false);
    match (config.format, timestamps) {
        (LogFormat::Json, _) => layer.json().boxed(),
        (LogFormat::Compact, true) => layer.compact().with_ansi(ansi).boxed(),
        (LogFormat::Compact, false) => layer.compact().with_ansi(ansi).without_time().boxed(),
        (LogFormat::Pretty, true) => layer.with_ansi(ansi).boxed(),
        (LogFormat::Pretty, false) => layer.with_ansi(ansi).without_time().boxed(),
    }
}

fn directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    let mut directives = String::from("warn");
    for name in FILECONV_CRATES {
        directives.push_str(&format!(",{name}={level}"));
    }
    directives
}

fn env_filter(config: &LogConfig) -> EnvFilter {
    let fallback = || EnvFilter::new(directives(config.level));
    if config.follow_rust_log {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
    } else {
        fallback()
    }
}
