use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{error, info, info_span};

use fileconv_cli::pipeline::{FileReport, RunSettings, read_upload, run_paths};
use fileconv_cli::render::{preview_table, print_report, schema_table, summary_table};
use fileconv_ingest::ingest;
use fileconv_model::Plan;

use crate::cli::{ConvertArgs, InspectArgs};

/// Outcome of `convert`: one report per input file.
pub struct ConvertResult {
    pub reports: Vec<FileReport>,
}

impl ConvertResult {
    pub fn has_failures(&self) -> bool {
        self.reports.iter().any(|report| !report.is_ok())
    }
}

pub fn run_convert(args: &ConvertArgs) -> Result<ConvertResult> {
    let span = info_span!("convert", files = args.files.len());
    let _guard = span.enter();
    let plan = match &args.plan {
        Some(path) => load_plan(path)?,
        None => Plan::default(),
    };
    let defaults = args.default_config();
    let output_dir = if args.dry_run {
        None
    } else {
        let dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&dir)
            .with_context(|| format!("create output dir {}", dir.display()))?;
        Some(dir)
    };
    let settings = RunSettings {
        ingest: args.ingest.options(),
        preview_rows: args.preview_rows,
        output_dir,
    };
    let reports = run_paths(&args.files, &plan, &defaults, &settings);
    for report in &reports {
        print_report(report, args.chart_rows);
    }
    Ok(ConvertResult { reports })
}

pub fn print_convert_summary(result: &ConvertResult) {
    println!();
    println!("{}", summary_table(&result.reports));
}

/// Print schema and preview for each file. Returns whether every file parsed.
pub fn run_inspect(args: &InspectArgs) -> Result<bool> {
    let options = args.ingest.options();
    let mut all_ok = true;
    for path in &args.files {
        let parsed = read_upload(path).and_then(|upload| ingest(&upload, &options));
        match parsed {
            Ok(df) => {
                info!(path = %path.display(), rows = df.height(), "inspected");
                println!();
                println!("== {} ==", path.display());
                println!("{} rows x {} columns", df.height(), df.width());
                println!("{}", schema_table(&df));
                println!("{}", preview_table(&df.head(Some(args.preview_rows))));
            }
            Err(err) => {
                error!(path = %path.display(), kind = err.kind(), error = %err, "inspect failed");
                eprintln!("error: {}: {err}", path.display());
                all_ok = false;
            }
        }
    }
    Ok(all_ok)
}

fn load_plan(path: &Path) -> Result<Plan> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read plan {}", path.display()))?;
    let plan: Plan =
        serde_json::from_str(&text).with_context(|| format!("parse plan {}", path.display()))?;
    info!(path = %path.display(), entries = plan.files.len(), "loaded plan");
    Ok(plan)
}
