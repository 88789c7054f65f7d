//! The per-file cleaning and projection pipeline.
//!
//! Stages always run in the same order: duplicate removal, mean fill,
//! projection. Disabled stages are skipped.

use std::fmt;

use polars::prelude::DataFrame;
use tracing::info;

use fileconv_model::{CleaningOptions, ColumnSelection, Result};

use crate::dedupe::remove_duplicates;
use crate::fill::fill_missing_with_mean;
use crate::project::project_columns;

/// A pipeline stage whose output can be previewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RemoveDuplicates,
    FillMissing,
    Project,
}

impl Stage {
    /// Confirmation shown after the stage completes.
    pub fn message(self) -> &'static str {
        match self {
            Self::RemoveDuplicates => "Duplicates removed!",
            Self::FillMissing => "Missing values filled with mean!",
            Self::Project => "Columns selected!",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RemoveDuplicates => "remove-duplicates",
            Self::FillMissing => "fill-missing",
            Self::Project => "project",
        })
    }
}

/// Run cleaning then projection on `df`.
pub fn process(
    df: &DataFrame,
    cleaning: CleaningOptions,
    selection: &ColumnSelection,
) -> Result<DataFrame> {
    process_observed(df, cleaning, selection, |_, _| {})
}

/// Like [`process`], calling `observe` with each stage's output as it completes.
///
/// Projection always runs, so `observe` sees at least one call.
pub fn process_observed<F>(
    df: &DataFrame,
    cleaning: CleaningOptions,
    selection: &ColumnSelection,
    mut observe: F,
) -> Result<DataFrame>
where
    F: FnMut(Stage, &DataFrame),
{
    let mut current = df.clone();
    if cleaning.remove_duplicates {
        let before = current.height();
        current = remove_duplicates(&current)?;
        info!(
            stage = %Stage::RemoveDuplicates,
            removed = before - current.height(),
            rows = current.height(),
            "stage complete"
        );
        observe(Stage::RemoveDuplicates, &current);
    }
    if cleaning.fill_missing_with_mean {
        let (filled, columns) = fill_missing_with_mean(&current)?;
        current = filled;
        info!(
            stage = %Stage::FillMissing,
            columns = columns.len(),
            cells = columns.iter().map(|column| column.filled).sum::<usize>(),
            "stage complete"
        );
        observe(Stage::FillMissing, &current);
    }
    current = project_columns(&current, selection)?;
    info!(
        stage = %Stage::Project,
        columns = current.width(),
        rows = current.height(),
        "stage complete"
    );
    observe(Stage::Project, &current);
    Ok(current)
}
