//! Cleaning pipeline and column projection.
//!
//! Each stage takes a `&DataFrame` and returns a new one, so a failing
//! stage never leaves a half-modified table behind.

pub mod dedupe;
pub mod fill;
pub mod pipeline;
pub mod project;

pub use dedupe::remove_duplicates;
pub use fill::{FilledColumn, fill_missing_with_mean};
pub use pipeline::{Stage, process, process_observed};
pub use project::project_columns;
