//! Shared utilities for fileconv crates.
//!
//! This crate provides the Polars helpers used by ingestion, cleaning and
//! export: value formatting, numeric parsing and dtype classification.

pub mod polars;

pub use polars::{
    any_to_f64, any_to_string, cell_text, format_numeric, is_numeric_dtype, parse_bool, parse_f64,
    parse_i64,
};
