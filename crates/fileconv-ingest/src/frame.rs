//! Column typing and DataFrame construction.

use polars::prelude::{Column, DataFrame, NamedFrom, PlSmallStr, Series};

use fileconv_common::{format_numeric, parse_bool, parse_f64, parse_i64};
use fileconv_model::{ConvertError, IngestOptions, Result};

use crate::raw::{RawCell, RawTable};

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    Float,
    Bool,
    Text,
}

/// A cell after NA handling.
enum Value<'a> {
    Missing,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(&'a str),
}

fn classify<'a>(cell: &'a RawCell, options: &IngestOptions) -> Value<'a> {
    match cell {
        RawCell::Empty => Value::Missing,
        RawCell::Int(v) => Value::Int(*v),
        RawCell::Float(v) => Value::Float(*v),
        RawCell::Bool(v) => Value::Bool(*v),
        RawCell::Text(text) if options.is_na(text.trim()) => Value::Missing,
        RawCell::Text(text) => Value::Text(text),
    }
}

fn as_int(value: &Value<'_>) -> Option<i64> {
    match value {
        Value::Int(v) => Some(*v),
        // Spreadsheets store whole numbers as floats.
        Value::Float(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => Some(*v as i64),
        Value::Text(text) => parse_i64(text),
        _ => None,
    }
}

fn as_float(value: &Value<'_>) -> Option<f64> {
    match value {
        Value::Int(v) => Some(*v as f64),
        Value::Float(v) => Some(*v),
        Value::Text(text) => parse_f64(text),
        _ => None,
    }
}

fn as_bool(value: &Value<'_>) -> Option<bool> {
    match value {
        Value::Bool(v) => Some(*v),
        Value::Text(text) => parse_bool(text),
        _ => None,
    }
}

fn as_text(value: &Value<'_>) -> Option<String> {
    match value {
        Value::Missing => None,
        Value::Int(v) => Some(v.to_string()),
        Value::Float(v) => Some(format_numeric(*v)),
        Value::Bool(v) => Some(if *v { "True" } else { "False" }.to_string()),
        Value::Text(text) => Some((*text).to_string()),
    }
}

fn kind_of(values: &[Value<'_>]) -> ColumnKind {
    let present: Vec<&Value<'_>> = values
        .iter()
        .filter(|value| !matches!(value, Value::Missing))
        .collect();
    if present.is_empty() {
        return ColumnKind::Float;
    }
    if present.iter().all(|value| as_int(value).is_some()) {
        ColumnKind::Int
    } else if present.iter().all(|value| as_float(value).is_some()) {
        ColumnKind::Float
    } else if present.iter().all(|value| as_bool(value).is_some()) {
        ColumnKind::Bool
    } else {
        ColumnKind::Text
    }
}

/// Infer the type of column `index` of `table`.
///
/// A column with no present values is `Float`, so it counts as numeric
/// but has nothing to average.
pub fn infer_column_kind(table: &RawTable, index: usize, options: &IngestOptions) -> ColumnKind {
    let values: Vec<Value<'_>> = table
        .rows
        .iter()
        .map(|row| row.get(index).map_or(Value::Missing, |cell| classify(cell, options)))
        .collect();
    kind_of(&values)
}

/// Build a typed DataFrame from raw cells.
pub fn build_frame(file_name: &str, table: RawTable, options: &IngestOptions) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(table.headers.len());
    for (index, header) in table.headers.iter().enumerate() {
        let values: Vec<Value<'_>> = table
            .rows
            .iter()
            .map(|row| row.get(index).map_or(Value::Missing, |cell| classify(cell, options)))
            .collect();
        let name: PlSmallStr = header.as_str().into();
        let series = match kind_of(&values) {
            ColumnKind::Int => {
                let data: Vec<Option<i64>> = values.iter().map(as_int).collect();
                Series::new(name, data)
            }
            ColumnKind::Float => {
                let data: Vec<Option<f64>> = values.iter().map(as_float).collect();
                Series::new(name, data)
            }
            ColumnKind::Bool => {
                let data: Vec<Option<bool>> = values.iter().map(as_bool).collect();
                Series::new(name, data)
            }
            ColumnKind::Text => {
                let data: Vec<Option<String>> = values.iter().map(as_text).collect();
                Series::new(name, data)
            }
        };
        columns.push(series.into());
    }
    DataFrame::new(columns).map_err(|error| ConvertError::parse(file_name, error))
}
