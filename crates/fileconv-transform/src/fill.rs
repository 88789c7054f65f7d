use polars::prelude::{Column, DataFrame, DataType, NamedFrom, Series};
use tracing::debug;

use fileconv_common::is_numeric_dtype;
use fileconv_model::{ConvertError, Result};

/// A column that received mean imputation.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledColumn {
    pub name: String,
    pub filled: usize,
    pub mean: f64,
}

/// Replace missing cells in numeric columns with the column mean.
///
/// The mean is taken over the present values only. Filled columns come back
/// as Float64; columns without gaps, non-numeric columns and numeric columns
/// with no present values are returned as they were.
pub fn fill_missing_with_mean(df: &DataFrame) -> Result<(DataFrame, Vec<FilledColumn>)> {
    let mut columns: Vec<Column> = Vec::with_capacity(df.width());
    let mut filled_columns = Vec::new();
    for column in df.get_columns() {
        if !is_numeric_dtype(column.dtype()) || column.null_count() == 0 {
            columns.push(column.clone());
            continue;
        }
        let series = column
            .as_materialized_series()
            .cast(&DataType::Float64)
            .map_err(ConvertError::table)?;
        let values: Vec<Option<f64>> = series.f64().map_err(ConvertError::table)?.into_iter().collect();

        let (sum, count) = values
            .iter()
            .flatten()
            .fold((0.0f64, 0usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            columns.push(column.clone());
            continue;
        }
        let mean = sum / count as f64;
        let filled = values.len() - count;
        let replaced: Vec<Option<f64>> = values.into_iter().map(|v| v.or(Some(mean))).collect();
        let name = column.name().to_string();
        debug!(column = %name, filled, mean, "filled missing values");
        columns.push(Series::new(column.name().clone(), replaced).into());
        filled_columns.push(FilledColumn { name, filled, mean });
    }
    if filled_columns.is_empty() {
        return Ok((df.clone(), filled_columns));
    }
    let data = DataFrame::new(columns).map_err(ConvertError::table)?;
    Ok((data, filled_columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_excludes_missing_cells() {
        let df = DataFrame::new(vec![
            Series::new("v".into(), vec![Some(2i64), None, Some(4)]).into(),
        ])
        .unwrap();
        let (filled, report) = fill_missing_with_mean(&df).unwrap();
        let values = filled.column("v").unwrap().f64().unwrap();
        assert_eq!(values.get(0), Some(2.0));
        assert_eq!(values.get(1), Some(3.0));
        assert_eq!(values.get(2), Some(4.0));
        assert_eq!(
            report,
            vec![FilledColumn {
                name: "v".to_string(),
                filled: 1,
                mean: 3.0
            }]
        );
    }

    #[test]
    fn all_missing_numeric_column_stays_missing() {
        let df = DataFrame::new(vec![
            Series::new("v".into(), vec![None::<f64>, None]).into(),
        ])
        .unwrap();
        let (filled, report) = fill_missing_with_mean(&df).unwrap();
        assert!(report.is_empty());
        assert_eq!(filled.column("v").unwrap().null_count(), 2);
    }
}
