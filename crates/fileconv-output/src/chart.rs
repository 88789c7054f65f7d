//! Series selection for the optional bar chart.

use polars::prelude::{AnyValue, DataFrame};
use tracing::debug;

use fileconv_common::{any_to_f64, is_numeric_dtype};

/// At most this many numeric columns are charted.
pub const MAX_CHART_SERIES: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Values to draw: one group of bars per row, one bar per series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// Row positions, starting at 0.
    pub row_labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl ChartData {
    /// Largest absolute value across all series, if any value is present.
    pub fn max_abs(&self) -> Option<f64> {
        self.series
            .iter()
            .flat_map(|series| series.values.iter().flatten())
            .map(|value| value.abs())
            .fold(None, |max, value| match max {
                Some(current) if current >= value => Some(current),
                _ => Some(value),
            })
    }
}

/// First [`MAX_CHART_SERIES`] numeric columns of `df`, in table order.
///
/// Returns `None` when the table has no numeric column.
pub fn chart_data(df: &DataFrame) -> Option<ChartData> {
    let series: Vec<ChartSeries> = df
        .get_columns()
        .iter()
        .filter(|column| is_numeric_dtype(column.dtype()))
        .take(MAX_CHART_SERIES)
        .map(|column| ChartSeries {
            name: column.name().to_string(),
            values: (0..df.height())
                .map(|idx| any_to_f64(column.get(idx).unwrap_or(AnyValue::Null)))
                .collect(),
        })
        .collect();
    if series.is_empty() {
        debug!("no numeric columns to chart");
        return None;
    }
    Some(ChartData {
        row_labels: (0..df.height()).map(|idx| idx.to_string()).collect(),
        series,
    })
}

#[cfg(test)]
mod tests {
    use polars::prelude::{NamedFrom, Series};

    use super::*;

    #[test]
    fn picks_first_two_numeric_columns() {
        let df = DataFrame::new(vec![
            Series::new("label".into(), vec!["a", "b"]).into(),
            Series::new("x".into(), vec![1i64, 2]).into(),
            Series::new("flag".into(), vec![true, false]).into(),
            Series::new("y".into(), vec![Some(0.5f64), None]).into(),
            Series::new("z".into(), vec![9i64, 9]).into(),
        ])
        .unwrap();
        let chart = chart_data(&df).unwrap();
        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(chart.series[1].values, vec![Some(0.5), None]);
        assert_eq!(chart.row_labels, vec!["0", "1"]);
        assert_eq!(chart.max_abs(), Some(2.0));
    }

    #[test]
    fn skips_tables_without_numbers() {
        let df = DataFrame::new(vec![
            Series::new("label".into(), vec!["a", "b"]).into(),
        ])
        .unwrap();
        assert!(chart_data(&df).is_none());
    }
}
