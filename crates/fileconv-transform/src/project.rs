use std::collections::BTreeSet;

use polars::prelude::{Column, DataFrame};

use fileconv_model::{ColumnSelection, ConvertError, Result};

/// Keep the selected columns in the table's own left-to-right order.
///
/// Selection order and repeats are ignored. An empty selection keeps the
/// row count and drops every column.
pub fn project_columns(df: &DataFrame, selection: &ColumnSelection) -> Result<DataFrame> {
    let ColumnSelection::Only(names) = selection else {
        return Ok(df.clone());
    };
    let wanted: BTreeSet<&str> = names.iter().map(String::as_str).collect();
    for name in &wanted {
        if df.column(name).is_err() {
            return Err(ConvertError::UnknownColumn {
                column: (*name).to_string(),
            });
        }
    }
    let columns: Vec<Column> = df
        .get_columns()
        .iter()
        .filter(|column| wanted.contains(column.name().as_str()))
        .cloned()
        .collect();
    if columns.is_empty() {
        return Ok(DataFrame::empty_with_height(df.height()));
    }
    DataFrame::new(columns).map_err(ConvertError::table)
}

#[cfg(test)]
mod tests {
    use polars::prelude::{NamedFrom, Series};

    use super::*;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Series::new("a".into(), vec![1i64, 2]).into(),
            Series::new("b".into(), vec!["x", "y"]).into(),
            Series::new("c".into(), vec![0.5f64, 1.5]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn keeps_table_order() {
        let projected = project_columns(&sample(), &ColumnSelection::only(["c", "a"])).unwrap();
        let names: Vec<String> = projected
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn unknown_column_fails() {
        let error = project_columns(&sample(), &ColumnSelection::only(["zzz"])).unwrap_err();
        assert_eq!(error.kind(), "UnknownColumn");
    }

    #[test]
    fn empty_selection_keeps_rows() {
        let projected = project_columns(&sample(), &ColumnSelection::Only(Vec::new())).unwrap();
        assert_eq!(projected.width(), 0);
        assert_eq!(projected.height(), 2);
    }
}
