//! Tests for the cleaning pipeline laws and scenarios.

use polars::prelude::*;
use proptest::prelude::*;

use fileconv_model::{CleaningOptions, ColumnSelection};
use fileconv_transform::{
    Stage, fill_missing_with_mean, process, process_observed, project_columns, remove_duplicates,
};

fn frame(ids: &[Option<i64>], names: &[Option<&str>]) -> DataFrame {
    DataFrame::new(vec![
        Series::new("id".into(), ids.to_vec()).into(),
        Series::new(
            "name".into(),
            names
                .iter()
                .map(|name| name.map(str::to_string))
                .collect::<Vec<_>>(),
        )
        .into(),
    ])
    .unwrap()
}

fn both() -> CleaningOptions {
    CleaningOptions {
        remove_duplicates: true,
        fill_missing_with_mean: true,
    }
}

#[test]
fn test_duplicate_scenario() {
    let df = frame(
        &[Some(1), Some(1), Some(2)],
        &[Some("a"), Some("a"), Some("b")],
    );
    let cleaning = CleaningOptions {
        remove_duplicates: true,
        fill_missing_with_mean: false,
    };
    let result = process(&df, cleaning, &ColumnSelection::All).unwrap();
    assert!(result.equals(&frame(&[Some(1), Some(2)], &[Some("a"), Some("b")])));
}

#[test]
fn test_no_options_leaves_table_unchanged() {
    let df = frame(&[Some(1), None, Some(1)], &[Some("a"), None, Some("a")]);
    let result = process(&df, CleaningOptions::default(), &ColumnSelection::All).unwrap();
    assert!(result.equals_missing(&df));
}

#[test]
fn test_duplicates_removed_before_fill() {
    // With dedupe first the mean is (1 + 5) / 2 = 3; on the raw rows it would be 7/3.
    let df = frame(
        &[Some(1), Some(1), Some(5), None],
        &[Some("a"), Some("a"), Some("b"), Some("c")],
    );
    let result = process(&df, both(), &ColumnSelection::All).unwrap();
    assert_eq!(result.height(), 3);
    let ids = result.column("id").unwrap().f64().unwrap();
    assert_eq!(ids.get(2), Some(3.0));
}

#[test]
fn test_fill_leaves_text_columns_missing() {
    let df = frame(&[Some(1), None], &[None, Some("b")]);
    let (filled, _) = fill_missing_with_mean(&df).unwrap();
    assert_eq!(filled.column("name").unwrap().null_count(), 1);
    assert_eq!(filled.column("id").unwrap().null_count(), 0);
}

#[test]
fn test_fill_ignores_boolean_columns() {
    let df = DataFrame::new(vec![
        Series::new("flag".into(), vec![Some(true), None, Some(false)]).into(),
    ])
    .unwrap();
    let (filled, report) = fill_missing_with_mean(&df).unwrap();
    assert!(report.is_empty());
    assert_eq!(filled.column("flag").unwrap().null_count(), 1);
}

#[test]
fn test_fill_scenario_from_spreadsheet_column() {
    let df = DataFrame::new(vec![
        Series::new("n".into(), vec![Some(10i64), None, Some(20), None]).into(),
    ])
    .unwrap();
    let (filled, _) = fill_missing_with_mean(&df).unwrap();
    let values: Vec<Option<f64>> = filled.column("n").unwrap().f64().unwrap().into_iter().collect();
    assert_eq!(values, vec![Some(10.0), Some(15.0), Some(20.0), Some(15.0)]);
}

#[test]
fn test_observer_sees_enabled_stages_in_order() {
    let df = frame(&[Some(1), Some(1)], &[Some("a"), Some("a")]);
    let mut seen = Vec::new();
    process_observed(&df, both(), &ColumnSelection::only(["id"]), |stage, table| {
        seen.push((stage, table.height(), table.width()));
    })
    .unwrap();
    assert_eq!(
        seen,
        vec![
            (Stage::RemoveDuplicates, 1, 2),
            (Stage::FillMissing, 1, 2),
            (Stage::Project, 1, 1),
        ]
    );
}

#[test]
fn test_failed_projection_reports_error() {
    let df = frame(&[Some(1)], &[Some("a")]);
    let error = process(&df, both(), &ColumnSelection::only(["missing"])).unwrap_err();
    assert_eq!(error.kind(), "UnknownColumn");
}

fn arb_frame() -> impl Strategy<Value = DataFrame> {
    prop::collection::vec(
        (
            prop::option::of(0i64..4),
            prop::option::of(prop::sample::select(vec!["a", "b", "c"])),
        ),
        0..24,
    )
    .prop_map(|rows| {
        let ids: Vec<Option<i64>> = rows.iter().map(|(id, _)| *id).collect();
        let names: Vec<Option<&str>> = rows.iter().map(|(_, name)| *name).collect();
        frame(&ids, &names)
    })
}

proptest! {
    #[test]
    fn prop_remove_duplicates_is_idempotent(df in arb_frame()) {
        let once = remove_duplicates(&df).unwrap();
        let twice = remove_duplicates(&once).unwrap();
        prop_assert!(once.equals_missing(&twice));
        prop_assert!(once.height() <= df.height());
    }

    #[test]
    fn prop_full_projection_is_identity(df in arb_frame()) {
        let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
        let projected = project_columns(&df, &ColumnSelection::Only(names)).unwrap();
        prop_assert!(projected.equals_missing(&df));
        let all = project_columns(&df, &ColumnSelection::All).unwrap();
        prop_assert!(all.equals_missing(&df));
    }

    #[test]
    fn prop_fill_is_noop_without_gaps(values in prop::collection::vec(-1000i64..1000, 1..20)) {
        let df = DataFrame::new(vec![Series::new("v".into(), values).into()]).unwrap();
        let (filled, report) = fill_missing_with_mean(&df).unwrap();
        prop_assert!(report.is_empty());
        prop_assert!(filled.equals(&df));
    }
}
