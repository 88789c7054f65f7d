//! Export tests: CSV text, XLSX packaging, naming and round trips.

use polars::prelude::*;

use fileconv_ingest::ingest;
use fileconv_model::{
    CleaningOptions, ColumnSelection, FileFormat, IngestOptions, UploadedFile,
};
use fileconv_output::{export_table, write_csv, write_xlsx};
use fileconv_transform::process;

fn sample() -> DataFrame {
    DataFrame::new(vec![
        Series::new("id".into(), vec![Some(1i64), Some(2), None]).into(),
        Series::new("name".into(), vec![Some("a"), Some("b, c"), None]).into(),
        Series::new("score".into(), vec![Some(1.5f64), None, Some(3.0)]).into(),
        Series::new("ok".into(), vec![Some(true), Some(false), None]).into(),
    ])
    .unwrap()
}

fn csv_text(df: &DataFrame) -> String {
    String::from_utf8(write_csv(df).unwrap()).unwrap()
}

#[test]
fn test_csv_has_header_and_no_index() {
    insta::assert_snapshot!(csv_text(&sample()), @r#"
    id,name,score,ok
    1,a,1.5,True
    2,"b, c",,False
    ,,3,
    "#);
}

#[test]
fn test_csv_without_columns_keeps_row_lines() {
    let df = DataFrame::empty_with_height(2);
    assert_eq!(csv_text(&df), "\n\n\n");
}

#[test]
fn test_csv_round_trip_preserves_cells() {
    let original = sample();
    let bytes = write_csv(&original).unwrap();
    let upload = UploadedFile::new("again.csv", bytes);
    let back = ingest(&upload, &IngestOptions::default()).unwrap();

    assert_eq!(back.get_column_names(), original.get_column_names());
    assert_eq!(back.height(), original.height());
    assert_eq!(csv_text(&back), csv_text(&original));
}

#[test]
fn test_xlsx_round_trip_preserves_cells() {
    let original = sample();
    let bytes = write_xlsx(&original).unwrap();
    let upload = UploadedFile::new("again.xlsx", bytes);
    let back = ingest(&upload, &IngestOptions::default()).unwrap();

    assert_eq!(back.get_column_names(), original.get_column_names());
    assert_eq!(back.height(), 3);
    assert_eq!(csv_text(&back), csv_text(&original));
}

#[test]
fn test_export_csv_source_as_spreadsheet() {
    let upload = UploadedFile::new("data.csv", b"id,name\n1,a\n1,a\n2,b\n".to_vec());
    let table = ingest(&upload, &IngestOptions::default()).unwrap();
    let cleaned = process(
        &table,
        CleaningOptions {
            remove_duplicates: true,
            fill_missing_with_mean: false,
        },
        &ColumnSelection::All,
    )
    .unwrap();

    let artifact = export_table(&cleaned, upload.name(), FileFormat::Xlsx).unwrap();
    assert_eq!(artifact.file_name, "data.xlsx");
    assert_eq!(
        artifact.mime_type,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(&artifact.bytes[..2], b"PK");

    let reread = ingest(
        &UploadedFile::new(artifact.file_name.clone(), artifact.bytes),
        &IngestOptions::default(),
    )
    .unwrap();
    assert_eq!(reread.height(), 2);
}

#[test]
fn test_padded_text_is_a_distinct_value() {
    let upload = UploadedFile::new("data.csv", b"name,n\n a,1\na,1\na,1\n".to_vec());
    let table = ingest(&upload, &IngestOptions::default()).unwrap();
    let cleaned = process(
        &table,
        CleaningOptions {
            remove_duplicates: true,
            fill_missing_with_mean: false,
        },
        &ColumnSelection::All,
    )
    .unwrap();
    assert_eq!(cleaned.height(), 2);

    let artifact = export_table(&cleaned, upload.name(), FileFormat::Csv).unwrap();
    let reread = ingest(
        &UploadedFile::new(artifact.file_name.clone(), artifact.bytes),
        &IngestOptions::default(),
    )
    .unwrap();
    assert_eq!(fileconv_common::cell_text(&reread, "name", 0), " a");
    assert_eq!(fileconv_common::cell_text(&reread, "name", 1), "a");
}

#[test]
fn test_export_spreadsheet_source_as_csv() {
    let artifact = export_table(&sample(), "report.xlsx", FileFormat::Csv).unwrap();
    assert_eq!(artifact.file_name, "report.csv");
    assert_eq!(artifact.mime_type, "text/csv");
}

#[test]
fn test_xlsx_rejects_non_finite_numbers() {
    let df = DataFrame::new(vec![
        Series::new("v".into(), vec![1.0f64, f64::INFINITY]).into(),
    ])
    .unwrap();
    let error = write_xlsx(&df).unwrap_err();
    assert_eq!(error.kind(), "SerializationError");
    // CSV can still carry the value as text.
    assert!(write_csv(&df).is_ok());
}

#[test]
fn test_xlsx_rejects_oversized_text() {
    let long = "x".repeat(fileconv_output::MAX_XLSX_TEXT_CHARS + 1);
    let df = DataFrame::new(vec![Series::new("v".into(), vec![long]).into()]).unwrap();
    let error = write_xlsx(&df).unwrap_err();
    assert_eq!(error.kind(), "SerializationError");
}

#[test]
fn test_list_columns_are_not_exportable() {
    let inner = Series::new("".into(), vec![1i64, 2]);
    let lists = Series::new("v".into(), vec![inner]);
    let df = DataFrame::new(vec![lists.into()]).unwrap();
    assert_eq!(write_csv(&df).unwrap_err().kind(), "SerializationError");
    assert_eq!(write_xlsx(&df).unwrap_err().kind(), "SerializationError");
}
