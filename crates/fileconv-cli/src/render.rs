//! Terminal rendering for previews, charts and run summaries.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::{AnyValue, DataFrame};

use fileconv_common::{any_to_string, format_numeric, is_numeric_dtype};
use fileconv_output::ChartData;

use crate::pipeline::{COMPLETE_MESSAGE, FileReport, StagePreview};

/// Width of the longest bar in the chart.
pub const BAR_WIDTH: usize = 30;

const BAR_CHAR: char = '█';
const NEGATIVE_BAR_CHAR: char = '░';

/// Print the stage previews, chart and export result for one file.
pub fn print_report(report: &FileReport, chart_rows: usize) {
    println!();
    println!("== {} ==", report.file_name);
    for stage in &report.stages {
        print_stage(stage);
    }
    if let Some(chart) = &report.chart {
        println!();
        println!("Chart:");
        println!("{}", render_chart(chart, chart_rows));
    } else if report.config.show_chart && report.is_ok() {
        println!("No numeric columns to chart.");
    }
    if let Some(artifact) = &report.artifact {
        println!();
        match &report.written_to {
            Some(path) => println!(
                "Exported {} ({}, {} bytes) to {}",
                artifact.file_name,
                artifact.mime_type,
                artifact.bytes.len(),
                path.display()
            ),
            None => println!(
                "Built {} ({}, {} bytes); not written",
                artifact.file_name,
                artifact.mime_type,
                artifact.bytes.len()
            ),
        }
        println!("{COMPLETE_MESSAGE}");
    }
    if let Some(failure) = &report.failure {
        eprintln!("error: {}: {}", report.file_name, failure.message);
    }
}

fn print_stage(stage: &StagePreview) {
    println!();
    match stage.message() {
        Some(message) => println!("{message}"),
        None => println!("Uploaded data:"),
    }
    println!(
        "{} rows x {} columns{}",
        stage.rows,
        stage.columns,
        if stage.rows > stage.preview.height() {
            format!(" (showing first {})", stage.preview.height())
        } else {
            String::new()
        }
    );
    println!("{}", preview_table(&stage.preview));
}

/// Tabulate every row of `df`. Callers pass an already truncated preview.
pub fn preview_table(df: &DataFrame) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("#")];
    header.extend(
        df.get_column_names()
            .iter()
            .map(|name| header_cell(name.as_str())),
    );
    table.set_header(header);
    apply_table_style(&mut table);
    for (idx, column) in df.get_columns().iter().enumerate() {
        if is_numeric_dtype(column.dtype()) {
            align_column(&mut table, idx + 1, CellAlignment::Right);
        }
    }
    for row in 0..df.height() {
        let mut cells = vec![dim_cell(row)];
        for column in df.get_columns() {
            let value = column.get(row).unwrap_or(AnyValue::Null);
            cells.push(value_cell(value));
        }
        table.add_row(cells);
    }
    table
}

/// Column names, dtypes and null counts of `df`.
pub fn schema_table(df: &DataFrame) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Nulls"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for column in df.get_columns() {
        table.add_row(vec![
            Cell::new(column.name().as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(column.dtype().to_string()),
            count_cell(column.null_count(), Color::Yellow),
        ]);
    }
    table
}

/// Horizontal bar chart: one group of bars per row, one bar per series.
///
/// Bars are scaled to the largest absolute value. Negative values use a
/// lighter bar and missing values have no bar.
pub fn render_chart(chart: &ChartData, max_rows: usize) -> String {
    let scale = chart.max_abs().filter(|max| *max > 0.0);
    let shown = chart.row_labels.len().min(max_rows);
    let label_width = chart.row_labels[..shown]
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0);
    let name_width = chart
        .series
        .iter()
        .map(|series| series.name.chars().count())
        .max()
        .unwrap_or(0);
    let mut lines = Vec::new();
    for (idx, label) in chart.row_labels[..shown].iter().enumerate() {
        for (position, series) in chart.series.iter().enumerate() {
            let row_label = if position == 0 { label.as_str() } else { "" };
            let value = series.values.get(idx).copied().flatten();
            let text = value.map_or_else(|| "missing".to_string(), format_numeric);
            lines.push(format!(
                "{row_label:>label_width$} {name:<name_width$} |{bar} {text}",
                name = series.name,
                bar = bar(value, scale),
            ));
        }
    }
    if chart.row_labels.len() > shown {
        lines.push(format!("... {} more rows", chart.row_labels.len() - shown));
    }
    lines.join("\n")
}

fn bar(value: Option<f64>, scale: Option<f64>) -> String {
    let (Some(value), Some(scale)) = (value, scale) else {
        return String::new();
    };
    let length = ((value.abs() / scale) * BAR_WIDTH as f64).round() as usize;
    let glyph = if value < 0.0 { NEGATIVE_BAR_CHAR } else { BAR_CHAR };
    std::iter::repeat_n(glyph, length.min(BAR_WIDTH)).collect()
}

/// One line per file: shape, stages, export and status.
pub fn summary_table(reports: &[FileReport]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("Stages"),
        header_cell("Chart"),
        header_cell("Output"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    let mut failed = 0usize;
    for report in reports {
        let final_stage = report.final_stage().filter(|_| report.is_ok());
        let stages: Vec<String> = report
            .stages
            .iter()
            .filter_map(|stage| stage.stage.as_ref().map(ToString::to_string))
            .collect();
        if !report.is_ok() {
            failed += 1;
        }
        table.add_row(vec![
            Cell::new(&report.file_name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            optional_cell(final_stage.map(|stage| stage.rows)),
            optional_cell(final_stage.map(|stage| stage.columns)),
            if stages.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(stages.join(", "))
            },
            match &report.chart {
                Some(_) => Cell::new("✓").fg(Color::Green),
                None => dim_cell("-"),
            },
            match &report.artifact {
                Some(artifact) => Cell::new(&artifact.file_name),
                None => dim_cell("-"),
            },
            status_cell(report),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(reports.iter().filter(|r| r.artifact.is_some()).count())
            .add_attribute(Attribute::Bold),
        count_cell(failed, Color::Red).add_attribute(Attribute::Bold),
    ]);
    table
}

fn status_cell(report: &FileReport) -> Cell {
    match &report.failure {
        Some(failure) => Cell::new(failure.kind)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        None => Cell::new("OK").fg(Color::Green),
    }
}

fn value_cell(value: AnyValue<'_>) -> Cell {
    if matches!(value, AnyValue::Null) {
        dim_cell("null")
    } else {
        Cell::new(any_to_string(value))
    }
}

fn optional_cell(value: Option<usize>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
