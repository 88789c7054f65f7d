//! Single-sheet XLSX serialization.
//!
//! The workbook is written by hand: a zip archive holding the package
//! relationships, a workbook with one sheet named `Sheet1`, minimal styles,
//! and the worksheet itself. Strings are stored inline, so no shared string
//! table is needed.

use std::io::{Cursor, Write};

use polars::prelude::{AnyValue, Column, DataFrame};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use fileconv_model::{ConvertError, FileFormat, Result};

use crate::ensure_exportable;

/// Rows per worksheet, header included.
pub const MAX_XLSX_ROWS: usize = 1_048_576;
/// Columns per worksheet.
pub const MAX_XLSX_COLUMNS: usize = 16_384;
/// Characters per cell.
pub const MAX_XLSX_TEXT_CHARS: usize = 32_767;

const SHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="1"><fill><patternFill patternType="none"/></fill></fills><borders count="1"><border/></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs></styleSheet>"#;

#[derive(Debug, Error)]
enum SheetError {
    #[error("{0}")]
    Unsupported(String),
    #[error("xml: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("zip: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SheetError> for ConvertError {
    fn from(error: SheetError) -> Self {
        ConvertError::serialization(FileFormat::Xlsx.extension(), error)
    }
}

/// Write a one-sheet workbook: header row, then data rows. No index column.
pub fn write_xlsx(df: &DataFrame) -> Result<Vec<u8>> {
    ensure_exportable(df, FileFormat::Xlsx)?;
    if df.width() > MAX_XLSX_COLUMNS {
        return Err(SheetError::Unsupported(format!(
            "{} columns exceed the sheet limit of {MAX_XLSX_COLUMNS}",
            df.width()
        ))
        .into());
    }
    if df.height() >= MAX_XLSX_ROWS {
        return Err(SheetError::Unsupported(format!(
            "{} rows exceed the sheet limit of {}",
            df.height(),
            MAX_XLSX_ROWS - 1
        ))
        .into());
    }
    let sheet = write_sheet(df)?;
    Ok(package(&sheet)?)
}

fn package(sheet: &[u8]) -> std::result::Result<Vec<u8>, SheetError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let parts: [(&str, &[u8]); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", ROOT_RELS.as_bytes()),
        ("xl/workbook.xml", WORKBOOK.as_bytes()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes()),
        ("xl/styles.xml", STYLES.as_bytes()),
        ("xl/worksheets/sheet1.xml", sheet),
    ];
    for (path, contents) in parts {
        zip.start_file(path, options)?;
        zip.write_all(contents)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn write_sheet(df: &DataFrame) -> std::result::Result<Vec<u8>, SheetError> {
    let mut xml = Writer::new(Vec::new());
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    let mut root = BytesStart::new("worksheet");
    root.push_attribute(("xmlns", SHEET_NS));
    xml.write_event(Event::Start(root))?;
    xml.write_event(Event::Start(BytesStart::new("sheetData")))?;

    let columns = df.get_columns();
    let letters: Vec<String> = (0..columns.len()).map(column_letter).collect();

    start_row(&mut xml, 1)?;
    for (column, letter) in columns.iter().zip(&letters) {
        write_text_cell(&mut xml, &format!("{letter}1"), column.name().as_str())?;
    }
    xml.write_event(Event::End(BytesEnd::new("row")))?;

    for idx in 0..df.height() {
        let row_number = idx + 2;
        start_row(&mut xml, row_number)?;
        for (column, letter) in columns.iter().zip(&letters) {
            let reference = format!("{letter}{row_number}");
            write_cell(&mut xml, &reference, column, idx)?;
        }
        xml.write_event(Event::End(BytesEnd::new("row")))?;
    }

    xml.write_event(Event::End(BytesEnd::new("sheetData")))?;
    xml.write_event(Event::End(BytesEnd::new("worksheet")))?;
    Ok(xml.into_inner())
}

fn start_row(xml: &mut Writer<Vec<u8>>, number: usize) -> std::result::Result<(), SheetError> {
    let mut row = BytesStart::new("row");
    row.push_attribute(("r", number.to_string().as_str()));
    xml.write_event(Event::Start(row))?;
    Ok(())
}

fn write_cell(
    xml: &mut Writer<Vec<u8>>,
    reference: &str,
    column: &Column,
    idx: usize,
) -> std::result::Result<(), SheetError> {
    let value = column.get(idx).unwrap_or(AnyValue::Null);
    match value {
        AnyValue::Null => Ok(()),
        AnyValue::Boolean(b) => write_value_cell(xml, reference, Some("b"), if b { "1" } else { "0" }),
        AnyValue::String(s) => write_text_cell(xml, reference, s),
        AnyValue::StringOwned(ref s) => write_text_cell(xml, reference, s.as_str()),
        AnyValue::Float32(v) => write_float_cell(xml, reference, column, f64::from(v)),
        AnyValue::Float64(v) => write_float_cell(xml, reference, column, v),
        AnyValue::Int8(v) => write_value_cell(xml, reference, None, &v.to_string()),
        AnyValue::Int16(v) => write_value_cell(xml, reference, None, &v.to_string()),
        AnyValue::Int32(v) => write_value_cell(xml, reference, None, &v.to_string()),
        AnyValue::Int64(v) => write_value_cell(xml, reference, None, &v.to_string()),
        AnyValue::UInt8(v) => write_value_cell(xml, reference, None, &v.to_string()),
        AnyValue::UInt16(v) => write_value_cell(xml, reference, None, &v.to_string()),
        AnyValue::UInt32(v) => write_value_cell(xml, reference, None, &v.to_string()),
        AnyValue::UInt64(v) => write_value_cell(xml, reference, None, &v.to_string()),
        other => Err(SheetError::Unsupported(format!(
            "cell {reference} in column {} holds {other}",
            column.name()
        ))),
    }
}

fn write_float_cell(
    xml: &mut Writer<Vec<u8>>,
    reference: &str,
    column: &Column,
    value: f64,
) -> std::result::Result<(), SheetError> {
    if !value.is_finite() {
        return Err(SheetError::Unsupported(format!(
            "cell {reference} in column {} is {value}, which a spreadsheet cannot store",
            column.name()
        )));
    }
    write_value_cell(xml, reference, None, &value.to_string())
}

fn write_value_cell(
    xml: &mut Writer<Vec<u8>>,
    reference: &str,
    cell_type: Option<&str>,
    value: &str,
) -> std::result::Result<(), SheetError> {
    let mut cell = BytesStart::new("c");
    cell.push_attribute(("r", reference));
    if let Some(cell_type) = cell_type {
        cell.push_attribute(("t", cell_type));
    }
    xml.write_event(Event::Start(cell))?;
    xml.write_event(Event::Start(BytesStart::new("v")))?;
    xml.write_event(Event::Text(BytesText::new(value)))?;
    xml.write_event(Event::End(BytesEnd::new("v")))?;
    xml.write_event(Event::End(BytesEnd::new("c")))?;
    Ok(())
}

fn write_text_cell(
    xml: &mut Writer<Vec<u8>>,
    reference: &str,
    text: &str,
) -> std::result::Result<(), SheetError> {
    if text.chars().count() > MAX_XLSX_TEXT_CHARS {
        return Err(SheetError::Unsupported(format!(
            "cell {reference} exceeds {MAX_XLSX_TEXT_CHARS} characters"
        )));
    }
    if text
        .chars()
        .any(|ch| ch.is_control() && !matches!(ch, '\t' | '\n' | '\r'))
    {
        return Err(SheetError::Unsupported(format!(
            "cell {reference} contains control characters"
        )));
    }
    let mut cell = BytesStart::new("c");
    cell.push_attribute(("r", reference));
    cell.push_attribute(("t", "inlineStr"));
    xml.write_event(Event::Start(cell))?;
    xml.write_event(Event::Start(BytesStart::new("is")))?;
    let mut t = BytesStart::new("t");
    if text.trim() != text {
        t.push_attribute(("xml:space", "preserve"));
    }
    xml.write_event(Event::Start(t))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new("t")))?;
    xml.write_event(Event::End(BytesEnd::new("is")))?;
    xml.write_event(Event::End(BytesEnd::new("c")))?;
    Ok(())
}

/// Spreadsheet column name for a zero-based index: 0 → A, 26 → AA.
fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
        assert_eq!(column_letter(MAX_XLSX_COLUMNS - 1), "XFD");
    }

    #[test]
    fn sheet_xml_uses_inline_strings() {
        use polars::prelude::{NamedFrom, Series};

        let df = DataFrame::new(vec![
            Series::new("name".into(), vec![Some("a & b"), None]).into(),
            Series::new("n".into(), vec![1.5f64, 2.0]).into(),
        ])
        .unwrap();
        let sheet = String::from_utf8(write_sheet(&df).unwrap()).unwrap();
        assert!(sheet.contains(r#"<c r="A1" t="inlineStr"><is><t>name</t></is></c>"#));
        assert!(sheet.contains("a &amp; b"));
        assert!(sheet.contains(r#"<c r="B3"><v>2</v></c>"#));
        assert!(!sheet.contains(r#"r="A3""#));
    }
}
