//! XLSX export of the result table
//!
//! Builds a fresh single-sheet workbook from scratch: the fixed part
//! set (content types, relationships, workbook, one worksheet) goes
//! into a ZIP archive, and the worksheet XML is produced with the
//! quick-xml event writer. Text cells use inline strings so no shared
//! strings table is needed.

use crate::report::{Report, ReportRow};
use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::{ZipWriter, write::FileOptions};

const SHEET_NAME: &str = "Results";

/// Column headers, in the fixed export order.
const HEADERS: [&str; 3] = [
    "Fluorinated GHG Name",
    "Emissions_metric_tons",
    "CO2e_kg",
];

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Results" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

/// Write the report to a new XLSX file with a single `Results` sheet.
/// Absent CO2e values become blank cells, distinguishable from zero.
pub fn write_report_xlsx(output_path: &Path, report: &Report) -> Result<()> {
    let output_file = File::create(output_path)
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
    let mut zip_writer = ZipWriter::new(output_file);
    let options = FileOptions::<()>::default();

    zip_writer.start_file("[Content_Types].xml", options)?;
    zip_writer.write_all(CONTENT_TYPES_XML.as_bytes())?;

    zip_writer.start_file("_rels/.rels", options)?;
    zip_writer.write_all(ROOT_RELS_XML.as_bytes())?;

    zip_writer.start_file("xl/workbook.xml", options)?;
    zip_writer.write_all(WORKBOOK_XML.as_bytes())?;

    zip_writer.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip_writer.write_all(WORKBOOK_RELS_XML.as_bytes())?;

    zip_writer.start_file("xl/worksheets/sheet1.xml", options)?;
    zip_writer.write_all(&worksheet_xml(&report.rows)?)?;

    zip_writer.finish()?;
    Ok(())
}

fn worksheet_xml(rows: &[ReportRow]) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut worksheet = BytesStart::new("worksheet");
    worksheet.push_attribute((
        "xmlns",
        "http://schemas.openxmlformats.org/spreadsheetml/2006/main",
    ));
    writer.write_event(Event::Start(worksheet))?;
    writer.write_event(Event::Start(BytesStart::new("sheetData")))?;

    write_row_start(&mut writer, 0)?;
    for (col, header) in HEADERS.iter().enumerate() {
        write_text_cell(&mut writer, 0, col as u32, header)?;
    }
    writer.write_event(Event::End(BytesEnd::new("row")))?;

    for (i, report_row) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        write_row_start(&mut writer, row)?;
        write_text_cell(&mut writer, row, 0, &report_row.name)?;
        write_number_cell(&mut writer, row, 1, report_row.mass_tons)?;
        if let Some(co2e_kg) = report_row.co2e_kg {
            write_number_cell(&mut writer, row, 2, co2e_kg)?;
        }
        writer.write_event(Event::End(BytesEnd::new("row")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("sheetData")))?;
    writer.write_event(Event::End(BytesEnd::new("worksheet")))?;

    Ok(writer.into_inner().into_inner())
}

fn write_row_start(writer: &mut Writer<Cursor<Vec<u8>>>, row: u32) -> Result<()> {
    let mut element = BytesStart::new("row");
    element.push_attribute(("r", (row + 1).to_string().as_str()));
    writer.write_event(Event::Start(element))?;
    Ok(())
}

fn write_text_cell(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    row: u32,
    col: u32,
    text: &str,
) -> Result<()> {
    let mut cell = BytesStart::new("c");
    cell.push_attribute(("r", cell_ref(row, col).as_str()));
    cell.push_attribute(("t", "inlineStr"));
    writer.write_event(Event::Start(cell))?;
    writer.write_event(Event::Start(BytesStart::new("is")))?;
    writer.write_event(Event::Start(BytesStart::new("t")))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new("t")))?;
    writer.write_event(Event::End(BytesEnd::new("is")))?;
    writer.write_event(Event::End(BytesEnd::new("c")))?;
    Ok(())
}

fn write_number_cell(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    row: u32,
    col: u32,
    value: f64,
) -> Result<()> {
    let mut cell = BytesStart::new("c");
    cell.push_attribute(("r", cell_ref(row, col).as_str()));
    writer.write_event(Event::Start(cell))?;
    writer.write_event(Event::Start(BytesStart::new("v")))?;
    writer.write_event(Event::Text(BytesText::new(&value.to_string())))?;
    writer.write_event(Event::End(BytesEnd::new("v")))?;
    writer.write_event(Event::End(BytesEnd::new("c")))?;
    Ok(())
}

/// Excel-style reference for a 0-based (row, col) position.
fn cell_ref(row: u32, col: u32) -> String {
    format!("{}{}", col_to_letter(col), row + 1)
}

/// Convert column number to letter (0 -> A, 1 -> B, etc.)
fn col_to_letter(mut col: u32) -> String {
    let mut result = String::new();
    loop {
        result.insert(0, (b'A' + (col % 26) as u8) as char);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    result
}
