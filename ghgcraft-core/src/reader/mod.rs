//! Workbook reader using calamine

use crate::config::InputConfig;
use anyhow::{Context, Result, bail};
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use std::path::Path;

/// One raw input row before registry filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub name: String,
    pub mass_tons: f64,
}

/// Read the configured sheet and extract `{name, mass_tons}` rows.
///
/// A missing sheet or a missing header column is fatal and reported
/// with a diagnostic naming what was not found, before any estimation
/// work starts. Rows with an empty name cell or a non-numeric mass
/// cell are skipped; that is data cleaning, not an error.
pub fn read_raw_rows<P: AsRef<Path>>(path: P, input: &InputConfig) -> Result<Vec<RawRow>> {
    let path = path.as_ref();
    let mut excel: Sheets<_> = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let range = excel.worksheet_range(&input.sheet).with_context(|| {
        format!(
            "Sheet '{}' not found in {}",
            input.sheet,
            path.display()
        )
    })?;

    extract_rows(&range, input)
}

/// Locate the header row and pull the data below it.
fn extract_rows(range: &Range<Data>, input: &InputConfig) -> Result<Vec<RawRow>> {
    let (header_index, name_col, mass_col) = find_columns(range, input)?;

    let mut rows = Vec::new();
    for row in range.rows().skip(header_index + 1) {
        let name = match row.get(name_col) {
            Some(Data::String(s)) if !s.trim().is_empty() => s.clone(),
            _ => continue,
        };
        let mass_tons = match row.get(mass_col) {
            Some(Data::Float(f)) => *f,
            Some(Data::Int(i)) => *i as f64,
            _ => continue,
        };
        rows.push(RawRow { name, mass_tons });
    }

    Ok(rows)
}

/// Find the header row containing the name column, then resolve both
/// column indices by exact header text (after trimming).
fn find_columns(range: &Range<Data>, input: &InputConfig) -> Result<(usize, usize, usize)> {
    for (row_index, row) in range.rows().enumerate() {
        let name_col = header_position(row, &input.name_column);
        if let Some(name_col) = name_col {
            let mass_col = header_position(row, &input.mass_column).with_context(|| {
                format!(
                    "Header column '{}' not found next to '{}' (row {})",
                    input.mass_column,
                    input.name_column,
                    row_index + 1
                )
            })?;
            return Ok((row_index, name_col, mass_col));
        }
    }

    bail!("Header column '{}' not found in sheet", input.name_column)
}

fn header_position(row: &[Data], header: &str) -> Option<usize> {
    row.iter().position(|cell| match cell {
        Data::String(s) => s.trim() == header,
        _ => false,
    })
}
