//! Final per-row result table

use serde::Serialize;

/// One output row, in the same order as the filtered input rows.
///
/// `co2e_kg` is `None` when the estimation call for the row (or its
/// group) failed; this is distinct from an estimate of zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub mass_tons: f64,
    pub co2e_kg: Option<f64>,
}

/// Result of one pipeline run: the row table plus one warning per
/// failed estimation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    pub warnings: Vec<String>,
}

impl Report {
    /// Rows that received an estimate.
    pub fn estimated_count(&self) -> usize {
        self.rows.iter().filter(|r| r.co2e_kg.is_some()).count()
    }

    /// Rows whose estimate is absent.
    pub fn failed_count(&self) -> usize {
        self.rows.iter().filter(|r| r.co2e_kg.is_none()).count()
    }
}
