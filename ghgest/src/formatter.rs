//! Output formatters for the result table

use anyhow::Result;
use colored::*;
use ghgcraft_core::Report;
use std::path::Path;

/// Print the results as a colored table with warnings and a summary
pub fn print_human(file_path: &Path, report: &Report, rows_read: usize) {
    println!("{}", format!("Estimating: {}", file_path.display()).bold());
    println!();

    if report.rows.is_empty() {
        println!("{}", "No supported gases found in the input.".yellow());
        return;
    }

    println!(
        "{:<12} {:>22} {:>16}",
        "Gas".bold(),
        "Emissions (t)".bold(),
        "CO2e (kg)".bold()
    );
    for row in &report.rows {
        let co2e = match row.co2e_kg {
            Some(value) => format!("{value}").normal(),
            None => "absent".dimmed(),
        };
        println!("{:<12} {:>22} {:>16}", row.name.cyan(), row.mass_tons, co2e);
    }
    println!();

    for warning in &report.warnings {
        println!("{} {}", "WARN".yellow().bold(), warning);
    }
    if !report.warnings.is_empty() {
        println!();
    }

    println!("{}", "Summary:".bold().underline());
    println!("  Rows read:      {}", rows_read);
    println!("  Rows retained:  {}", report.rows.len());
    println!(
        "  {} {}",
        "Estimated:".green().bold(),
        report.estimated_count()
    );
    if report.failed_count() > 0 {
        println!("  {} {}", "Failed:".red().bold(), report.failed_count());
    }
}

/// Print the full report in JSON format
pub fn print_json(file_path: &Path, report: &Report, rows_read: usize) -> Result<()> {
    let output = serde_json::json!({
        "file": file_path.display().to_string(),
        "rows": report.rows,
        "warnings": report.warnings,
        "summary": {
            "rows_read": rows_read,
            "rows_retained": report.rows.len(),
            "estimated": report.estimated_count(),
            "failed": report.failed_count(),
        }
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
