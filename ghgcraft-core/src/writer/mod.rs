//! Spreadsheet export

pub mod xlsx_writer;

pub use xlsx_writer::write_report_xlsx;
