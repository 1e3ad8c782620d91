//! ghgcraft-core: CO2e estimation for fluorinated GHG emissions
//!
//! This library reads fluorinated greenhouse-gas emissions from a
//! spreadsheet, maps recognized gas names to external activity ids,
//! asks a remote estimation service for the CO2e of each row (or of
//! each group of rows sharing an activity id), and assembles the
//! results for display and export.

pub mod config;
pub mod estimator;
pub mod pipeline;
pub mod reader;
pub mod registry;
pub mod report;
pub mod writer;

pub use config::{AggregationPolicy, EstimatorConfig};
pub use estimator::{ClimatiqClient, EstimateError, EstimateProvider};
pub use pipeline::Pipeline;
pub use report::{Report, ReportRow};
