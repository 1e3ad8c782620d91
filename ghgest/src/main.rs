use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ghgcraft_core::{AggregationPolicy, ClimatiqClient, EstimatorConfig, Pipeline, reader, writer};
use std::path::PathBuf;

mod formatter;

#[derive(Parser)]
#[command(name = "ghgest")]
#[command(about = "CO2e estimator for fluorinated GHG emissions reported in a spreadsheet", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the Excel file with the emissions data
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Aggregation policy (overrides the config file)
    #[arg(short, long, value_enum)]
    aggregation: Option<Aggregation>,

    /// Export the results to an XLSX file
    #[arg(short, long, value_name = "XLSX")]
    output: Option<PathBuf>,

    /// Read and filter the rows without calling the estimation service
    #[arg(long)]
    dry_run: bool,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum Aggregation {
    /// One estimation call per row
    PerRow,
    /// One call per activity id, apportioned by mass share
    Grouped,
}

impl From<Aggregation> for AggregationPolicy {
    fn from(value: Aggregation) -> Self {
        match value {
            Aggregation::PerRow => AggregationPolicy::PerRow,
            Aggregation::Grouped => AggregationPolicy::Grouped,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        EstimatorConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        // Try to load default config from current directory if it exists
        let default_config_path = PathBuf::from("ghgest.toml");
        if default_config_path.exists() {
            EstimatorConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            EstimatorConfig::default()
        }
    };

    let policy = cli
        .aggregation
        .map(AggregationPolicy::from)
        .unwrap_or(config.aggregation);

    // Read the spreadsheet; failure here is fatal and happens before
    // any estimation call is issued.
    let raw = reader::read_raw_rows(&cli.file, &config.input)
        .with_context(|| format!("Failed to read file: {}", cli.file.display()))?;

    let report = if cli.dry_run {
        Pipeline::preview(&raw)
    } else {
        let client = ClimatiqClient::new(&config.api)?;
        Pipeline::new(policy, Box::new(client)).process_rows(&raw)
    };

    // Output results
    match cli.format {
        OutputFormat::Human => {
            formatter::print_human(&cli.file, &report, raw.len());
        }
        OutputFormat::Json => {
            formatter::print_json(&cli.file, &report, raw.len())?;
        }
    }

    // Export if requested
    if let Some(output_path) = &cli.output {
        writer::write_report_xlsx(output_path, &report)
            .with_context(|| format!("Failed to export to {}", output_path.display()))?;
        println!("Exported: {}", output_path.display());
    }

    Ok(())
}
