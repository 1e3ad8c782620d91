//! Configuration for the estimation pipeline

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstimatorConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub aggregation: AggregationPolicy,
}

impl EstimatorConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: EstimatorConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Estimation service settings. The credential itself never lives in
/// the file; `key_env` names the environment variable holding it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_key_env")]
    pub key_env: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            key_env: default_key_env(),
        }
    }
}

/// Where to find the data in the uploaded workbook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_sheet")]
    pub sheet: String,
    #[serde(default = "default_name_column")]
    pub name_column: String,
    #[serde(default = "default_mass_column")]
    pub mass_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            sheet: default_sheet(),
            name_column: default_name_column(),
            mass_column: default_mass_column(),
        }
    }
}

/// How estimation calls are issued.
///
/// `PerRow` is exact and issues one call per retained row. `Grouped`
/// issues one call per distinct activity id and apportions the result
/// by mass share; that split is only exact while the service's CO2e is
/// linear in mass for the chosen factor, which holds for simple
/// multiplicative factors but is an assumption, not a guarantee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationPolicy {
    #[default]
    PerRow,
    Grouped,
}

fn default_api_url() -> String {
    "https://api.climatiq.io/data/v1/estimate".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_key_env() -> String {
    "CLIMATIQ_API_KEY".to_string()
}

fn default_sheet() -> String {
    "Emissions from P&T Proc by Chem".to_string()
}

fn default_name_column() -> String {
    "Fluorinated GHG Name".to_string()
}

fn default_mass_column() -> String {
    "Fluorinated GHG Emissions (metric tons)".to_string()
}
