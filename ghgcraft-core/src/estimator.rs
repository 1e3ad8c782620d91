//! Estimation service client

use crate::config::ApiConfig;
use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;

/// Why a single estimation call produced no result.
///
/// These are per-call failures: the pipeline turns them into a warning
/// and an absent `co2e_kg`, then keeps going. Nothing here is fatal.
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("response has no numeric co2e value")]
    MissingValue,
}

/// Source of CO2e estimates. One call per activity id (grouped policy)
/// or per row (per-row policy); implementations must not retry.
pub trait EstimateProvider {
    /// Estimate the CO2e mass in kg for `mass_kg` of the gas behind
    /// `activity_id`. Zero or negative mass is passed through; the
    /// service is the authority on valid ranges.
    fn estimate(&self, activity_id: &str, mass_kg: f64) -> Result<f64, EstimateError>;
}

/// Blocking HTTP client for the Climatiq estimate endpoint.
pub struct ClimatiqClient {
    client: reqwest::blocking::Client,
    url: String,
    api_key: String,
}

impl ClimatiqClient {
    /// Build a client from config. The bearer credential is read from
    /// the environment variable named by `api.key_env`; a missing
    /// credential is fatal before any file is read.
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let api_key = std::env::var(&api.key_env).with_context(|| {
            format!("API key environment variable '{}' is not set", api.key_env)
        })?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: api.url.clone(),
            api_key,
        })
    }
}

impl EstimateProvider for ClimatiqClient {
    fn estimate(&self, activity_id: &str, mass_kg: f64) -> Result<f64, EstimateError> {
        let body = json!({
            "emission_factor": { "activity_id": activity_id },
            "parameters": { "weight": mass_kg, "weight_unit": "kg" }
        });

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(EstimateError::Status(status));
        }

        let value: Value = response.json()?;
        extract_co2e(&value).ok_or(EstimateError::MissingValue)
    }
}

/// Pull the CO2e number out of a response. The service reports it at
/// `co2e`, either as a bare number or as an object carrying `value`.
fn extract_co2e(response: &Value) -> Option<f64> {
    match response.get("co2e")? {
        Value::Number(n) => n.as_f64(),
        Value::Object(fields) => fields.get("value").and_then(Value::as_f64),
        _ => None,
    }
}
