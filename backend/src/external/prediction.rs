//! Prediction API client for fetching forecast text and raw series
//!
//! The API wraps its answer in an envelope whose `output` field is itself a
//! JSON-encoded string.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use shared::RawSeriesPayload;

use crate::error::{AppError, AppResult};

/// Prediction API client
#[derive(Clone)]
pub struct PredictionClient {
    client: Client,
    base_url: String,
}

/// Forecast for a location as returned by the prediction API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteForecast {
    pub location: String,
    pub prediction: String,
    pub fun_fact: String,
    pub raw_data: RawSeriesPayload,
}

/// Response envelope of the prediction API
#[derive(Debug, Deserialize)]
struct PredictionEnvelope {
    output: String,
    #[serde(default)]
    raw_data: Option<RawSeriesPayload>,
}

/// Decoded contents of the envelope's `output` string
#[derive(Debug, Deserialize)]
struct PredictionOutput {
    #[serde(default)]
    prediction: String,
    #[serde(default)]
    fun_fact: String,
}

impl PredictionClient {
    /// Create a new PredictionClient
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("weathergy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the forecast for a location
    pub async fn fetch_forecast(&self, location: &str) -> AppResult<RemoteForecast> {
        let url = format!("{}/predict", self.base_url);

        tracing::debug!(%url, location, "requesting forecast from prediction API");

        let response = self
            .client
            .get(&url)
            .query(&[("location", location)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    AppError::UpstreamUnavailable(e.to_string())
                } else {
                    AppError::ExternalService(format!("Prediction API request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
                    AppError::UpstreamUnavailable(format!("{} - {}", status, body))
                }
                _ => AppError::ExternalService(format!(
                    "Prediction API error: {} - {}",
                    status, body
                )),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::UpstreamFormat(format!("Failed to read response: {}", e)))?;

        parse_envelope(location, &body)
    }
}

/// Unwrap the prediction API envelope, including its JSON-encoded `output`
pub fn parse_envelope(location: &str, body: &str) -> AppResult<RemoteForecast> {
    let envelope: PredictionEnvelope = serde_json::from_str(body)
        .map_err(|e| AppError::UpstreamFormat(format!("Invalid response envelope: {}", e)))?;

    let output: PredictionOutput = serde_json::from_str(&envelope.output)
        .map_err(|e| AppError::UpstreamFormat(format!("Invalid prediction output: {}", e)))?;

    let raw_data = envelope.raw_data.unwrap_or_default();
    if raw_data.is_empty() {
        tracing::warn!(location, "prediction API returned no series data");
    }

    Ok(RemoteForecast {
        location: location.to_string(),
        prediction: output.prediction,
        fun_fact: output.fun_fact,
        raw_data,
    })
}
