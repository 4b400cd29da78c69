//! Configuration management for the Weathergy server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides, e.g. WEATHERGY__SERVER__PORT

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::SensorReading;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Remote prediction API configuration
    pub upstream: UpstreamConfig,

    /// Sensor source configuration
    pub sensors: SensorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the prediction API
    pub api_endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SensorConfig {
    /// Where readings come from
    pub mode: SensorMode,

    /// Seed for reproducible mock readings
    pub seed: Option<u64>,

    /// Reading reported in fixed mode
    pub fixed_reading: Option<SensorReading>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SensorMode {
    /// Random readings within the demo ranges
    Mock,
    /// The same configured reading every time
    Fixed,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("WEATHERGY_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("upstream.api_endpoint", "http://localhost:5000")?
            .set_default("upstream.timeout_secs", 30)?
            .set_default("sensors.mode", "mock")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WEATHERGY__ prefix)
            .add_source(
                Environment::with_prefix("WEATHERGY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
impl Config {
    /// Configuration pointing at the given upstream, with seeded mock sensors
    pub fn for_tests(api_endpoint: &str) -> Self {
        Self {
            environment: "test".to_string(),
            server: ServerConfig {
                port: 0,
                host: "127.0.0.1".to_string(),
            },
            upstream: UpstreamConfig {
                api_endpoint: api_endpoint.to_string(),
                timeout_secs: 5,
            },
            sensors: SensorConfig {
                mode: SensorMode::Mock,
                seed: Some(7),
                fixed_reading: None,
            },
        }
    }
}
