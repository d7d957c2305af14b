//! Configuration management for the Crop Disease Advisor
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides, e.g. `CDA_RISK__PRECIPITATION_MODE=exclusive`

use std::path::{Path, PathBuf};

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::PrecipitationMode;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Classifier model configuration
    pub models: ModelsConfig,

    /// Forecast API configuration
    pub weather: WeatherConfig,

    /// Risk heuristic configuration
    pub risk: RiskConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Largest accepted upload body in bytes
    pub max_upload_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelsConfig {
    /// Directory holding one ONNX file per crop
    pub dir: PathBuf,
}

impl ModelsConfig {
    pub fn model_path(&self, model_file: &str) -> PathBuf {
        Path::new(&self.dir).join(model_file)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Daily forecast endpoint
    pub api_endpoint: String,

    /// Per-attempt request timeout in seconds
    pub timeout_secs: u64,

    /// Total attempts per forecast, including the first
    pub max_attempts: u32,

    /// Delay before the second attempt; grows linearly per attempt
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RiskConfig {
    pub precipitation_mode: PrecipitationMode,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("CDA_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.max_upload_bytes", 10 * 1024 * 1024)?
            .set_default("models.dir", "models")?
            .set_default("weather.api_endpoint", "https://api.open-meteo.com/v1/forecast")?
            .set_default("weather.timeout_secs", 10)?
            .set_default("weather.max_attempts", 2)?
            .set_default("weather.retry_backoff_ms", 500)?
            .set_default("risk.precipitation_mode", "legacy")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CDA_ prefix)
            .add_source(
                Environment::with_prefix("CDA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "https://api.open-meteo.com/v1/forecast".to_string(),
            timeout_secs: 10,
            max_attempts: 2,
            retry_backoff_ms: 500,
        }
    }
}
