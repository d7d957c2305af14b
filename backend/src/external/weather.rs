//! Weather API client for fetching daily forecasts
//!
//! Integrates with the Open-Meteo daily forecast API. One forecast is fetched
//! per diagnosis; nothing is cached between requests.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use shared::{Forecast, ForecastLocation, ForecastPoint};

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

/// Daily variables requested from the provider
const DAILY_VARIABLES: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum";

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    max_attempts: u32,
    retry_backoff: Duration,
}

/// Open-Meteo API response; only the daily block is read
#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    daily: OpenMeteoDaily,
}

/// Parallel daily series. Missing or null values fail deserialization.
#[derive(Debug, Deserialize)]
struct OpenMeteoDaily {
    time: Vec<NaiveDate>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    precipitation_sum: Vec<f64>,
}

/// Why a single attempt failed
#[derive(Debug)]
enum FetchFailure {
    /// Transport errors, timeouts, 5xx and 429
    Retryable(String),
    Fatal(String),
}

impl WeatherClient {
    /// Create a new WeatherClient
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_endpoint.clone(),
            max_attempts: config.max_attempts.max(1),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    /// Forecast URL for a location
    pub fn forecast_url(&self, location: &ForecastLocation) -> String {
        format!(
            "{}?latitude={}&longitude={}&daily={}&timezone={}",
            self.base_url,
            location.latitude(),
            location.longitude(),
            DAILY_VARIABLES,
            location.timezone
        )
    }

    /// Fetch the daily forecast, retrying transient failures
    pub async fn fetch_forecast(&self, location: &ForecastLocation) -> AppResult<Forecast> {
        let url = self.forecast_url(location);
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            match self.fetch_once(&url).await {
                Ok(body) => return parse_forecast(&body, location.clone()),
                Err(FetchFailure::Fatal(message)) => return Err(AppError::WeatherFetch(message)),
                Err(FetchFailure::Retryable(message)) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        "Forecast request failed: {}",
                        message
                    );
                    last_error = message;
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.retry_backoff * attempt).await;
                    }
                }
            }
        }

        Err(AppError::WeatherFetch(format!(
            "{} (gave up after {} attempts)",
            last_error, self.max_attempts
        )))
    }

    async fn fetch_once(&self, url: &str) -> Result<String, FetchFailure> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchFailure::Retryable(format!("Weather API request timed out: {}", e))
            } else {
                FetchFailure::Retryable(format!("Weather API request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("Weather API error: {} - {}", status, body);
            return if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                Err(FetchFailure::Retryable(message))
            } else {
                Err(FetchFailure::Fatal(message))
            };
        }

        response
            .text()
            .await
            .map_err(|e| {
                FetchFailure::Retryable(format!("Failed to read forecast response: {}", e))
            })
    }
}

/// Parse an Open-Meteo body into a forecast
pub fn parse_forecast(body: &str, location: ForecastLocation) -> AppResult<Forecast> {
    let data: OpenMeteoResponse = serde_json::from_str(body)
        .map_err(|e| AppError::WeatherFetch(format!("Failed to parse forecast response: {}", e)))?;

    let daily = data.daily;
    let days = daily.time.len();
    if daily.temperature_2m_max.len() != days
        || daily.temperature_2m_min.len() != days
        || daily.precipitation_sum.len() != days
    {
        return Err(AppError::WeatherFetch(format!(
            "Forecast series have mismatched lengths: time={}, max={}, min={}, precipitation={}",
            days,
            daily.temperature_2m_max.len(),
            daily.temperature_2m_min.len(),
            daily.precipitation_sum.len()
        )));
    }
    if days == 0 {
        return Err(AppError::WeatherFetch(
            "Forecast response contained no days".to_string(),
        ));
    }

    let points = daily
        .time
        .into_iter()
        .zip(daily.temperature_2m_max)
        .zip(daily.temperature_2m_min)
        .zip(daily.precipitation_sum)
        .map(|(((date, temperature_max), temperature_min), precipitation)| ForecastPoint {
            date,
            temperature_max,
            temperature_min,
            precipitation,
        })
        .collect();

    Ok(Forecast::new(location, points))
}
