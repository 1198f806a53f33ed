//! Weather API client for fetching hourly forecasts
//!
//! Integrates with the Open-Meteo forecast API. Wind speed is requested in m/s
//! so that snapshots can convert it to km/h.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::{GpsCoordinates, HourlyForecast};

use crate::error::{AppError, AppResult};

const HOURLY_FIELDS: &str =
    "temperature_2m,precipitation_probability,relative_humidity_2m,wind_speed_10m";

/// Hourly series start at the current hour, so index 0 is "now"
const FORECAST_HOURS: &str = "24";

/// Source of hourly forecasts for a location
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch(&self, coordinates: GpsCoordinates) -> AppResult<HourlyForecast>;
}

/// Open-Meteo forecast client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
}

/// Open-Meteo forecast response
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: HourlyForecast,
}

impl WeatherClient {
    /// Create a new WeatherClient against the public API
    pub fn new(timeout: Duration) -> AppResult<Self> {
        Self::with_base_url("https://api.open-meteo.com".to_string(), timeout)
    }

    /// Create a new WeatherClient with custom base URL (for testing)
    pub fn with_base_url(base_url: String, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WeatherProvider for WeatherClient {
    /// Fetch the next 24 hours of forecast by GPS coordinates
    async fn fetch(&self, coordinates: GpsCoordinates) -> AppResult<HourlyForecast> {
        let url = format!("{}/v1/forecast", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", coordinates.latitude.to_string()),
                ("longitude", coordinates.longitude.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("wind_speed_unit", "ms".to_string()),
                ("forecast_hours", FORECAST_HOURS.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Weather API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        let data: ForecastResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse weather response: {}", e))
        })?;

        Ok(data.hourly)
    }
}
