//! Place name to coordinates lookup via the Open-Meteo geocoding API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::GpsCoordinates;

use crate::error::{AppError, AppResult};

/// A resolved place
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeocodedPlace {
    pub name: String,
    pub coordinates: GpsCoordinates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the place is unknown
    async fn resolve(&self, place: &str) -> AppResult<Option<GeocodedPlace>>;
}

#[derive(Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    name: String,
    latitude: f64,
    longitude: f64,
    admin1: Option<String>,
    country: Option<String>,
}

impl GeocodingClient {
    pub fn new(base_url: String, timeout: Duration) -> AppResult<Self> {
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

fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_f64_retain(value).map(|d| d.round_dp(4))
}

#[async_trait]
impl Geocoder for GeocodingClient {
    async fn resolve(&self, place: &str) -> AppResult<Option<GeocodedPlace>> {
        let place = place.trim();
        if place.is_empty() {
            return Ok(None);
        }

        let response = self
            .client
            .get(format!("{}/v1/search", self.base_url))
            .query(&[
                ("name", place),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| AppError::GeocodingError(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::GeocodingError(format!("{} - {}", status, body)));
        }

        let data: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::GeocodingError(format!("invalid response: {}", e)))?;

        let place = data.results.into_iter().find_map(|r| {
            let latitude = to_decimal(r.latitude)?;
            let longitude = to_decimal(r.longitude)?;
            Some(GeocodedPlace {
                name: r.name,
                coordinates: GpsCoordinates::new(latitude, longitude),
                region: r.admin1,
                country: r.country,
            })
        });

        Ok(place)
    }
}
