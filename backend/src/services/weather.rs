//! Weather lookups for farmers and places

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use shared::{
    weather_banner, Farmer, GpsCoordinates, LocalizedText, ProfileDefaults, ProfileView,
    WeatherBanner, WeatherSnapshot,
};

use crate::error::{AppError, AppResult};
use crate::external::{Geocoder, WeatherProvider};

/// Current conditions with the fallback flag set when the provider failed
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReading {
    pub snapshot: WeatherSnapshot,
    pub fallback: bool,
}

impl WeatherReading {
    /// Snapshot to hand to the advisory engine, `None` when on fallback values
    pub fn measured(&self) -> Option<&WeatherSnapshot> {
        (!self.fallback).then_some(&self.snapshot)
    }
}

/// Weather for a location, as shown on the weather page
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub location: String,
    pub coordinates: GpsCoordinates,
    pub weather: WeatherSnapshot,
    pub banner: Option<WeatherBanner>,
    pub summary: LocalizedText,
}

#[derive(Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    geocoder: Arc<dyn Geocoder>,
    defaults: ProfileDefaults,
}

impl WeatherService {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        geocoder: Arc<dyn Geocoder>,
        defaults: ProfileDefaults,
    ) -> Self {
        Self {
            provider,
            geocoder,
            defaults,
        }
    }

    /// Current-hour snapshot, or `WeatherServiceUnavailable`
    pub async fn current(&self, coordinates: GpsCoordinates) -> AppResult<WeatherSnapshot> {
        let forecast = self.provider.fetch(coordinates).await.map_err(|e| {
            tracing::warn!(error = %e, "Weather fetch failed");
            AppError::WeatherServiceUnavailable
        })?;

        forecast.current(Utc::now()).ok_or_else(|| {
            tracing::warn!("Weather provider returned an empty forecast");
            AppError::WeatherServiceUnavailable
        })
    }

    /// Current snapshot, falling back to the fixed defaults on any failure
    pub async fn current_or_fallback(&self, coordinates: GpsCoordinates) -> WeatherReading {
        match self.current(coordinates).await {
            Ok(snapshot) => WeatherReading {
                snapshot,
                fallback: false,
            },
            Err(_) => {
                tracing::warn!(
                    latitude = %coordinates.latitude,
                    longitude = %coordinates.longitude,
                    "Using fallback weather"
                );
                WeatherReading {
                    snapshot: WeatherSnapshot::fallback(Utc::now()),
                    fallback: true,
                }
            }
        }
    }

    /// Weather at the farmer's stored location
    pub async fn report_for_farmer(&self, farmer: &Farmer) -> AppResult<WeatherReport> {
        let view = ProfileView::new(Some(&farmer.profile), &self.defaults);
        let snapshot = self.current(view.coordinates()).await?;

        Ok(WeatherReport {
            location: view.location().to_string(),
            coordinates: view.coordinates(),
            banner: weather_banner(&snapshot, &view),
            summary: snapshot.summary(view.location(), view.location_ml()),
            weather: snapshot,
        })
    }

    /// Weather for a place name typed by the user
    pub async fn lookup(&self, place: &str) -> AppResult<WeatherReport> {
        let place = place.trim();
        if place.is_empty() {
            return Err(AppError::Validation {
                field: "location".to_string(),
                message: "Location is required".to_string(),
                message_ml: "സ്ഥലം നൽകുക".to_string(),
            });
        }

        let resolved = self
            .geocoder
            .resolve(place)
            .await?
            .ok_or_else(|| AppError::LocationNotFound(place.to_string()))?;

        let snapshot = self.current(resolved.coordinates).await?;
        let view = ProfileView::new(None, &self.defaults);

        Ok(WeatherReport {
            banner: weather_banner(&snapshot, &view),
            summary: snapshot.summary(&resolved.name, &resolved.name),
            location: resolved.name,
            coordinates: resolved.coordinates,
            weather: snapshot,
        })
    }

    /// Coordinates for a place, or the configured defaults when it cannot be resolved
    pub async fn resolve_or_default(&self, place: Option<&str>) -> GpsCoordinates {
        let Some(place) = place.map(str::trim).filter(|p| !p.is_empty()) else {
            return self.defaults.coordinates;
        };

        match self.geocoder.resolve(place).await {
            Ok(Some(resolved)) => resolved.coordinates,
            Ok(None) => {
                tracing::warn!(place, "Location not found, using default coordinates");
                self.defaults.coordinates
            }
            Err(e) => {
                tracing::warn!(place, error = %e, "Geocoding failed, using default coordinates");
                self.defaults.coordinates
            }
        }
    }
}
