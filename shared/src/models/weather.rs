//! Weather data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::LocalizedText;

/// Temperature assumed when no weather data is available
pub const FALLBACK_TEMPERATURE_C: f64 = 28.0;
/// Precipitation probability assumed when no weather data is available
pub const FALLBACK_PRECIPITATION_PCT: i32 = 0;
/// Wind speed unit conversion from the provider's m/s
pub const MPS_TO_KMH: f64 = 3.6;

/// A single weather observation for the current hour.
///
/// Transient: fetched per request and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub precipitation_probability_pct: i32,
    pub humidity_pct: i32,
    pub wind_speed_kmh: f64,
    pub timestamp: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Snapshot carrying the fixed fallback constants
    pub fn fallback(timestamp: DateTime<Utc>) -> Self {
        Self {
            temperature_c: FALLBACK_TEMPERATURE_C,
            precipitation_probability_pct: FALLBACK_PRECIPITATION_PCT,
            humidity_pct: 0,
            wind_speed_kmh: 0.0,
            timestamp,
        }
    }

    /// Short bilingual summary of the conditions at a location
    pub fn summary(&self, location: &str, location_ml: &str) -> LocalizedText {
        LocalizedText::new(
            format!(
                "{} കാലാവസ്ഥ: താപനില {:.1}°C, മഴ സാധ്യത {}%, ആർദ്രത {}%, കാറ്റ് {:.1} km/h",
                location_ml,
                self.temperature_c,
                self.precipitation_probability_pct,
                self.humidity_pct,
                self.wind_speed_kmh
            ),
            format!(
                "Weather for {}: Temp {:.1}°C, Rain chance {}%, Humidity {}%, Wind {:.1} km/h",
                location,
                self.temperature_c,
                self.precipitation_probability_pct,
                self.humidity_pct,
                self.wind_speed_kmh
            ),
        )
    }
}

/// Hourly forecast as returned by the weather provider.
///
/// Index 0 of every series is the current hour. Units: °C, %, %, m/s.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HourlyForecast {
    #[serde(default)]
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
    pub precipitation_probability: Vec<i32>,
    pub relative_humidity_2m: Vec<i32>,
    pub wind_speed_10m: Vec<f64>,
}

impl HourlyForecast {
    /// Number of hours for which every series has a value
    pub fn hours(&self) -> usize {
        self.temperature_2m
            .len()
            .min(self.precipitation_probability.len())
            .min(self.relative_humidity_2m.len())
            .min(self.wind_speed_10m.len())
    }

    /// Snapshot for the given hour offset, converting wind to km/h
    pub fn snapshot_at(&self, hour: usize, timestamp: DateTime<Utc>) -> Option<WeatherSnapshot> {
        if hour >= self.hours() {
            return None;
        }

        Some(WeatherSnapshot {
            temperature_c: self.temperature_2m[hour],
            precipitation_probability_pct: self.precipitation_probability[hour].clamp(0, 100),
            humidity_pct: self.relative_humidity_2m[hour].clamp(0, 100),
            wind_speed_kmh: self.wind_speed_10m[hour] * MPS_TO_KMH,
            timestamp,
        })
    }

    /// Snapshot for the current hour
    pub fn current(&self, timestamp: DateTime<Utc>) -> Option<WeatherSnapshot> {
        self.snapshot_at(0, timestamp)
    }
}
