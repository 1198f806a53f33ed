//! Configuration management for the Krishi Sakhi backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with KRISHI_ prefix

use std::net::{AddrParseError, IpAddr, SocketAddr};

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{GpsCoordinates, ProfileDefaults};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration. In-memory storage is used when `url` is unset.
    pub database: DatabaseConfig,

    /// JWT session configuration
    pub jwt: JwtConfig,

    /// Weather and geocoding API configuration
    pub weather: WeatherConfig,

    /// LLM inference configuration
    pub inference: InferenceConfig,

    /// Push notification configuration
    pub notifications: NotificationConfig,

    /// Advisory defaults
    pub advisory: AdvisoryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    #[serde(default)]
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing session tokens
    pub secret: String,

    /// Session token expiration in seconds
    pub access_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Forecast API endpoint
    pub forecast_endpoint: String,

    /// Geocoding API endpoint
    pub geocoding_endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InferenceConfig {
    /// Use the LLM instead of the rule engine
    pub enabled: bool,

    /// OpenAI-compatible chat completions endpoint
    pub endpoint: String,

    /// API token
    #[serde(default)]
    pub api_token: Option<String>,

    /// Chat model identifier
    pub model: String,

    /// English to Malayalam translation endpoint
    pub translation_endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    /// Send push notifications
    pub enabled: bool,

    /// Path to the Firebase service account JSON file
    #[serde(default)]
    pub credentials_path: Option<String>,

    /// FCM HTTP v1 API base URL
    pub fcm_endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdvisoryConfig {
    /// Location used when a profile has none
    pub default_location: String,

    pub default_latitude: Decimal,

    pub default_longitude: Decimal,

    /// Default number of history entries returned
    pub history_limit: i64,
}

impl AdvisoryConfig {
    pub fn profile_defaults(&self) -> ProfileDefaults {
        ProfileDefaults {
            location: self.default_location.clone(),
            coordinates: GpsCoordinates::new(self.default_latitude, self.default_longitude),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("KRISHI_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.secret", "change-me-in-production")?
            .set_default("jwt.access_token_expiry", 86400)?
            .set_default("weather.forecast_endpoint", "https://api.open-meteo.com")?
            .set_default(
                "weather.geocoding_endpoint",
                "https://geocoding-api.open-meteo.com",
            )?
            .set_default("weather.timeout_secs", 5)?
            .set_default("inference.enabled", false)?
            .set_default("inference.endpoint", "https://router.huggingface.co")?
            .set_default("inference.model", "meta-llama/Llama-3.1-8B-Instruct")?
            .set_default(
                "inference.translation_endpoint",
                "https://api-inference.huggingface.co/models/Helsinki-NLP/opus-mt-en-ml",
            )?
            .set_default("inference.timeout_secs", 5)?
            .set_default("notifications.enabled", false)?
            .set_default("notifications.fcm_endpoint", "https://fcm.googleapis.com")?
            .set_default("notifications.timeout_secs", 5)?
            .set_default("advisory.default_location", shared::DEFAULT_LOCATION)?
            .set_default("advisory.default_latitude", "10.5276")?
            .set_default("advisory.default_longitude", "76.2144")?
            .set_default("advisory.history_limit", 5)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (KRISHI_ prefix)
            .add_source(
                Environment::with_prefix("KRISHI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Configuration suitable for tests: in-memory storage, no external pushes
    pub fn for_tests() -> Self {
        Self {
            environment: "test".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: None,
                max_connections: 1,
                min_connections: 1,
            },
            jwt: JwtConfig {
                secret: "test-secret".to_string(),
                access_token_expiry: 3600,
            },
            weather: WeatherConfig {
                forecast_endpoint: "http://127.0.0.1:9".to_string(),
                geocoding_endpoint: "http://127.0.0.1:9".to_string(),
                timeout_secs: 1,
            },
            inference: InferenceConfig {
                enabled: false,
                endpoint: "http://127.0.0.1:9".to_string(),
                api_token: None,
                model: "test-model".to_string(),
                translation_endpoint: "http://127.0.0.1:9".to_string(),
                timeout_secs: 1,
            },
            notifications: NotificationConfig {
                enabled: false,
                credentials_path: None,
                fcm_endpoint: "http://127.0.0.1:9".to_string(),
                timeout_secs: 1,
            },
            advisory: AdvisoryConfig {
                default_location: shared::DEFAULT_LOCATION.to_string(),
                default_latitude: Decimal::new(105276, 4),
                default_longitude: Decimal::new(762144, 4),
                history_limit: 5,
            },
        }
    }
}

impl ServerConfig {
    /// Address to bind, from `host` and `port`
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.host.trim().parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults_from_config() {
        let config = Config::for_tests();
        let defaults = config.advisory.profile_defaults();
        assert_eq!(defaults.location, "Thrissur");
        assert_eq!(defaults.coordinates, GpsCoordinates::thrissur());
    }

    #[test]
    fn test_server_binds_configured_host() {
        let server = ServerConfig {
            port: 8080,
            host: "127.0.0.1".to_string(),
        };
        assert_eq!(server.socket_addr().unwrap(), "127.0.0.1:8080".parse().unwrap());

        let default_addr = ServerConfig::default().socket_addr().unwrap();
        assert!(default_addr.ip().is_unspecified());
        assert_eq!(default_addr.port(), 8000);
    }

    #[test]
    fn test_server_rejects_bad_host() {
        let server = ServerConfig {
            port: 8000,
            host: "not-an-ip".to_string(),
        };
        assert!(server.socket_addr().is_err());
    }
}
