//! Krishi Sakhi - farmer advisory backend
//!
//! Bilingual (Malayalam / English) farming advice for Kerala farmers, built on
//! a rule-based engine combined with live weather and the farmer's profile.

use std::{sync::Arc, time::Duration};

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;

use crate::error::AppResult;
use crate::external::{
    FcmClient, Geocoder, GeocodingClient, InferenceClient, InferenceProvider, PushDispatcher,
    ServiceAccount, WeatherClient, WeatherProvider,
};
use crate::services::{
    AdvisoryService, FarmerService, FarmerStore, NotificationService, SessionService,
    WeatherService,
};
use shared::AdvisoryEngine;

/// External collaborators the services talk to
#[derive(Clone)]
pub struct Clients {
    pub weather: Arc<dyn WeatherProvider>,
    pub geocoder: Arc<dyn Geocoder>,
    /// `None` when inference is disabled
    pub inference: Option<Arc<dyn InferenceProvider>>,
    /// `None` when push notifications are disabled
    pub push: Option<Arc<dyn PushDispatcher>>,
}

impl Clients {
    /// Build the HTTP clients described by the configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let weather_timeout = Duration::from_secs(config.weather.timeout_secs);

        let weather = WeatherClient::with_base_url(
            config.weather.forecast_endpoint.clone(),
            weather_timeout,
        )?;
        let geocoder =
            GeocodingClient::new(config.weather.geocoding_endpoint.clone(), weather_timeout)?;

        let inference: Option<Arc<dyn InferenceProvider>> = if config.inference.enabled {
            Some(Arc::new(InferenceClient::new(
                config.inference.endpoint.clone(),
                config.inference.translation_endpoint.clone(),
                config.inference.api_token.clone(),
                config.inference.model.clone(),
                Duration::from_secs(config.inference.timeout_secs),
            )?))
        } else {
            None
        };

        let push: Option<Arc<dyn PushDispatcher>> = match (
            config.notifications.enabled,
            config.notifications.credentials_path.as_deref(),
        ) {
            (true, Some(path)) => {
                let account = ServiceAccount::from_file(path)?;
                Some(Arc::new(FcmClient::new(
                    account,
                    config.notifications.fcm_endpoint.clone(),
                    Duration::from_secs(config.notifications.timeout_secs),
                )?))
            }
            (true, None) => {
                tracing::warn!("Notifications enabled without credentials, disabling push");
                None
            }
            (false, _) => None,
        };

        Ok(Self {
            weather: Arc::new(weather),
            geocoder: Arc::new(geocoder),
            inference,
            push,
        })
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn FarmerStore>,
    pub sessions: SessionService,
    pub farmers: FarmerService,
    pub weather: WeatherService,
    pub advisory: AdvisoryService,
    pub notifications: NotificationService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn FarmerStore>, clients: Clients) -> Self {
        let defaults = config.advisory.profile_defaults();
        let engine = AdvisoryEngine::new(defaults.clone());
        let sessions = SessionService::new(&config.jwt);
        let weather = WeatherService::new(clients.weather, clients.geocoder, defaults);

        let farmers = FarmerService::new(store.clone(), weather.clone(), sessions.clone());
        let advisory = AdvisoryService::new(
            store.clone(),
            weather.clone(),
            engine.clone(),
            clients.inference,
            config.advisory.history_limit,
        );
        let notifications = NotificationService::new(clients.push, weather.clone(), engine);

        Self {
            config: Arc::new(config),
            store,
            sessions,
            farmers,
            weather,
            advisory,
            notifications,
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
