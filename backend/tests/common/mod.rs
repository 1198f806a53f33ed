//! Shared fixtures for integration tests: in-process fakes for the external
//! collaborators and helpers for driving the router.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header::AUTHORIZATION, header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use krishi_server::{
    create_app,
    error::{AppError, AppResult},
    external::{AdvisoryPrompt, GeocodedPlace, Geocoder, InferenceProvider, PushDispatcher, WeatherProvider},
    services::InMemoryFarmerStore,
    AppState, Clients, Config,
};
use rust_decimal::Decimal;
use serde_json::Value;
use shared::{GpsCoordinates, HourlyForecast, PushMessage};
use tower::ServiceExt;

// ============================================================================
// Fakes
// ============================================================================

/// Weather provider returning a fixed forecast, or failing when `None`
pub struct FixedWeather(pub Option<HourlyForecast>);

#[async_trait]
impl WeatherProvider for FixedWeather {
    async fn fetch(&self, _coordinates: GpsCoordinates) -> AppResult<HourlyForecast> {
        self.0
            .clone()
            .ok_or_else(|| AppError::ExternalService("weather offline".to_string()))
    }
}

/// Geocoder that knows a fixed set of places
#[derive(Default)]
pub struct FixedGeocoder(pub HashMap<String, GpsCoordinates>);

impl FixedGeocoder {
    pub fn kerala() -> Self {
        let mut places = HashMap::new();
        places.insert(
            "Kochi".to_string(),
            GpsCoordinates::new(Decimal::new(99312, 4), Decimal::new(762673, 4)),
        );
        places.insert("Thrissur".to_string(), GpsCoordinates::thrissur());
        Self(places)
    }
}

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn resolve(&self, place: &str) -> AppResult<Option<GeocodedPlace>> {
        Ok(self.0.get(place).map(|coordinates| GeocodedPlace {
            name: place.to_string(),
            coordinates: *coordinates,
            region: Some("Kerala".to_string()),
            country: Some("India".to_string()),
        }))
    }
}

/// Push dispatcher that records what it was asked to send
#[derive(Default)]
pub struct RecordingPush {
    pub sent: Mutex<Vec<(PushMessage, String)>>,
    pub fail: bool,
}

#[async_trait]
impl PushDispatcher for RecordingPush {
    async fn send(&self, message: &PushMessage, delivery_token: &str) -> AppResult<String> {
        if self.fail {
            return Err(AppError::PushError("unregistered token".to_string()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push((message.clone(), delivery_token.to_string()));
        Ok(format!("projects/test/messages/{}", sent.len()))
    }
}

/// Inference provider with canned answers. `None` fails the call.
pub struct ScriptedInference {
    pub answer: Option<String>,
    pub translation: Option<String>,
    pub prompts: Mutex<Vec<AdvisoryPrompt>>,
}

impl ScriptedInference {
    pub fn new(answer: Option<&str>, translation: Option<&str>) -> Self {
        Self {
            answer: answer.map(str::to_string),
            translation: translation.map(str::to_string),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl InferenceProvider for ScriptedInference {
    async fn complete(&self, prompt: &AdvisoryPrompt) -> AppResult<String> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.answer
            .clone()
            .ok_or_else(|| AppError::InferenceError("model overloaded".to_string()))
    }

    async fn translate_to_malayalam(&self, _text: &str) -> AppResult<String> {
        self.translation
            .clone()
            .ok_or_else(|| AppError::InferenceError("translation unavailable".to_string()))
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Single-hour forecast with the given temperature and rain chance
pub fn forecast(temperature_c: f64, precipitation_pct: i32) -> HourlyForecast {
    HourlyForecast {
        time: vec!["2025-06-01T10:00".to_string()],
        temperature_2m: vec![temperature_c],
        precipitation_probability: vec![precipitation_pct],
        relative_humidity_2m: vec![80],
        wind_speed_10m: vec![2.0],
    }
}

pub fn clients(weather: Option<HourlyForecast>) -> Clients {
    Clients {
        weather: Arc::new(FixedWeather(weather)),
        geocoder: Arc::new(FixedGeocoder::kerala()),
        inference: None,
        push: None,
    }
}

pub fn state_with(clients: Clients) -> AppState {
    AppState::new(
        Config::for_tests(),
        Arc::new(InMemoryFarmerStore::new()),
        clients,
    )
}

pub fn app_with(clients: Clients) -> Router {
    create_app(state_with(clients))
}

// ============================================================================
// Request helpers
// ============================================================================

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}

/// Register a farmer and return the session token
pub async fn register(app: &Router, profile: Value) -> String {
    let (status, body) = send(app, Method::POST, "/api/v1/farmers", None, Some(profile)).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["access_token"].as_str().unwrap().to_string()
}
