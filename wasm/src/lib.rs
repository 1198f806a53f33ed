//! WebAssembly module for Krishi Sakhi
//!
//! Provides offline, in-browser computation for:
//! - Rule-based farming advice
//! - Weather banners
//! - Query category matching
//! - Profile validation before upload
//!
//! Structured inputs and outputs cross the boundary as JSON strings.

use chrono::NaiveDate;
use serde::Serialize;
use shared::{
    compose_alert, match_category, validate_profile, AdvisoryEngine, AlertKind, FarmerProfile,
    WeatherSnapshot,
};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("Krishi Sakhi offline advisor ready"));
}

fn to_js_error(message: String) -> JsValue {
    web_sys::console::error_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

fn parse_profile(profile_json: Option<String>) -> Result<Option<FarmerProfile>, String> {
    match profile_json.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(json) => serde_json::from_str(json)
            .map(Some)
            .map_err(|e| format!("Invalid profile JSON: {}", e)),
        None => Ok(None),
    }
}

fn parse_weather(weather_json: Option<String>) -> Result<Option<WeatherSnapshot>, String> {
    match weather_json.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(json) => serde_json::from_str(json)
            .map(Some)
            .map_err(|e| format!("Invalid weather JSON: {}", e)),
        None => Ok(None),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization failed: {}", e))
}

fn advise_json(
    query: &str,
    profile_json: Option<String>,
    weather_json: Option<String>,
) -> Result<String, String> {
    let profile = parse_profile(profile_json)?;
    let weather = parse_weather(weather_json)?;
    let reply = AdvisoryEngine::default().reply(query, profile.as_ref(), weather.as_ref());
    to_json(&reply)
}

fn respond_text(
    query: &str,
    profile_json: Option<String>,
    weather_json: Option<String>,
) -> Result<String, String> {
    let profile = parse_profile(profile_json)?;
    let weather = parse_weather(weather_json)?;
    Ok(AdvisoryEngine::default().respond(query, profile.as_ref(), weather.as_ref()))
}

fn banner_json(weather_json: &str, profile_json: Option<String>) -> Result<String, String> {
    let weather: WeatherSnapshot = serde_json::from_str(weather_json)
        .map_err(|e| format!("Invalid weather JSON: {}", e))?;
    let profile = parse_profile(profile_json)?;
    to_json(&AdvisoryEngine::default().banner(profile.as_ref(), &weather))
}

fn check_profile(profile_json: &str) -> Result<(), String> {
    let profile: FarmerProfile = serde_json::from_str(profile_json)
        .map_err(|e| format!("Invalid profile JSON: {}", e))?;
    validate_profile(&profile).map_err(|e| e.to_string())
}

fn alert_json(
    kind: &str,
    name: Option<String>,
    message: &str,
    date: (i32, u32, u32, u32, u32),
) -> Result<String, String> {
    let kind: AlertKind = serde_json::from_value(serde_json::Value::String(kind.to_string()))
        .map_err(|_| format!("Unknown alert kind: {}", kind))?;
    let (year, month, day, hour, minute) = date;
    let at = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| "Invalid device clock".to_string())?;
    to_json(&compose_alert(kind, name.as_deref(), message, at))
}

/// Structured advice `{category, message_ml, message_en}` as JSON
#[wasm_bindgen]
pub fn advise(
    query: &str,
    profile_json: Option<String>,
    weather_json: Option<String>,
) -> Result<String, JsValue> {
    advise_json(query, profile_json, weather_json).map_err(to_js_error)
}

/// Bilingual advice text, Malayalam followed by English
#[wasm_bindgen]
pub fn respond(
    query: &str,
    profile_json: Option<String>,
    weather_json: Option<String>,
) -> Result<String, JsValue> {
    respond_text(query, profile_json, weather_json).map_err(to_js_error)
}

/// Weather banner as JSON, or `null` when none applies
#[wasm_bindgen]
pub fn weather_banner(weather_json: &str, profile_json: Option<String>) -> Result<String, JsValue> {
    banner_json(weather_json, profile_json).map_err(to_js_error)
}

/// Category a query would be answered under: "rain", "pest", "fertilizer" or undefined
#[wasm_bindgen]
pub fn query_category(query: &str) -> Option<String> {
    match_category(query).map(|c| c.as_str().to_string())
}

/// Validate a profile before registration
#[wasm_bindgen]
pub fn validate_farmer_profile(profile_json: &str) -> Result<(), JsValue> {
    check_profile(profile_json).map_err(to_js_error)
}

/// Compose a push alert stamped with the device's local time
#[wasm_bindgen]
pub fn compose_alert_message(
    kind: &str,
    name: Option<String>,
    message: &str,
) -> Result<String, JsValue> {
    let now = js_sys::Date::new_0();
    let date = (
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
        now.get_hours(),
        now.get_minutes(),
    );
    alert_json(kind, name, message, date).map_err(to_js_error)
}
