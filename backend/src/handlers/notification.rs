//! HTTP handlers for push alerts

use axum::{extract::State, Json};
use serde::Deserialize;
use shared::AlertKind;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentFarmer;
use crate::services::{DeliveryOutcome, WeatherAlertOutcome};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SendAlertInput {
    pub message: String,
    #[serde(default)]
    pub kind: AlertKind,
}

/// Push an alert to the current farmer's device
pub async fn send_alert(
    State(state): State<AppState>,
    current: CurrentFarmer,
    Json(input): Json<SendAlertInput>,
) -> AppResult<Json<DeliveryOutcome>> {
    let message = input.message.trim();
    if message.is_empty() {
        return Err(AppError::invalid_field("message", "Message cannot be empty"));
    }

    let outcome = state
        .notifications
        .send_alert(&current.0, input.kind, message)
        .await;
    Ok(Json(outcome))
}

/// Push the current weather banner to the farmer's device
pub async fn send_weather_alert(
    State(state): State<AppState>,
    current: CurrentFarmer,
) -> AppResult<Json<WeatherAlertOutcome>> {
    let outcome = state.notifications.send_weather_alert(&current.0).await?;
    Ok(Json(outcome))
}
