//! HTTP handlers for farmer profiles and sessions

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use shared::{Farmer, FarmerProfile};

use crate::error::AppResult;
use crate::middleware::CurrentFarmer;
use crate::services::SessionResponse;
use crate::AppState;

/// Register a new farmer profile
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<FarmerProfile>,
) -> AppResult<(StatusCode, Json<SessionResponse>)> {
    let response = state.farmers.register(input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
}

/// Resume an existing profile by username
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<SessionResponse>> {
    let response = state.farmers.login(&input.username).await?;
    Ok(Json(response))
}

/// Get the current farmer's profile
pub async fn get_me(current: CurrentFarmer) -> Json<Farmer> {
    Json(current.0)
}

#[derive(Debug, Deserialize)]
pub struct DeliveryTokenInput {
    /// `null` or empty clears the registration
    pub token: Option<String>,
}

/// Register the device token used for push alerts
pub async fn update_delivery_token(
    State(state): State<AppState>,
    current: CurrentFarmer,
    Json(input): Json<DeliveryTokenInput>,
) -> AppResult<Json<Farmer>> {
    let farmer = state
        .farmers
        .update_delivery_token(current.0.id, input.token.as_deref())
        .await?;
    Ok(Json(farmer))
}
