//! HTTP handlers for weather lookups

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::CurrentFarmer;
use crate::services::WeatherReport;
use crate::AppState;

/// Weather at the current farmer's location
pub async fn my_weather(
    State(state): State<AppState>,
    current: CurrentFarmer,
) -> AppResult<Json<WeatherReport>> {
    let report = state.weather.report_for_farmer(&current.0).await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    #[serde(default)]
    pub location: String,
}

/// Weather for a place name
pub async fn lookup(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> AppResult<Json<WeatherReport>> {
    let report = state.weather.lookup(&query.location).await?;
    Ok(Json(report))
}
