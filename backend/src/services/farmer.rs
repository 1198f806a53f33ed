//! Farmer registration, login and device registration

use std::sync::Arc;

use serde::Serialize;
use shared::{validate_profile, Farmer, FarmerProfile};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::auth::{SessionService, SessionToken};
use crate::services::store::FarmerStore;
use crate::services::weather::WeatherService;

/// Response after registration or login
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub profile: Farmer,
    #[serde(flatten)]
    pub session: SessionToken,
}

#[derive(Clone)]
pub struct FarmerService {
    store: Arc<dyn FarmerStore>,
    weather: WeatherService,
    sessions: SessionService,
}

fn blank_to_none(value: &mut Option<String>) {
    *value = value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);
}

impl FarmerService {
    pub fn new(store: Arc<dyn FarmerStore>, weather: WeatherService, sessions: SessionService) -> Self {
        Self {
            store,
            weather,
            sessions,
        }
    }

    /// Store a new profile and open a session for it
    pub async fn register(&self, mut profile: FarmerProfile) -> AppResult<SessionResponse> {
        profile.username = profile.username.trim().to_string();
        for field in [
            &mut profile.name,
            &mut profile.gender,
            &mut profile.phone,
            &mut profile.delivery_token,
            &mut profile.location,
            &mut profile.location_ml,
            &mut profile.crop,
            &mut profile.soil,
            &mut profile.field_type,
            &mut profile.irrigation_type,
            &mut profile.pest_history,
            &mut profile.yield_goals,
        ] {
            blank_to_none(field);
        }

        validate_profile(&profile)?;

        if profile.coordinates.is_none() {
            let coordinates = self
                .weather
                .resolve_or_default(profile.location.as_deref())
                .await;
            profile.coordinates = Some(coordinates);
        }

        let farmer = self.store.save_profile(&profile).await?;
        tracing::info!(farmer_id = %farmer.id, username = %farmer.profile.username, "Farmer registered");

        let session = self.sessions.issue(&farmer)?;
        Ok(SessionResponse {
            profile: farmer,
            session,
        })
    }

    /// Resume an existing profile by username
    pub async fn login(&self, username: &str) -> AppResult<SessionResponse> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::invalid_field("username", "Username is required"));
        }

        let farmer = self.store.get_profile(username).await?;
        tracing::info!(farmer_id = %farmer.id, "Farmer logged in");

        let session = self.sessions.issue(&farmer)?;
        Ok(SessionResponse {
            profile: farmer,
            session,
        })
    }

    pub async fn get_profile(&self, username: &str) -> AppResult<Farmer> {
        self.store.get_profile(username.trim()).await
    }

    pub async fn get(&self, farmer_id: Uuid) -> AppResult<Farmer> {
        self.store.get_farmer(farmer_id).await
    }

    /// Register or clear the device token used for push alerts
    pub async fn update_delivery_token(
        &self,
        farmer_id: Uuid,
        token: Option<&str>,
    ) -> AppResult<Farmer> {
        let token = token.map(str::trim).filter(|t| !t.is_empty());
        self.store.update_delivery_token(farmer_id, token).await?;
        tracing::info!(%farmer_id, registered = token.is_some(), "Delivery token updated");
        self.store.get_farmer(farmer_id).await
    }
}
