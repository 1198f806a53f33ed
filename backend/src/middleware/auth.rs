//! Authentication middleware
//!
//! Validates the session JWT and exposes the farmer to handlers

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use shared::Farmer;
use uuid::Uuid;

use crate::error::AppError;
use crate::AppState;

/// Authenticated farmer identity extracted from the JWT
#[derive(Clone, Debug)]
pub struct AuthFarmer {
    pub farmer_id: Uuid,
    pub username: String,
}

fn missing_credentials() -> AppError {
    AppError::Unauthorized {
        message: "Missing or invalid Authorization header".to_string(),
        message_ml: "ലോഗിൻ ചെയ്യേണ്ടതുണ്ട്".to_string(),
    }
}

/// Authentication middleware that validates session tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(missing_credentials)?;

    let claims = state.sessions.validate(token)?;
    let auth = AuthFarmer {
        farmer_id: claims.farmer_id()?,
        username: claims.username,
    };

    request.extensions_mut().insert(auth);
    Ok(next.run(request).await)
}

/// Extractor for the authenticated farmer's stored record
#[derive(Clone, Debug)]
pub struct CurrentFarmer(pub Farmer);

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentFarmer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth = parts
            .extensions
            .get::<AuthFarmer>()
            .cloned()
            .ok_or_else(missing_credentials)?;

        // A token can outlive its farmer record
        let farmer = state.farmers.get(auth.farmer_id).await.map_err(|e| match e {
            AppError::NotFound(_) => AppError::InvalidToken,
            other => other,
        })?;

        Ok(CurrentFarmer(farmer))
    }
}
