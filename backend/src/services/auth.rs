//! Session tokens for farmers
//!
//! Farmers resume their profile by username, so a session is just a signed
//! JWT carrying the farmer id.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::Farmer;
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Farmer ID
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn farmer_id(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::InvalidToken)
    }
}

/// Issued session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct SessionService {
    jwt_secret: String,
    access_token_expiry: i64,
}

impl SessionService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            jwt_secret: config.secret.clone(),
            access_token_expiry: config.access_token_expiry,
        }
    }

    /// Sign a session token for a farmer
    pub fn issue(&self, farmer: &Farmer) -> AppResult<SessionToken> {
        let now = Utc::now();
        let claims = Claims {
            sub: farmer.id.to_string(),
            username: farmer.profile.username.clone(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(SessionToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    /// Validate a session token
    pub fn validate(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::FarmerProfile;

    fn service(expiry: i64) -> SessionService {
        SessionService::new(&JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry: expiry,
        })
    }

    fn farmer() -> Farmer {
        Farmer {
            id: Uuid::new_v4(),
            profile: FarmerProfile::new("raman123"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_validate() {
        let sessions = service(3600);
        let farmer = farmer();
        let token = sessions.issue(&farmer).unwrap();
        assert_eq!(token.token_type, "Bearer");

        let claims = sessions.validate(&token.access_token).unwrap();
        assert_eq!(claims.farmer_id().unwrap(), farmer.id);
        assert_eq!(claims.username, "raman123");
    }

    #[test]
    fn test_expired_token() {
        let sessions = service(-3600);
        let token = sessions.issue(&farmer()).unwrap();
        assert!(matches!(
            sessions.validate(&token.access_token),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service(3600).issue(&farmer()).unwrap();
        let other = SessionService::new(&JwtConfig {
            secret: "other".to_string(),
            access_token_expiry: 3600,
        });
        assert!(matches!(
            other.validate(&token.access_token),
            Err(AppError::InvalidToken)
        ));
    }
}
