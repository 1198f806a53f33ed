//! Firebase Cloud Messaging HTTP v1 client
//!
//! Authenticates with a service account: an RS256-signed JWT assertion is
//! exchanged for an OAuth access token, which is cached until shortly before
//! it expires.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::PushMessage;
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};

const MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh the access token this long before it expires
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// Delivers push messages to a device token
#[async_trait]
pub trait PushDispatcher: Send + Sync {
    /// Returns the provider's message id
    async fn send(&self, message: &PushMessage, delivery_token: &str) -> AppResult<String>;
}

/// Fields of a Google service account key file used for messaging
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ServiceAccount {
    pub fn from_file(path: &str) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!("cannot read service account {}: {}", path, e))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| AppError::Configuration(format!("invalid service account: {}", e)))
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    name: String,
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

pub struct FcmClient {
    client: Client,
    account: ServiceAccount,
    key: EncodingKey,
    endpoint: String,
    token: Mutex<Option<CachedToken>>,
}

impl FcmClient {
    pub fn new(account: ServiceAccount, endpoint: String, timeout: Duration) -> AppResult<Self> {
        let key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())
            .map_err(|e| AppError::Configuration(format!("invalid service account key: {}", e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            account,
            key,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        })
    }

    fn assertion(&self, now: DateTime<Utc>) -> AppResult<String> {
        let claims = AssertionClaims {
            iss: &self.account.client_email,
            scope: MESSAGING_SCOPE,
            aud: &self.account.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| AppError::PushError(format!("cannot sign assertion: {}", e)))
    }

    async fn access_token(&self) -> AppResult<String> {
        let mut cached = self.token.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref() {
            if token.expires_at > now {
                return Ok(token.value.clone());
            }
        }

        let assertion = self.assertion(now)?;
        let response = self
            .client
            .post(&self.account.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::PushError(format!("token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::PushError(format!(
                "token exchange error: {} - {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::PushError(format!("invalid token response: {}", e)))?;

        let lifetime = (token.expires_in - TOKEN_EXPIRY_MARGIN_SECS).max(0);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: now + chrono::Duration::seconds(lifetime),
        });

        Ok(token.access_token)
    }
}

#[async_trait]
impl PushDispatcher for FcmClient {
    async fn send(&self, message: &PushMessage, delivery_token: &str) -> AppResult<String> {
        let access_token = self.access_token().await?;
        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.endpoint, self.account.project_id
        );

        let body = json!({
            "message": {
                "token": delivery_token,
                "notification": {
                    "title": message.title,
                    "body": message.body,
                }
            }
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::PushError(format!("send failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::PushError(format!("FCM error: {} - {}", status, body)));
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| AppError::PushError(format!("invalid FCM response: {}", e)))?;

        tracing::info!(message_id = %sent.name, "Push notification sent");
        Ok(sent.name)
    }
}
