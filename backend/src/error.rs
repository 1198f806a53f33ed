//! Error handling for the Krishi Sakhi backend
//!
//! Provides consistent error responses in Malayalam and English

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String, message_ml: String },

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_ml: String,
    },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    // External service errors
    #[error("Weather service unavailable")]
    WeatherServiceUnavailable,

    #[error("Geocoding service error: {0}")]
    GeocodingError(String),

    #[error("Inference service error: {0}")]
    InferenceError(String),

    #[error("Push notification error: {0}")]
    PushError(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_ml: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// Validation failure on a single profile field
    pub fn invalid_field(field: &str, message: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
            message_ml: format!("{}: വിവരം ശരിയല്ല", field),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::TokenExpired | AppError::InvalidToken | AppError::Unauthorized { .. } => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::DuplicateEntry(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) | AppError::LocationNotFound(_) => StatusCode::NOT_FOUND,
            AppError::WeatherServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::GeocodingError(_)
            | AppError::InferenceError(_)
            | AppError::PushError(_)
            | AppError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_)
            | AppError::DatabaseError(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> ErrorDetail {
        let (code, message_en, message_ml, field) = match self {
            AppError::TokenExpired => (
                "TOKEN_EXPIRED",
                "Session has expired, please log in again".to_string(),
                "സെഷൻ കാലഹരണപ്പെട്ടു, വീണ്ടും ലോഗിൻ ചെയ്യുക".to_string(),
                None,
            ),
            AppError::InvalidToken => (
                "INVALID_TOKEN",
                "Invalid token".to_string(),
                "ടോക്കൺ അസാധുവാണ്".to_string(),
                None,
            ),
            AppError::Unauthorized { message, message_ml } => {
                ("UNAUTHORIZED", message.clone(), message_ml.clone(), None)
            }
            AppError::Validation {
                field,
                message,
                message_ml,
            } => (
                "VALIDATION_ERROR",
                message.clone(),
                message_ml.clone(),
                Some(field.clone()),
            ),
            AppError::DuplicateEntry(field) => (
                "DUPLICATE_ENTRY",
                format!("A record with this {} already exists", field),
                format!("ഈ {} ഇതിനകം നിലവിലുണ്ട്", field),
                Some(field.clone()),
            ),
            AppError::NotFound(resource) => (
                "NOT_FOUND",
                format!("{} not found", resource),
                format!("{} കണ്ടെത്താനായില്ല", resource),
                None,
            ),
            AppError::LocationNotFound(place) => (
                "LOCATION_NOT_FOUND",
                format!("Location '{}' not found. Try a nearby town name.", place),
                format!("'{}' എന്ന സ്ഥലം കണ്ടെത്താനായില്ല. അടുത്തുള്ള പട്ടണത്തിന്റെ പേര് നൽകുക.", place),
                Some("location".to_string()),
            ),
            AppError::WeatherServiceUnavailable => (
                "WEATHER_SERVICE_UNAVAILABLE",
                "Weather service is temporarily unavailable".to_string(),
                "കാലാവസ്ഥാ സേവനം താൽക്കാലികമായി ലഭ്യമല്ല".to_string(),
                None,
            ),
            AppError::GeocodingError(msg) => (
                "GEOCODING_ERROR",
                format!("Geocoding service error: {}", msg),
                "സ്ഥല സേവനത്തിൽ പിശക്".to_string(),
                None,
            ),
            AppError::InferenceError(msg) => (
                "INFERENCE_ERROR",
                format!("Inference service error: {}", msg),
                "ഉപദേശ സേവനത്തിൽ പിശക്".to_string(),
                None,
            ),
            AppError::PushError(msg) => (
                "PUSH_ERROR",
                format!("Push notification error: {}", msg),
                "അറിയിപ്പ് അയയ്ക്കുന്നതിൽ പിശക്".to_string(),
                None,
            ),
            AppError::ExternalService(msg) => (
                "EXTERNAL_SERVICE_ERROR",
                format!("External service error: {}", msg),
                "പുറത്തുള്ള സേവനത്തിൽ പിശക്".to_string(),
                None,
            ),
            AppError::Configuration(msg) => (
                "CONFIGURATION_ERROR",
                format!("Configuration error: {}", msg),
                "ക്രമീകരണത്തിൽ പിശക്".to_string(),
                None,
            ),
            AppError::DatabaseError(_) => (
                "DATABASE_ERROR",
                "A database error occurred".to_string(),
                "ഡാറ്റാബേസ് പിശക്".to_string(),
                None,
            ),
            AppError::Internal(msg) => (
                "INTERNAL_ERROR",
                msg.clone(),
                "സെർവറിൽ ആന്തരിക പിശക്".to_string(),
                None,
            ),
        };

        ErrorDetail {
            code: code.to_string(),
            message_en,
            message_ml,
            field,
        }
    }
}

impl From<shared::FieldError> for AppError {
    fn from(err: shared::FieldError) -> Self {
        AppError::invalid_field(err.field, err.message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
