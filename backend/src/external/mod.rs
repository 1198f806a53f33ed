//! External API integrations

pub mod fcm;
pub mod geocoding;
pub mod inference;
pub mod weather;

pub use fcm::{FcmClient, PushDispatcher, ServiceAccount};
pub use geocoding::{GeocodedPlace, Geocoder, GeocodingClient};
pub use inference::{AdvisoryPrompt, InferenceClient, InferenceProvider};
pub use weather::{WeatherClient, WeatherProvider};
