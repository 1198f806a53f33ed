//! Notification service tests
//!
//! - Push delivery outcomes (no token, disabled, delivered, rejected)
//! - Weather alerts driven by the banner rules

mod common;

use std::sync::Arc;

use common::{forecast, FixedGeocoder, FixedWeather, RecordingPush};
use krishi_server::error::AppError;
use krishi_server::external::PushDispatcher;
use krishi_server::services::notification::{REASON_DISABLED, REASON_NOT_NEEDED, REASON_NO_TOKEN};
use krishi_server::services::{FarmerStore, InMemoryFarmerStore, NotificationService, WeatherService};
use rust_decimal::Decimal;
use shared::{AdvisoryEngine, AlertKind, Farmer, FarmerProfile, HourlyForecast, ProfileDefaults};
use tokio_test::{assert_err, assert_ok};

fn weather_service(forecast: Option<HourlyForecast>) -> WeatherService {
    WeatherService::new(
        Arc::new(FixedWeather(forecast)),
        Arc::new(FixedGeocoder::kerala()),
        ProfileDefaults::default(),
    )
}

async fn stored_farmer(store: &InMemoryFarmerStore, token: Option<&str>) -> Farmer {
    let mut profile = FarmerProfile::new("raman123");
    profile.name = Some("Raman".to_string());
    profile.crop = Some("Paddy".to_string());
    profile.soil = Some("laterite".to_string());
    profile.location = Some("Kochi".to_string());
    profile.farm_size_acres = Some(Decimal::new(15, 1));
    profile.delivery_token = token.map(str::to_string);
    store.save_profile(&profile).await.unwrap()
}

fn notifier(push: Option<Arc<RecordingPush>>, forecast: Option<HourlyForecast>) -> NotificationService {
    NotificationService::new(
        push.map(|p| p as Arc<dyn PushDispatcher>),
        weather_service(forecast),
        AdvisoryEngine::default(),
    )
}

// ============================================================================
// Alerts
// ============================================================================

#[cfg(test)]
mod alert_tests {
    use super::*;

    #[tokio::test]
    async fn test_alert_without_token_is_not_sent() {
        let store = InMemoryFarmerStore::new();
        let farmer = stored_farmer(&store, None).await;
        let push = Arc::new(RecordingPush::default());
        let service = notifier(Some(push.clone()), None);

        let outcome = service.send_alert(&farmer, AlertKind::Info, "Market prices updated").await;

        assert!(!outcome.delivered);
        assert_eq!(outcome.reason.as_deref(), Some(REASON_NO_TOKEN));
        assert!(push.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_alert_with_push_disabled() {
        let store = InMemoryFarmerStore::new();
        let farmer = stored_farmer(&store, Some("device-1")).await;
        let service = notifier(None, None);

        assert!(!service.is_enabled());
        let outcome = service.send_alert(&farmer, AlertKind::Info, "hello").await;
        assert_eq!(outcome.reason.as_deref(), Some(REASON_DISABLED));
    }

    #[tokio::test]
    async fn test_alert_delivered_with_composed_message() {
        let store = InMemoryFarmerStore::new();
        let farmer = stored_farmer(&store, Some("device-1")).await;
        let push = Arc::new(RecordingPush::default());
        let service = notifier(Some(push.clone()), None);

        let outcome = service
            .send_alert(&farmer, AlertKind::Error, "Pest outbreak nearby")
            .await;

        assert!(outcome.delivered);
        assert_eq!(outcome.message_id.as_deref(), Some("projects/test/messages/1"));

        let sent = push.sent.lock().unwrap();
        let (message, token) = &sent[0];
        assert_eq!(token, "device-1");
        assert_eq!(message.title, "Urgent: Krishi Sakhi");
        assert!(message.body.starts_with("Hi Raman, Pest outbreak nearby ("));
    }

    #[tokio::test]
    async fn test_rejected_delivery_is_reported_not_raised() {
        let store = InMemoryFarmerStore::new();
        let farmer = stored_farmer(&store, Some("stale")).await;
        let push = Arc::new(RecordingPush {
            fail: true,
            ..Default::default()
        });
        let service = notifier(Some(push), None);

        let outcome = service.send_alert(&farmer, AlertKind::Success, "Done").await;

        assert!(!outcome.delivered);
        assert!(outcome.reason.unwrap().contains("unregistered token"));
        assert!(outcome.message.is_some());
    }

    #[tokio::test]
    async fn test_weather_alert_for_heavy_rain() {
        let store = InMemoryFarmerStore::new();
        let farmer = stored_farmer(&store, Some("device-1")).await;
        let push = Arc::new(RecordingPush::default());
        let service = notifier(Some(push.clone()), Some(forecast(27.0, 80)));

        let outcome = assert_ok!(service.send_weather_alert(&farmer).await);

        let banner = outcome.banner.unwrap();
        assert!(banner.text.message_en.contains("80% chance of rain"));
        assert!(outcome.delivery.delivered);
        let sent = push.sent.lock().unwrap();
        assert_eq!(sent[0].0.title, "Alert: Krishi Sakhi");
    }

    #[tokio::test]
    async fn test_weather_alert_not_needed_in_mild_weather() {
        let store = InMemoryFarmerStore::new();
        let farmer = stored_farmer(&store, Some("device-1")).await;
        let push = Arc::new(RecordingPush::default());
        let service = notifier(Some(push.clone()), Some(forecast(29.0, 20)));

        let outcome = assert_ok!(service.send_weather_alert(&farmer).await);

        assert!(outcome.banner.is_none());
        assert_eq!(outcome.delivery.reason.as_deref(), Some(REASON_NOT_NEEDED));
        assert!(push.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_weather_alert_fails_when_weather_unavailable() {
        let store = InMemoryFarmerStore::new();
        let farmer = stored_farmer(&store, Some("device-1")).await;
        let service = notifier(Some(Arc::new(RecordingPush::default())), None);

        let err = assert_err!(service.send_weather_alert(&farmer).await);
        assert!(matches!(err, AppError::WeatherServiceUnavailable));
    }
}
