//! Push alerts to farmers' devices

use std::sync::Arc;

use chrono::{FixedOffset, NaiveDateTime, Utc};
use serde::Serialize;
use shared::{
    compose_alert, AlertKind, AdvisoryEngine, Farmer, PushMessage, WeatherBanner,
};

use crate::error::AppResult;
use crate::external::PushDispatcher;
use crate::services::weather::WeatherService;

/// India Standard Time, UTC+05:30
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

pub const REASON_NO_TOKEN: &str = "no delivery token";
pub const REASON_DISABLED: &str = "notifications disabled";
pub const REASON_NOT_NEEDED: &str = "no weather alert needed";

/// Result of a delivery attempt. Failures are reported, never raised.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeliveryOutcome {
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<PushMessage>,
}

impl DeliveryOutcome {
    fn failed(reason: impl Into<String>, message: Option<PushMessage>) -> Self {
        Self {
            delivered: false,
            reason: Some(reason.into()),
            message_id: None,
            message,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeatherAlertOutcome {
    pub banner: Option<WeatherBanner>,
    #[serde(flatten)]
    pub delivery: DeliveryOutcome,
}

#[derive(Clone)]
pub struct NotificationService {
    dispatcher: Option<Arc<dyn PushDispatcher>>,
    weather: WeatherService,
    engine: AdvisoryEngine,
}

/// Current wall-clock time in India
fn local_now() -> NaiveDateTime {
    let now = Utc::now();
    FixedOffset::east_opt(IST_OFFSET_SECS)
        .map(|tz| now.with_timezone(&tz).naive_local())
        .unwrap_or_else(|| now.naive_utc())
}

impl NotificationService {
    pub fn new(
        dispatcher: Option<Arc<dyn PushDispatcher>>,
        weather: WeatherService,
        engine: AdvisoryEngine,
    ) -> Self {
        Self {
            dispatcher,
            weather,
            engine,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.dispatcher.is_some()
    }

    /// Compose and push an alert to the farmer's registered device
    pub async fn send_alert(&self, farmer: &Farmer, kind: AlertKind, message: &str) -> DeliveryOutcome {
        let push = compose_alert(kind, farmer.profile.name.as_deref(), message, local_now());

        let Some(token) = farmer
            .profile
            .delivery_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
        else {
            tracing::warn!(farmer_id = %farmer.id, "No delivery token registered");
            return DeliveryOutcome::failed(REASON_NO_TOKEN, Some(push));
        };

        let Some(dispatcher) = &self.dispatcher else {
            tracing::warn!(farmer_id = %farmer.id, "Push notifications are disabled");
            return DeliveryOutcome::failed(REASON_DISABLED, Some(push));
        };

        match dispatcher.send(&push, token).await {
            Ok(message_id) => DeliveryOutcome {
                delivered: true,
                reason: None,
                message_id: Some(message_id),
                message: Some(push),
            },
            Err(e) => {
                tracing::warn!(farmer_id = %farmer.id, error = %e, "Push delivery failed");
                DeliveryOutcome::failed(e.to_string(), Some(push))
            }
        }
    }

    /// Push the current weather banner, if one applies
    pub async fn send_weather_alert(&self, farmer: &Farmer) -> AppResult<WeatherAlertOutcome> {
        let view = self.engine.view(Some(&farmer.profile));
        let snapshot = self.weather.current(view.coordinates()).await?;
        let banner = self.engine.banner(Some(&farmer.profile), &snapshot);

        let delivery = match &banner {
            Some(b) => {
                self.send_alert(farmer, AlertKind::Warning, &b.text.bilingual())
                    .await
            }
            None => DeliveryOutcome::failed(REASON_NOT_NEEDED, None),
        };

        Ok(WeatherAlertOutcome { banner, delivery })
    }
}
