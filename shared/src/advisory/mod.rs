//! Rule-based advisory engine
//!
//! A free-text query is matched against an ordered keyword table
//! (rain, then pest, then fertilizer). The selected template is filled with
//! the farmer's profile and the current weather, or the fallback constants
//! when no weather is available. The engine is pure and never fails.

mod banner;
mod rules;

pub use banner::*;
pub use rules::*;

use serde::{Deserialize, Serialize};

use crate::models::{ChatLog, FarmerProfile, ProfileDefaults, ProfileView, WeatherSnapshot};
use crate::types::LocalizedText;

/// Structured engine output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdvisoryReply {
    /// `None` when the fallback rule answered
    pub category: Option<AdvisoryCategory>,
    #[serde(flatten)]
    pub text: LocalizedText,
}

impl AdvisoryReply {
    pub fn is_fallback(&self) -> bool {
        self.category.is_none()
    }

    /// Malayalam followed by English in parentheses
    pub fn render(&self) -> String {
        self.text.bilingual()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdvisoryEngine {
    defaults: ProfileDefaults,
}

impl AdvisoryEngine {
    pub fn new(defaults: ProfileDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &ProfileDefaults {
        &self.defaults
    }

    pub fn view<'a>(&'a self, profile: Option<&'a FarmerProfile>) -> ProfileView<'a> {
        ProfileView::new(profile, &self.defaults)
    }

    pub fn reply(
        &self,
        query: &str,
        profile: Option<&FarmerProfile>,
        weather: Option<&WeatherSnapshot>,
    ) -> AdvisoryReply {
        let Some(rule) = find_rule(query) else {
            return AdvisoryReply {
                category: None,
                text: fallback_advice(),
            };
        };

        let ctx = AdvisoryContext {
            profile: self.view(profile),
            conditions: Conditions::from_snapshot(weather),
        };

        AdvisoryReply {
            category: Some(rule.category),
            text: (rule.template)(&ctx),
        }
    }

    /// Rendered bilingual advice for a query
    pub fn respond(
        &self,
        query: &str,
        profile: Option<&FarmerProfile>,
        weather: Option<&WeatherSnapshot>,
    ) -> String {
        self.reply(query, profile, weather).render()
    }

    /// Banner for the first forecast hour, if one applies
    pub fn banner(
        &self,
        profile: Option<&FarmerProfile>,
        weather: &WeatherSnapshot,
    ) -> Option<WeatherBanner> {
        weather_banner(weather, &self.view(profile))
    }

    /// Append a user turn and the assistant's answer to a chat log
    pub fn converse(
        &self,
        log: &mut ChatLog,
        query: &str,
        profile: Option<&FarmerProfile>,
        weather: Option<&WeatherSnapshot>,
    ) -> AdvisoryReply {
        let reply = self.reply(query, profile, weather);
        log.push_user(query);
        log.push_assistant(reply.render());
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatRole;
    use chrono::Utc;

    fn brinjal_profile() -> FarmerProfile {
        let mut profile = FarmerProfile::new("raman123");
        profile.crop = Some("Brinjal".into());
        profile.soil = Some("Sandy Loam".into());
        profile.location = Some("Thrissur".into());
        profile
    }

    fn weather(t: f64, p: i32) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature_c: t,
            precipitation_probability_pct: p,
            humidity_pct: 75,
            wind_speed_kmh: 7.2,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_rain_query_with_weather() {
        let engine = AdvisoryEngine::default();
        let profile = brinjal_profile();
        let response = engine.respond("rain", Some(&profile), Some(&weather(29.0, 70)));

        assert!(response.contains("70"));
        assert!(response.contains("Brinjal"));
        assert!(response.contains("Reduce irrigation"));
        assert!(response.contains("Thrissur"));
    }

    #[test]
    fn test_rain_query_without_weather_irrigates_as_usual() {
        let engine = AdvisoryEngine::default();
        let reply = engine.reply("Rain today?", None, None);
        assert_eq!(reply.category, Some(AdvisoryCategory::Rain));
        assert!(reply.text.message_en.contains("0%"));
        assert!(reply.text.message_en.contains("as usual"));
        assert!(reply.text.message_en.contains("general"));
        assert!(reply.text.message_ml.contains("വിള"));
    }

    #[test]
    fn test_pest_query_without_weather() {
        let engine = AdvisoryEngine::default();
        let profile = brinjal_profile();
        let response = engine.respond("pest", Some(&profile), None);

        assert!(response.contains("neem spray"));
        assert!(response.contains("Sandy Loam"));
        assert!(!response.contains("pest risk"));
    }

    #[test]
    fn test_pest_query_in_heat_adds_risk_clause() {
        let engine = AdvisoryEngine::default();
        let reply = engine.reply("pest", Some(&brinjal_profile()), Some(&weather(32.5, 10)));
        assert!(reply.text.message_en.contains("pest risk"));
        assert!(reply.text.message_en.contains("32.5"));
    }

    #[test]
    fn test_pest_risk_threshold_is_strict() {
        let engine = AdvisoryEngine::default();
        let reply = engine.reply("pest", None, Some(&weather(30.0, 10)));
        assert!(!reply.text.message_en.contains("pest risk"));
    }

    #[test]
    fn test_fertilizer_dose_reduced_by_rain() {
        let engine = AdvisoryEngine::default();
        let profile = brinjal_profile();
        let reply = engine.reply("fertilizer", Some(&profile), Some(&weather(27.0, 50)));
        assert_eq!(reply.category, Some(AdvisoryCategory::Fertilizer));
        assert!(reply.text.message_en.contains("1.0kg/cent"));
        assert!(reply.text.message_en.contains("rain chance 50%"));
        assert!(reply.text.message_en.contains("Sandy Loam"));
    }

    #[test]
    fn test_fertilizer_full_dose_when_dry() {
        let engine = AdvisoryEngine::default();
        let reply = engine.reply("Which വളം?", None, None);
        assert!(reply.text.message_en.contains("2.0kg/cent"));
        assert!(reply.text.message_en.contains("loamy"));
    }

    #[test]
    fn test_fertilizer_postponed_at_certain_rain() {
        let engine = AdvisoryEngine::default();
        let reply = engine.reply("compost", None, Some(&weather(26.0, 100)));
        assert!(reply.text.message_en.contains("Postpone"));
    }

    #[test]
    fn test_fallback_is_fixed() {
        let engine = AdvisoryEngine::default();
        let a = engine.respond("hello", None, None);
        let b = engine.respond("what now", Some(&brinjal_profile()), Some(&weather(40.0, 90)));
        assert_eq!(a, b);
        assert_eq!(a, fallback_advice().bilingual());
        assert!(a.ends_with("(Tell more. E.g., 'rain' or 'pest'.)"));
    }

    #[test]
    fn test_rain_and_pest_resolves_to_rain() {
        let engine = AdvisoryEngine::default();
        let reply = engine.reply("Rain and PEST problems", None, None);
        assert_eq!(reply.category, Some(AdvisoryCategory::Rain));
    }

    #[test]
    fn test_output_is_malayalam_then_english() {
        let engine = AdvisoryEngine::default();
        let reply = engine.reply("rain", None, None);
        assert_eq!(
            reply.render(),
            format!("{} ({})", reply.text.message_ml, reply.text.message_en)
        );
    }

    #[test]
    fn test_configured_default_location() {
        let engine = AdvisoryEngine::new(ProfileDefaults {
            location: "Palakkad".into(),
            ..Default::default()
        });
        let response = engine.respond("rain", None, None);
        assert!(response.contains("Palakkad"));
    }

    #[test]
    fn test_converse_appends_two_turns() {
        let engine = AdvisoryEngine::default();
        let mut log = ChatLog::new();
        engine.converse(&mut log, "rain", None, None);
        engine.converse(&mut log, "hello", None, None);

        assert_eq!(log.len(), 4);
        assert_eq!(log.turns()[0].role, ChatRole::User);
        assert_eq!(log.turns()[1].role, ChatRole::Assistant);
        assert_eq!(log.turns()[3].text, fallback_advice().bilingual());
    }
}
