//! Weather advisory banner shown above the chat

use serde::{Deserialize, Serialize};

use super::rules::Conditions;
use crate::models::{ProfileView, WeatherSnapshot};
use crate::types::{Language, LocalizedText};

/// Precipitation probability above which irrigation should be reduced
pub const RAIN_BANNER_THRESHOLD_PCT: i32 = 50;
/// Temperature above which crops need shade
pub const HEAT_BANNER_THRESHOLD_C: f64 = 35.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BannerKind {
    ReduceIrrigation,
    ProvideShade,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeatherBanner {
    pub kind: BannerKind,
    #[serde(flatten)]
    pub text: LocalizedText,
}

/// At most one banner for the current hour. Rain takes precedence over heat.
pub fn weather_banner(snapshot: &WeatherSnapshot, profile: &ProfileView<'_>) -> Option<WeatherBanner> {
    let crop_ml = profile.crop(Language::Malayalam);
    let crop_en = profile.crop(Language::English);
    let Conditions {
        temperature_c: t,
        precipitation_pct: p,
    } = Conditions::from_snapshot(Some(snapshot));

    if p > RAIN_BANNER_THRESHOLD_PCT {
        Some(WeatherBanner {
            kind: BannerKind::ReduceIrrigation,
            text: LocalizedText::new(
                format!(
                    "മഴ മുന്നറിയിപ്പ്: മഴ സാധ്യത {}%. {} വിളയ്ക്ക് ജലസേചനം കുറയ്ക്കുക.",
                    p, crop_ml
                ),
                format!(
                    "Rain alert: {}% chance of rain. Reduce irrigation for {}.",
                    p, crop_en
                ),
            ),
        })
    } else if t > HEAT_BANNER_THRESHOLD_C {
        Some(WeatherBanner {
            kind: BannerKind::ProvideShade,
            text: LocalizedText::new(
                format!(
                    "ചൂട് മുന്നറിയിപ്പ്: താപനില {:.1}°C. {} വിളയ്ക്ക് തണൽ നൽകുക.",
                    t, crop_ml
                ),
                format!("Heat alert: {:.1}°C. Provide shade for {}.", t, crop_en),
            ),
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FarmerProfile, ProfileDefaults};
    use chrono::Utc;

    fn snapshot(t: f64, p: i32) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature_c: t,
            precipitation_probability_pct: p,
            humidity_pct: 80,
            wind_speed_kmh: 5.0,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_rain_wins_over_heat() {
        let defaults = ProfileDefaults::default();
        let view = ProfileView::new(None, &defaults);
        let banner = weather_banner(&snapshot(36.0, 80), &view).unwrap();
        assert_eq!(banner.kind, BannerKind::ReduceIrrigation);
    }

    #[test]
    fn test_heat_banner() {
        let defaults = ProfileDefaults::default();
        let mut profile = FarmerProfile::new("devi");
        profile.crop = Some("Banana".into());
        let view = ProfileView::new(Some(&profile), &defaults);
        let banner = weather_banner(&snapshot(36.5, 20), &view).unwrap();
        assert_eq!(banner.kind, BannerKind::ProvideShade);
        assert!(banner.text.message_en.contains("Banana"));
    }

    #[test]
    fn test_thresholds_are_strict() {
        let defaults = ProfileDefaults::default();
        let view = ProfileView::new(None, &defaults);
        assert!(weather_banner(&snapshot(35.0, 50), &view).is_none());
    }

    #[test]
    fn test_rain_banner_names_default_crop() {
        let defaults = ProfileDefaults::default();
        let view = ProfileView::new(None, &defaults);
        let banner = weather_banner(&snapshot(25.0, 51), &view).unwrap();
        assert!(banner.text.message_en.contains("general"));
        assert!(banner.text.message_ml.contains("വിള"));
    }

    #[test]
    fn test_rain_banner_clamps_probability() {
        let defaults = ProfileDefaults::default();
        let view = ProfileView::new(None, &defaults);
        let banner = weather_banner(&snapshot(25.0, 150), &view).unwrap();
        assert!(banner.text.message_en.contains("100% chance of rain"));
        assert!(!banner.text.message_en.contains("150"));

        assert!(weather_banner(&snapshot(25.0, -20), &view).is_none());
    }
}
