//! Common types used across the platform

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl GpsCoordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Thrissur district headquarters, used when a farm location cannot be resolved
    pub fn thrissur() -> Self {
        Self {
            latitude: Decimal::new(105276, 4),
            longitude: Decimal::new(762144, 4),
        }
    }
}

/// Supported languages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(alias = "ml")]
    Malayalam,
    #[serde(alias = "en")]
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Malayalam => "ml",
            Language::English => "en",
        }
    }

    /// Parse a language code, accepting both short codes and names
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "ml" | "malayalam" | "മലയാളം" => Some(Language::Malayalam),
            "en" | "english" => Some(Language::English),
            _ => None,
        }
    }
}

/// A message rendered in both Malayalam and English
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalizedText {
    pub message_ml: String,
    pub message_en: String,
}

impl LocalizedText {
    pub fn new(message_ml: impl Into<String>, message_en: impl Into<String>) -> Self {
        Self {
            message_ml: message_ml.into(),
            message_en: message_en.into(),
        }
    }

    /// Text in a single language
    pub fn in_language(&self, language: Language) -> &str {
        match language {
            Language::Malayalam => &self.message_ml,
            Language::English => &self.message_en,
        }
    }

    /// Malayalam text followed by the English text in parentheses
    pub fn bilingual(&self) -> String {
        format!("{} ({})", self.message_ml, self.message_en)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::Malayalam.code(), "ml");
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::from_code("EN"), Some(Language::English));
        assert_eq!(Language::from_code("മലയാളം"), Some(Language::Malayalam));
        assert_eq!(Language::from_code("hi"), None);
    }

    #[test]
    fn test_bilingual_rendering() {
        let text = LocalizedText::new("നമസ്കാരം", "Hello");
        assert_eq!(text.bilingual(), "നമസ്കാരം (Hello)");
        assert_eq!(text.in_language(Language::English), "Hello");
    }

    #[test]
    fn test_thrissur_coordinates() {
        let c = GpsCoordinates::thrissur();
        assert_eq!(c.latitude.to_string(), "10.5276");
        assert_eq!(c.longitude.to_string(), "76.2144");
    }
}
