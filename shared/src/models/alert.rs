//! Push alert composition

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Severity of a push alert, controlling the title prefix
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    #[default]
    Info,
    Warning,
    Error,
    Success,
}

impl AlertKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            AlertKind::Info => "Info",
            AlertKind::Warning => "Alert",
            AlertKind::Error => "Urgent",
            AlertKind::Success => "Update",
        }
    }
}

/// A rendered push message ready for the dispatcher
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
}

/// Build the title and body of an alert addressed to a farmer
pub fn compose_alert(
    kind: AlertKind,
    name: Option<&str>,
    message: &str,
    at: NaiveDateTime,
) -> PushMessage {
    let name = name.map(str::trim).filter(|n| !n.is_empty()).unwrap_or("Farmer");
    PushMessage {
        title: format!("{}: Krishi Sakhi", kind.prefix()),
        body: format!("Hi {}, {} ({})", name, message, at.format("%d/%m %H:%M")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(7, 5, 0)
            .unwrap()
    }

    #[test]
    fn test_title_prefixes() {
        let title = |kind| compose_alert(kind, None, "x", at()).title;
        assert_eq!(title(AlertKind::Info), "Info: Krishi Sakhi");
        assert_eq!(title(AlertKind::Warning), "Alert: Krishi Sakhi");
        assert_eq!(title(AlertKind::Error), "Urgent: Krishi Sakhi");
        assert_eq!(title(AlertKind::Success), "Update: Krishi Sakhi");
    }

    #[test]
    fn test_body_includes_name_and_timestamp() {
        let msg = compose_alert(AlertKind::Warning, Some("Raman"), "Rain expected", at());
        assert_eq!(msg.body, "Hi Raman, Rain expected (01/06 07:05)");
    }

    #[test]
    fn test_blank_name_defaults() {
        let msg = compose_alert(AlertKind::Info, Some("  "), "hello", at());
        assert!(msg.body.starts_with("Hi Farmer,"));
    }
}
