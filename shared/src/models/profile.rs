//! Farmer profile models and read-time defaulting

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{GpsCoordinates, Language};

pub const DEFAULT_NAME_EN: &str = "farmer";
pub const DEFAULT_NAME_ML: &str = "കർഷകൻ";
pub const DEFAULT_CROP_EN: &str = "general";
pub const DEFAULT_CROP_ML: &str = "വിള";
pub const DEFAULT_SOIL: &str = "loamy";
pub const DEFAULT_LOCATION: &str = "Thrissur";
pub const DEFAULT_AGE: i32 = 40;

/// Farmer attributes as submitted on the profile form.
///
/// Only `username` is required. Everything else may be left empty and is
/// defaulted when read through [`ProfileView`], never when written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FarmerProfile {
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Push delivery token for the farmer's device
    #[serde(default)]
    pub delivery_token: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Location name in Malayalam script
    #[serde(default)]
    pub location_ml: Option<String>,
    #[serde(default)]
    pub coordinates: Option<GpsCoordinates>,
    #[serde(default)]
    pub crop: Option<String>,
    #[serde(default)]
    pub soil: Option<String>,
    #[serde(default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub irrigation_type: Option<String>,
    #[serde(default)]
    pub farm_size_acres: Option<Decimal>,
    #[serde(default)]
    pub experience_years: Option<i32>,
    #[serde(default)]
    pub pest_history: Option<String>,
    #[serde(default)]
    pub yield_goals: Option<String>,
}

impl FarmerProfile {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }
}

/// A stored farmer record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Farmer {
    pub id: Uuid,
    #[serde(flatten)]
    pub profile: FarmerProfile,
    pub created_at: DateTime<Utc>,
}

/// Domain defaults applied when a profile field is missing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileDefaults {
    pub location: String,
    pub coordinates: GpsCoordinates,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION.to_string(),
            coordinates: GpsCoordinates::thrissur(),
        }
    }
}

/// Read-only view over a possibly partial profile that applies defaults per field
#[derive(Debug, Clone, Copy)]
pub struct ProfileView<'a> {
    profile: Option<&'a FarmerProfile>,
    defaults: &'a ProfileDefaults,
}

/// Treats blank form values the same as missing ones
fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl<'a> ProfileView<'a> {
    pub fn new(profile: Option<&'a FarmerProfile>, defaults: &'a ProfileDefaults) -> Self {
        Self { profile, defaults }
    }

    fn field(&self, pick: impl Fn(&'a FarmerProfile) -> &'a Option<String>) -> Option<&'a str> {
        self.profile.and_then(|p| present(pick(p)))
    }

    pub fn name(&self, language: Language) -> &'a str {
        self.field(|p| &p.name).unwrap_or(match language {
            Language::Malayalam => DEFAULT_NAME_ML,
            Language::English => DEFAULT_NAME_EN,
        })
    }

    pub fn crop(&self, language: Language) -> &'a str {
        self.field(|p| &p.crop).unwrap_or(match language {
            Language::Malayalam => DEFAULT_CROP_ML,
            Language::English => DEFAULT_CROP_EN,
        })
    }

    pub fn soil(&self) -> &'a str {
        self.field(|p| &p.soil).unwrap_or(DEFAULT_SOIL)
    }

    pub fn location(&self) -> &'a str {
        self.field(|p| &p.location)
            .unwrap_or(self.defaults.location.as_str())
    }

    /// Malayalam location name, falling back to the plain location
    pub fn location_ml(&self) -> &'a str {
        self.field(|p| &p.location_ml)
            .unwrap_or_else(|| self.location())
    }

    pub fn age(&self) -> i32 {
        self.profile.and_then(|p| p.age).unwrap_or(DEFAULT_AGE)
    }

    pub fn farm_size_acres(&self) -> Decimal {
        self.profile
            .and_then(|p| p.farm_size_acres)
            .unwrap_or_else(|| Decimal::from(2))
    }

    pub fn coordinates(&self) -> GpsCoordinates {
        self.profile
            .and_then(|p| p.coordinates)
            .unwrap_or(self.defaults.coordinates)
    }
}
