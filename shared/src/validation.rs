//! Validation utilities for farmer input
//!
//! Includes India-specific checks such as mobile number format.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::FarmerProfile;
use crate::types::GpsCoordinates;

/// Maximum accepted length of an advisory query, in characters
pub const MAX_QUERY_CHARS: usize = 1000;

/// A rejected profile field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Validate username (3-50 chars, ASCII letters, digits and underscore)
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    let len = username.chars().count();
    if !(3..=50).contains(&len) {
        return Err("Username must be 3-50 characters");
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err("Username may only contain letters, digits and underscore");
    }
    Ok(())
}

/// Validate Indian mobile number (10 digits starting with 6-9, optional +91, 91 or 0 prefix)
pub fn validate_indian_phone(phone: &str) -> Result<(), &'static str> {
    let cleaned: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    let digits = if let Some(rest) = cleaned.strip_prefix("+91") {
        rest
    } else if cleaned.len() == 12 && cleaned.starts_with("91") {
        &cleaned[2..]
    } else if cleaned.len() == 11 && cleaned.starts_with('0') {
        &cleaned[1..]
    } else {
        cleaned.as_str()
    };

    if digits.len() != 10 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err("Phone number must have 10 digits");
    }
    if !digits.starts_with(['6', '7', '8', '9']) {
        return Err("Mobile numbers start with 6, 7, 8 or 9");
    }
    Ok(())
}

pub fn validate_age(age: i32) -> Result<(), &'static str> {
    if !(18..=100).contains(&age) {
        return Err("Age must be between 18 and 100");
    }
    Ok(())
}

pub fn validate_farm_size(acres: Decimal) -> Result<(), &'static str> {
    if acres < Decimal::ZERO {
        return Err("Farm size cannot be negative");
    }
    Ok(())
}

pub fn validate_experience(years: i32) -> Result<(), &'static str> {
    if !(0..=100).contains(&years) {
        return Err("Experience must be between 0 and 100 years");
    }
    Ok(())
}

/// Validate latitude and longitude ranges
pub fn validate_coordinates(coords: &GpsCoordinates) -> Result<(), &'static str> {
    if coords.latitude < Decimal::from(-90) || coords.latitude > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    if coords.longitude < Decimal::from(-180) || coords.longitude > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate an advisory query after trimming
pub fn validate_query(query: &str) -> Result<(), &'static str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err("Query cannot be empty");
    }
    if trimmed.chars().count() > MAX_QUERY_CHARS {
        return Err("Query is too long");
    }
    Ok(())
}

/// Check every supplied field of a profile. Missing optional fields are fine.
pub fn validate_profile(profile: &FarmerProfile) -> Result<(), FieldError> {
    validate_username(&profile.username).map_err(|m| FieldError::new("username", m))?;

    if let Some(phone) = profile.phone.as_deref().filter(|p| !p.trim().is_empty()) {
        validate_indian_phone(phone).map_err(|m| FieldError::new("phone", m))?;
    }
    if let Some(age) = profile.age {
        validate_age(age).map_err(|m| FieldError::new("age", m))?;
    }
    if let Some(acres) = profile.farm_size_acres {
        validate_farm_size(acres).map_err(|m| FieldError::new("farm_size_acres", m))?;
    }
    if let Some(years) = profile.experience_years {
        validate_experience(years).map_err(|m| FieldError::new("experience_years", m))?;
    }
    if let Some(coords) = &profile.coordinates {
        validate_coordinates(coords).map_err(|m| FieldError::new("coordinates", m))?;
    }
    Ok(())
}
