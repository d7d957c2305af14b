//! Validation utilities for the Crop Disease Advisor
//!
//! Checks run once when profiles are loaded; a profile that fails them is
//! never served.

use std::collections::HashSet;

use crate::models::{CropProfile, DiseaseRiskRule, RiskRule, TemperatureBandRule};
use crate::types::GpsCoordinates;

// ============================================================================
// Location Validations
// ============================================================================

/// Validate latitude and longitude ranges
pub fn validate_coordinates(coordinates: &GpsCoordinates) -> Result<(), &'static str> {
    if !coordinates.latitude.is_finite() || !coordinates.longitude.is_finite() {
        return Err("Coordinates must be finite numbers");
    }
    if !(-90.0..=90.0).contains(&coordinates.latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    if !(-180.0..=180.0).contains(&coordinates.longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate an IANA-style timezone name (basic check)
pub fn validate_timezone(timezone: &str) -> Result<(), &'static str> {
    if timezone.is_empty() {
        return Err("Timezone must not be empty");
    }
    if timezone
        .chars()
        .any(|c| c.is_whitespace() || c == '&' || c == '?' || c == '#')
    {
        return Err("Timezone contains invalid characters");
    }
    Ok(())
}

// ============================================================================
// Risk Rule Validations
// ============================================================================

/// Validate the bounds of a threshold rule
pub fn validate_risk_rule(rule: &DiseaseRiskRule) -> Result<(), &'static str> {
    if rule.disease_name.trim().is_empty() {
        return Err("Risk rule must name a disease");
    }
    if !(rule.temp_low < rule.temp_high) {
        return Err("Risk rule temperature bounds must satisfy low < high");
    }
    if !(rule.precip_low < rule.precip_high) {
        return Err("Risk rule precipitation bounds must satisfy low < high");
    }
    if rule.precip_low < 0.0 {
        return Err("Risk rule precipitation bounds cannot be negative");
    }
    Ok(())
}

/// Validate the thresholds of a temperature band rule
pub fn validate_temperature_band(rule: &TemperatureBandRule) -> Result<(), &'static str> {
    if !(rule.optimal_above < rule.high_above) {
        return Err("Temperature band must satisfy optimal < high");
    }
    Ok(())
}

// ============================================================================
// Profile Validations
// ============================================================================

/// Validate a crop profile before its model is loaded
pub fn validate_profile(profile: &CropProfile) -> Result<(), &'static str> {
    if profile.label_set.is_empty() {
        return Err("Label set must not be empty");
    }

    let mut seen = HashSet::new();
    if !profile.label_set.iter().all(|label| seen.insert(label.as_str())) {
        return Err("Label set contains duplicate labels");
    }

    if profile.model_file.trim().is_empty() {
        return Err("Model file must be set");
    }

    validate_coordinates(&profile.location.coordinates)?;
    validate_timezone(&profile.location.timezone)?;

    for rule in &profile.risk_rules {
        match rule {
            RiskRule::Threshold(rule) => validate_risk_rule(rule)?,
            RiskRule::TemperatureBand(rule) => validate_temperature_band(rule)?,
        }
    }

    Ok(())
}
