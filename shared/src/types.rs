//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsCoordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Fixed point a crop's forecast is requested for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastLocation {
    pub coordinates: GpsCoordinates,
    /// IANA timezone name passed to the forecast provider
    pub timezone: String,
}

impl ForecastLocation {
    pub fn new(latitude: f64, longitude: f64, timezone: impl Into<String>) -> Self {
        Self {
            coordinates: GpsCoordinates::new(latitude, longitude),
            timezone: timezone.into(),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates.longitude
    }
}
