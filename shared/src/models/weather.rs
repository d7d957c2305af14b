//! Weather forecast models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::ForecastLocation;

/// One day of the forecast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub temperature_max: f64,
    pub temperature_min: f64,
    /// Daily precipitation sum in mm
    pub precipitation: f64,
}

impl ForecastPoint {
    pub fn mean_temperature(&self) -> f64 {
        (self.temperature_max + self.temperature_min) / 2.0
    }
}

/// Daily forecast ordered by date, typically seven points
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Forecast {
    pub location: ForecastLocation,
    pub points: Vec<ForecastPoint>,
}

/// Means over the whole forecast window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ForecastAggregate {
    /// Mean of the daily (max + min) / 2
    pub avg_temp: f64,
    /// Mean of the daily precipitation sums
    pub avg_precip: f64,
    /// Mean of the daily maxima
    pub avg_temp_max: f64,
}

impl ForecastAggregate {
    pub fn new(avg_temp: f64, avg_precip: f64, avg_temp_max: f64) -> Self {
        Self {
            avg_temp,
            avg_precip,
            avg_temp_max,
        }
    }
}

impl Forecast {
    pub fn new(location: ForecastLocation, points: Vec<ForecastPoint>) -> Self {
        Self { location, points }
    }

    /// Aggregate the window; `None` for an empty forecast
    pub fn aggregate(&self) -> Option<ForecastAggregate> {
        if self.points.is_empty() {
            return None;
        }
        let days = self.points.len() as f64;
        let avg_temp = self.points.iter().map(ForecastPoint::mean_temperature).sum::<f64>() / days;
        let avg_precip = self.points.iter().map(|p| p.precipitation).sum::<f64>() / days;
        let avg_temp_max = self.points.iter().map(|p| p.temperature_max).sum::<f64>() / days;

        Some(ForecastAggregate {
            avg_temp,
            avg_precip,
            avg_temp_max,
        })
    }

    pub fn days(&self) -> usize {
        self.points.len()
    }
}
