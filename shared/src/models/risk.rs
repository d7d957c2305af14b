//! Weather-driven disease risk rules
//!
//! Rules look only at the forecast aggregate, never at the classifier output.
//! Each rule yields exactly one finding and rules are evaluated in
//! declaration order.

use serde::{Deserialize, Serialize};

use crate::models::weather::{Forecast, ForecastAggregate};

/// How the precipitation bounds of a threshold rule are applied
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PrecipitationMode {
    /// `avg < high || avg > low || low < avg < high`.
    /// Holds for every value whenever `low < high`, so risk follows the
    /// temperature gate alone. Kept for output compatibility.
    #[default]
    Legacy,
    /// `low < avg < high`
    Exclusive,
}

impl PrecipitationMode {
    pub fn admits(&self, avg_precip: f64, low: f64, high: f64) -> bool {
        let inside = low < avg_precip && avg_precip < high;
        match self {
            PrecipitationMode::Legacy => avg_precip < high || avg_precip > low || inside,
            PrecipitationMode::Exclusive => inside,
        }
    }
}

/// Temperature and precipitation window favouring one disease
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiseaseRiskRule {
    pub disease_name: String,
    pub temp_low: f64,
    pub temp_high: f64,
    pub precip_low: f64,
    pub precip_high: f64,
}

impl DiseaseRiskRule {
    pub fn new(
        disease_name: impl Into<String>,
        (temp_low, temp_high): (f64, f64),
        (precip_low, precip_high): (f64, f64),
    ) -> Self {
        Self {
            disease_name: disease_name.into(),
            temp_low,
            temp_high,
            precip_low,
            precip_high,
        }
    }

    /// Strict open interval on the mean temperature
    pub fn temperature_gate(&self, avg_temp: f64) -> bool {
        self.temp_low < avg_temp && avg_temp < self.temp_high
    }

    pub fn evaluate(&self, aggregate: &ForecastAggregate, mode: PrecipitationMode) -> RiskFinding {
        let name = &self.disease_name;

        if !self.temperature_gate(aggregate.avg_temp) {
            return RiskFinding {
                disease_name: name.clone(),
                risk_present: false,
                gate: RiskGate::Temperature,
                reason: format!("No significant chance of {} based on temperature data.", name),
            };
        }

        if !mode.admits(aggregate.avg_precip, self.precip_low, self.precip_high) {
            return RiskFinding {
                disease_name: name.clone(),
                risk_present: false,
                gate: RiskGate::Precipitation,
                reason: format!(
                    "No significant chance of {} based on precipitation data.",
                    name
                ),
            };
        }

        RiskFinding {
            disease_name: name.clone(),
            risk_present: true,
            gate: RiskGate::Passed,
            reason: format!("Take necessary actions to prevent {}.", name),
        }
    }
}

/// Generic banding of the mean daily maximum temperature
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemperatureBandRule {
    pub subject: String,
    /// Above this mean maximum the crop is stressed and risk is flagged
    pub high_above: f64,
    /// Above this (and not above `high_above`) conditions are optimal
    pub optimal_above: f64,
    pub high_message: String,
    pub optimal_message: String,
    pub low_message: String,
}

impl TemperatureBandRule {
    pub fn evaluate(&self, aggregate: &ForecastAggregate) -> RiskFinding {
        let max_temp = aggregate.avg_temp_max;
        let (risk_present, message) = if max_temp > self.high_above {
            (true, &self.high_message)
        } else if max_temp > self.optimal_above {
            (false, &self.optimal_message)
        } else {
            (false, &self.low_message)
        };

        RiskFinding {
            disease_name: self.subject.clone(),
            risk_present,
            gate: RiskGate::TemperatureBand,
            reason: message.clone(),
        }
    }
}

/// A rule in a crop's risk table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskRule {
    Threshold(DiseaseRiskRule),
    TemperatureBand(TemperatureBandRule),
}

impl RiskRule {
    pub fn name(&self) -> &str {
        match self {
            RiskRule::Threshold(rule) => &rule.disease_name,
            RiskRule::TemperatureBand(rule) => &rule.subject,
        }
    }

    pub fn evaluate(&self, aggregate: &ForecastAggregate, mode: PrecipitationMode) -> RiskFinding {
        match self {
            RiskRule::Threshold(rule) => rule.evaluate(aggregate, mode),
            RiskRule::TemperatureBand(rule) => rule.evaluate(aggregate),
        }
    }
}

/// Which check decided a finding
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskGate {
    /// Both gates passed
    Passed,
    Temperature,
    Precipitation,
    TemperatureBand,
}

/// Outcome of one rule against one forecast aggregate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskFinding {
    pub disease_name: String,
    pub risk_present: bool,
    pub gate: RiskGate,
    pub reason: String,
}

impl std::fmt::Display for RiskFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.gate, self.risk_present) {
            (RiskGate::TemperatureBand, _) => write!(f, "Weather Impact: {}", self.reason),
            (_, true) => write!(
                f,
                "There is a chance of an occurrence of {}\nPrevention: {}",
                self.disease_name, self.reason
            ),
            (_, false) => write!(f, "{}", self.reason),
        }
    }
}

/// Evaluate every rule against one aggregate, preserving table order
pub fn evaluate_rules(
    rules: &[RiskRule],
    aggregate: &ForecastAggregate,
    mode: PrecipitationMode,
) -> Vec<RiskFinding> {
    rules.iter().map(|rule| rule.evaluate(aggregate, mode)).collect()
}

/// Aggregate a forecast and evaluate the rule table; `None` for an empty forecast
pub fn assess_forecast(
    rules: &[RiskRule],
    forecast: &Forecast,
    mode: PrecipitationMode,
) -> Option<Vec<RiskFinding>> {
    forecast
        .aggregate()
        .map(|aggregate| evaluate_rules(rules, &aggregate, mode))
}
