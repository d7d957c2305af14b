//! Combined diagnosis report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::advisory::{Advisory, NO_ADVISORY_NOTICE};
use crate::models::classification::ClassificationResult;
use crate::models::crop::CropKind;
use crate::models::risk::{assess_forecast, PrecipitationMode, RiskFinding, RiskRule};
use crate::models::weather::Forecast;

/// Weather branch of a report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WeatherRisk {
    /// One finding per configured rule, in table order
    Assessed { findings: Vec<RiskFinding> },
    /// The forecast could not be obtained; the classification still stands
    Unavailable { reason: String },
}

impl WeatherRisk {
    pub fn unavailable(reason: impl std::fmt::Display) -> Self {
        WeatherRisk::Unavailable {
            reason: reason.to_string(),
        }
    }

    /// Evaluate a crop's rule table against a fetched forecast
    pub fn assess(rules: &[RiskRule], forecast: &Forecast, mode: PrecipitationMode) -> Self {
        match assess_forecast(rules, forecast, mode) {
            Some(findings) => WeatherRisk::Assessed { findings },
            None => WeatherRisk::unavailable("forecast contained no days"),
        }
    }

    pub fn findings(&self) -> &[RiskFinding] {
        match self {
            WeatherRisk::Assessed { findings } => findings,
            WeatherRisk::Unavailable { .. } => &[],
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, WeatherRisk::Assessed { .. })
    }
}

/// Diagnosis for one uploaded image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub id: Uuid,
    pub crop: CropKind,
    pub classification: ClassificationResult,
    pub advisory: Advisory,
    pub weather_risk: WeatherRisk,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    /// Join the classification branch with the weather branch
    pub fn assemble(
        crop: CropKind,
        classification: ClassificationResult,
        advisory: Advisory,
        weather_risk: WeatherRisk,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            crop,
            classification,
            advisory,
            weather_risk,
            generated_at: Utc::now(),
        }
    }

    pub fn predicted_label(&self) -> &str {
        &self.classification.predicted_label
    }

    pub fn risk_findings(&self) -> &[RiskFinding] {
        self.weather_risk.findings()
    }

    /// Plain-text rendering, one fact per line
    pub fn render_text(&self) -> String {
        let mut lines = vec![format!("Prediction: {}", self.classification.predicted_label)];

        match &self.advisory {
            Advisory::Available(entry) => {
                lines.push(format!("Preventive Measures: {}", entry.preventive_measures));
                lines.push(format!("Medications: {}", entry.medications));
            }
            Advisory::NotAvailable { label } => {
                lines.push(format!("{} Predicted label: {}", NO_ADVISORY_NOTICE, label));
            }
        }

        match &self.weather_risk {
            WeatherRisk::Assessed { findings } => {
                lines.extend(findings.iter().map(ToString::to_string));
            }
            WeatherRisk::Unavailable { reason } => {
                lines.push(format!("Risk assessment unavailable: {}", reason));
            }
        }

        lines.join("\n")
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render_text())
    }
}
