//! Crop identifiers and per-crop profiles

use serde::{Deserialize, Serialize};

use crate::models::advisory::AdvisoryCatalog;
use crate::models::risk::RiskRule;
use crate::types::ForecastLocation;

/// Crops with a trained classifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CropKind {
    Cherry,
    Corn,
    Grape,
}

impl CropKind {
    pub const ALL: [CropKind; 3] = [CropKind::Cherry, CropKind::Corn, CropKind::Grape];

    pub fn as_str(&self) -> &'static str {
        match self {
            CropKind::Cherry => "cherry",
            CropKind::Corn => "corn",
            CropKind::Grape => "grape",
        }
    }
}

impl std::fmt::Display for CropKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CropKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cherry" => Ok(CropKind::Cherry),
            "corn" => Ok(CropKind::Corn),
            "grape" => Ok(CropKind::Grape),
            other => Err(other.to_string()),
        }
    }
}

/// Everything one crop's pipeline needs apart from the loaded model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropProfile {
    pub kind: CropKind,
    /// Class names in the order the model was trained on
    pub label_set: Vec<String>,
    pub advisory: AdvisoryCatalog,
    /// Evaluated in declaration order
    pub risk_rules: Vec<RiskRule>,
    pub location: ForecastLocation,
    /// Model file name, resolved against the configured model directory
    pub model_file: String,
}

impl CropProfile {
    /// Labels the model can emit that have no advisory entry
    pub fn labels_without_advisory(&self) -> Vec<&str> {
        self.label_set
            .iter()
            .map(String::as_str)
            .filter(|label| !self.advisory.contains(label))
            .collect()
    }

    pub fn monitored_diseases(&self) -> Vec<&str> {
        self.risk_rules.iter().map(RiskRule::name).collect()
    }
}
