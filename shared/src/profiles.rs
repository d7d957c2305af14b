//! Built-in crop profiles
//!
//! Label order must match the order the classifiers were trained with.

use crate::models::{
    AdvisoryCatalog, AdvisoryEntry, CropKind, CropProfile, DiseaseRiskRule, RiskRule,
    TemperatureBandRule,
};
use crate::types::ForecastLocation;

/// New Delhi, used for the cherry and corn forecasts
pub fn new_delhi() -> ForecastLocation {
    ForecastLocation::new(28.6139, 77.2090, "Asia/Kolkata")
}

/// Vineyard location used for the grape forecast
pub fn vineyard_location() -> ForecastLocation {
    ForecastLocation::new(37.7749, -122.4194, "Asia/Tokyo")
}

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

pub fn cherry_profile() -> CropProfile {
    CropProfile {
        kind: CropKind::Cherry,
        label_set: labels(&["Cherry_Powdery_Mildew", "Cherry_Healthy"]),
        advisory: AdvisoryCatalog::from_entries([
            (
                "Cherry_Powdery_Mildew",
                AdvisoryEntry::new(
                    "Ensure proper pruning and apply sulfur-based fungicides to prevent Powdery Mildew.",
                    "Apply fungicides like myclobutanil or potassium bicarbonate to treat infections.",
                ),
            ),
            (
                "Cherry_Healthy",
                AdvisoryEntry::new(
                    "Maintain good orchard hygiene and inspect regularly for disease symptoms.",
                    "No action needed.",
                ),
            ),
        ]),
        risk_rules: vec![RiskRule::Threshold(DiseaseRiskRule::new(
            "Cherry Powdery Mildew",
            (15.0, 25.0),
            (0.1, 0.4),
        ))],
        location: new_delhi(),
        model_file: "crop_disease_model_cherry.onnx".to_string(),
    }
}

pub fn corn_profile() -> CropProfile {
    CropProfile {
        kind: CropKind::Corn,
        label_set: labels(&[
            "Corn_Cercospora_Gray_leaf_spot",
            "Corn_Common_rust",
            "Corn_Northern_Leaf_Blight",
            "Corn_Healthy",
        ]),
        advisory: AdvisoryCatalog::from_entries([
            (
                "Corn_Cercospora_Gray_leaf_spot",
                AdvisoryEntry::new(
                    "Rotate crops and apply fungicides like strobilurins or triazoles to reduce Gray Leaf Spot.",
                    "Apply fungicides at the early onset of symptoms.",
                ),
            ),
            (
                "Corn_Common_rust",
                AdvisoryEntry::new(
                    "Plant resistant hybrids and practice crop rotation to prevent Common Rust.",
                    "Use fungicides like azoxystrobin or propiconazole.",
                ),
            ),
            (
                "Corn_Northern_Leaf_Blight",
                AdvisoryEntry::new(
                    "Use resistant hybrids, rotate crops, and manage plant debris to prevent Northern Leaf Blight.",
                    "Apply fungicides like pyraclostrobin or mancozeb.",
                ),
            ),
            (
                "Corn_Healthy",
                AdvisoryEntry::new(
                    "Maintain healthy crop management practices such as crop rotation, irrigation, and weed control.",
                    "No action needed.",
                ),
            ),
        ]),
        risk_rules: vec![
            RiskRule::Threshold(DiseaseRiskRule::new(
                "Cercospora leaf spot Gray leaf spot",
                (20.0, 30.0),
                (0.2, 0.6),
            )),
            RiskRule::Threshold(DiseaseRiskRule::new("Common rust", (18.0, 28.0), (0.3, 0.8))),
            RiskRule::Threshold(DiseaseRiskRule::new(
                "Northern Leaf Blight",
                (22.0, 32.0),
                (0.4, 0.9),
            )),
        ],
        location: new_delhi(),
        model_file: "crop_disease_model_corn1.onnx".to_string(),
    }
}

pub fn grape_profile() -> CropProfile {
    CropProfile {
        kind: CropKind::Grape,
        label_set: labels(&[
            "Grape_Black_rot",
            "Grape_Esca_(Black_Measles)",
            "Grape_Healthy",
            "Grape_Leaf_blight_(Isariopsis_Leaf_Spot)",
        ]),
        advisory: AdvisoryCatalog::from_entries([
            (
                "Grape_Black_rot",
                AdvisoryEntry::new(
                    "Prune infected parts, avoid overhead watering, and practice good field sanitation.",
                    "Use fungicides like mancozeb or myclobutanil.",
                ),
            ),
            (
                "Grape_Esca_(Black_Measles)",
                AdvisoryEntry::new(
                    "Avoid planting in infected soils and practice good vineyard hygiene.",
                    "No known cure, manage symptoms through proper pruning and canopy management.",
                ),
            ),
            (
                "Grape_Leaf_blight_(Isariopsis_Leaf_Spot)",
                AdvisoryEntry::new(
                    "Remove and destroy infected leaves. Avoid overhead irrigation.",
                    "Fungicide sprays such as copper-based compounds can help control the spread.",
                ),
            ),
            (
                "Grape_Healthy",
                AdvisoryEntry::new(
                    "Maintain good vineyard management practices, proper irrigation, and pest control.",
                    "No action needed.",
                ),
            ),
        ]),
        risk_rules: vec![RiskRule::TemperatureBand(TemperatureBandRule {
            subject: "Grapevine temperature stress".to_string(),
            high_above: 30.0,
            optimal_above: 20.0,
            high_message: "High temperatures may stress the vines and increase disease risk."
                .to_string(),
            optimal_message: "Optimal temperature range for the grapevines.".to_string(),
            low_message: "Low temperatures may slow down vine growth.".to_string(),
        })],
        location: vineyard_location(),
        model_file: "crop_disease_model_grape.onnx".to_string(),
    }
}

/// Every crop with a shipped classifier, in `CropKind::ALL` order
pub fn builtin_profiles() -> Vec<CropProfile> {
    CropKind::ALL.iter().map(|kind| builtin_profile(*kind)).collect()
}

pub fn builtin_profile(kind: CropKind) -> CropProfile {
    match kind {
        CropKind::Cherry => cherry_profile(),
        CropKind::Corn => corn_profile(),
        CropKind::Grape => grape_profile(),
    }
}
