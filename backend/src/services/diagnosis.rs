//! Diagnosis service: the generic per-crop pipeline
//!
//! Image → tensor → scores → label → advice, then forecast → risk findings,
//! joined into one report. A weather failure degrades the report; an image or
//! classifier failure aborts it.

use std::sync::Arc;

use shared::{ClassificationResult, PrecipitationMode, Report, WeatherRisk};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::WeatherClient;
use crate::services::classifier::classify;
use crate::services::preprocess::ImagePreprocessor;
use crate::services::registry::{CropPipeline, CropRegistry};

/// Runs diagnoses against the loaded crop registry
#[derive(Clone)]
pub struct DiagnosisService {
    registry: Arc<CropRegistry>,
    weather_client: WeatherClient,
    preprocessor: ImagePreprocessor,
    precipitation_mode: PrecipitationMode,
}

impl DiagnosisService {
    pub fn new(
        registry: Arc<CropRegistry>,
        weather_client: WeatherClient,
        precipitation_mode: PrecipitationMode,
    ) -> Self {
        Self {
            registry,
            weather_client,
            preprocessor: ImagePreprocessor::default(),
            precipitation_mode,
        }
    }

    pub fn registry(&self) -> &CropRegistry {
        &self.registry
    }

    /// Diagnose one uploaded image for the named crop
    pub async fn diagnose(&self, crop: &str, image: Vec<u8>) -> AppResult<Report> {
        let request_id = Uuid::new_v4();
        let pipeline = self.registry.resolve(crop)?.clone();
        let kind = pipeline.profile.kind;

        tracing::info!(%request_id, crop = %kind, bytes = image.len(), "Diagnosing leaf image");

        let classification = self.classify_image(&pipeline, image).await?;
        let advisory = pipeline.profile.advisory.lookup(&classification.predicted_label);
        if !advisory.is_available() {
            tracing::warn!(
                %request_id,
                label = %classification.predicted_label,
                "No advisory entry for predicted label"
            );
        }

        let weather_risk = self.assess_weather(&pipeline).await;

        tracing::info!(
            %request_id,
            label = %classification.predicted_label,
            weather_available = weather_risk.is_available(),
            "Diagnosis complete"
        );

        Ok(Report::assemble(kind, classification, advisory, weather_risk))
    }

    /// Decode and score on the blocking pool; inference is CPU bound
    async fn classify_image(
        &self,
        pipeline: &CropPipeline,
        image: Vec<u8>,
    ) -> AppResult<ClassificationResult> {
        let preprocessor = self.preprocessor;
        let scorer = pipeline.scorer.clone();
        let profile = pipeline.profile.clone();

        tokio::task::spawn_blocking(move || {
            let tensor = preprocessor.preprocess_bytes(&image)?;
            classify(scorer.as_ref(), &profile.label_set, tensor.view())
        })
        .await
        .map_err(|e| AppError::Internal(format!("Classification task failed: {}", e)))?
    }

    async fn assess_weather(&self, pipeline: &CropPipeline) -> WeatherRisk {
        let profile = &pipeline.profile;
        match self.weather_client.fetch_forecast(&profile.location).await {
            Ok(forecast) => {
                WeatherRisk::assess(&profile.risk_rules, &forecast, self.precipitation_mode)
            }
            Err(e) => {
                tracing::warn!(crop = %profile.kind, "Risk assessment unavailable: {}", e);
                WeatherRisk::unavailable(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::weather::tests::{spawn_forecast_server, test_config, SAMPLE_BODY};
    use crate::services::classifier::tests::FixedScorer;
    use crate::services::preprocess::tests::png_bytes;
    use axum::http::StatusCode;
    use shared::{
        cherry_profile, corn_profile, grape_profile, Advisory, ClassificationError, CropKind,
        CropProfile, RiskGate,
    };

    async fn service_with(
        pipelines: Vec<(CropProfile, Vec<f32>)>,
        status: StatusCode,
        body: &'static str,
    ) -> DiagnosisService {
        let mut registry = CropRegistry::default();
        for (profile, scores) in pipelines {
            registry.insert(CropPipeline::new(profile, Arc::new(FixedScorer(scores))).unwrap());
        }
        let (url, _) = spawn_forecast_server(status, body).await;
        let weather_client = WeatherClient::new(&test_config(url)).unwrap();
        DiagnosisService::new(Arc::new(registry), weather_client, PrecipitationMode::Legacy)
    }

    fn leaf() -> Vec<u8> {
        png_bytes(32, 24, [40, 160, 60])
    }

    #[tokio::test]
    async fn test_corn_report_has_three_findings_in_order() {
        // Sample forecast: avg temp 23.0, avg precipitation 0.3
        let service = service_with(
            vec![(corn_profile(), vec![0.05, 0.8, 0.1, 0.05])],
            StatusCode::OK,
            SAMPLE_BODY,
        )
        .await;

        let report = service.diagnose("corn", leaf()).await.unwrap();
        assert_eq!(report.crop, CropKind::Corn);
        assert_eq!(report.predicted_label(), "Corn_Common_rust");
        assert!(report.advisory.is_available());

        let names: Vec<&str> = report
            .risk_findings()
            .iter()
            .map(|f| f.disease_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Cercospora leaf spot Gray leaf spot",
                "Common rust",
                "Northern Leaf Blight"
            ]
        );
        let present: Vec<bool> = report.risk_findings().iter().map(|f| f.risk_present).collect();
        assert_eq!(present, vec![true, true, true]);
    }

    #[tokio::test]
    async fn test_weather_failure_degrades_report() {
        let service = service_with(
            vec![(cherry_profile(), vec![0.7, 0.3])],
            StatusCode::INTERNAL_SERVER_ERROR,
            "boom",
        )
        .await;

        let report = service.diagnose("cherry", leaf()).await.unwrap();
        assert_eq!(report.predicted_label(), "Cherry_Powdery_Mildew");
        assert!(report.advisory.is_available());
        assert!(matches!(report.weather_risk, WeatherRisk::Unavailable { .. }));
        assert!(report.risk_findings().is_empty());

        let text = report.render_text();
        assert!(text.starts_with("Prediction: Cherry_Powdery_Mildew\nPreventive Measures: "));
        assert!(text
            .lines()
            .last()
            .unwrap()
            .starts_with("Risk assessment unavailable: "));
    }

    #[tokio::test]
    async fn test_unknown_label_degrades_advisory() {
        let mut profile = cherry_profile();
        profile.label_set.push("Cherry_Leaf_Spot".to_string());

        let service = service_with(
            vec![(profile, vec![0.1, 0.2, 0.7])],
            StatusCode::OK,
            SAMPLE_BODY,
        )
        .await;

        let report = service.diagnose("cherry", leaf()).await.unwrap();
        assert_eq!(report.predicted_label(), "Cherry_Leaf_Spot");
        assert_eq!(
            report.advisory,
            Advisory::NotAvailable {
                label: "Cherry_Leaf_Spot".to_string()
            }
        );
        assert_eq!(report.risk_findings().len(), 1);
        assert!(report
            .render_text()
            .contains("No information available for this disease. Predicted label: Cherry_Leaf_Spot"));
    }

    #[tokio::test]
    async fn test_label_mismatch_aborts() {
        let service = service_with(
            vec![(grape_profile(), vec![0.5, 0.5])],
            StatusCode::OK,
            SAMPLE_BODY,
        )
        .await;

        let err = service.diagnose("grape", leaf()).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Classification(ClassificationError::LabelMismatch {
                predicted: 2,
                expected: 4
            })
        ));
    }

    #[tokio::test]
    async fn test_grape_weather_impact() {
        // Sample forecast: mean daily maximum 28.0
        let service = service_with(
            vec![(grape_profile(), vec![0.9, 0.05, 0.03, 0.02])],
            StatusCode::OK,
            SAMPLE_BODY,
        )
        .await;

        let report = service.diagnose("grape", leaf()).await.unwrap();
        assert_eq!(report.predicted_label(), "Grape_Black_rot");
        let findings = report.risk_findings();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].gate, RiskGate::TemperatureBand);
        assert!(!findings[0].risk_present);
        assert!(report
            .render_text()
            .ends_with("Weather Impact: Optimal temperature range for the grapevines."));
    }

    #[tokio::test]
    async fn test_invalid_image_aborts() {
        let service = service_with(
            vec![(cherry_profile(), vec![0.5, 0.5])],
            StatusCode::OK,
            SAMPLE_BODY,
        )
        .await;

        let err = service.diagnose("cherry", b"not an image".to_vec()).await.unwrap_err();
        assert!(matches!(err, AppError::ImageDecode(_)));
    }

    #[tokio::test]
    async fn test_unsupported_crop() {
        let service = service_with(vec![], StatusCode::OK, SAMPLE_BODY).await;
        let err = service.diagnose("apple", leaf()).await.unwrap_err();
        assert!(matches!(err, AppError::UnsupportedCrop(_)));
    }
}
