//! Crop registry: profiles paired with their loaded models

use std::collections::HashMap;
use std::sync::Arc;

use shared::{validate_profile, CropKind, CropProfile};

use crate::config::ModelsConfig;
use crate::error::{AppError, AppResult};
use crate::services::classifier::{OnnxScorer, Scorer};

/// One crop's profile and model, immutable after startup
#[derive(Clone)]
pub struct CropPipeline {
    pub profile: Arc<CropProfile>,
    pub scorer: Arc<dyn Scorer>,
}

impl CropPipeline {
    pub fn new(profile: CropProfile, scorer: Arc<dyn Scorer>) -> AppResult<Self> {
        validate_profile(&profile).map_err(|e| {
            AppError::Configuration(format!("Invalid profile for {}: {}", profile.kind, e))
        })?;

        let missing = profile.labels_without_advisory();
        if !missing.is_empty() {
            tracing::warn!(
                crop = %profile.kind,
                labels = ?missing,
                "Label set and advisory catalog are out of sync"
            );
        }

        Ok(Self {
            profile: Arc::new(profile),
            scorer,
        })
    }
}

/// Lookup from crop identifier to its pipeline
#[derive(Clone, Default)]
pub struct CropRegistry {
    pipelines: HashMap<CropKind, CropPipeline>,
}

impl CropRegistry {
    /// Load every profile's model; any failure is fatal
    pub fn load(profiles: Vec<CropProfile>, models: &ModelsConfig) -> AppResult<Self> {
        let mut registry = Self::default();
        for profile in profiles {
            let model_path = models.model_path(&profile.model_file);
            let scorer = OnnxScorer::load(&model_path)?;
            tracing::info!(crop = %profile.kind, "Crop pipeline ready");
            registry.insert(CropPipeline::new(profile, Arc::new(scorer))?);
        }
        Ok(registry)
    }

    pub fn insert(&mut self, pipeline: CropPipeline) {
        self.pipelines.insert(pipeline.profile.kind, pipeline);
    }

    pub fn get(&self, kind: CropKind) -> Option<&CropPipeline> {
        self.pipelines.get(&kind)
    }

    /// Resolve a user-supplied crop identifier
    pub fn resolve(&self, crop: &str) -> AppResult<&CropPipeline> {
        let kind: CropKind = crop.parse().map_err(AppError::UnsupportedCrop)?;
        self.get(kind)
            .ok_or_else(|| AppError::UnsupportedCrop(kind.to_string()))
    }

    /// Loaded crops in a stable order
    pub fn crops(&self) -> Vec<CropKind> {
        CropKind::ALL
            .into_iter()
            .filter(|kind| self.pipelines.contains_key(kind))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}
