//! Classifier adapter
//!
//! The pretrained model is an opaque scoring capability. `OnnxScorer` backs it
//! with ONNX Runtime; tests substitute fixed scorers.

use std::path::Path;

use ndarray::ArrayView4;
use ort::session::{builder::GraphOptimizationLevel, Session, SessionOutputs};
use shared::{resolve_label, ClassificationResult};

use crate::error::{AppError, AppResult};

/// Scores a preprocessed image against a crop's label set
pub trait Scorer: Send + Sync {
    /// One score per trained class, in training order
    fn predict(&self, input: ArrayView4<'_, f32>) -> AppResult<Vec<f32>>;
}

/// ONNX Runtime model loaded once at startup and shared read-only
pub struct OnnxScorer {
    session: Session,
    input_name: String,
    output_name: String,
}

impl OnnxScorer {
    pub fn load(model_path: &Path) -> AppResult<Self> {
        if !model_path.exists() {
            return Err(AppError::ModelLoad(format!(
                "Model file not found: {}",
                model_path.display()
            )));
        }

        tracing::info!("Loading model from {}", model_path.display());

        let session = Session::builder()
            .and_then(|builder| builder.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|builder| builder.with_intra_threads(num_cpus::get()))
            .and_then(|builder| builder.commit_from_file(model_path))
            .map_err(|e| AppError::ModelLoad(format!("{}: {}", model_path.display(), e)))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| AppError::ModelLoad("Model declares no inputs".to_string()))?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| AppError::ModelLoad("Model declares no outputs".to_string()))?;

        tracing::info!(
            input = %input_name,
            output = %output_name,
            "Model session created"
        );

        Ok(Self {
            session,
            input_name,
            output_name,
        })
    }
}

impl Scorer for OnnxScorer {
    fn predict(&self, input: ArrayView4<'_, f32>) -> AppResult<Vec<f32>> {
        let inputs = ort::inputs![self.input_name.as_str() => input.into_dyn()]
            .map_err(|e| AppError::Inference(format!("Failed to build model input: {}", e)))?;

        let outputs: SessionOutputs = self
            .session
            .run(inputs)
            .map_err(|e| AppError::Inference(e.to_string()))?;

        let output_value = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            AppError::Inference(format!("Model output '{}' missing", self.output_name))
        })?;

        // Shape is (1, classes)
        let scores = output_value
            .try_extract_tensor::<f32>()
            .map_err(|e| AppError::Inference(format!("Unexpected model output: {}", e)))?;

        Ok(scores.iter().copied().collect())
    }
}

/// Score an image and resolve the winning label
pub fn classify(
    scorer: &dyn Scorer,
    label_set: &[String],
    input: ArrayView4<'_, f32>,
) -> AppResult<ClassificationResult> {
    let scores = scorer.predict(input)?;
    tracing::debug!(?scores, "Model prediction output");
    Ok(resolve_label(&scores, label_set)?)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ndarray::Array4;
    use shared::ClassificationError;

    /// Returns the same scores for every input
    pub(crate) struct FixedScorer(pub Vec<f32>);

    impl Scorer for FixedScorer {
        fn predict(&self, _input: ArrayView4<'_, f32>) -> AppResult<Vec<f32>> {
            Ok(self.0.clone())
        }
    }

    /// Scores by mean green intensity: class 0 for green leaves, class 1 otherwise
    struct GreenScorer;

    impl Scorer for GreenScorer {
        fn predict(&self, input: ArrayView4<'_, f32>) -> AppResult<Vec<f32>> {
            let green = input.slice(ndarray::s![0, .., .., 1]).mean().unwrap_or(0.0);
            Ok(vec![green, 1.0 - green])
        }
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_classify_picks_argmax() {
        let scorer = FixedScorer(vec![0.1, 0.6, 0.2, 0.1]);
        let input = Array4::<f32>::zeros((1, 180, 180, 3));
        let result = classify(
            &scorer,
            &labels(&["a", "b", "c", "d"]),
            input.view(),
        )
        .unwrap();
        assert_eq!(result.predicted_label, "b");
        assert_eq!(result.confidence_vector, vec![0.1, 0.6, 0.2, 0.1]);
    }

    #[test]
    fn test_classify_reads_tensor() {
        let mut input = Array4::<f32>::zeros((1, 4, 4, 3));
        input.slice_mut(ndarray::s![0, .., .., 1]).fill(1.0);
        let result =
            classify(&GreenScorer, &labels(&["healthy", "diseased"]), input.view()).unwrap();
        assert_eq!(result.predicted_label, "healthy");
    }

    #[test]
    fn test_classify_label_mismatch() {
        let scorer = FixedScorer(vec![0.5, 0.5, 0.0]);
        let input = Array4::<f32>::zeros((1, 180, 180, 3));
        let err = classify(&scorer, &labels(&["a", "b"]), input.view()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Classification(ClassificationError::LabelMismatch {
                predicted: 3,
                expected: 2
            })
        ));
    }

    #[test]
    fn test_load_missing_model_is_fatal() {
        let result = OnnxScorer::load(Path::new("/nonexistent/models/cherry.onnx"));
        assert!(matches!(result, Err(AppError::ModelLoad(_))));
    }
}
