//! Classifier output models and label resolution

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while turning classifier scores into a label
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassificationError {
    #[error(
        "The number of predicted classes ({predicted}) does not match the number of defined class names ({expected})"
    )]
    LabelMismatch { predicted: usize, expected: usize },

    #[error("Classifier returned no scores")]
    EmptyScores,
}

/// Result of classifying one leaf image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResult {
    pub predicted_label: String,
    /// Raw scores in label-set order; relative, not required to sum to 1
    pub confidence_vector: Vec<f32>,
}

impl ClassificationResult {
    /// Score attached to the predicted label
    pub fn confidence(&self) -> f32 {
        argmax(&self.confidence_vector)
            .map(|index| self.confidence_vector[index])
            .unwrap_or(0.0)
    }
}

/// Index of the largest score, first occurrence on ties.
///
/// NaN never wins against a number; a vector of only NaN resolves to index 0.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &score) in scores.iter().enumerate() {
        match best {
            None => best = Some((index, score)),
            Some((_, current)) if current.is_nan() && !score.is_nan() => {
                best = Some((index, score))
            }
            Some((_, current)) if score > current => best = Some((index, score)),
            _ => {}
        }
    }
    best.map(|(index, _)| index)
}

/// Resolve a score vector against an ordered label set.
///
/// The length check happens before any indexing.
pub fn resolve_label<S: AsRef<str>>(
    scores: &[f32],
    label_set: &[S],
) -> Result<ClassificationResult, ClassificationError> {
    if scores.len() != label_set.len() {
        return Err(ClassificationError::LabelMismatch {
            predicted: scores.len(),
            expected: label_set.len(),
        });
    }

    let index = argmax(scores).ok_or(ClassificationError::EmptyScores)?;

    Ok(ClassificationResult {
        predicted_label: label_set[index].as_ref().to_string(),
        confidence_vector: scores.to_vec(),
    })
}
