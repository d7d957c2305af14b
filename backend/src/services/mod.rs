//! Business logic services for the Crop Disease Advisor

pub mod classifier;
pub mod diagnosis;
pub mod preprocess;
pub mod registry;

pub use classifier::{OnnxScorer, Scorer};
pub use diagnosis::DiagnosisService;
pub use preprocess::ImagePreprocessor;
pub use registry::{CropPipeline, CropRegistry};
