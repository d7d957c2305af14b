//! HTTP handlers for the Crop Disease Advisor

pub mod diagnosis;
pub mod health;

pub use diagnosis::{create_diagnosis, list_crops, upload};
pub use health::health_check;
