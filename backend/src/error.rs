//! Error handling for the Crop Disease Advisor
//!
//! Every per-request failure ends up here and is turned into a response;
//! none of them take the server down.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::ClassificationError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Request errors
    #[error("Invalid crop selection: {0}")]
    UnsupportedCrop(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    // Pipeline errors
    #[error("Failed to load image: {0}")]
    ImageDecode(String),

    #[error("{0}")]
    Classification(#[from] ClassificationError),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    // External service errors
    #[error("Failed to fetch weather data: {0}")]
    WeatherFetch(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnsupportedCrop(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ImageDecode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Classification(_) | AppError::Inference(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::WeatherFetch(_) => StatusCode::BAD_GATEWAY,
            AppError::ModelLoad(_) | AppError::Configuration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::UnsupportedCrop(_) => "UNSUPPORTED_CROP",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::ImageDecode(_) => "IMAGE_DECODE_ERROR",
            AppError::Classification(ClassificationError::LabelMismatch { .. }) => "LABEL_MISMATCH",
            AppError::Classification(ClassificationError::EmptyScores) => "EMPTY_SCORES",
            AppError::Inference(_) => "INFERENCE_ERROR",
            AppError::ModelLoad(_) => "MODEL_LOAD_ERROR",
            AppError::WeatherFetch(_) => "WEATHER_FETCH_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to the client
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        }
    }

    /// Plain-text response used by the upload endpoint
    pub fn into_plain_text(self) -> Response {
        tracing::error!("Error: {:?}", self);
        (self.status_code(), self.public_message()).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_detail = ErrorDetail {
            code: self.code().to_string(),
            message: self.public_message(),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
