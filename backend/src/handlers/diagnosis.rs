//! HTTP handlers for leaf diagnosis endpoints

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{CropKind, Report};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Fields of the upload form
#[derive(Debug)]
pub struct UploadForm {
    pub crop: String,
    pub image: Vec<u8>,
}

/// Read the `crop` and `image` parts of a multipart upload
async fn read_upload(mut multipart: Multipart) -> AppResult<UploadForm> {
    let mut crop = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "crop" => {
                let text = field.text().await.map_err(|e| {
                    AppError::ValidationError(format!("Failed to read crop field: {}", e))
                })?;
                crop = Some(text);
            }
            "image" => {
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::ValidationError(format!("Failed to read image field: {}", e))
                })?;
                image = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    Ok(UploadForm {
        crop: crop.ok_or_else(|| AppError::ValidationError("Missing crop field".to_string()))?,
        image: image
            .ok_or_else(|| AppError::ValidationError("Missing image field".to_string()))?,
    })
}

/// Upload an image and receive the plain-text report
pub async fn upload(State(state): State<AppState>, multipart: Multipart) -> Response {
    let result = match read_upload(multipart).await {
        Ok(form) => state.diagnosis.diagnose(&form.crop, form.image).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => (StatusCode::OK, report.render_text()).into_response(),
        Err(e) => e.into_plain_text(),
    }
}

/// Upload an image and receive the structured report
pub async fn create_diagnosis(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<Report>> {
    let form = read_upload(multipart).await?;
    let report = state.diagnosis.diagnose(&form.crop, form.image).await?;
    Ok(Json(report))
}

/// Summary of a loaded crop
#[derive(Debug, Serialize)]
pub struct CropSummary {
    pub crop: CropKind,
    pub labels: Vec<String>,
    pub monitored_diseases: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
}

/// List the crops this server can diagnose
pub async fn list_crops(State(state): State<AppState>) -> Json<Vec<CropSummary>> {
    let registry = state.diagnosis.registry();
    let crops = registry
        .crops()
        .into_iter()
        .filter_map(|kind| registry.get(kind))
        .map(|pipeline| {
            let profile = &pipeline.profile;
            CropSummary {
                crop: profile.kind,
                labels: profile.label_set.clone(),
                monitored_diseases: profile
                    .monitored_diseases()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                latitude: profile.location.latitude(),
                longitude: profile.location.longitude(),
                timezone: profile.location.timezone.clone(),
            }
        })
        .collect();

    Json(crops)
}
