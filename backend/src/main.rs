//! Crop Disease Advisor - Backend Server
//!
//! Classifies an uploaded leaf photo per crop, attaches prevention and
//! medication advice, and adds a forecast-based disease risk assessment.

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;

use external::WeatherClient;
use services::{CropRegistry, DiagnosisService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub diagnosis: Arc<DiagnosisService>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env first so RUST_LOG and CDA_* overrides apply
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crop_advisor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::load()?;

    tracing::info!("Starting Crop Disease Advisor");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Precipitation mode: {:?}", config.risk.precipitation_mode);

    // Load every crop model up front; a missing model stops startup
    tracing::info!("Loading crop models from {}", config.models.dir.display());
    let registry = CropRegistry::load(shared::builtin_profiles(), &config.models)?;
    tracing::info!("Loaded {} crop pipelines", registry.crops().len());

    let weather_client = WeatherClient::new(&config.weather)?;
    let diagnosis = DiagnosisService::new(
        Arc::new(registry),
        weather_client,
        config.risk.precipitation_mode,
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        diagnosis: Arc::new(diagnosis),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        // Plain-text upload used by the mobile client
        .route("/upload", post(handlers::upload))
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Crop Disease Advisor API v1.0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ModelsConfig, RiskConfig, ServerConfig};
    use crate::external::weather::tests::{spawn_forecast_server, test_config, SAMPLE_BODY};
    use crate::services::classifier::tests::FixedScorer;
    use crate::services::preprocess::tests::png_bytes;
    use crate::services::CropPipeline;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use shared::{cherry_profile, PrecipitationMode, Report};
    use tower::ServiceExt;

    const BOUNDARY: &str = "leaf-upload-boundary";

    async fn test_app() -> Router {
        let mut registry = CropRegistry::default();
        registry.insert(
            CropPipeline::new(cherry_profile(), Arc::new(FixedScorer(vec![0.2, 0.8]))).unwrap(),
        );
        app_with_registry(registry).await
    }

    async fn app_with_registry(registry: CropRegistry) -> Router {
        let (url, _) = spawn_forecast_server(StatusCode::OK, SAMPLE_BODY).await;
        let weather = test_config(url);
        let weather_client = WeatherClient::new(&weather).unwrap();

        let config = Config {
            environment: "test".to_string(),
            server: ServerConfig::default(),
            models: ModelsConfig {
                dir: "models".into(),
            },
            weather,
            risk: RiskConfig {
                precipitation_mode: PrecipitationMode::Legacy,
            },
        };

        let diagnosis =
            DiagnosisService::new(Arc::new(registry), weather_client, PrecipitationMode::Legacy);

        create_app(AppState {
            config: Arc::new(config),
            diagnosis: Arc::new(diagnosis),
        })
    }

    fn upload_request(uri: &str, crop: &str, image: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"crop\"\r\n\r\n{crop}\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"leaf.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(image);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_upload_returns_plain_text_report() {
        let app = test_app().await;
        let response = app
            .oneshot(upload_request("/upload", "cherry", &png_bytes(16, 16, [30, 150, 40])))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert_eq!(
            text,
            "Prediction: Cherry_Healthy\n\
             Preventive Measures: Maintain good orchard hygiene and inspect regularly for disease symptoms.\n\
             Medications: No action needed.\n\
             There is a chance of an occurrence of Cherry Powdery Mildew\n\
             Prevention: Take necessary actions to prevent Cherry Powdery Mildew."
        );
    }

    #[tokio::test]
    async fn test_upload_invalid_crop() {
        let app = test_app().await;
        let response = app
            .oneshot(upload_request("/upload", "apple", &png_bytes(4, 4, [0, 0, 0])))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Invalid crop selection: apple");
    }

    #[tokio::test]
    async fn test_upload_corrupt_image() {
        let app = test_app().await;
        let response = app
            .oneshot(upload_request("/upload", "cherry", b"GIF89a-truncated"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response).await.starts_with("Failed to load image"));
    }

    #[tokio::test]
    async fn test_json_diagnosis() {
        let app = test_app().await;
        let response = app
            .oneshot(upload_request(
                "/api/v1/diagnoses",
                "cherry",
                &png_bytes(16, 16, [30, 150, 40]),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let report: Report = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(report.predicted_label(), "Cherry_Healthy");
        assert_eq!(report.risk_findings().len(), 1);
    }

    #[tokio::test]
    async fn test_list_crops() {
        let app = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/crops")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let crops: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(crops[0]["crop"], "cherry");
        assert_eq!(crops[0]["monitored_diseases"][0], "Cherry Powdery Mildew");
    }

    #[tokio::test]
    async fn test_health_lists_loaded_crops() {
        let app = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let health: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["crops"][0], "cherry");
    }

    #[tokio::test]
    async fn test_root_health_matches_api_health() {
        let app = test_app().await;
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let health: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["crops"], serde_json::json!(["cherry"]));
    }

    #[tokio::test]
    async fn test_health_degraded_without_crops() {
        let app = app_with_registry(CropRegistry::default()).await;
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let health: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(health["status"], "degraded");
        assert_eq!(health["crops"], serde_json::json!([]));
    }
}
