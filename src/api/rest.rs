//! Axum REST API handlers

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderValue, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::engine::Classifier;
use crate::error::ServiceError;
use crate::service::PredictService;
use crate::storage::RecordStorage;
use crate::utils::math::format_percent;

use super::dto::*;

/// Application state shared across handlers
pub struct AppState<C: Classifier, S: RecordStorage> {
    pub service: Arc<PredictService<C, S>>,
}

/// Create the REST API router
pub fn create_router<C: Classifier, S: RecordStorage>(
    state: Arc<AppState<C, S>>,
    allowed_origins: &[String],
) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    Router::new()
        .route("/", get(root_handler::<C, S>))
        .route("/records/", get(records_handler::<C, S>))
        .route("/predict/", post(predict_handler::<C, S>))
        // Middleware
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024)) // 50MB limit for large images
        .layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe
async fn root_handler<C: Classifier, S: RecordStorage>(
    State(_state): State<Arc<AppState<C, S>>>,
) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "API çalışıyor!".to_string(),
    })
}

/// List all stored prediction records
async fn records_handler<C: Classifier, S: RecordStorage>(
    State(state): State<Arc<AppState<C, S>>>,
) -> Result<Json<RecordsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let records = state.service.records().await.map_err(|e| {
        error!("Failed to list records: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string(), "PERSISTENCE_ERROR")),
        )
    })?;

    Ok(Json(RecordsResponse { records }))
}

/// Classify an uploaded image
async fn predict_handler<C: Classifier, S: RecordStorage>(
    State(state): State<Arc<AppState<C, S>>>,
    mut multipart: Multipart,
) -> Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    // Extract the file field from the multipart form
    let mut filename: Option<String> = None;
    let mut image_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(&e.to_string(), "MULTIPART_ERROR")),
        )
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            filename = Some(field.file_name().unwrap_or("upload").to_string());
            image_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| {
                        (
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponse::new(&e.to_string(), "READ_ERROR")),
                        )
                    })?
                    .to_vec(),
            );
        }
    }

    let image_data = image_data.ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing file field", "MISSING_FILE")),
        )
    })?;
    let filename = filename.unwrap_or_else(|| "upload".to_string());

    let outcome = state
        .service
        .handle_upload(&filename, &image_data)
        .await
        .map_err(|e| {
            error!("Prediction failed for {}: {}", filename, e);
            match e {
                ServiceError::Decode(_) => (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(&e.to_string(), "DECODE_ERROR")),
                ),
                ServiceError::Inference(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(&e.to_string(), "INFERENCE_FAULT")),
                ),
                ServiceError::Persistence(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(&e.to_string(), "PERSISTENCE_ERROR")),
                ),
            }
        })?;

    Ok(Json(PredictResponse {
        filename: outcome.filename,
        prediction: outcome.prediction.label,
        confidence: format_percent(outcome.prediction.confidence),
        stored: outcome.stored,
    }))
}
