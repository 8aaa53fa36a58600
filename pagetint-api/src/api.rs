use axum::{
    extract::{Multipart, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pagetint::{
    AnalysisError, AnalyzerOptions, ClassificationThresholds, DocumentAnalyzer, PdfiumBackend,
    RateCard,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::debug;

/// Query parameters accepted by the analyze endpoint. Missing values fall
/// back to the library defaults.
#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    pub color_threshold: Option<f64>,
    pub photo_threshold: Option<f64>,
    pub scale: Option<f64>,
}

/// Standard error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message describing what went wrong
    pub error: String,
}

/// Application-specific error types for the API
#[derive(Debug)]
pub enum AppError {
    /// Analysis failures from the pagetint library
    Analysis(AnalysisError),
    /// Problems reading the multipart upload
    Upload(String),
    /// Internal failures (task join, etc.)
    Internal(String),
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        AppError::Analysis(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Upload(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Analysis(ref err) => (analysis_status(err), err.to_string()),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Map analysis failures onto HTTP status codes: caller mistakes are 400,
/// documents we cannot process are 422.
fn analysis_status(error: &AnalysisError) -> StatusCode {
    match error {
        AnalysisError::EmptyInput
        | AnalysisError::InvalidThreshold { .. }
        | AnalysisError::ThresholdOrdering { .. }
        | AnalysisError::InvalidDownsample(_) => StatusCode::BAD_REQUEST,
        AnalysisError::OpenDocument(_)
        | AnalysisError::PageRender { .. }
        | AnalysisError::EmptyRaster { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AnalysisError::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        AnalysisError::ResultCountMismatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the application router with all routes configured
pub fn app() -> Router {
    Router::new()
        .route("/api/analyze", post(analyze_document))
        .route("/api/health", get(health_check))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint for monitoring and load balancing
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "pagetint API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Analyze an uploaded PDF and return its color classification summary
/// together with a price quote.
pub async fn analyze_document(
    Query(params): Query<AnalyzeParams>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut file_bytes = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Upload(format!("failed to read multipart field: {e}")))?
    {
        if field.name() == Some("file") {
            file_bytes = Some(field.bytes().await.map_err(|e| {
                AppError::Upload(format!("failed to read file data: {e}"))
            })?);
            break;
        }
    }

    let bytes = file_bytes.ok_or_else(|| AppError::Upload("no file provided in upload".into()))?;
    debug!(size = bytes.len(), "received document for analysis");

    let defaults = ClassificationThresholds::default();
    let thresholds = ClassificationThresholds::new(
        params.color_threshold.unwrap_or(defaults.color),
        params.photo_threshold.unwrap_or(defaults.photo),
    );
    let mut options = AnalyzerOptions::default();
    if let Some(scale) = params.scale {
        options = options.with_downsample(scale);
    }

    // Rendering is CPU-bound; keep it off the async executor.
    let summary = tokio::task::spawn_blocking(move || {
        let analyzer = DocumentAnalyzer::with_options(PdfiumBackend::new(), options);
        analyzer.analyze(&bytes, thresholds)
    })
    .await
    .map_err(|e| AppError::Internal(format!("analysis task failed: {e}")))??;

    let quote = RateCard::default().quote(&summary);

    Ok(Json(serde_json::json!({ "summary": summary, "quote": quote })).into_response())
}
