//! HTTP surface for the study material generator.
//!
//! A single endpoint lives at `/`:
//!
//! - `OPTIONS /` answers CORS preflight with `204 No Content`.
//! - `POST /` accepts either `application/json` (`{"text": "...", "materialType": "..."}`) or
//!   `multipart/form-data` (`file` holding a PDF, optional `materialType`). It returns
//!   `{"success": true, "materials": [...], "materialType": "..."}`.
//!
//! Content shorter than 50 characters (after trimming) is rejected with `400`. Unreadable
//! uploads produce `500`. Model failures never surface here; the service substitutes a
//! placeholder entry and the request still succeeds. Every response carries
//! `Access-Control-Allow-Origin: *`.

use crate::materials::{
    ExtractedContent, ExtractionError, MaterialType, StudyApi, extract::extract_content,
};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Request, State},
    http::{
        HeaderValue, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
        },
    },
    middleware,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Minimum trimmed content length, in characters, accepted for generation.
pub const MIN_CONTENT_CHARS: usize = 50;

const CONTENT_TOO_SHORT: &str = "Content too short. Please provide more study material.";
const GENERATION_FAILED: &str = "Failed to generate materials. Please try again.";

/// Build the HTTP router exposing the generation endpoint.
pub fn create_router<S>(service: Arc<S>, max_upload_bytes: usize) -> Router
where
    S: StudyApi + 'static,
{
    Router::new()
        .route("/", post(generate_materials::<S>).options(preflight))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(middleware::map_response(allow_any_origin))
        .with_state(service)
}

async fn allow_any_origin(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (ACCESS_CONTROL_ALLOW_METHODS, "POST"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            (ACCESS_CONTROL_MAX_AGE, "3600"),
        ],
    )
}

/// Success response for `POST /`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    success: bool,
    materials: Vec<Value>,
    material_type: MaterialType,
}

/// Extract study content, gate it on length, and generate materials.
async fn generate_materials<S>(
    State(service): State<Arc<S>>,
    request: Request,
) -> Result<Json<GenerateResponse>, AppError>
where
    S: StudyApi,
{
    let ExtractedContent {
        content,
        material_type,
    } = extract_content(request).await?;

    let trimmed_chars = content.trim().chars().count();
    if trimmed_chars < MIN_CONTENT_CHARS {
        tracing::info!(
            chars = trimmed_chars,
            min = MIN_CONTENT_CHARS,
            "Rejecting request with too little content"
        );
        return Err(AppError::ContentTooShort);
    }

    let result = service.generate_materials(&content, material_type).await;
    tracing::info!(
        material_type = material_type.as_str(),
        content_chars = trimmed_chars,
        materials = result.materials().len(),
        fallback = result.is_fallback(),
        "Generate request completed"
    );

    Ok(Json(GenerateResponse {
        success: true,
        materials: result.into_materials(),
        material_type,
    }))
}

enum AppError {
    ContentTooShort,
    Extraction(ExtractionError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::ContentTooShort => (StatusCode::BAD_REQUEST, CONTENT_TOO_SHORT),
            Self::Extraction(error) => {
                tracing::error!(%error, "Content extraction failed");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ExtractionError> for AppError {
    fn from(inner: ExtractionError) -> Self {
        Self::Extraction(inner)
    }
}
