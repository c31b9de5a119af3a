//! Normalize an incoming request (JSON text or PDF upload) into study content.

use super::types::{ExtractedContent, ExtractionError, MaterialType};
use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use lopdf::Document;
use serde_json::Value;

const FILE_FIELD: &str = "file";
const MATERIAL_TYPE_FIELD: &str = "materialType";
const TEXT_FIELD: &str = "text";

/// Pull study content out of a request.
///
/// Multipart bodies are read as a PDF upload; everything else is treated as JSON. Missing
/// fields and undecodable JSON yield empty content rather than an error so the caller's length
/// check produces the user-facing message.
pub async fn extract_content(request: Request) -> Result<ExtractedContent, ExtractionError> {
    if is_multipart(&request) {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|rejection| ExtractionError::Multipart(rejection.body_text()))?;
        extract_from_multipart(multipart).await
    } else {
        let body = Bytes::from_request(request, &())
            .await
            .map_err(|rejection| ExtractionError::Body(rejection.body_text()))?;
        Ok(extract_from_json(&body))
    }
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("multipart/form-data"))
}

/// Read `text` and `materialType` from a JSON body.
pub fn extract_from_json(body: &[u8]) -> ExtractedContent {
    let Ok(payload) = serde_json::from_slice::<Value>(body) else {
        return ExtractedContent::default();
    };
    let content = payload
        .get(TEXT_FIELD)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let material_type =
        MaterialType::from_field(payload.get(MATERIAL_TYPE_FIELD).and_then(Value::as_str));
    ExtractedContent {
        content,
        material_type,
    }
}

/// Read the uploaded `file` and the `materialType` field from a multipart form.
pub async fn extract_from_multipart(
    mut multipart: Multipart,
) -> Result<ExtractedContent, ExtractionError> {
    let mut file = None;
    let mut material_type = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| ExtractionError::Multipart(error.body_text()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|error| ExtractionError::Multipart(error.body_text()))?;
                file = Some(bytes);
            }
            Some(MATERIAL_TYPE_FIELD) => {
                let value = field
                    .text()
                    .await
                    .map_err(|error| ExtractionError::Multipart(error.body_text()))?;
                material_type = Some(value);
            }
            _ => {}
        }
    }

    let content = match file {
        Some(bytes) => {
            tracing::debug!(bytes = bytes.len(), "Extracting text from uploaded PDF");
            tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
                .await
                .map_err(|error| ExtractionError::Task(error.to_string()))??
        }
        None => String::new(),
    };

    Ok(ExtractedContent {
        content,
        material_type: MaterialType::from_field(material_type.as_deref()),
    })
}

/// Extract text from every page of a PDF, each page followed by a newline.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let document = Document::load_mem(bytes)?;
    let mut text = String::new();
    for page_number in document.get_pages().into_keys() {
        text.push_str(&document.extract_text(&[page_number])?);
        text.push('\n');
    }
    Ok(text)
}
