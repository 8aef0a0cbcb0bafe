use std::path::Path;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;

use crate::ai::{Attachment, DEFAULT_DOCUMENT_QUERY};
use crate::server::api::{AnalysisResponse, AnalyzeQuery, ApiQuery};
use crate::server::error::ApiError;
use crate::server::state::AppState;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Pick a mime type from the file extension, falling back to the declared
/// multipart content type and then to `text/plain`.
#[must_use]
pub fn detect_mime_type(filename: &str, declared: Option<&str>) -> String {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("pdf") => "application/pdf".to_string(),
        Some("docx") => DOCX_MIME.to_string(),
        Some("txt") => "text/plain".to_string(),
        _ => declared
            .filter(|mime| !mime.is_empty())
            .unwrap_or("text/plain")
            .to_string(),
    }
}

/// Map a multipart failure to an API error, keeping the 413 raised when the
/// body limit trips.
fn multipart_error(context: &str, error: &MultipartError) -> ApiError {
    let message = format!("{context}: {}", error.body_text());
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(message)
    } else {
        ApiError::BadRequest(message)
    }
}

/// POST /api/files/analyze?query= - Analyze an uploaded document.
///
/// The upload is read from the multipart `file` field and kept in memory.
pub async fn analyze_file(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AnalyzeQuery>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let ai = state.ai()?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Multipart error", &e))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let declared = field.content_type().map(ToString::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Read error", &e))?;
        upload = Some((filename, declared, data));
        break;
    }

    let (filename, declared, data) = upload
        .ok_or_else(|| ApiError::BadRequest("Missing file in multipart form".to_string()))?;
    if data.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
    }

    let mime_type = detect_mime_type(&filename, declared.as_deref());
    let attachment = Attachment::new(filename.as_str(), mime_type, data.to_vec());
    let query = query
        .query
        .filter(|q| !q.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DOCUMENT_QUERY.to_string());

    let analysis = ai.analyze_document(&attachment, &query).await?;
    tracing::info!(filename = %filename, mime_type = %attachment.mime_type, "File analyzed");

    Ok(Json(AnalysisResponse { analysis, filename }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_mime_by_extension() {
        assert_eq!(detect_mime_type("notes.pdf", None), "application/pdf");
        assert_eq!(detect_mime_type("NOTES.PDF", Some("text/plain")), "application/pdf");
        assert_eq!(detect_mime_type("essay.docx", None), DOCX_MIME);
        assert_eq!(detect_mime_type("list.txt", Some("application/octet-stream")), "text/plain");
    }

    #[test]
    fn test_detect_mime_fallbacks() {
        assert_eq!(detect_mime_type("slide.png", Some("image/png")), "image/png");
        assert_eq!(detect_mime_type("README", None), "text/plain");
        assert_eq!(detect_mime_type("README", Some("")), "text/plain");
    }
}
