//! Multipart upload parsing shared by the processing endpoints.

use axum::body::Bytes;
use axum::extract::Multipart;

use crate::error::{ApiError, ApiResult};

/// Parsed multipart form: the uploaded file plus optional form fields.
pub struct UploadForm {
    /// Original client filename (used only for its extension)
    pub filename: String,
    /// Uploaded file contents
    pub bytes: Bytes,
    /// Silence threshold percentage, when the endpoint takes one
    pub threshold: Option<f64>,
    /// Optional task id for progress tracking
    pub task_id: Option<String>,
}

/// Read the `file`, `threshold` and `task_id` fields from a multipart
/// body. Unknown fields are skipped.
pub async fn read_upload(multipart: &mut Multipart) -> ApiResult<UploadForm> {
    let mut filename = None;
    let mut bytes = None;
    let mut threshold = None;
    let mut task_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("file") => {
                filename = field.file_name().map(|s| s.to_string());
                bytes = Some(field.bytes().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read uploaded file: {}", e))
                })?);
            }
            Some("threshold") => {
                let text = field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read threshold: {}", e))
                })?;
                threshold = Some(text.trim().parse::<f64>().map_err(|_| {
                    ApiError::bad_request(format!("Invalid threshold: {}", text))
                })?);
            }
            Some("task_id") => {
                task_id = field.text().await.ok().map(|s| s.trim().to_string());
            }
            _ => {}
        }
    }

    let bytes = bytes.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    let filename = filename
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::bad_request("No filename provided"))?;

    Ok(UploadForm {
        filename,
        bytes,
        threshold,
        task_id: task_id.filter(|id| !id.is_empty()),
    })
}

/// Require a threshold field, defaulting is deliberately not offered:
/// the frontend always sends one.
pub fn require_threshold(form: &UploadForm) -> ApiResult<f64> {
    form.threshold
        .ok_or_else(|| ApiError::bad_request("No threshold provided"))
}
