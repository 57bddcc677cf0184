use std::path::Path;

use axum::body::Bytes;
use chrono::Utc;
use tokio::fs;

use crate::error::{AppError, AppResult};

/// Public URL prefix under which the upload directory is served.
pub const UPLOADS_ROUTE: &str = "/uploads";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Keep only the final path component and characters safe in a URL path.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Write a file as `<unix-millis>_<name>` and return its public path.
pub async fn store_upload(dir: &Path, file: &UploadedFile) -> AppResult<String> {
    if file.is_empty() {
        return Err(AppError::BadRequest("uploaded file is empty".into()));
    }

    fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("cannot create upload dir: {e}")))?;

    let file_name = format!(
        "{}_{}",
        Utc::now().timestamp_millis(),
        sanitize_file_name(&file.file_name)
    );
    fs::write(dir.join(&file_name), &file.bytes)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("cannot write upload: {e}")))?;

    tracing::debug!(file = %file_name, size = file.bytes.len(), "stored upload");
    Ok(format!("{UPLOADS_ROUTE}/{file_name}"))
}
