//! Handlers for blob uploads (quotes, DPR photos, receipts).
//!
//! Files land on local disk under the configured upload directory; the
//! returned paths are what callers attach to indents and DPRs, and what
//! archive manifests later refer to.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// One stored file from an upload batch.
#[derive(Debug, Serialize)]
pub struct StoredFile {
    /// Filename as sent by the client.
    pub original_name: String,
    /// Server-side path to attach to records.
    pub path: String,
    pub size_bytes: usize,
}

/// POST /api/v1/uploads
///
/// Accepts a multipart form; every `file` field is stored and its server
/// path returned. Stored names are prefixed with a fresh UUID so client
/// filenames can never collide or escape the upload directory.
pub async fn upload_files(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let upload_dir = std::path::PathBuf::from(&state.config.upload_dir);
    tokio::fs::create_dir_all(&upload_dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let mut stored = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue; // ignore unknown fields
        }

        let original_name = field.file_name().unwrap_or("upload.bin").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        // Keep only the final path component of whatever the client sent.
        let base = original_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or("upload.bin");
        let stored_name = format!("{}_{base}", uuid::Uuid::new_v4());
        let file_path = upload_dir.join(&stored_name);

        tokio::fs::write(&file_path, &data)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        stored.push(StoredFile {
            original_name,
            path: file_path.to_string_lossy().to_string(),
            size_bytes: data.len(),
        });
    }

    if stored.is_empty() {
        return Err(AppError::BadRequest(
            "Multipart body carried no 'file' field".into(),
        ));
    }

    tracing::info!(
        user = %auth.username,
        files = stored.len(),
        "Files uploaded"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: stored })))
}
