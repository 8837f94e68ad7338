//! Handlers for drive-sync archival.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use sitedesk_core::archive::SyncManifest;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for `POST /archive/sync`.
#[derive(Debug, Serialize)]
pub struct SyncQueued {
    /// `false` when the background queue was full and the manifest was
    /// dropped; archival is fire-and-forget either way.
    pub queued: bool,
}

/// POST /api/v1/archive/sync
///
/// Queue a manifest of already-uploaded files for archival. Returns 202
/// immediately; delivery happens in the background worker.
pub async fn queue_sync(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(manifest): Json<SyncManifest>,
) -> AppResult<impl IntoResponse> {
    manifest.validate()?;

    tracing::info!(
        user = %auth.username,
        project_code = %manifest.project_code,
        files = manifest.file_names.len(),
        "Sync manifest queued"
    );

    let queued = state.sync_queue.enqueue(manifest);
    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: SyncQueued { queued },
        }),
    ))
}
