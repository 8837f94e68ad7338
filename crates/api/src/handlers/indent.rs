//! Handlers for the material indent workflow.
//!
//! Creation is gated to the Site Engineer; every status change goes through
//! the single transition endpoint, where the store enforces role gates,
//! payload validation, and compare-and-swap against the caller's
//! `expected_status`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use sitedesk_core::indent::{CreateIndent, IndentStatus};
use sitedesk_core::store::IndentFilter;
use sitedesk_core::types::RecordId;
use sitedesk_core::workflow::{self, TransitionAction};
use sitedesk_events::ChangeEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireSiteEngineer;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /indents`.
#[derive(Debug, Default, Deserialize)]
pub struct IndentListQuery {
    /// Filter to a single status (canonical string form, e.g. `PM_Review`).
    pub status: Option<String>,
    /// Filter to a single project.
    pub project: Option<String>,
}

/// Request body for `POST /indents/{id}/transition`.
///
/// The action name and its payload fields sit flat beside `expected_status`,
/// so a PM approval reads:
///
/// ```json
/// { "expected_status": "Raised_By_SE", "action": "pm_approve", "pm_comments": "ok" }
/// ```
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    /// Status the caller last observed; the transition commits only if the
    /// stored status still matches.
    pub expected_status: IndentStatus,
    #[serde(flatten)]
    pub action: TransitionAction,
    /// Optional client-generated key making retries of the same transition
    /// safe.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// POST /api/v1/indents
///
/// Raise a new material indent. Site Engineer only.
pub async fn create_indent(
    RequireSiteEngineer(auth): RequireSiteEngineer,
    State(state): State<AppState>,
    Json(input): Json<CreateIndent>,
) -> AppResult<impl IntoResponse> {
    let request = input.into_request(auth.username.clone())?;
    let created = state.indents.create(request).await?;

    tracing::info!(
        indent_id = %created.id,
        project = %created.project_name,
        urgency = ?created.urgency,
        "Indent raised"
    );

    state.event_bus.publish(
        ChangeEvent::new("indent.created")
            .with_record(created.id)
            .with_actor(auth.display_name)
            .with_payload(json!({ "status": created.status, "project": &created.project_name })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/indents
///
/// List indents, optionally filtered by status and project.
pub async fn list_indents(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<IndentListQuery>,
) -> AppResult<impl IntoResponse> {
    let statuses = match query.status.as_deref() {
        Some(raw) => {
            let status = IndentStatus::parse(raw)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown status '{raw}'")))?;
            Some(vec![status])
        }
        None => None,
    };
    let filter = IndentFilter {
        statuses,
        project_name: query.project,
    };

    let indents = state.indents.list(&filter).await?;
    Ok(Json(DataResponse { data: indents }))
}

/// GET /api/v1/indents/inbox
///
/// List the indents currently actionable by the caller's role.
pub async fn inbox(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<IndentListQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = IndentFilter {
        statuses: Some(workflow::inbox_statuses(auth.role).to_vec()),
        project_name: query.project,
    };

    let indents = state.indents.list(&filter).await?;
    Ok(Json(DataResponse { data: indents }))
}

/// GET /api/v1/indents/{id}
pub async fn get_indent(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<impl IntoResponse> {
    let indent = state.indents.get(id).await?;
    Ok(Json(DataResponse { data: indent }))
}

/// GET /api/v1/indents/{id}/tracker
///
/// Render the ten-step progress tracker for an indent.
pub async fn get_tracker(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<impl IntoResponse> {
    let indent = state.indents.get(id).await?;
    let steps = sitedesk_core::tracker::progress(indent.status);
    Ok(Json(DataResponse {
        data: json!({
            "status": indent.status,
            "steps": steps,
        }),
    }))
}

/// POST /api/v1/indents/{id}/transition
///
/// Apply one workflow transition. The acting role comes from the session,
/// never from the request body.
pub async fn transition_indent(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(input): Json<TransitionRequest>,
) -> AppResult<impl IntoResponse> {
    let updated = state
        .indents
        .apply_transition(
            id,
            auth.role,
            input.expected_status,
            input.action,
            input.idempotency_key,
        )
        .await?;

    tracing::info!(
        indent_id = %id,
        role = %auth.role,
        from = %input.expected_status,
        to = %updated.status,
        "Indent transitioned"
    );

    state.event_bus.publish(
        ChangeEvent::new("indent.transitioned")
            .with_record(id)
            .with_actor(auth.display_name)
            .with_payload(json!({ "from": input.expected_status, "to": updated.status })),
    );

    Ok(Json(DataResponse { data: updated }))
}
