//! Handlers for daily progress reports.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use sitedesk_core::dpr::SubmitDpr;
use sitedesk_core::store::DprFilter;
use sitedesk_events::ChangeEvent;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireSiteEngineer;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /dpr`.
#[derive(Debug, Default, Deserialize)]
pub struct DprListQuery {
    pub project: Option<String>,
    /// Calendar date the report covers, `YYYY-MM-DD`.
    pub date: Option<chrono::NaiveDate>,
}

/// POST /api/v1/dpr
///
/// Submit a daily progress report. Site Engineer only; reports are
/// append-only, a correction is a fresh submission.
pub async fn submit_dpr(
    RequireSiteEngineer(auth): RequireSiteEngineer,
    State(state): State<AppState>,
    Json(input): Json<SubmitDpr>,
) -> AppResult<impl IntoResponse> {
    let record = input.into_record(auth.username.clone())?;
    let saved = state.dprs.submit(record).await?;

    tracing::info!(
        dpr_id = %saved.id,
        project = %saved.project_name,
        report_date = %saved.report_date,
        "DPR submitted"
    );

    state.event_bus.publish(
        ChangeEvent::new("dpr.submitted")
            .with_record(saved.id)
            .with_actor(auth.display_name)
            .with_payload(json!({ "project": &saved.project_name, "date": saved.report_date })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: saved })))
}

/// GET /api/v1/dpr
///
/// List submitted reports, optionally filtered by project and date.
pub async fn list_dprs(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<DprListQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = DprFilter {
        project_name: query.project,
        report_date: query.date,
    };
    let reports = state.dprs.list(&filter).await?;
    Ok(Json(DataResponse { data: reports }))
}
