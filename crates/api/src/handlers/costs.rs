//! Handlers for project cost roll-ups.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use sitedesk_core::indent::IndentStatus;
use sitedesk_core::store::IndentFilter;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Estimated spend for one project, summed over QS-priced indents.
#[derive(Debug, Serialize)]
pub struct ProjectCostSummary {
    pub project_name: String,
    /// Indents included in the total (rejected ones are excluded).
    pub indents_counted: usize,
    /// Σ quantity × target_rate across priced items of included indents.
    pub estimated_total: f64,
}

/// GET /api/v1/costs/{project_name}
///
/// Roll up the estimated cost of a project's indents. Rejected indents
/// never contribute; indents the QS has not priced yet contribute zero.
pub async fn project_costs(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(project_name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let filter = IndentFilter {
        statuses: None,
        project_name: Some(project_name.clone()),
    };
    let indents = state.indents.list(&filter).await?;

    let included: Vec<_> = indents
        .iter()
        .filter(|i| i.status != IndentStatus::RejectedByPm)
        .collect();
    let estimated_total = included.iter().map(|i| i.estimated_cost()).sum();

    Ok(Json(DataResponse {
        data: ProjectCostSummary {
            project_name,
            indents_counted: included.len(),
            estimated_total,
        },
    }))
}
