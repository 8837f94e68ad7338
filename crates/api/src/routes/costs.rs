//! Route definitions for the `/costs` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::costs;
use crate::state::AppState;

/// Routes mounted at `/costs`.
///
/// ```text
/// GET /{project_name} -> estimated project spend
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{project_name}", get(costs::project_costs))
}
