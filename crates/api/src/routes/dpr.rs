//! Route definitions for the `/dpr` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::dpr;
use crate::state::AppState;

/// Routes mounted at `/dpr`.
///
/// ```text
/// GET  / -> list (filter by ?project= and ?date=)
/// POST / -> submit (SE only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dpr::list_dprs).post(dpr::submit_dpr))
}
