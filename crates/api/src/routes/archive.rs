//! Route definitions for the `/archive` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::archive;
use crate::state::AppState;

/// Routes mounted at `/archive`.
///
/// ```text
/// POST /sync -> queue uploaded files for archival (202)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/sync", post(archive::queue_sync))
}
