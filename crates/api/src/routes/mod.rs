pub mod archive;
pub mod auth;
pub mod costs;
pub mod dpr;
pub mod health;
pub mod indent;
pub mod uploads;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                              WebSocket (live dashboard updates)
///
/// /auth/login                      login (public)
/// /auth/logout                     logout (requires auth)
/// /auth/me                         current user (requires auth)
///
/// /indents                         list, create (create: SE only)
/// /indents/inbox                   caller's actionable indents
/// /indents/{id}                    get
/// /indents/{id}/tracker            ten-step progress view
/// /indents/{id}/transition         apply one workflow transition (POST)
///
/// /dpr                             list, submit (submit: SE only)
///
/// /costs/{project_name}            estimated project spend
///
/// /uploads                         multipart blob upload (POST)
///
/// /archive/sync                    queue files for archival (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/indents", indent::router())
        .nest("/dpr", dpr::router())
        .nest("/costs", costs::router())
        .nest("/uploads", uploads::router())
        .nest("/archive", archive::router())
        .route("/ws", get(ws::ws_handler))
}
