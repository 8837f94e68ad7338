//! Route definitions for the `/indents` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::indent;
use crate::state::AppState;

/// Routes mounted at `/indents`.
///
/// ```text
/// GET  /                   -> list (filter by ?status= and ?project=)
/// POST /                   -> create (SE only)
/// GET  /inbox              -> caller's actionable indents
/// GET  /{id}               -> get
/// GET  /{id}/tracker       -> progress tracker
/// POST /{id}/transition    -> apply workflow transition
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(indent::list_indents).post(indent::create_indent))
        .route("/inbox", get(indent::inbox))
        .route("/{id}", get(indent::get_indent))
        .route("/{id}/tracker", get(indent::get_tracker))
        .route("/{id}/transition", post(indent::transition_indent))
}
