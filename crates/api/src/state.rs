use std::sync::Arc;

use sitedesk_core::store::{DprStore, IndentStore};
use sitedesk_events::{EventBus, SyncQueue};

use crate::auth::session::SessionStore;
use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// The stores are trait objects so the same router runs against Postgres in
/// production and the in-memory implementation in tests.
#[derive(Clone)]
pub struct AppState {
    /// Material indent store; the only sanctioned write path for `status`.
    pub indents: Arc<dyn IndentStore>,
    /// Daily progress report store (append-only).
    pub dprs: Arc<dyn DprStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Active login sessions (token → authenticated user).
    pub sessions: Arc<SessionStore>,
    /// WebSocket connection manager (browser dashboards).
    pub ws_manager: Arc<WsManager>,
    /// Centralized event bus for publishing change notifications.
    pub event_bus: Arc<EventBus>,
    /// Queue feeding the fire-and-forget drive-sync worker.
    pub sync_queue: SyncQueue,
}
