//! Event-bus to WebSocket bridge.
//!
//! Subscribes to the central [`EventBus`] and pushes every [`ChangeEvent`]
//! as a JSON text frame to all connected dashboards, so role inboxes and
//! trackers refresh without polling.

use std::sync::Arc;

use axum::extract::ws::{Message, Utf8Bytes};
use tokio::sync::broadcast::error::RecvError;

use sitedesk_events::EventBus;

use crate::ws::manager::WsManager;

/// Spawn the bridge task. Runs until the event bus sender is dropped.
pub fn start_event_bridge(
    event_bus: Arc<EventBus>,
    ws_manager: Arc<WsManager>,
) -> tokio::task::JoinHandle<()> {
    let mut rx = event_bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let json = match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to serialize change event");
                            continue;
                        }
                    };
                    ws_manager
                        .broadcast(Message::Text(Utf8Bytes::from(json)))
                        .await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    // Dashboards refetch on reconnect anyway; log and go on.
                    tracing::warn!(skipped, "Event bridge lagged behind the bus");
                }
                Err(RecvError::Closed) => {
                    tracing::info!("Event bus closed, stopping WebSocket bridge");
                    break;
                }
            }
        }
    })
}
