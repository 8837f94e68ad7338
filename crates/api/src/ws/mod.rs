//! WebSocket infrastructure for live dashboard updates.
//!
//! Provides connection management, heartbeat monitoring, the HTTP upgrade
//! handler, and the bridge task that fans events from the bus out to every
//! connected dashboard.

mod bridge;
mod handler;
mod heartbeat;
pub mod manager;

pub use bridge::start_event_bridge;
pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
