//! Sitedesk event infrastructure.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`, feeding the WebSocket bridge that keeps role
//!   inboxes live.
//! - [`ChangeEvent`] — the canonical change-notification envelope.
//! - [`archive`] — fire-and-forget drive-sync delivery to the archival
//!   collaborator.

pub mod archive;
pub mod bus;

pub use archive::{DriveSyncWorker, SyncQueue};
pub use bus::{ChangeEvent, EventBus};
