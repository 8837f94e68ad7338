//! Fire-and-forget drive-sync delivery.
//!
//! Handlers enqueue a [`SyncManifest`] and return immediately; the worker
//! POSTs each manifest to the configured archiver endpoint in the
//! background. Delivery failures are logged and dropped — the archival
//! collaborator owns durability, nothing in the workflow waits on it.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use sitedesk_core::archive::SyncManifest;

/// Queue depth before enqueue attempts start failing fast.
const QUEUE_CAPACITY: usize = 256;

/// Sender half handed to the API layer.
#[derive(Clone)]
pub struct SyncQueue {
    tx: mpsc::Sender<SyncManifest>,
}

impl SyncQueue {
    /// Enqueue a manifest. Returns `false` when the queue is full or the
    /// worker is gone; the caller logs and moves on either way.
    pub fn enqueue(&self, manifest: SyncManifest) -> bool {
        match self.tx.try_send(manifest) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Drive-sync queue rejected manifest");
                false
            }
        }
    }
}

/// Background worker delivering sync manifests to the archiver.
pub struct DriveSyncWorker {
    client: reqwest::Client,
    endpoint: Option<String>,
    rx: mpsc::Receiver<SyncManifest>,
}

impl DriveSyncWorker {
    /// Create the worker and its queue handle.
    ///
    /// `endpoint` is the archiver URL; `None` disables delivery (manifests
    /// are drained and logged), which is the local-development default.
    pub fn new(endpoint: Option<String>) -> (Self, SyncQueue) {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        (
            Self {
                client: reqwest::Client::new(),
                endpoint,
                rx,
            },
            SyncQueue { tx },
        )
    }

    /// Run until cancelled, delivering queued manifests one at a time.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!("Drive-sync worker stopping");
                    break;
                }
                manifest = self.rx.recv() => {
                    let Some(manifest) = manifest else { break };
                    self.deliver(manifest).await;
                }
            }
        }
    }

    async fn deliver(&self, manifest: SyncManifest) {
        let Some(endpoint) = &self.endpoint else {
            tracing::debug!(
                project_code = %manifest.project_code,
                files = manifest.file_names.len(),
                "No archiver endpoint configured; dropping sync manifest"
            );
            return;
        };
        match self.client.post(endpoint).json(&manifest).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!(
                    project_code = %manifest.project_code,
                    files = manifest.file_names.len(),
                    "Sync manifest delivered to archiver"
                );
            }
            Ok(response) => {
                tracing::warn!(
                    status = %response.status(),
                    project_code = %manifest.project_code,
                    "Archiver rejected sync manifest"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    project_code = %manifest.project_code,
                    "Failed to reach archiver"
                );
            }
        }
    }
}
