//! Store abstractions.
//!
//! The workflow engine is pure; these traits are the seam between it and
//! whatever holds the records (Postgres in production, memory in tests and
//! local development). `apply_transition` is the only sanctioned write path
//! for `status` — implementations must run [`crate::workflow::evaluate`]
//! and commit with compare-and-swap semantics against `expected_from`.

use async_trait::async_trait;

use crate::dpr::DprRecord;
use crate::error::CoreError;
use crate::indent::{IndentStatus, MaterialRequest};
use crate::roles::Role;
use crate::types::RecordId;
use crate::workflow::TransitionAction;

/// Filter for indent listing. All fields are conjunctive; `None` matches
/// everything.
#[derive(Debug, Clone, Default)]
pub struct IndentFilter {
    pub statuses: Option<Vec<IndentStatus>>,
    pub project_name: Option<String>,
}

impl IndentFilter {
    pub fn matches(&self, request: &MaterialRequest) -> bool {
        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&request.status) {
                return false;
            }
        }
        if let Some(project) = &self.project_name {
            if &request.project_name != project {
                return false;
            }
        }
        true
    }
}

/// Storage contract for material indents.
#[async_trait]
pub trait IndentStore: Send + Sync {
    /// Persist a new request (already validated and in `Raised_By_SE`).
    async fn create(&self, request: MaterialRequest) -> Result<MaterialRequest, CoreError>;

    async fn get(&self, id: RecordId) -> Result<MaterialRequest, CoreError>;

    /// List requests matching the filter, newest first.
    async fn list(&self, filter: &IndentFilter) -> Result<Vec<MaterialRequest>, CoreError>;

    /// Validate and commit a status transition.
    ///
    /// Succeeds only if the stored status still equals `expected_from` at
    /// write time; otherwise fails with [`CoreError::StaleState`] and leaves
    /// the stored record unchanged. A retry carrying the same
    /// `idempotency_key` after the transition already landed returns the
    /// current record without re-applying.
    async fn apply_transition(
        &self,
        id: RecordId,
        role: Role,
        expected_from: IndentStatus,
        action: TransitionAction,
        idempotency_key: Option<String>,
    ) -> Result<MaterialRequest, CoreError>;
}

/// Filter for DPR listing.
#[derive(Debug, Clone, Default)]
pub struct DprFilter {
    pub project_name: Option<String>,
    pub report_date: Option<chrono::NaiveDate>,
}

impl DprFilter {
    pub fn matches(&self, record: &DprRecord) -> bool {
        if let Some(project) = &self.project_name {
            if &record.project_name != project {
                return false;
            }
        }
        if let Some(date) = self.report_date {
            if record.report_date != date {
                return false;
            }
        }
        true
    }
}

/// Storage contract for daily progress reports. Append-only by design.
#[async_trait]
pub trait DprStore: Send + Sync {
    async fn submit(&self, record: DprRecord) -> Result<DprRecord, CoreError>;

    /// List reports matching the filter, newest submission first.
    async fn list(&self, filter: &DprFilter) -> Result<Vec<DprRecord>, CoreError>;
}
