//! In-memory store implementations.
//!
//! Used by the API integration tests and by local development when no
//! `DATABASE_URL` is configured. The indent store holds its write lock
//! across the read-check-write sequence, so the compare-and-swap semantics
//! match the Postgres implementation: two racing approvals resolve to
//! exactly one winner.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use sitedesk_core::dpr::DprRecord;
use sitedesk_core::error::CoreError;
use sitedesk_core::indent::{IndentStatus, MaterialRequest};
use sitedesk_core::roles::Role;
use sitedesk_core::store::{DprFilter, DprStore, IndentFilter, IndentStore};
use sitedesk_core::types::RecordId;
use sitedesk_core::workflow::{self, TransitionAction};

/// HashMap-backed [`IndentStore`].
#[derive(Default)]
pub struct InMemoryIndentStore {
    inner: RwLock<HashMap<RecordId, MaterialRequest>>,
}

impl InMemoryIndentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IndentStore for InMemoryIndentStore {
    async fn create(&self, request: MaterialRequest) -> Result<MaterialRequest, CoreError> {
        let mut inner = self.inner.write().await;
        inner.insert(request.id, request.clone());
        Ok(request)
    }

    async fn get(&self, id: RecordId) -> Result<MaterialRequest, CoreError> {
        self.inner
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "MaterialRequest",
                id,
            })
    }

    async fn list(&self, filter: &IndentFilter) -> Result<Vec<MaterialRequest>, CoreError> {
        let inner = self.inner.read().await;
        let mut requests: Vec<MaterialRequest> =
            inner.values().filter(|r| filter.matches(r)).cloned().collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    async fn apply_transition(
        &self,
        id: RecordId,
        role: Role,
        expected_from: IndentStatus,
        action: TransitionAction,
        idempotency_key: Option<String>,
    ) -> Result<MaterialRequest, CoreError> {
        // Write lock held across read-check-write: the CAS point.
        let mut inner = self.inner.write().await;
        let record = inner.get(&id).cloned().ok_or(CoreError::NotFound {
            entity: "MaterialRequest",
            id,
        })?;
        let outcome = workflow::transition(
            record,
            role,
            expected_from,
            &action,
            idempotency_key.as_deref(),
        )?;
        let updated = outcome.into_request();
        inner.insert(id, updated.clone());
        Ok(updated)
    }
}

/// Vec-backed append-only [`DprStore`].
#[derive(Default)]
pub struct InMemoryDprStore {
    inner: RwLock<Vec<DprRecord>>,
}

impl InMemoryDprStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DprStore for InMemoryDprStore {
    async fn submit(&self, record: DprRecord) -> Result<DprRecord, CoreError> {
        self.inner.write().await.push(record.clone());
        Ok(record)
    }

    async fn list(&self, filter: &DprFilter) -> Result<Vec<DprRecord>, CoreError> {
        let inner = self.inner.read().await;
        let mut records: Vec<DprRecord> =
            inner.iter().filter(|r| filter.matches(r)).cloned().collect();
        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::Arc;

    use sitedesk_core::indent::{CreateIndent, RequestItem, Urgency};

    fn create_dto() -> CreateIndent {
        CreateIndent {
            project_name: "Tower A".into(),
            items: vec![RequestItem {
                material: "Cement".into(),
                quantity: 50.0,
                unit: "Bags".into(),
                target_rate: None,
            }],
            urgency: Urgency::High,
            notes: Some("foundation pour".into()),
        }
    }

    async fn seed(store: &InMemoryIndentStore) -> MaterialRequest {
        let request = create_dto().into_request("ravi".into()).unwrap();
        store.create(request).await.unwrap()
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = InMemoryIndentStore::new();
        let created = seed(&store).await;
        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched.status, IndentStatus::RaisedBySe);
        assert_eq!(fetched.project_name, "Tower A");
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let store = InMemoryIndentStore::new();
        assert_matches!(
            store.get(uuid::Uuid::new_v4()).await,
            Err(CoreError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn list_filters_by_status_and_project() {
        let store = InMemoryIndentStore::new();
        seed(&store).await;
        let mut other = create_dto();
        other.project_name = "Tower B".into();
        store
            .create(other.into_request("meena".into()).unwrap())
            .await
            .unwrap();

        let filter = IndentFilter {
            statuses: Some(vec![IndentStatus::RaisedBySe]),
            project_name: Some("Tower B".into()),
        };
        let listed = store.list(&filter).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].project_name, "Tower B");
    }

    #[tokio::test]
    async fn transition_advances_and_stale_retry_fails() {
        let store = InMemoryIndentStore::new();
        let created = seed(&store).await;
        let action = TransitionAction::PmApprove {
            pm_comments: "ok".into(),
        };

        let updated = store
            .apply_transition(
                created.id,
                Role::ProjectManager,
                IndentStatus::RaisedBySe,
                action.clone(),
                None,
            )
            .await
            .unwrap();
        assert_eq!(updated.status, IndentStatus::ApprovedByPm);

        // Same expected_from again: the state already advanced.
        let err = store
            .apply_transition(
                created.id,
                Role::ProjectManager,
                IndentStatus::RaisedBySe,
                action,
                None,
            )
            .await;
        assert_matches!(err, Err(CoreError::StaleState { .. }));
        // Stored state unchanged by the failed attempt.
        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched.status, IndentStatus::ApprovedByPm);
    }

    #[tokio::test]
    async fn two_racing_approvals_yield_one_winner() {
        let store = Arc::new(InMemoryIndentStore::new());
        let created = seed(&store).await;

        let mut handles = Vec::new();
        for comment in ["approver one", "approver two"] {
            let store = Arc::clone(&store);
            let id = created.id;
            handles.push(tokio::spawn(async move {
                store
                    .apply_transition(
                        id,
                        Role::ProjectManager,
                        IndentStatus::RaisedBySe,
                        TransitionAction::PmApprove {
                            pm_comments: comment.into(),
                        },
                        None,
                    )
                    .await
            }));
        }

        let mut successes = 0;
        let mut stale = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(CoreError::StaleState { .. }) => stale += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(stale, 1);
    }

    #[tokio::test]
    async fn idempotent_retry_returns_current_record() {
        let store = InMemoryIndentStore::new();
        let created = seed(&store).await;
        let action = TransitionAction::PmApprove {
            pm_comments: "ok".into(),
        };

        let first = store
            .apply_transition(
                created.id,
                Role::ProjectManager,
                IndentStatus::RaisedBySe,
                action.clone(),
                Some("retry-key-1".into()),
            )
            .await
            .unwrap();

        // Network retry resends the identical transition.
        let second = store
            .apply_transition(
                created.id,
                Role::ProjectManager,
                IndentStatus::RaisedBySe,
                action,
                Some("retry-key-1".into()),
            )
            .await
            .unwrap();
        assert_eq!(second.status, IndentStatus::ApprovedByPm);
        assert_eq!(second.updated_at, first.updated_at);
    }

    #[tokio::test]
    async fn dpr_store_is_append_only_and_filterable() {
        let store = InMemoryDprStore::new();
        let date = chrono::NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let record = sitedesk_core::dpr::SubmitDpr {
            project_name: "Tower A".into(),
            report_date: date,
            labour: vec![],
            materials: vec![],
            activities: vec![],
            machinery_notes: None,
            safety_observations: None,
            risk_notes: None,
            photos: vec![],
        }
        .into_record("ravi".into())
        .unwrap();
        store.submit(record).await.unwrap();

        let listed = store
            .list(&DprFilter {
                project_name: Some("Tower A".into()),
                report_date: Some(date),
            })
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);

        let none = store
            .list(&DprFilter {
                project_name: Some("Tower B".into()),
                report_date: None,
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
