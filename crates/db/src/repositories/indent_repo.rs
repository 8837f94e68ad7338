//! Postgres [`IndentStore`] implementation for the `material_requests` table.
//!
//! `apply_transition` takes a row lock (`SELECT ... FOR UPDATE`) and keeps a
//! status predicate on the `UPDATE`, so the compare-and-swap holds even if
//! the lock discipline ever changes: a write only lands while the stored
//! status still equals the caller's `expected_from`.

use async_trait::async_trait;
use sqlx::PgPool;

use sitedesk_core::error::CoreError;
use sitedesk_core::indent::{IndentStatus, MaterialRequest};
use sitedesk_core::roles::Role;
use sitedesk_core::store::{IndentFilter, IndentStore};
use sitedesk_core::types::RecordId;
use sitedesk_core::workflow::{self, TransitionAction, TransitionOutcome};

use crate::models::indent::{items_json, quotes_json, IndentRow};

/// Column list for material_requests queries.
const INDENT_COLUMNS: &str = "id, created_at, requested_by, project_name, items, urgency, \
    status, notes, pm_comments, market_analysis, costing_comments, procurement_comments, \
    ops_comments, md_comments, po_number, grn_details, quotes, last_transition_key, updated_at";

/// Postgres-backed indent store.
pub struct PgIndentStore {
    pool: PgPool,
}

impl PgIndentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage(err: sqlx::Error) -> CoreError {
    CoreError::Storage(err.to_string())
}

#[async_trait]
impl IndentStore for PgIndentStore {
    async fn create(&self, request: MaterialRequest) -> Result<MaterialRequest, CoreError> {
        let query = format!(
            "INSERT INTO material_requests
                (id, created_at, requested_by, project_name, items, urgency, status,
                 notes, quotes, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {INDENT_COLUMNS}"
        );
        let row: IndentRow = sqlx::query_as(&query)
            .bind(request.id)
            .bind(request.created_at)
            .bind(&request.requested_by)
            .bind(&request.project_name)
            .bind(items_json(&request)?)
            .bind(request.urgency.as_str())
            .bind(request.status.as_str())
            .bind(&request.notes)
            .bind(quotes_json(&request)?)
            .bind(request.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;
        row.try_into()
    }

    async fn get(&self, id: RecordId) -> Result<MaterialRequest, CoreError> {
        let query = format!("SELECT {INDENT_COLUMNS} FROM material_requests WHERE id = $1");
        let row: Option<IndentRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;
        row.ok_or(CoreError::NotFound {
            entity: "MaterialRequest",
            id,
        })?
        .try_into()
    }

    async fn list(&self, filter: &IndentFilter) -> Result<Vec<MaterialRequest>, CoreError> {
        let statuses: Option<Vec<String>> = filter
            .statuses
            .as_ref()
            .map(|s| s.iter().map(|st| st.as_str().to_string()).collect());
        let query = format!(
            "SELECT {INDENT_COLUMNS} FROM material_requests
             WHERE ($1::text[] IS NULL OR status = ANY($1))
               AND ($2::text IS NULL OR project_name = $2)
             ORDER BY created_at DESC"
        );
        let rows: Vec<IndentRow> = sqlx::query_as(&query)
            .bind(statuses)
            .bind(&filter.project_name)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn apply_transition(
        &self,
        id: RecordId,
        role: Role,
        expected_from: IndentStatus,
        action: TransitionAction,
        idempotency_key: Option<String>,
    ) -> Result<MaterialRequest, CoreError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let query =
            format!("SELECT {INDENT_COLUMNS} FROM material_requests WHERE id = $1 FOR UPDATE");
        let row: Option<IndentRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage)?;
        let record: MaterialRequest = row
            .ok_or(CoreError::NotFound {
                entity: "MaterialRequest",
                id,
            })?
            .try_into()?;

        let updated = match workflow::transition(
            record,
            role,
            expected_from,
            &action,
            idempotency_key.as_deref(),
        )? {
            // Retry of an already-landed transition: nothing to write.
            TransitionOutcome::Replayed(current) => {
                tx.rollback().await.map_err(storage)?;
                return Ok(current);
            }
            TransitionOutcome::Applied(updated) => updated,
        };

        let update = "UPDATE material_requests SET
                status = $3, items = $4, notes = $5, pm_comments = $6,
                market_analysis = $7, costing_comments = $8, procurement_comments = $9,
                ops_comments = $10, md_comments = $11, po_number = $12, grn_details = $13,
                quotes = $14, last_transition_key = $15, updated_at = $16
             WHERE id = $1 AND status = $2";
        let result = sqlx::query(update)
            .bind(id)
            .bind(expected_from.as_str())
            .bind(updated.status.as_str())
            .bind(items_json(&updated)?)
            .bind(&updated.notes)
            .bind(&updated.pm_comments)
            .bind(&updated.market_analysis)
            .bind(&updated.costing_comments)
            .bind(&updated.procurement_comments)
            .bind(&updated.ops_comments)
            .bind(&updated.md_comments)
            .bind(&updated.po_number)
            .bind(&updated.grn_details)
            .bind(quotes_json(&updated)?)
            .bind(&updated.last_transition_key)
            .bind(updated.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        if result.rows_affected() == 0 {
            // Lost the race after all; surface the current stored status.
            tx.rollback().await.map_err(storage)?;
            let current = self.get(id).await?;
            return Err(CoreError::StaleState {
                expected: expected_from,
                actual: current.status,
            });
        }

        tx.commit().await.map_err(storage)?;
        tracing::info!(
            indent_id = %id,
            from = %expected_from,
            to = %updated.status,
            role = %role,
            "Indent transition applied"
        );
        Ok(updated)
    }
}
