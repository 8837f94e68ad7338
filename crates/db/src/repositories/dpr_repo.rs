//! Postgres [`DprStore`] implementation for the `dpr_records` table.
//!
//! Inserts only — corrections are new submissions, so there is no update
//! statement in this module at all.

use async_trait::async_trait;
use sqlx::PgPool;

use sitedesk_core::dpr::DprRecord;
use sitedesk_core::error::CoreError;
use sitedesk_core::store::{DprFilter, DprStore};

use crate::models::dpr::DprRow;

/// Column list for dpr_records queries.
const DPR_COLUMNS: &str = "id, project_name, report_date, reported_by, labour, materials, \
    activities, machinery_notes, safety_observations, risk_notes, photos, submitted_at";

/// Postgres-backed DPR store.
pub struct PgDprStore {
    pool: PgPool,
}

impl PgDprStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage(err: sqlx::Error) -> CoreError {
    CoreError::Storage(err.to_string())
}

fn json(value: &impl serde::Serialize) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(value).map_err(|e| CoreError::Internal(format!("serialize dpr: {e}")))
}

#[async_trait]
impl DprStore for PgDprStore {
    async fn submit(&self, record: DprRecord) -> Result<DprRecord, CoreError> {
        let query = format!(
            "INSERT INTO dpr_records
                (id, project_name, report_date, reported_by, labour, materials, activities,
                 machinery_notes, safety_observations, risk_notes, photos, submitted_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {DPR_COLUMNS}"
        );
        let row: DprRow = sqlx::query_as(&query)
            .bind(record.id)
            .bind(&record.project_name)
            .bind(record.report_date)
            .bind(&record.reported_by)
            .bind(json(&record.labour)?)
            .bind(json(&record.materials)?)
            .bind(json(&record.activities)?)
            .bind(&record.machinery_notes)
            .bind(&record.safety_observations)
            .bind(&record.risk_notes)
            .bind(json(&record.photos)?)
            .bind(record.submitted_at)
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;
        row.try_into()
    }

    async fn list(&self, filter: &DprFilter) -> Result<Vec<DprRecord>, CoreError> {
        let query = format!(
            "SELECT {DPR_COLUMNS} FROM dpr_records
             WHERE ($1::text IS NULL OR project_name = $1)
               AND ($2::date IS NULL OR report_date = $2)
             ORDER BY submitted_at DESC"
        );
        let rows: Vec<DprRow> = sqlx::query_as(&query)
            .bind(&filter.project_name)
            .bind(filter.report_date)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        rows.into_iter().map(TryInto::try_into).collect()
    }
}
