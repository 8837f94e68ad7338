//! Row mapping for the `dpr_records` table.

use sqlx::FromRow;

use sitedesk_core::dpr::{ActivityEntry, DprRecord, LabourEntry, MaterialConsumption};
use sitedesk_core::error::CoreError;
use sitedesk_core::types::{RecordId, Timestamp};

/// A row from the `dpr_records` table. Structured sub-lists live in JSONB.
#[derive(Debug, Clone, FromRow)]
pub struct DprRow {
    pub id: RecordId,
    pub project_name: String,
    pub report_date: chrono::NaiveDate,
    pub reported_by: String,
    pub labour: serde_json::Value,
    pub materials: serde_json::Value,
    pub activities: serde_json::Value,
    pub machinery_notes: Option<String>,
    pub safety_observations: Option<String>,
    pub risk_notes: Option<String>,
    pub photos: serde_json::Value,
    pub submitted_at: Timestamp,
}

impl TryFrom<DprRow> for DprRecord {
    type Error = CoreError;

    fn try_from(row: DprRow) -> Result<Self, Self::Error> {
        let labour: Vec<LabourEntry> = serde_json::from_value(row.labour)
            .map_err(|e| CoreError::Storage(format!("corrupt labour payload: {e}")))?;
        let materials: Vec<MaterialConsumption> = serde_json::from_value(row.materials)
            .map_err(|e| CoreError::Storage(format!("corrupt materials payload: {e}")))?;
        let activities: Vec<ActivityEntry> = serde_json::from_value(row.activities)
            .map_err(|e| CoreError::Storage(format!("corrupt activities payload: {e}")))?;
        let photos: Vec<String> = serde_json::from_value(row.photos)
            .map_err(|e| CoreError::Storage(format!("corrupt photos payload: {e}")))?;

        Ok(DprRecord {
            id: row.id,
            project_name: row.project_name,
            report_date: row.report_date,
            reported_by: row.reported_by,
            labour,
            materials,
            activities,
            machinery_notes: row.machinery_notes,
            safety_observations: row.safety_observations,
            risk_notes: row.risk_notes,
            photos,
            submitted_at: row.submitted_at,
        })
    }
}
