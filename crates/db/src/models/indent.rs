//! Row mapping for the `material_requests` table.
//!
//! Items and quote references are stored as JSONB; status and urgency as
//! TEXT in their canonical string forms. Conversion to the domain entity is
//! fallible only on data corruption, which surfaces as a storage error.

use sqlx::FromRow;

use sitedesk_core::error::CoreError;
use sitedesk_core::indent::{IndentStatus, MaterialRequest, RequestItem, Urgency};
use sitedesk_core::types::{RecordId, Timestamp};

/// A row from the `material_requests` table.
#[derive(Debug, Clone, FromRow)]
pub struct IndentRow {
    pub id: RecordId,
    pub created_at: Timestamp,
    pub requested_by: String,
    pub project_name: String,
    pub items: serde_json::Value,
    pub urgency: String,
    pub status: String,
    pub notes: Option<String>,
    pub pm_comments: Option<String>,
    pub market_analysis: Option<String>,
    pub costing_comments: Option<String>,
    pub procurement_comments: Option<String>,
    pub ops_comments: Option<String>,
    pub md_comments: Option<String>,
    pub po_number: Option<String>,
    pub grn_details: Option<String>,
    pub quotes: serde_json::Value,
    pub last_transition_key: Option<String>,
    pub updated_at: Timestamp,
}

impl TryFrom<IndentRow> for MaterialRequest {
    type Error = CoreError;

    fn try_from(row: IndentRow) -> Result<Self, Self::Error> {
        let status = IndentStatus::parse(&row.status).ok_or_else(|| {
            CoreError::Storage(format!("unknown stored status '{}'", row.status))
        })?;
        let urgency = Urgency::parse(&row.urgency).ok_or_else(|| {
            CoreError::Storage(format!("unknown stored urgency '{}'", row.urgency))
        })?;
        let items: Vec<RequestItem> = serde_json::from_value(row.items)
            .map_err(|e| CoreError::Storage(format!("corrupt items payload: {e}")))?;
        let quotes: Vec<String> = serde_json::from_value(row.quotes)
            .map_err(|e| CoreError::Storage(format!("corrupt quotes payload: {e}")))?;

        Ok(MaterialRequest {
            id: row.id,
            created_at: row.created_at,
            requested_by: row.requested_by,
            project_name: row.project_name,
            items,
            urgency,
            status,
            notes: row.notes,
            pm_comments: row.pm_comments,
            market_analysis: row.market_analysis,
            costing_comments: row.costing_comments,
            procurement_comments: row.procurement_comments,
            ops_comments: row.ops_comments,
            md_comments: row.md_comments,
            po_number: row.po_number,
            grn_details: row.grn_details,
            quotes,
            last_transition_key: row.last_transition_key,
            updated_at: row.updated_at,
        })
    }
}

/// JSON-encode the item list for a JSONB column bind.
pub fn items_json(request: &MaterialRequest) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(&request.items)
        .map_err(|e| CoreError::Internal(format!("serialize items: {e}")))
}

/// JSON-encode the quote reference list for a JSONB column bind.
pub fn quotes_json(request: &MaterialRequest) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(&request.quotes)
        .map_err(|e| CoreError::Internal(format!("serialize quotes: {e}")))
}
