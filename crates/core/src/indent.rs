//! The material indent model: status enum, line items, and the central
//! [`MaterialRequest`] entity.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{RecordId, Timestamp};

/// Lifecycle status of a material indent.
///
/// The first ten variants are the nominal forward order shown by the
/// progress tracker; the remainder are side states reachable by exception
/// (returns, rejection) or acting as the concrete form of a forward step
/// (`PoRaised`, `GoodsReceived`, `Closed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndentStatus {
    #[serde(rename = "Raised_By_SE")]
    RaisedBySe,
    #[serde(rename = "PM_Review")]
    PmReview,
    #[serde(rename = "QS_Analysis")]
    QsAnalysis,
    #[serde(rename = "Procurement_Quoting")]
    ProcurementQuoting,
    #[serde(rename = "Ops_Approval")]
    OpsApproval,
    #[serde(rename = "MD_Final_Approval")]
    MdFinalApproval,
    #[serde(rename = "Finance_Payment_Pending")]
    FinancePaymentPending,
    #[serde(rename = "Procurement_Dispatch")]
    ProcurementDispatch,
    #[serde(rename = "GRN_Pending")]
    GrnPending,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Returned_To_SE")]
    ReturnedToSe,
    #[serde(rename = "Rejected_By_PM")]
    RejectedByPm,
    #[serde(rename = "Approved_By_PM")]
    ApprovedByPm,
    #[serde(rename = "PO_Raised")]
    PoRaised,
    #[serde(rename = "Goods_Received")]
    GoodsReceived,
    #[serde(rename = "Closed")]
    Closed,
}

impl IndentStatus {
    /// Stable string form matching the serialized wire/database value.
    pub fn as_str(self) -> &'static str {
        match self {
            IndentStatus::RaisedBySe => "Raised_By_SE",
            IndentStatus::PmReview => "PM_Review",
            IndentStatus::QsAnalysis => "QS_Analysis",
            IndentStatus::ProcurementQuoting => "Procurement_Quoting",
            IndentStatus::OpsApproval => "Ops_Approval",
            IndentStatus::MdFinalApproval => "MD_Final_Approval",
            IndentStatus::FinancePaymentPending => "Finance_Payment_Pending",
            IndentStatus::ProcurementDispatch => "Procurement_Dispatch",
            IndentStatus::GrnPending => "GRN_Pending",
            IndentStatus::Completed => "Completed",
            IndentStatus::ReturnedToSe => "Returned_To_SE",
            IndentStatus::RejectedByPm => "Rejected_By_PM",
            IndentStatus::ApprovedByPm => "Approved_By_PM",
            IndentStatus::PoRaised => "PO_Raised",
            IndentStatus::GoodsReceived => "Goods_Received",
            IndentStatus::Closed => "Closed",
        }
    }

    pub fn parse(s: &str) -> Option<IndentStatus> {
        match s {
            "Raised_By_SE" => Some(IndentStatus::RaisedBySe),
            "PM_Review" => Some(IndentStatus::PmReview),
            "QS_Analysis" => Some(IndentStatus::QsAnalysis),
            "Procurement_Quoting" => Some(IndentStatus::ProcurementQuoting),
            "Ops_Approval" => Some(IndentStatus::OpsApproval),
            "MD_Final_Approval" => Some(IndentStatus::MdFinalApproval),
            "Finance_Payment_Pending" => Some(IndentStatus::FinancePaymentPending),
            "Procurement_Dispatch" => Some(IndentStatus::ProcurementDispatch),
            "GRN_Pending" => Some(IndentStatus::GrnPending),
            "Completed" => Some(IndentStatus::Completed),
            "Returned_To_SE" => Some(IndentStatus::ReturnedToSe),
            "Rejected_By_PM" => Some(IndentStatus::RejectedByPm),
            "Approved_By_PM" => Some(IndentStatus::ApprovedByPm),
            "PO_Raised" => Some(IndentStatus::PoRaised),
            "Goods_Received" => Some(IndentStatus::GoodsReceived),
            "Closed" => Some(IndentStatus::Closed),
            _ => None,
        }
    }

    /// Terminal states accept no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            IndentStatus::Completed | IndentStatus::Closed | IndentStatus::RejectedByPm
        )
    }
}

impl std::fmt::Display for IndentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency assigned at creation; immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Low => "Low",
            Urgency::Medium => "Medium",
            Urgency::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Urgency> {
        match s {
            "Low" => Some(Urgency::Low),
            "Medium" => Some(Urgency::Medium),
            "High" => Some(Urgency::High),
            _ => None,
        }
    }
}

/// One line item of a material indent.
///
/// `target_rate` is absent at creation and attached by the QS at the
/// costing-analysis step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestItem {
    pub material: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_rate: Option<f64>,
}

impl RequestItem {
    /// Validate the shape common to creation and the QS rate-attachment
    /// step: non-blank material/unit and a positive quantity.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.material.trim().is_empty() {
            return Err(CoreError::Validation("item material must not be empty".into()));
        }
        if self.unit.trim().is_empty() {
            return Err(CoreError::Validation("item unit must not be empty".into()));
        }
        if !(self.quantity > 0.0) {
            return Err(CoreError::Validation(format!(
                "item '{}' quantity must be > 0",
                self.material
            )));
        }
        if let Some(rate) = self.target_rate {
            if !(rate > 0.0) {
                return Err(CoreError::Validation(format!(
                    "item '{}' target rate must be > 0",
                    self.material
                )));
            }
        }
        Ok(())
    }
}

/// The central entity: one material procurement request.
///
/// Mutated exclusively through the store's `apply_transition` path; `status`
/// is the single driver field and doubles as the audit trail position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRequest {
    pub id: RecordId,
    pub created_at: Timestamp,
    pub requested_by: String,
    pub project_name: String,
    pub items: Vec<RequestItem>,
    pub urgency: Urgency,
    pub status: IndentStatus,

    // Per-role annotations. Each is written by exactly one role at its step;
    // a later visit to the same step may overwrite that role's own field but
    // never another role's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm_comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub costing_comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procurement_comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ops_comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md_comments: Option<String>,

    /// Write-once at the PO-raise transition; never cleared afterwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub po_number: Option<String>,
    /// Write-once at the GRN-confirm transition; never cleared afterwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grn_details: Option<String>,
    /// Quote attachment references, written at the quoting step.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quotes: Vec<String>,

    /// Idempotency key of the last applied transition. A retried call that
    /// carries the same key against the already-advanced status succeeds
    /// without re-applying.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_key: Option<String>,

    pub updated_at: Timestamp,
}

impl MaterialRequest {
    /// Estimated cost of the request: Σ quantity × target_rate over items
    /// that have been priced by the QS. Unpriced items contribute nothing.
    pub fn estimated_cost(&self) -> f64 {
        self.items
            .iter()
            .filter_map(|i| i.target_rate.map(|r| i.quantity * r))
            .sum()
    }
}

/// DTO for raising a new indent (`POST /indents`).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIndent {
    pub project_name: String,
    pub items: Vec<RequestItem>,
    pub urgency: Urgency,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateIndent {
    /// Validate the creation invariants: non-empty project name, at least
    /// one item, every item well-formed.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.project_name.trim().is_empty() {
            return Err(CoreError::Validation("project_name must not be empty".into()));
        }
        if self.items.is_empty() {
            return Err(CoreError::Validation(
                "an indent must contain at least one item".into(),
            ));
        }
        for item in &self.items {
            item.validate()?;
        }
        Ok(())
    }

    /// Materialize a new request in the `Raised_By_SE` state.
    pub fn into_request(self, requested_by: String) -> Result<MaterialRequest, CoreError> {
        self.validate()?;
        let now = chrono::Utc::now();
        Ok(MaterialRequest {
            id: uuid::Uuid::new_v4(),
            created_at: now,
            requested_by,
            project_name: self.project_name,
            items: self.items,
            urgency: self.urgency,
            status: IndentStatus::RaisedBySe,
            notes: self.notes,
            pm_comments: None,
            market_analysis: None,
            costing_comments: None,
            procurement_comments: None,
            ops_comments: None,
            md_comments: None,
            po_number: None,
            grn_details: None,
            quotes: Vec::new(),
            last_transition_key: None,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn cement_item() -> RequestItem {
        RequestItem {
            material: "Cement".into(),
            quantity: 50.0,
            unit: "Bags".into(),
            target_rate: None,
        }
    }

    #[test]
    fn status_string_round_trip() {
        for status in [
            IndentStatus::RaisedBySe,
            IndentStatus::PmReview,
            IndentStatus::QsAnalysis,
            IndentStatus::ProcurementQuoting,
            IndentStatus::OpsApproval,
            IndentStatus::MdFinalApproval,
            IndentStatus::FinancePaymentPending,
            IndentStatus::ProcurementDispatch,
            IndentStatus::GrnPending,
            IndentStatus::Completed,
            IndentStatus::ReturnedToSe,
            IndentStatus::RejectedByPm,
            IndentStatus::ApprovedByPm,
            IndentStatus::PoRaised,
            IndentStatus::GoodsReceived,
            IndentStatus::Closed,
        ] {
            assert_eq!(IndentStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn serde_names_match_string_form() {
        let json = serde_json::to_string(&IndentStatus::RaisedBySe).unwrap();
        assert_eq!(json, "\"Raised_By_SE\"");
        let parsed: IndentStatus = serde_json::from_str("\"GRN_Pending\"").unwrap();
        assert_eq!(parsed, IndentStatus::GrnPending);
    }

    #[test]
    fn terminal_states() {
        assert!(IndentStatus::Closed.is_terminal());
        assert!(IndentStatus::Completed.is_terminal());
        assert!(IndentStatus::RejectedByPm.is_terminal());
        assert!(!IndentStatus::ReturnedToSe.is_terminal());
        assert!(!IndentStatus::GoodsReceived.is_terminal());
    }

    #[test]
    fn create_requires_items() {
        let create = CreateIndent {
            project_name: "Tower A".into(),
            items: vec![],
            urgency: Urgency::High,
            notes: None,
        };
        assert_matches!(create.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn create_rejects_non_positive_quantity() {
        let mut item = cement_item();
        item.quantity = 0.0;
        let create = CreateIndent {
            project_name: "Tower A".into(),
            items: vec![item],
            urgency: Urgency::Low,
            notes: None,
        };
        assert_matches!(create.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn create_starts_in_raised_state() {
        let create = CreateIndent {
            project_name: "Tower A".into(),
            items: vec![cement_item()],
            urgency: Urgency::High,
            notes: Some("urgent pour on Friday".into()),
        };
        let request = create.into_request("ravi".into()).unwrap();
        assert_eq!(request.status, IndentStatus::RaisedBySe);
        assert_eq!(request.requested_by, "ravi");
        assert!(request.po_number.is_none());
        assert!(request.quotes.is_empty());
    }
}
