//! The indent workflow engine.
//!
//! Pure transition logic: given a request's current status, an acting role,
//! and a proposed [`TransitionAction`], decide whether the transition is
//! legal, what the destination status is, and which fields the payload must
//! carry. The engine performs no I/O; the stores call [`evaluate`] before
//! committing a status change and no other code path may set `status`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::indent::{IndentStatus, MaterialRequest, RequestItem};
use crate::roles::Role;

/// A proposed transition, tagged by action with exactly the payload fields
/// that action requires. Missing-payload mistakes therefore fail at
/// deserialization or in [`TransitionAction::validate_payload`], never
/// silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TransitionAction {
    /// Site engineer resubmits a returned indent.
    Resubmit { notes: String },
    /// PM approves the indent for costing.
    PmApprove { pm_comments: String },
    /// PM rejects the indent outright (terminal).
    PmReject { pm_comments: String },
    /// PM sends the indent back to the site engineer with a reason.
    PmReturn { pm_comments: String },
    /// QS attaches target rates and market analysis, releasing the indent
    /// to procurement for quoting.
    QsComplete {
        items: Vec<RequestItem>,
        market_analysis: String,
        costing_comments: String,
    },
    /// Procurement attaches quotes and forwards to the Ops Head for vendor
    /// selection.
    ForwardQuotes {
        quotes: Vec<String>,
        procurement_comments: String,
    },
    /// Procurement sends the indent back for another PM review.
    ReturnToPm { procurement_comments: String },
    /// Procurement sends the indent all the way back to the site engineer.
    ReturnToSe { procurement_comments: String },
    /// Ops Head approves the vendor selection.
    OpsApprove { ops_comments: String },
    /// Ops Head returns the indent to PM review.
    OpsReturn { ops_comments: String },
    /// MD signs off, releasing the indent to finance.
    MdApprove { md_comments: String },
    /// MD returns the indent to PM review.
    MdReturn { md_comments: String },
    /// Procurement raises the purchase order once funds are cleared.
    RaisePo { po_number: String },
    /// Procurement marks the order dispatched.
    MarkDispatched {
        #[serde(default)]
        procurement_comments: Option<String>,
    },
    /// Site engineer confirms physical delivery with a GRN.
    SubmitGrn { grn_details: String },
    /// Finance closes the indent after goods are received.
    Close,
}

impl TransitionAction {
    /// The role allowed to perform this action.
    pub fn role(&self) -> Role {
        match self {
            TransitionAction::Resubmit { .. } | TransitionAction::SubmitGrn { .. } => {
                Role::SiteEngineer
            }
            TransitionAction::PmApprove { .. }
            | TransitionAction::PmReject { .. }
            | TransitionAction::PmReturn { .. } => Role::ProjectManager,
            TransitionAction::QsComplete { .. } => Role::Qs,
            TransitionAction::ForwardQuotes { .. }
            | TransitionAction::ReturnToPm { .. }
            | TransitionAction::ReturnToSe { .. }
            | TransitionAction::RaisePo { .. }
            | TransitionAction::MarkDispatched { .. } => Role::Procurement,
            TransitionAction::OpsApprove { .. } | TransitionAction::OpsReturn { .. } => {
                Role::OpsHead
            }
            TransitionAction::MdApprove { .. } | TransitionAction::MdReturn { .. } => Role::Md,
            TransitionAction::Close => Role::Finance,
        }
    }

    /// The destination status this action produces.
    pub fn target(&self) -> IndentStatus {
        match self {
            TransitionAction::Resubmit { .. } => IndentStatus::PmReview,
            TransitionAction::PmApprove { .. } => IndentStatus::ApprovedByPm,
            TransitionAction::PmReject { .. } => IndentStatus::RejectedByPm,
            TransitionAction::PmReturn { .. } => IndentStatus::ReturnedToSe,
            TransitionAction::QsComplete { .. } => IndentStatus::ProcurementQuoting,
            TransitionAction::ForwardQuotes { .. } => IndentStatus::OpsApproval,
            TransitionAction::ReturnToPm { .. } => IndentStatus::PmReview,
            TransitionAction::ReturnToSe { .. } => IndentStatus::ReturnedToSe,
            TransitionAction::OpsApprove { .. } => IndentStatus::MdFinalApproval,
            TransitionAction::OpsReturn { .. } => IndentStatus::PmReview,
            TransitionAction::MdApprove { .. } => IndentStatus::FinancePaymentPending,
            TransitionAction::MdReturn { .. } => IndentStatus::PmReview,
            TransitionAction::RaisePo { .. } => IndentStatus::PoRaised,
            TransitionAction::MarkDispatched { .. } => IndentStatus::ProcurementDispatch,
            TransitionAction::SubmitGrn { .. } => IndentStatus::GoodsReceived,
            TransitionAction::Close => IndentStatus::Closed,
        }
    }

    /// Source statuses this action may fire from.
    ///
    /// The transition table's `From` column names the acting role's inbox: a
    /// freshly raised indent sits in the PM inbox alongside indents returned
    /// to `PM_Review` by Ops or MD, and the same reading applies at the QS
    /// and GRN steps.
    pub fn allowed_from(&self) -> &'static [IndentStatus] {
        match self {
            TransitionAction::Resubmit { .. } => &[IndentStatus::ReturnedToSe],
            TransitionAction::PmApprove { .. }
            | TransitionAction::PmReject { .. }
            | TransitionAction::PmReturn { .. } => {
                &[IndentStatus::RaisedBySe, IndentStatus::PmReview]
            }
            TransitionAction::QsComplete { .. } => {
                &[IndentStatus::ApprovedByPm, IndentStatus::QsAnalysis]
            }
            TransitionAction::ForwardQuotes { .. }
            | TransitionAction::ReturnToPm { .. }
            | TransitionAction::ReturnToSe { .. } => &[IndentStatus::ProcurementQuoting],
            TransitionAction::OpsApprove { .. } | TransitionAction::OpsReturn { .. } => {
                &[IndentStatus::OpsApproval]
            }
            TransitionAction::MdApprove { .. } | TransitionAction::MdReturn { .. } => {
                &[IndentStatus::MdFinalApproval]
            }
            TransitionAction::RaisePo { .. } => &[IndentStatus::FinancePaymentPending],
            TransitionAction::MarkDispatched { .. } => &[IndentStatus::PoRaised],
            TransitionAction::SubmitGrn { .. } => &[
                IndentStatus::PoRaised,
                IndentStatus::ProcurementDispatch,
                IndentStatus::GrnPending,
            ],
            TransitionAction::Close => &[IndentStatus::GoodsReceived],
        }
    }

    /// Validate that the required payload fields are present and non-empty.
    ///
    /// Every forward transition carries a non-empty justification from the
    /// acting role; an attempt lacking it fails here with a validation
    /// error, it never silently proceeds.
    pub fn validate_payload(&self) -> Result<(), CoreError> {
        match self {
            TransitionAction::Resubmit { notes } => require("notes", notes),
            TransitionAction::PmApprove { pm_comments }
            | TransitionAction::PmReject { pm_comments }
            | TransitionAction::PmReturn { pm_comments } => require("pm_comments", pm_comments),
            TransitionAction::QsComplete {
                items,
                market_analysis,
                costing_comments,
            } => {
                require("market_analysis", market_analysis)?;
                require("costing_comments", costing_comments)?;
                if items.is_empty() {
                    return Err(CoreError::Validation(
                        "costing analysis must carry the priced item list".into(),
                    ));
                }
                for item in items {
                    item.validate()?;
                    if item.target_rate.is_none() {
                        return Err(CoreError::Validation(format!(
                            "item '{}' is missing a target rate",
                            item.material
                        )));
                    }
                }
                Ok(())
            }
            TransitionAction::ForwardQuotes {
                quotes,
                procurement_comments,
            } => {
                require("procurement_comments", procurement_comments)?;
                if quotes.is_empty() {
                    return Err(CoreError::Validation(
                        "at least one quote attachment is required".into(),
                    ));
                }
                Ok(())
            }
            TransitionAction::ReturnToPm {
                procurement_comments,
            }
            | TransitionAction::ReturnToSe {
                procurement_comments,
            } => require("procurement_comments", procurement_comments),
            TransitionAction::OpsApprove { ops_comments }
            | TransitionAction::OpsReturn { ops_comments } => require("ops_comments", ops_comments),
            TransitionAction::MdApprove { md_comments }
            | TransitionAction::MdReturn { md_comments } => require("md_comments", md_comments),
            TransitionAction::RaisePo { po_number } => require("po_number", po_number),
            // Dispatch comment is optional; if present it must be non-blank.
            TransitionAction::MarkDispatched {
                procurement_comments,
            } => match procurement_comments {
                Some(c) => require("procurement_comments", c),
                None => Ok(()),
            },
            TransitionAction::SubmitGrn { grn_details } => require("grn_details", grn_details),
            TransitionAction::Close => Ok(()),
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::Validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

/// Check a proposed transition against the full rule set without applying it.
///
/// Order of checks: role gate, source-status legality, payload validation.
/// The caller is responsible for the `expected_from` compare-and-swap check,
/// which must happen at write time against the *stored* status.
pub fn evaluate(
    role: Role,
    current: IndentStatus,
    action: &TransitionAction,
) -> Result<IndentStatus, CoreError> {
    if action.role() != role {
        return Err(CoreError::ForbiddenTransition(format!(
            "role {role} may not perform this action (requires {})",
            action.role()
        )));
    }
    if current.is_terminal() {
        return Err(CoreError::Validation(format!(
            "indent is in terminal status {current} and accepts no further transition"
        )));
    }
    if !action.allowed_from().contains(&current) {
        return Err(CoreError::Validation(format!(
            "transition to {} is not allowed from {current}",
            action.target()
        )));
    }
    action.validate_payload()?;
    Ok(action.target())
}

/// Apply an already-evaluated action to a request, producing the updated
/// record. Writes only the acting role's own fields; every other role's
/// annotation is preserved untouched.
pub fn apply(mut request: MaterialRequest, action: &TransitionAction) -> MaterialRequest {
    request.status = action.target();
    match action {
        TransitionAction::Resubmit { notes } => {
            request.notes = Some(notes.clone());
        }
        TransitionAction::PmApprove { pm_comments }
        | TransitionAction::PmReject { pm_comments }
        | TransitionAction::PmReturn { pm_comments } => {
            request.pm_comments = Some(pm_comments.clone());
        }
        TransitionAction::QsComplete {
            items,
            market_analysis,
            costing_comments,
        } => {
            request.items = items.clone();
            request.market_analysis = Some(market_analysis.clone());
            request.costing_comments = Some(costing_comments.clone());
        }
        TransitionAction::ForwardQuotes {
            quotes,
            procurement_comments,
        } => {
            request.quotes = quotes.clone();
            request.procurement_comments = Some(procurement_comments.clone());
        }
        TransitionAction::ReturnToPm {
            procurement_comments,
        }
        | TransitionAction::ReturnToSe {
            procurement_comments,
        } => {
            request.procurement_comments = Some(procurement_comments.clone());
        }
        TransitionAction::OpsApprove { ops_comments }
        | TransitionAction::OpsReturn { ops_comments } => {
            request.ops_comments = Some(ops_comments.clone());
        }
        TransitionAction::MdApprove { md_comments } | TransitionAction::MdReturn { md_comments } => {
            request.md_comments = Some(md_comments.clone());
        }
        TransitionAction::RaisePo { po_number } => {
            request.po_number = Some(po_number.clone());
        }
        TransitionAction::MarkDispatched {
            procurement_comments,
        } => {
            if let Some(c) = procurement_comments {
                request.procurement_comments = Some(c.clone());
            }
        }
        TransitionAction::SubmitGrn { grn_details } => {
            request.grn_details = Some(grn_details.clone());
        }
        TransitionAction::Close => {}
    }
    request.updated_at = chrono::Utc::now();
    request
}

/// Result of [`transition`]: either the action was applied, or a retry with
/// a matching idempotency key found the transition already landed.
#[derive(Debug)]
pub enum TransitionOutcome {
    Applied(MaterialRequest),
    Replayed(MaterialRequest),
}

impl TransitionOutcome {
    pub fn into_request(self) -> MaterialRequest {
        match self {
            TransitionOutcome::Applied(r) | TransitionOutcome::Replayed(r) => r,
        }
    }
}

/// Run the full transition sequence against a loaded record.
///
/// 1. Compare-and-swap guard: the stored status must equal `expected_from`,
///    except when a retry carries the idempotency key of the transition that
///    already advanced the record to the action's target — that replay
///    succeeds without re-applying.
/// 2. [`evaluate`]: role gate, source legality, payload validation.
/// 3. [`apply`]: write the acting role's fields and the new status.
///
/// Store implementations call this while holding whatever lock makes the
/// read-check-write atomic (a write lock in memory, `SELECT ... FOR UPDATE`
/// plus a status predicate on the `UPDATE` in Postgres).
pub fn transition(
    record: MaterialRequest,
    role: Role,
    expected_from: IndentStatus,
    action: &TransitionAction,
    idempotency_key: Option<&str>,
) -> Result<TransitionOutcome, CoreError> {
    if record.status != expected_from {
        let replayed = idempotency_key.is_some()
            && record.last_transition_key.as_deref() == idempotency_key
            && record.status == action.target();
        if replayed {
            return Ok(TransitionOutcome::Replayed(record));
        }
        return Err(CoreError::StaleState {
            expected: expected_from,
            actual: record.status,
        });
    }
    evaluate(role, record.status, action)?;
    let mut updated = apply(record, action);
    updated.last_transition_key = idempotency_key.map(str::to_owned);
    Ok(TransitionOutcome::Applied(updated))
}

/// Statuses actionable by a given role — the role's live inbox filter.
pub fn inbox_statuses(role: Role) -> &'static [IndentStatus] {
    match role {
        Role::SiteEngineer => &[
            IndentStatus::ReturnedToSe,
            IndentStatus::PoRaised,
            IndentStatus::ProcurementDispatch,
            IndentStatus::GrnPending,
        ],
        Role::ProjectManager => &[IndentStatus::RaisedBySe, IndentStatus::PmReview],
        Role::Qs => &[IndentStatus::ApprovedByPm, IndentStatus::QsAnalysis],
        Role::Procurement => &[
            IndentStatus::ProcurementQuoting,
            IndentStatus::FinancePaymentPending,
            IndentStatus::PoRaised,
        ],
        Role::OpsHead => &[IndentStatus::OpsApproval],
        Role::Md => &[IndentStatus::MdFinalApproval],
        Role::Finance => &[IndentStatus::GoodsReceived],
    }
}
