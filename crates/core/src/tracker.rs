//! Display-only progress tracker.
//!
//! Maps a request's status onto the ten-step canonical forward list. A
//! request is considered to have passed every step at or before the one its
//! status covers; returned/rejected states render an explicit error marker
//! at the step where the flow stopped instead of advancing the tracker.

use serde::Serialize;

use crate::indent::IndentStatus;

/// The canonical forward order, step 1 through step 10.
pub const FORWARD_ORDER: [IndentStatus; 10] = [
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
];

/// Rendering state of one tracker step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Complete,
    Pending,
    Error,
}

/// One rendered tracker step.
#[derive(Debug, Clone, Serialize)]
pub struct TrackerStep {
    /// 1-based step number.
    pub step: usize,
    pub status: IndentStatus,
    pub state: StepState,
}

/// Highest 1-based forward step covered by a status, plus whether the
/// status is an error overlay (returned/rejected).
fn coverage(status: IndentStatus) -> (usize, bool) {
    match status {
        IndentStatus::RaisedBySe => (1, false),
        IndentStatus::PmReview => (2, false),
        IndentStatus::ApprovedByPm => (2, false),
        IndentStatus::QsAnalysis => (3, false),
        IndentStatus::ProcurementQuoting => (4, false),
        IndentStatus::OpsApproval => (5, false),
        IndentStatus::MdFinalApproval => (6, false),
        IndentStatus::FinancePaymentPending => (7, false),
        IndentStatus::PoRaised | IndentStatus::ProcurementDispatch => (8, false),
        IndentStatus::GrnPending | IndentStatus::GoodsReceived => (9, false),
        IndentStatus::Completed | IndentStatus::Closed => (10, false),
        // Flow stopped at the PM gate; render the error there.
        IndentStatus::ReturnedToSe | IndentStatus::RejectedByPm => (2, true),
    }
}

/// Render the full ten-step tracker for a status.
pub fn progress(status: IndentStatus) -> Vec<TrackerStep> {
    let (covered, errored) = coverage(status);
    FORWARD_ORDER
        .iter()
        .enumerate()
        .map(|(i, &step_status)| {
            let step = i + 1;
            let state = if errored && step == covered {
                StepState::Error
            } else if errored && step > covered {
                StepState::Pending
            } else if step <= covered {
                StepState::Complete
            } else {
                StepState::Pending
            };
            TrackerStep {
                step,
                status: step_status,
                state,
            }
        })
        .collect()
}
