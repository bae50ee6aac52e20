//! DispatchOutcome - per-record dispatch result
//!
//! One outcome per input record, in input order. Outcomes are the only
//! channel through which dispatch failures surface; a failed record never
//! aborts the rest of the batch.

use serde::{Deserialize, Serialize};

use crate::invoker::Acceptance;
use crate::{Route, TargetId};

/// Terminal status of one record's dispatch attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The downstream accepted the invocation request
    Accepted(Acceptance),
    /// The acceptance call itself failed (rejection, transport error, timeout)
    Failed { message: String },
    /// The batch deadline or shutdown fired before this record was dispatched
    Cancelled,
}

/// Per-record dispatch outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    /// Position of the record in the input batch
    pub index: usize,
    /// Which side of the split was selected
    pub route: Route,
    /// Target the record was (or would have been) dispatched to
    pub target: TargetId,
    /// Terminal status
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl DispatchOutcome {
    /// Build an accepted outcome
    pub fn accepted(index: usize, route: Route, target: TargetId, acceptance: Acceptance) -> Self {
        Self {
            index,
            route,
            target,
            status: OutcomeStatus::Accepted(acceptance),
        }
    }

    /// Build a failed outcome
    pub fn failed(index: usize, route: Route, target: TargetId, message: impl Into<String>) -> Self {
        Self {
            index,
            route,
            target,
            status: OutcomeStatus::Failed {
                message: message.into(),
            },
        }
    }

    /// Build a cancelled outcome
    pub fn cancelled(index: usize, route: Route, target: TargetId) -> Self {
        Self {
            index,
            route,
            target,
            status: OutcomeStatus::Cancelled,
        }
    }

    /// Whether the dispatch request was accepted
    pub fn is_accepted(&self) -> bool {
        matches!(self.status, OutcomeStatus::Accepted(_))
    }

    /// Whether the acceptance call failed
    pub fn is_failed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed { .. })
    }

    /// Whether the record was given up before dispatch
    pub fn is_cancelled(&self) -> bool {
        matches!(self.status, OutcomeStatus::Cancelled)
    }
}
