//! Invoker trait - outbound dispatch interface
//!
//! Defines the abstract interface for the invocation collaborator.

use serde::{Deserialize, Serialize};

use crate::{ContractError, EventRecord, TargetId};

/// Result of a successfully accepted dispatch request.
///
/// Carries the collaborator's acceptance status code (202 for async
/// invocations), not any downstream execution result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acceptance {
    /// Acceptance status code reported by the collaborator
    pub status_code: u16,
}

impl Acceptance {
    /// Create an acceptance with the given status code
    pub fn new(status_code: u16) -> Self {
        Self { status_code }
    }
}

impl Default for Acceptance {
    fn default() -> Self {
        Self { status_code: 202 }
    }
}

/// Invocation collaborator trait
///
/// All invoker implementations must implement this trait. `accept` must
/// return as soon as the downstream system has accepted the invocation
/// request, without waiting for the downstream function to complete
/// (fire-and-forget semantics).
///
/// Implementations take `&self` and are shared across concurrent dispatch
/// workers; internal state must be access-synchronized.
#[trait_variant::make(Invoker: Send)]
pub trait LocalInvoker {
    /// Invoker name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Request acceptance of one invocation
    ///
    /// # Errors
    /// Returns a dispatch error on rejection, transport failure, or an
    /// unresolvable target id. Errors are recovered per record by the
    /// caller; they never abort a batch.
    async fn accept(
        &self,
        target: &TargetId,
        record: &EventRecord,
    ) -> Result<Acceptance, ContractError>;
}
