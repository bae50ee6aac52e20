//! LogInvoker - logs acceptance via tracing
//!
//! Accepts every invocation without any outbound call. Mirrors deployments
//! where the routing decision itself is the observable behavior.

use contracts::{Acceptance, ContractError, EventRecord, Invoker, TargetId};
use tracing::{info, instrument};

/// Invoker that logs each dispatch and always accepts
pub struct LogInvoker {
    name: String,
}

impl LogInvoker {
    /// Create a new LogInvoker with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Invoker for LogInvoker {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_invoker_accept",
        skip(self, record),
        fields(invoker = %self.name, target = %target)
    )]
    async fn accept(
        &self,
        target: &TargetId,
        record: &EventRecord,
    ) -> Result<Acceptance, ContractError> {
        let acceptance = Acceptance::default();
        info!(
            invoker = %self.name,
            target = %target,
            fields = record.len(),
            status_code = acceptance.status_code,
            "Invocation accepted"
        );
        Ok(acceptance)
    }
}
