//! Invoker implementations
//!
//! Contains LogInvoker, UdpInvoker, and MockInvoker.

mod log;
mod mock;
mod udp;

pub use self::log::LogInvoker;
pub use self::mock::MockInvoker;
pub use self::udp::UdpInvoker;

use contracts::{Acceptance, ContractError, EventRecord, Invoker, InvokerConfig, InvokerType, TargetId};
use tracing::instrument;

use crate::error::SplitterError;

/// Type-erased invoker built from configuration
pub enum AnyInvoker {
    /// Log-only backend
    Log(LogInvoker),
    /// UDP fire-and-forget backend
    Udp(UdpInvoker),
}

impl Invoker for AnyInvoker {
    fn name(&self) -> &str {
        match self {
            Self::Log(invoker) => invoker.name(),
            Self::Udp(invoker) => invoker.name(),
        }
    }

    async fn accept(
        &self,
        target: &TargetId,
        record: &EventRecord,
    ) -> Result<Acceptance, ContractError> {
        match self {
            Self::Log(invoker) => invoker.accept(target, record).await,
            Self::Udp(invoker) => invoker.accept(target, record).await,
        }
    }
}

/// Create an invoker from configuration
#[instrument(
    name = "splitter_create_invoker",
    skip(config),
    fields(invoker = %config.name, invoker_type = ?config.invoker_type)
)]
pub async fn create_invoker(config: &InvokerConfig) -> Result<AnyInvoker, SplitterError> {
    match config.invoker_type {
        InvokerType::Log => Ok(AnyInvoker::Log(LogInvoker::new(&config.name))),
        InvokerType::Udp => {
            let invoker = UdpInvoker::from_params(&config.name, &config.params)
                .await
                .map_err(|e| SplitterError::invoker_creation(&config.name, e.to_string()))?;
            Ok(AnyInvoker::Udp(invoker))
        }
    }
}
