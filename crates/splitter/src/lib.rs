//! # Splitter
//!
//! Canary traffic splitting module.
//!
//! Responsibilities:
//! - Decide stable/canary per record via weighted random choice
//! - Fire-and-forget dispatch through the `Invoker` collaborator
//! - Isolate per-record failures, never abort the batch
//! - Report one `DispatchOutcome` per record, in input order

pub mod error;
pub mod invokers;
pub mod metrics;
pub mod random;
pub mod splitter;

pub use contracts::{DispatchOutcome, EventRecord, Invoker, RoutingConfig};
pub use error::SplitterError;
pub use invokers::{create_invoker, AnyInvoker, LogInvoker, MockInvoker, UdpInvoker};
pub use metrics::{MetricsSnapshot, RouteMetrics};
pub use random::{FixedSequence, SeededRandom, SystemRandom};
pub use splitter::{create_splitter, SplitterConfig, TrafficSplitter};
