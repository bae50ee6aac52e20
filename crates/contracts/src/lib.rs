//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Routing Model
//! - Traffic split is decided per record from one uniform sample in [0, 100)
//! - `sample < canary_percent` routes canary, otherwise stable (strict `<`)
//! - Dispatch acceptance is decoupled from downstream execution (fire-and-forget)

mod blueprint;
mod error;
mod invoker;
mod outcome;
mod random;
mod record;
mod routing;
mod target;

pub use blueprint::*;
pub use error::*;
pub use invoker::{Acceptance, Invoker};
pub use outcome::*;
pub use random::RandomSource;
pub use record::EventRecord;
pub use routing::RoutingConfig;
pub use target::{Route, TargetId};
