//! RandomSource trait - injectable routing randomness
//!
//! Routing decisions consume exactly one sample per record, so substituting
//! a deterministic source makes decisions reproducible in tests.

/// Source of uniform routing samples.
///
/// Implementations must yield values uniformly distributed over `[0, 100)`
/// with no correlation between successive draws (for production sources).
pub trait RandomSource {
    /// Next uniform sample in `[0, 100)`
    fn next_percent(&mut self) -> f64;
}
