//! RandomSource implementations
//!
//! Production routing uses `SystemRandom`; `SeededRandom` and
//! `FixedSequence` make routing decisions reproducible.

use contracts::RandomSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// OS-seeded uniform source, the production default
pub struct SystemRandom {
    rng: StdRng,
}

impl SystemRandom {
    /// Create a new OS-seeded source
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SystemRandom {
    fn next_percent(&mut self) -> f64 {
        self.rng.random_range(0.0..100.0)
    }
}

/// Deterministic source seeded from a fixed value
///
/// Same seed, same sequence of routing decisions.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Create a source from a 64-bit seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_percent(&mut self) -> f64 {
        self.rng.random_range(0.0..100.0)
    }
}

/// Fixed sample sequence, cycling when exhausted (test support)
pub struct FixedSequence {
    samples: Vec<f64>,
    cursor: usize,
}

impl FixedSequence {
    /// Create a source replaying the given samples in order
    ///
    /// # Panics
    /// Panics when `samples` is empty; a cycling source with nothing to
    /// replay has no meaningful behavior.
    pub fn new(samples: impl IntoIterator<Item = f64>) -> Self {
        let samples: Vec<f64> = samples.into_iter().collect();
        assert!(!samples.is_empty(), "FixedSequence needs at least one sample");
        Self { samples, cursor: 0 }
    }
}

impl RandomSource for FixedSequence {
    fn next_percent(&mut self) -> f64 {
        let sample = self.samples[self.cursor % self.samples.len()];
        self.cursor += 1;
        sample
    }
}
