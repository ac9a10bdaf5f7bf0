//! Injectable random-number source for the music generator.
//!
//! Generation code only ever asks for uniform values in `[0, 1)`, so tests can
//! substitute a fixed value and get a reproducible composition.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::params::ValueRange;

/// Source of uniform random values in `[0, 1)`
pub trait RandomSource {
    /// Next value in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// Uniform draw from `range`
    fn uniform(&mut self, range: ValueRange) -> f64 {
        range.at(self.next_unit())
    }

    /// Uniform draw from `range`, floored to an integer
    fn uniform_floor(&mut self, range: ValueRange) -> i32 {
        self.uniform(range).floor() as i32
    }

    /// `true` with the given probability
    fn chance(&mut self, probability: f64) -> bool {
        self.next_unit() < probability
    }

    /// Uniform index in `0..len` (`len` must be non-zero)
    fn index(&mut self, len: usize) -> usize {
        ((self.next_unit() * len as f64) as usize).min(len - 1)
    }

    /// Uniform choice from a non-empty slice
    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.index(items.len())]
    }
}

/// PCG-backed source; the seed is kept so a session can be replayed
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: Pcg32,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed from the thread-local entropy source
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Always returns the same value (clamped into `[0, 1)`)
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(f64);

impl FixedRandom {
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0 - f64::EPSILON))
    }
}

impl RandomSource for FixedRandom {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}
