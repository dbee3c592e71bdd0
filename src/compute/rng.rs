//! Seeded random source for the search.
//!
//! The search consumes a 32-bit integer stream and uniform floats in `[0, 1)`.
//! The order of draws is part of the algorithm: a fixed seed reproduces a run
//! exactly.

use rand::prelude::*;

/// Uniform random stream consumed by the genetic operators and hybrids.
pub trait RandomSource {
    /// Next value over the full 32-bit range.
    fn next_u32(&mut self) -> u32;

    /// Next float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Integer in `0..bound` by modulo reduction. `bound` must be non-zero.
    #[inline]
    fn below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        (self.next_u32() as usize) % bound
    }
}

/// Random number generator wrapper for a coloring run.
pub struct ColoringRng {
    rng: StdRng,
}

impl ColoringRng {
    /// Create from seed.
    pub fn new(seed: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(u64::from(seed)),
        }
    }

    /// Create with random seed.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Restart the stream from `seed`.
    pub fn reseed(&mut self, seed: u32) {
        self.rng = StdRng::seed_from_u64(u64::from(seed));
    }
}

impl RandomSource for ColoringRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    #[inline]
    fn next_f64(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}
