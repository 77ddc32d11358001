//! Seeded random source
//!
//! Every engine draws from its own `RandomSource` so that a seed fully
//! determines generation (pipe gaps, word placement, color sequences).

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Seedable, reproducible random generator
#[derive(Debug, Clone)]
pub struct RandomSource {
    seed: u64,
    rng: Pcg32,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed this source was created (or last reseeded) with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the stream from a new seed
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    /// Uniform index in `0..n` (returns 0 when `n == 0`)
    pub fn index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.rng.random_range(0..n)
    }

    /// Uniform float in `[lo, hi)`
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..hi)
    }

    /// Uniform uppercase ASCII letter
    pub fn letter(&mut self) -> char {
        (b'A' + self.rng.random_range(0..26u8)) as char
    }
}
