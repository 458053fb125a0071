//! Injectable randomness
//!
//! Every random decision in the simulation goes through [`RandomSource`].
//! Any `rand` generator works (the game uses a seeded `ChaCha8Rng`);
//! tests use [`ScriptedRandom`] to replay an exact sequence of rolls.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub trait RandomSource {
    /// Uniform value in `[0, 1)`
    fn next_f32(&mut self) -> f32;

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Uniform value in `[lo, hi)`
    fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }

    /// Uniform index in `0..len`; `len` must be non-zero
    fn index(&mut self, len: usize) -> usize {
        ((self.next_f32() * len as f32) as usize).min(len.saturating_sub(1))
    }

    /// Uniform integer in `lo..=hi`
    fn range_u64(&mut self, lo: u64, hi: u64) -> u64 {
        if hi <= lo {
            return lo;
        }
        lo + ((self.next_f32() * (hi - lo + 1) as f32) as u64).min(hi - lo)
    }
}

impl<R: rand::RngCore> RandomSource for R {
    fn next_f32(&mut self) -> f32 {
        self.gen::<f32>()
    }
}

/// Seeded generator used by the game
pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Replays a fixed list of rolls, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f32>) -> Self {
        assert!(!values.is_empty(), "ScriptedRandom needs at least one value");
        Self { values, cursor: 0 }
    }

    /// Always rolls the same value
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    pub fn rolls_taken(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f32(&mut self) -> f32 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 0.999_999)
    }
}
