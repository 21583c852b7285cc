//! Deterministic random number generation
//!
//! All randomness in the simulator (demand jitter, supplier delays) goes
//! through the [`RandomSource`] trait. Production runs use the seeded
//! xorshift64* [`RngManager`]; tests inject a [`ScriptedSource`] to pin the
//! exact values drawn.

mod scripted;
mod xorshift;

pub use scripted::ScriptedSource;
pub use xorshift::RngManager;

/// Source of uniform random numbers in [0.0, 1.0)
///
/// Implementors only provide `next_f64`; the derived helpers keep every
/// consumer drawing exactly one value per call so scripted sources line up
/// with the draws the engine makes.
pub trait RandomSource {
    /// Next value in [0.0, 1.0)
    fn next_f64(&mut self) -> f64;

    /// Uniform value in [low, high)
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    /// Uniform integer in [min, max] (one draw)
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f64;
        let offset = (self.next_f64() * span).floor() as u32;
        min + offset.min(max - min)
    }

    /// Raw state for checkpointing, if this source can be resumed
    fn checkpoint_state(&self) -> Option<u64> {
        None
    }
}
