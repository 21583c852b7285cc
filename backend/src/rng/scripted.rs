//! Replaying random source for tests and demos

use super::RandomSource;

/// Random source that cycles through a fixed list of values
///
/// Values are clamped into [0.0, 1.0). After the last value the sequence
/// starts over.
///
/// # Example
/// ```
/// use vending_sim_core_rs::rng::{RandomSource, ScriptedSource};
///
/// let mut source = ScriptedSource::new(vec![0.0, 0.5]);
/// assert_eq!(source.next_f64(), 0.0);
/// assert_eq!(source.next_f64(), 0.5);
/// assert_eq!(source.next_f64(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    /// # Panics
    /// Panics if `values` is empty
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "scripted source needs at least one value");
        let values = values
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }

    /// Source that always returns the same value
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of values drawn so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn next_f64(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "at least one value")]
    fn test_empty_script_panics() {
        ScriptedSource::new(vec![]);
    }

    #[test]
    fn test_values_are_clamped() {
        let mut source = ScriptedSource::new(vec![-1.0, 2.0]);
        assert_eq!(source.next_f64(), 0.0);
        assert!(source.next_f64() < 1.0);
    }

    #[test]
    fn test_range_inclusive_covers_both_ends() {
        let mut low = ScriptedSource::constant(0.0);
        let mut high = ScriptedSource::constant(0.999);
        assert_eq!(low.range_inclusive(0, 1), 0);
        assert_eq!(high.range_inclusive(0, 1), 1);
        assert_eq!(low.draws(), 1);
    }
}
