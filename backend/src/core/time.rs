//! Day clock for the simulation
//!
//! The vending simulation advances in whole days. Day 0 means "not started";
//! the first call to [`DayClock::advance_day`] opens day 1.

use serde::{Deserialize, Serialize};

/// Tracks the current simulated day against the run length
///
/// # Example
/// ```
/// use vending_sim_core_rs::DayClock;
///
/// let mut clock = DayClock::new(30);
/// assert_eq!(clock.current_day(), 0);
///
/// clock.advance_day();
/// assert_eq!(clock.current_day(), 1);
/// assert!(!clock.is_final_day());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayClock {
    /// Current day, 1-based once the run has started
    current_day: u32,
    /// Last day of the run
    max_days: u32,
}

impl DayClock {
    /// Create a clock for a run of `max_days` days
    ///
    /// # Panics
    /// Panics if `max_days` is zero
    pub fn new(max_days: u32) -> Self {
        assert!(max_days > 0, "max_days must be positive");
        Self {
            current_day: 0,
            max_days,
        }
    }

    /// Restore a clock at a given day (checkpoint restore)
    pub fn at_day(current_day: u32, max_days: u32) -> Self {
        let mut clock = Self::new(max_days);
        clock.current_day = current_day.min(max_days);
        clock
    }

    /// Move to the next day
    pub fn advance_day(&mut self) {
        self.current_day += 1;
    }

    /// Current day (0 before the first day starts)
    pub fn current_day(&self) -> u32 {
        self.current_day
    }

    /// Total days in the run
    pub fn max_days(&self) -> u32 {
        self.max_days
    }

    /// True on the last day of the run
    pub fn is_final_day(&self) -> bool {
        self.current_day >= self.max_days
    }

    /// Days left after the current one
    pub fn days_remaining(&self) -> u32 {
        self.max_days.saturating_sub(self.current_day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "max_days must be positive")]
    fn test_zero_days_panics() {
        DayClock::new(0);
    }

    #[test]
    fn test_final_day_detection() {
        let mut clock = DayClock::new(3);
        clock.advance_day();
        clock.advance_day();
        assert!(!clock.is_final_day());
        assert_eq!(clock.days_remaining(), 1);

        clock.advance_day();
        assert!(clock.is_final_day());
        assert_eq!(clock.days_remaining(), 0);
    }

    #[test]
    fn test_at_day_clamps_to_run_length() {
        let clock = DayClock::at_day(40, 30);
        assert_eq!(clock.current_day(), 30);
    }
}
