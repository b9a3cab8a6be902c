//! Shared meter state.
//!
//! Thread-safe current/peak levels stored as f32 bit patterns in atomics.
//! Written by the metering loop, read by the IPC handler, reset by the
//! display layer's reset_peak command.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use super::level::update_peak;

/// Latest and peak dB readings, shareable via `Arc`.
#[derive(Debug)]
pub struct MeterState {
    level_bits: AtomicU32,
    peak_bits: AtomicU32,
}

impl MeterState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Most recent dB reading.
    pub fn current_level(&self) -> f32 {
        f32::from_bits(self.level_bits.load(Ordering::Acquire))
    }

    /// Maximum dB reading observed since the last reset.
    pub fn peak_level(&self) -> f32 {
        f32::from_bits(self.peak_bits.load(Ordering::Acquire))
    }

    /// Record a new reading and fold it into the peak.
    /// Returns the stored (level, peak) pair.
    ///
    /// The peak fold is a compare-exchange loop so that a reading observed
    /// after a concurrent `reset_peak` wins and becomes the new peak.
    pub fn update(&self, db: f32) -> (f32, f32) {
        self.level_bits.store(db.to_bits(), Ordering::Release);
        let mut prior = self.peak_bits.load(Ordering::Acquire);
        loop {
            let folded = update_peak(db, f32::from_bits(prior));
            if folded == f32::from_bits(prior) {
                return (db, folded);
            }
            match self.peak_bits.compare_exchange(
                prior,
                folded.to_bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return (db, folded),
                Err(actual) => prior = actual,
            }
        }
    }

    /// Set the peak back to zero regardless of prior history.
    pub fn reset_peak(&self) {
        self.peak_bits.store(0f32.to_bits(), Ordering::Release);
    }
}

impl Default for MeterState {
    fn default() -> Self {
        Self {
            level_bits: AtomicU32::new(0f32.to_bits()),
            peak_bits: AtomicU32::new(0f32.to_bits()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_stores_level_and_peak() {
        let state = MeterState::new();
        let (db, peak) = state.update(42.5);
        assert_eq!(db, 42.5);
        assert_eq!(peak, 42.5);
        assert_eq!(state.current_level(), 42.5);
        assert_eq!(state.peak_level(), 42.5);
    }

    #[test]
    fn peak_survives_quieter_readings() {
        let state = MeterState::new();
        state.update(71.0);
        let (db, peak) = state.update(30.0);
        assert_eq!(db, 30.0);
        assert_eq!(peak, 71.0);
    }

    #[test]
    fn repeated_reading_leaves_peak_unchanged() {
        let state = MeterState::new();
        state.update(55.0);
        state.update(55.0);
        state.update(55.0);
        assert_eq!(state.peak_level(), 55.0);
    }

    #[test]
    fn reset_clears_peak_and_next_reading_becomes_it() {
        let state = MeterState::new();
        state.update(80.0);
        state.reset_peak();
        assert_eq!(state.peak_level(), 0.0);
        let (_, peak) = state.update(12.0);
        assert_eq!(peak, 12.0);
    }

    #[test]
    fn final_peak_is_order_independent() {
        let a = MeterState::new();
        a.update(48.0);
        a.update(73.5);
        let b = MeterState::new();
        b.update(73.5);
        b.update(48.0);
        assert_eq!(a.peak_level(), b.peak_level());
    }
}
