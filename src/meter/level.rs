//! Decibel level estimation.
//!
//! Computes a calibrated dB reading from one block of signed 16-bit samples:
//! RMS, floored at 1.0 so the logarithm stays finite, then
//! `20 * log10(rms / 32768) + 90`. The offset calibrates 0 dB to the
//! silence floor rather than to full-scale amplitude; band thresholds
//! downstream assume this exact calibration, so the constants are not
//! meant to be tuned independently.

/// Full-scale reference for signed 16-bit samples.
const FULL_SCALE: f64 = 32768.0;

/// RMS floor applied before the logarithm.
const MIN_RMS: f64 = 1.0;

/// Empirical calibration offset added to the log term.
const CALIBRATION_OFFSET_DB: f64 = 90.0;

/// Level above which the display layer shows the high-noise warning.
pub const WARN_THRESHOLD_DB: f32 = 70.0;

const ELEVATED_THRESHOLD_DB: f32 = 60.0;
const NORMAL_THRESHOLD_DB: f32 = 40.0;

/// The reading produced by an all-zero (or empty) block.
pub fn silence_floor() -> f32 {
    (20.0 * (MIN_RMS / FULL_SCALE).log10() + CALIBRATION_OFFSET_DB) as f32
}

/// Compute the calibrated dB level of one sample block.
///
/// An empty block reads as the silence floor, never an error: the metering
/// loop runs in real time and a starved capture source must not crash it.
/// The result is always finite.
pub fn compute_level(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return silence_floor();
    }
    let sum: f64 = samples.iter().map(|&s| s as f64 * s as f64).sum();
    let rms = (sum / samples.len() as f64).sqrt().max(MIN_RMS);
    (20.0 * (rms / FULL_SCALE).log10() + CALIBRATION_OFFSET_DB) as f32
}

/// Fold a new reading into the running peak.
pub fn update_peak(current: f32, prior_peak: f32) -> f32 {
    current.max(prior_peak)
}

/// Loudness band for a dB reading. A pure threshold ladder, no hysteresis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelBand {
    Quiet,
    Normal,
    Elevated,
    Alert,
}

impl LevelBand {
    pub fn classify(db: f32) -> Self {
        if db > WARN_THRESHOLD_DB {
            Self::Alert
        } else if db > ELEVATED_THRESHOLD_DB {
            Self::Elevated
        } else if db > NORMAL_THRESHOLD_DB {
            Self::Normal
        } else {
            Self::Quiet
        }
    }

    /// Lowercase name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quiet => "quiet",
            Self::Normal => "normal",
            Self::Elevated => "elevated",
            Self::Alert => "alert",
        }
    }
}

impl std::fmt::Display for LevelBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
