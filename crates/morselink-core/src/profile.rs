//! Timing profile: the duration thresholds that drive classification
//!
//! A [`TimingProfile`] carries both the receive-side classification
//! thresholds and the transmit-side dot unit. It is validated once at load
//! time; every classifier and scheduler call assumes a valid profile.

use serde::{Deserialize, Serialize};

use crate::errors::ProfileError;

// Standard Morse ratios, in dot units
pub const DASH_UNITS: u64 = 3;
pub const SYMBOL_GAP_UNITS: u64 = 1;
pub const CHAR_GAP_UNITS: u64 = 3;
pub const WORD_GAP_UNITS: u64 = 7;

/// Duration thresholds for press/gap classification plus the transmit unit
///
/// Invariants (checked by [`TimingProfile::validate`]):
/// `debounce_floor_ms < dot_threshold_ms < char_gap_threshold_ms <
/// word_gap_threshold_ms`, and `dot_duration_ms < dot_threshold_ms` so a
/// device's own transmissions survive a peer running the same profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingProfile {
    /// Press shorter than this is a dot; at or above is a dash
    pub dot_threshold_ms: u64,
    /// Gap at or above this closes the character
    pub char_gap_threshold_ms: u64,
    /// Gap at or above this closes the word; also the idle-flush timeout
    pub word_gap_threshold_ms: u64,
    /// Edges closer than this to the previous accepted edge are noise
    pub debounce_floor_ms: u64,
    /// Transmit-side duration of one dot unit
    pub dot_duration_ms: u64,
    /// Presses beyond this are capped (still classified as dash, never rejected)
    pub press_ceiling_ms: u64,
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self {
            dot_threshold_ms: 200,
            char_gap_threshold_ms: 300,
            word_gap_threshold_ms: 700,
            debounce_floor_ms: 20,
            dot_duration_ms: 100,
            press_ceiling_ms: 2_000,
        }
    }
}

impl TimingProfile {
    /// Profile with generous thresholds for hand keying practice
    pub fn relaxed() -> Self {
        Self {
            dot_threshold_ms: 400,
            char_gap_threshold_ms: 700,
            word_gap_threshold_ms: 1_200,
            debounce_floor_ms: 50,
            dot_duration_ms: 200,
            press_ceiling_ms: 5_000,
        }
    }

    /// Check the ordering invariants; a violating profile must be rejected
    /// at load time, classification over it is undefined.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.dot_duration_ms == 0 {
            return Err(ProfileError::ZeroDuration {
                field: "dot_duration_ms",
            });
        }
        if self.dot_threshold_ms == 0 {
            return Err(ProfileError::ZeroDuration {
                field: "dot_threshold_ms",
            });
        }
        if !(self.dot_threshold_ms < self.char_gap_threshold_ms
            && self.char_gap_threshold_ms < self.word_gap_threshold_ms)
        {
            return Err(ProfileError::ThresholdOrder {
                dot_ms: self.dot_threshold_ms,
                char_gap_ms: self.char_gap_threshold_ms,
                word_gap_ms: self.word_gap_threshold_ms,
            });
        }
        if self.debounce_floor_ms >= self.dot_threshold_ms {
            return Err(ProfileError::DebounceFloor {
                debounce_ms: self.debounce_floor_ms,
                dot_ms: self.dot_threshold_ms,
            });
        }
        if self.dot_duration_ms >= self.dot_threshold_ms {
            return Err(ProfileError::UnitAboveThreshold {
                unit_ms: self.dot_duration_ms,
                dot_ms: self.dot_threshold_ms,
            });
        }
        if self.press_ceiling_ms <= self.dot_threshold_ms {
            return Err(ProfileError::CeilingBelowThreshold {
                ceiling_ms: self.press_ceiling_ms,
                dot_ms: self.dot_threshold_ms,
            });
        }
        Ok(())
    }

    // Transmit-side interval durations, per the standard 1:3 ratios

    pub fn dash_duration_ms(&self) -> u64 {
        self.dot_duration_ms * DASH_UNITS
    }

    pub fn symbol_gap_ms(&self) -> u64 {
        self.dot_duration_ms * SYMBOL_GAP_UNITS
    }

    pub fn char_gap_ms(&self) -> u64 {
        self.dot_duration_ms * CHAR_GAP_UNITS
    }

    pub fn word_gap_ms(&self) -> u64 {
        self.dot_duration_ms * WORD_GAP_UNITS
    }

    /// Poll cadence for the sampling loop: half the debounce floor, so no
    /// debounce-relevant edge can fall between two ticks.
    pub fn tick_interval_ms(&self) -> u64 {
        (self.debounce_floor_ms / 2).max(1)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
