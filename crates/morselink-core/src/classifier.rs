//! Duration classification for presses and gaps
//!
//! Pure threshold comparisons against a [`TimingProfile`]. Press durations
//! split into dot/dash at the dot threshold (the threshold itself keys a
//! dash); gap durations split four ways at the dot, character, and word
//! thresholds.

use crate::alphabet::Element;
use crate::profile::TimingProfile;

// ----------------------------------------------------------------------------
// Gap Classes
// ----------------------------------------------------------------------------

/// What a measured release-to-press gap means for symbol assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapClass {
    /// Below the dot threshold; elements stay in the current symbol
    Intra,
    /// At or above the dot threshold but below the character gap; the
    /// current symbol closes
    CloseSymbol,
    /// At or above the character gap but below the word gap; the current
    /// symbol closes and a character boundary is recorded
    CloseChar,
    /// At or above the word gap; the current symbol and word both close
    CloseWord,
}

// ----------------------------------------------------------------------------
// Classification
// ----------------------------------------------------------------------------

/// Classify a press duration into a dot or dash
///
/// Presses at or above the ceiling are capped to it first; a capped press
/// always classifies as a dash under a valid profile.
pub fn classify_press(duration_ms: u64, profile: &TimingProfile) -> Element {
    let duration_ms = duration_ms.min(profile.press_ceiling_ms);
    if duration_ms < profile.dot_threshold_ms {
        Element::Dot
    } else {
        Element::Dash
    }
}

/// Classify a gap duration into its boundary meaning
pub fn classify_gap(duration_ms: u64, profile: &TimingProfile) -> GapClass {
    if duration_ms < profile.dot_threshold_ms {
        GapClass::Intra
    } else if duration_ms < profile.char_gap_threshold_ms {
        GapClass::CloseSymbol
    } else if duration_ms < profile.word_gap_threshold_ms {
        GapClass::CloseChar
    } else {
        GapClass::CloseWord
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
