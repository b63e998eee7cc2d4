//! Transmit scheduling
//!
//! Expands an encoded symbol sequence into an alternating high/low pulse
//! train using the 1/3/1/3/7 unit structure: dots are one unit high, dashes
//! three; elements inside a symbol are separated by one unit low, symbols by
//! three, words by seven. The output carries no trailing silence so a
//! transmission ends the instant its last element drops.

use crate::alphabet::Element;
use crate::codec::EncodedUnit;
use crate::profile::TimingProfile;
use crate::types::PulseEvent;

/// Expand encoded units into a pulse train
///
/// Consecutive low intervals never occur; a word break replaces the symbol
/// gap that would otherwise follow the preceding symbol.
pub fn schedule(units: &[EncodedUnit], profile: &TimingProfile) -> Vec<PulseEvent> {
    let mut pulses = Vec::new();
    let mut pending_gap_ms: Option<u64> = None;

    for unit in units {
        match unit {
            EncodedUnit::WordBreak => {
                pending_gap_ms = Some(profile.word_gap_ms());
            }
            EncodedUnit::Symbol(symbol) => {
                if symbol.is_empty() {
                    continue;
                }
                if !pulses.is_empty() {
                    let gap = pending_gap_ms.take().unwrap_or(profile.char_gap_ms());
                    pulses.push(PulseEvent::low(gap));
                } else {
                    pending_gap_ms = None;
                }
                for (i, element) in symbol.elements().iter().enumerate() {
                    if i > 0 {
                        pulses.push(PulseEvent::low(profile.symbol_gap_ms()));
                    }
                    let high_ms = match element {
                        Element::Dot => profile.dot_duration_ms,
                        Element::Dash => profile.dash_duration_ms(),
                    };
                    pulses.push(PulseEvent::high(high_ms));
                }
            }
        }
    }

    pulses
}

/// Total wall time a pulse train occupies
pub fn total_duration_ms(pulses: &[PulseEvent]) -> u64 {
    pulses.iter().map(|p| p.duration_ms).sum()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use crate::codec::{Codec, EncodePolicy};
    use crate::types::Level;

    fn pulses_for(text: &str) -> Vec<PulseEvent> {
        let codec = Codec::new(Alphabet::canonical(), EncodePolicy::Skip);
        schedule(&codec.encode(text).unwrap(), &TimingProfile::default())
    }

    fn shape(pulses: &[PulseEvent]) -> Vec<(Level, u64)> {
        pulses.iter().map(|p| (p.level, p.duration_ms)).collect()
    }

    #[test]
    fn test_single_letter_structure() {
        // "A" = ".-": dot, symbol gap, dash
        let profile = TimingProfile::default();
        let unit = profile.dot_duration_ms;
        assert_eq!(
            shape(&pulses_for("A")),
            vec![
                (Level::High, unit),
                (Level::Low, unit),
                (Level::High, unit * 3),
            ]
        );
    }

    #[test]
    fn test_character_gap_between_symbols() {
        // "EE": dot, char gap, dot
        let profile = TimingProfile::default();
        let unit = profile.dot_duration_ms;
        assert_eq!(
            shape(&pulses_for("EE")),
            vec![
                (Level::High, unit),
                (Level::Low, unit * 3),
                (Level::High, unit),
            ]
        );
    }

    #[test]
    fn test_word_break_replaces_character_gap() {
        // "E E": dot, word gap, dot
        let profile = TimingProfile::default();
        let unit = profile.dot_duration_ms;
        assert_eq!(
            shape(&pulses_for("E E")),
            vec![
                (Level::High, unit),
                (Level::Low, unit * 7),
                (Level::High, unit),
            ]
        );
    }

    #[test]
    fn test_no_leading_or_trailing_silence() {
        for text in ["A", "SOS", "HI YO"] {
            let pulses = pulses_for(text);
            assert_eq!(pulses.first().unwrap().level, Level::High, "{text}");
            assert_eq!(pulses.last().unwrap().level, Level::High, "{text}");
        }
    }

    #[test]
    fn test_levels_alternate() {
        let pulses = pulses_for("PARIS TEST");
        for pair in pulses.windows(2) {
            assert_ne!(pair[0].level, pair[1].level);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(pulses_for("").is_empty());
        assert!(pulses_for("   ").is_empty());
    }

    #[test]
    fn test_total_duration() {
        // "E" is a single one-unit pulse
        let profile = TimingProfile::default();
        assert_eq!(total_duration_ms(&pulses_for("E")), profile.dot_duration_ms);
    }
}
