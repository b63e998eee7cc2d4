//! Incremental receive decoding
//!
//! Turns a stream of debounced edges (local key) or remote signals into
//! decoded words. Press durations classify into elements on the falling
//! edge; the silence before each rising edge classifies into a boundary.
//! Because a word gap is only observable when the next press arrives, an
//! idle timeout flushes whatever is pending after the line has been quiet
//! for a full word gap.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::alphabet::Alphabet;
use crate::classifier::{classify_gap, classify_press, GapClass};
use crate::codec::TokenDecoder;
use crate::profile::TimingProfile;
use crate::types::{Edge, PulseEvent, RemoteSignal, Timestamp, TimingEvent};

/// Edge/gap stream decoder for one signal source
#[derive(Debug, Clone)]
pub struct ReceiveDecoder {
    profile: TimingProfile,
    decoder: TokenDecoder,
    press_started: Option<Timestamp>,
    last_release: Option<Timestamp>,
    last_activity: Option<Timestamp>,
}

impl ReceiveDecoder {
    pub fn new(profile: TimingProfile, alphabet: Arc<Alphabet>) -> Self {
        Self {
            profile,
            decoder: TokenDecoder::new(alphabet),
            press_started: None,
            last_release: None,
            last_activity: None,
        }
    }

    /// True while a press is open or decoded state awaits a boundary
    pub fn is_active(&self) -> bool {
        self.press_started.is_some() || self.decoder.is_pending()
    }

    /// Feed one debounced edge; returns a word when one completes
    pub fn on_event(&mut self, event: TimingEvent) -> Option<String> {
        self.last_activity = Some(event.timestamp);
        match event.edge {
            Edge::Rising => {
                let completed = match self.last_release {
                    Some(release) => self.close_gap(event.timestamp.since(release)),
                    None => None,
                };
                self.press_started = Some(event.timestamp);
                completed
            }
            Edge::Falling => {
                // A release without a recorded press can only happen at
                // startup; there is no duration to classify.
                if let Some(start) = self.press_started.take() {
                    let duration = event.timestamp.since(start);
                    let element = classify_press(duration, &self.profile);
                    trace!(duration_ms = duration, ?element, "classified press");
                    self.decoder.push_element(element);
                }
                self.last_release = Some(event.timestamp);
                None
            }
        }
    }

    /// Feed one remote signal observed at `now`; returns a word when one
    /// completes
    ///
    /// Pulse signals carry durations directly and need no edge pairing;
    /// high pulses classify as presses, low pulses as gaps. Edge signals
    /// keep their embedded timestamps for press/gap durations (internally
    /// consistent on the peer's clock), but idle timing is re-anchored to
    /// `now`: the peer's clock shares no origin with ours, so comparing its
    /// timestamps against local ticks would flush too early or never.
    pub fn on_signal(&mut self, signal: RemoteSignal, now: Timestamp) -> Option<String> {
        match signal {
            RemoteSignal::Edge(event) => {
                let word = self.on_event(event);
                self.last_activity = Some(now);
                word
            }
            RemoteSignal::Pulse(PulseEvent { level, duration_ms }) => {
                self.last_activity = Some(now);
                if level.is_high() {
                    let element = classify_press(duration_ms, &self.profile);
                    self.decoder.push_element(element);
                    None
                } else {
                    self.close_gap(duration_ms)
                }
            }
        }
    }

    /// Flush on idle: the word gap has elapsed with no new activity
    pub fn on_tick(&mut self, now: Timestamp) -> Option<String> {
        if self.press_started.is_some() || !self.decoder.is_pending() {
            return None;
        }
        let last = self.last_activity?;
        if now.since(last) >= self.profile.word_gap_threshold_ms {
            debug!("idle timeout, flushing pending word");
            self.last_activity = None;
            self.last_release = None;
            return self.decoder.flush();
        }
        None
    }

    /// Drop any open press and drain pending decode state
    pub fn flush(&mut self) -> Option<String> {
        self.press_started = None;
        self.last_release = None;
        self.last_activity = None;
        self.decoder.flush()
    }

    fn close_gap(&mut self, duration_ms: u64) -> Option<String> {
        let class = classify_gap(duration_ms, &self.profile);
        trace!(duration_ms, ?class, "classified gap");
        match class {
            GapClass::Intra => None,
            GapClass::CloseSymbol | GapClass::CloseChar => {
                self.decoder.close_symbol();
                None
            }
            GapClass::CloseWord => self.decoder.close_word(),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Level;

    fn decoder() -> ReceiveDecoder {
        ReceiveDecoder::new(TimingProfile::default(), Alphabet::canonical())
    }

    fn ts(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    fn press(d: &mut ReceiveDecoder, at: u64, duration: u64) -> Option<String> {
        let mut word = d.on_event(TimingEvent::new(Edge::Rising, ts(at)));
        let release = d.on_event(TimingEvent::new(Edge::Falling, ts(at + duration)));
        word = word.or(release);
        word
    }

    #[test]
    fn test_keyed_word() {
        // Default profile: dot threshold 200, char gap 300, word gap 700.
        // ".-" then "-" keyed with explicit gaps decodes "AT" on the next
        // word-length silence.
        let mut d = decoder();
        assert_eq!(press(&mut d, 0, 150), None); // dot
        assert_eq!(press(&mut d, 250, 650), None); // intra gap 100, dash
        assert_eq!(press(&mut d, 1300, 650), None); // gap 400 closes char
        // Next press 1500ms after release closes the word
        let word = d.on_event(TimingEvent::new(Edge::Rising, ts(3450)));
        assert_eq!(word, Some("AT".to_string()));
    }

    #[test]
    fn test_idle_flush() {
        let mut d = decoder();
        press(&mut d, 0, 150); // "E"
        assert!(d.is_active());
        // Quiet for less than a word gap: nothing yet
        assert_eq!(d.on_tick(ts(500)), None);
        // Word gap elapsed
        assert_eq!(d.on_tick(ts(850)), Some("E".to_string()));
        assert!(!d.is_active());
        // Further ticks emit nothing
        assert_eq!(d.on_tick(ts(2000)), None);
    }

    #[test]
    fn test_tick_during_press_does_not_flush() {
        let mut d = decoder();
        press(&mut d, 0, 150);
        d.on_event(TimingEvent::new(Edge::Rising, ts(400)));
        assert_eq!(d.on_tick(ts(5000)), None);
    }

    #[test]
    fn test_remote_pulse_stream() {
        // The scheduler's own output for "E E" decodes back
        let mut d = decoder();
        let unit = TimingProfile::default().dot_duration_ms;
        assert_eq!(
            d.on_signal(RemoteSignal::Pulse(PulseEvent::high(unit)), ts(0)),
            None
        );
        assert_eq!(
            d.on_signal(RemoteSignal::Pulse(PulseEvent::low(unit * 7)), ts(100)),
            Some("E".to_string())
        );
        assert_eq!(
            d.on_signal(RemoteSignal::Pulse(PulseEvent::high(unit)), ts(900)),
            None
        );
        assert_eq!(d.flush(), Some("E".to_string()));
    }

    #[test]
    fn test_remote_pulse_stream_idle_flushes() {
        let mut d = decoder();
        d.on_signal(RemoteSignal::Pulse(PulseEvent::high(100)), ts(0));
        // Last pulse arrived at t=100; flush fires a word gap later
        d.on_signal(RemoteSignal::Pulse(PulseEvent::high(100)), ts(100));
        assert_eq!(d.on_tick(ts(500)), None);
        assert_eq!(d.on_tick(ts(800)), Some("I".to_string()));
    }

    #[test]
    fn test_remote_edge_idle_flush_uses_local_clock() {
        // Peer edges are stamped on the peer's clock, which shares no
        // origin with ours. Edges at 0/100ms arriving when our clock reads
        // an hour must neither flush early nor park forever.
        let mut d = decoder();
        let local = 3_600_000u64;
        d.on_signal(
            RemoteSignal::Edge(TimingEvent::new(Edge::Rising, ts(0))),
            ts(local),
        );
        d.on_signal(
            RemoteSignal::Edge(TimingEvent::new(Edge::Falling, ts(100))),
            ts(local + 100),
        );
        // Still inside the word gap on the local clock
        assert_eq!(d.on_tick(ts(local + 210)), None);
        // Word gap elapsed locally: the trailing word flushes
        assert_eq!(d.on_tick(ts(local + 800)), Some("E".to_string()));
    }

    #[test]
    fn test_remote_edge_from_clock_ahead_of_ours_still_flushes() {
        let mut d = decoder();
        // Peer clock reads far ahead of ours
        d.on_signal(
            RemoteSignal::Edge(TimingEvent::new(Edge::Rising, ts(9_000_000))),
            ts(500),
        );
        d.on_signal(
            RemoteSignal::Edge(TimingEvent::new(Edge::Falling, ts(9_000_100))),
            ts(600),
        );
        assert_eq!(d.on_tick(ts(1300)), Some("E".to_string()));
    }

    #[test]
    fn test_remote_pulse_levels_respected() {
        let mut d = decoder();
        // A low pulse before anything pending does nothing
        assert_eq!(
            d.on_signal(
                RemoteSignal::Pulse(PulseEvent {
                    level: Level::Low,
                    duration_ms: 1000,
                }),
                ts(0)
            ),
            None
        );
        assert!(!d.is_active());
    }

    #[test]
    fn test_flush_drops_open_press() {
        let mut d = decoder();
        press(&mut d, 0, 150);
        d.on_event(TimingEvent::new(Edge::Rising, ts(400)));
        assert_eq!(d.flush(), Some("E".to_string()));
        assert!(!d.is_active());
    }
}
