//! Debounced input sampling
//!
//! Converts a polled raw switch level into clean edge events. Contact bounce
//! after an accepted edge is absorbed by a holdoff window: a level change
//! inside the window records nothing, and only a level that still differs
//! once the window elapses produces an edge, stamped at the poll that
//! confirmed it.

use crate::profile::TimingProfile;
use crate::types::{Edge, Level, Timestamp, TimingEvent};

/// Edge detector with a debounce holdoff
///
/// Feed it every poll of the raw input; it returns an event only when a
/// stable level change is confirmed.
#[derive(Debug, Clone)]
pub struct DebouncedSampler {
    debounce_floor_ms: u64,
    stable_level: Level,
    last_edge_at: Option<Timestamp>,
}

impl DebouncedSampler {
    /// Sampler assuming the switch starts released
    pub fn new(profile: &TimingProfile) -> Self {
        Self {
            debounce_floor_ms: profile.debounce_floor_ms,
            stable_level: Level::Low,
            last_edge_at: None,
        }
    }

    /// The most recently confirmed level
    pub fn level(&self) -> Level {
        self.stable_level
    }

    /// Observe one raw poll; returns an edge when a change is confirmed
    pub fn poll(&mut self, raw_high: bool, now: Timestamp) -> Option<TimingEvent> {
        let raw = Level::from_bool(raw_high);
        if raw == self.stable_level {
            return None;
        }
        if let Some(last) = self.last_edge_at {
            if now.since(last) < self.debounce_floor_ms {
                // Inside the holdoff window; treat as bounce
                return None;
            }
        }
        self.stable_level = raw;
        self.last_edge_at = Some(now);
        Some(TimingEvent::new(Edge::to(raw), now))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
