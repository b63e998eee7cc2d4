//! Core types for the MorseLink engine
//!
//! This module defines the fundamental types used throughout the engine,
//! using newtype patterns for semantic validation and type safety. Time is
//! represented as monotonic milliseconds behind the [`Clock`] trait so every
//! timing-sensitive component can run against a simulated clock in tests.

use core::fmt;
use core::ops::Sub;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ----------------------------------------------------------------------------
// Signal Levels and Edges
// ----------------------------------------------------------------------------

/// Logical level of the input or output line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    High,
    Low,
}

impl Level {
    pub fn from_bool(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }

    pub fn is_high(&self) -> bool {
        matches!(self, Level::High)
    }
}

/// Direction of a level transition on the input line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Rising,
    Falling,
}

impl Edge {
    /// The edge produced when the line settles at `level`
    pub fn to(level: Level) -> Self {
        match level {
            Level::High => Edge::Rising,
            Level::Low => Edge::Falling,
        }
    }
}

// ----------------------------------------------------------------------------
// Timestamp
// ----------------------------------------------------------------------------

/// Monotonic millisecond timestamp
///
/// Timestamps are only meaningful relative to other timestamps from the same
/// [`Clock`]; they carry no epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier` (saturating)
    pub fn since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl Sub for Timestamp {
    type Output = u64;

    fn sub(self, earlier: Timestamp) -> u64 {
        self.since(earlier)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

// ----------------------------------------------------------------------------
// Clock Trait
// ----------------------------------------------------------------------------

/// Trait for providing monotonic timestamps
///
/// Production code uses [`SystemClock`]; tests use [`ManualClock`] to step
/// time deterministically without real hardware.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Monotonic clock backed by the tokio runtime clock
///
/// Built on `tokio::time::Instant` so tests running under a paused tokio
/// clock observe the same virtual time the scheduler does.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: tokio::time::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.origin.elapsed().as_millis() as u64)
    }
}

/// Hand-stepped clock for tests
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn starting_at(millis: u64) -> Arc<Self> {
        Arc::new(Self {
            millis: AtomicU64::new(millis),
        })
    }

    pub fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

// ----------------------------------------------------------------------------
// Timing Events
// ----------------------------------------------------------------------------

/// A debounced edge observed on the input line
///
/// Produced by the sampler, consumed once by the receive decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingEvent {
    pub edge: Edge,
    pub timestamp: Timestamp,
}

impl TimingEvent {
    pub fn new(edge: Edge, timestamp: Timestamp) -> Self {
        Self { edge, timestamp }
    }
}

// ----------------------------------------------------------------------------
// Morse Tokens
// ----------------------------------------------------------------------------

/// One element of a classified Morse token stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MorseToken {
    Dot,
    Dash,
    /// Gap between elements of the same character (no emission)
    SymbolGap,
    /// Gap that closes the current character
    CharGap,
    /// Gap that closes the current word
    WordGap,
}

// ----------------------------------------------------------------------------
// Pulse Events (wire format)
// ----------------------------------------------------------------------------

/// One transmitted interval: the line was held at `level` for `duration_ms`
///
/// This is the event stream exchanged with the peer (one event per interval,
/// in order); the transport is responsible for delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulseEvent {
    pub level: Level,
    pub duration_ms: u64,
}

impl PulseEvent {
    pub fn high(duration_ms: u64) -> Self {
        Self {
            level: Level::High,
            duration_ms,
        }
    }

    pub fn low(duration_ms: u64) -> Self {
        Self {
            level: Level::Low,
            duration_ms,
        }
    }
}

/// Inbound remote signal, in either representation the peer may send
///
/// Peers normally forward the pre-classified pulse stream their own scheduler
/// produced, but a transport may also relay raw edge timestamps; both decode
/// through identical logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteSignal {
    Pulse(PulseEvent),
    Edge(TimingEvent),
}

/// Which receive path produced a decoded word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalSource {
    Local,
    Remote,
}

// ----------------------------------------------------------------------------
// Feedback
// ----------------------------------------------------------------------------

/// Kind of local feedback actuation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackKind {
    Led,
    Buzzer,
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_since_saturates() {
        let a = Timestamp::from_millis(100);
        let b = Timestamp::from_millis(250);
        assert_eq!(b.since(a), 150);
        assert_eq!(a.since(b), 0);
        assert_eq!(b - a, 150);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::starting_at(1_000);
        assert_eq!(clock.now().as_millis(), 1_000);
        clock.advance(250);
        assert_eq!(clock.now().as_millis(), 1_250);
        clock.set(42);
        assert_eq!(clock.now().as_millis(), 42);
    }

    #[test]
    fn test_edge_for_level() {
        assert_eq!(Edge::to(Level::High), Edge::Rising);
        assert_eq!(Edge::to(Level::Low), Edge::Falling);
    }

    #[test]
    fn test_level_from_bool() {
        assert!(Level::from_bool(true).is_high());
        assert!(!Level::from_bool(false).is_high());
    }
}
