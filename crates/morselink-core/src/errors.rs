//! Error types for the MorseLink engine
//!
//! This module contains all error types used throughout the core engine:
//! profile validation errors, alphabet validation errors, and the main
//! EngineError type that unifies them.
//!
//! The only condition that is fatal at startup is an invalid timing profile
//! or alphabet; every runtime condition degrades gracefully and is reported
//! upward.

// ----------------------------------------------------------------------------
// Specific Error Types
// ----------------------------------------------------------------------------

/// Timing profile validation errors (fatal at startup, refuses to run)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("threshold order violated: dot {dot_ms}ms, char gap {char_gap_ms}ms, word gap {word_gap_ms}ms must be strictly increasing")]
    ThresholdOrder {
        dot_ms: u64,
        char_gap_ms: u64,
        word_gap_ms: u64,
    },
    #[error("debounce floor {debounce_ms}ms must be below the dot threshold {dot_ms}ms")]
    DebounceFloor { debounce_ms: u64, dot_ms: u64 },
    #[error("{field} must be non-zero")]
    ZeroDuration { field: &'static str },
    #[error("dot unit {unit_ms}ms must be below the dot threshold {dot_ms}ms or transmitted dots decode as dashes")]
    UnitAboveThreshold { unit_ms: u64, dot_ms: u64 },
    #[error("press ceiling {ceiling_ms}ms must be above the dot threshold {dot_ms}ms")]
    CeilingBelowThreshold { ceiling_ms: u64, dot_ms: u64 },
}

/// Alphabet table validation errors (fatal at startup)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlphabetError {
    #[error("duplicate pattern {pattern:?} maps to both '{first}' and '{second}'")]
    DuplicatePattern {
        pattern: String,
        first: char,
        second: char,
    },
    #[error("character '{character}' appears more than once in the table")]
    DuplicateCharacter { character: char },
    #[error("pattern for '{character}' is empty")]
    EmptyPattern { character: char },
    #[error("pattern for '{character}' has {len} elements (maximum 6)")]
    PatternTooLong { character: char, len: usize },
    #[error("pattern for '{character}' contains invalid glyph '{glyph}' (expected '.' or '-')")]
    InvalidPatternGlyph { character: char, glyph: char },
}

// ----------------------------------------------------------------------------
// Unified Engine Error
// ----------------------------------------------------------------------------

/// Core error types for the MorseLink engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid profile: {0}")]
    InvalidProfile(#[from] ProfileError),

    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(#[from] AlphabetError),

    /// Engine is busy with a conflicting activity (recoverable, caller retries)
    #[error("engine busy: {reason}")]
    Busy { reason: String },

    /// A character with no Morse mapping was submitted for transmission
    #[error("unsupported character '{character}'")]
    UnsupportedCharacter { character: char },

    /// Channel communication error (internal to the task architecture)
    #[error("channel error: {message}")]
    Channel { message: String },

    /// Transport-layer failure (external; remote reception stops, local
    /// operation continues unaffected)
    #[error("transport error: {reason}")]
    Transport { reason: String },

    /// Configuration error
    #[error("configuration error: {reason}")]
    Configuration { reason: String },
}

// ----------------------------------------------------------------------------
// Convenience Error Constructors
// ----------------------------------------------------------------------------

impl EngineError {
    /// Create a busy error with a reason
    pub fn busy<T: Into<String>>(reason: T) -> Self {
        EngineError::Busy {
            reason: reason.into(),
        }
    }

    /// Create a channel error with a message
    pub fn channel_error<T: Into<String>>(message: T) -> Self {
        EngineError::Channel {
            message: message.into(),
        }
    }

    /// Create a transport error with a reason
    pub fn transport_error<T: Into<String>>(reason: T) -> Self {
        EngineError::Transport {
            reason: reason.into(),
        }
    }

    /// Create a configuration error with a reason
    pub fn config_error<T: Into<String>>(reason: T) -> Self {
        EngineError::Configuration {
            reason: reason.into(),
        }
    }

    /// True for errors the caller can retry after (busy, channel pressure)
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            EngineError::InvalidProfile(_) | EngineError::InvalidAlphabet(_)
        )
    }
}

// ----------------------------------------------------------------------------
// Type Aliases
// ----------------------------------------------------------------------------

pub type Result<T> = std::result::Result<T, EngineError>;
