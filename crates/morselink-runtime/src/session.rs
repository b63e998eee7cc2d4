//! Session state owned by the coordinator task
//!
//! Tracks what the engine is doing (idle, transmitting, receiving) and the
//! accumulated transcript. Only the coordinator mutates this; everything
//! else observes it through events.

use morselink_core::{EngineError, Result};

/// What the engine is currently doing
///
/// `ReceivingRemote` is reported only while nothing local is happening;
/// remote decode runs concurrently with local activity and never blocks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    Idle,
    Transmitting,
    Receiving,
    ReceivingRemote,
}

#[derive(Debug, Default)]
pub struct Session {
    transmitting: Option<String>,
    local_receiving: bool,
    remote_active: bool,
    transcript: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EngineMode {
        if self.transmitting.is_some() {
            EngineMode::Transmitting
        } else if self.local_receiving {
            EngineMode::Receiving
        } else if self.remote_active {
            EngineMode::ReceivingRemote
        } else {
            EngineMode::Idle
        }
    }

    pub fn is_transmitting(&self) -> bool {
        self.transmitting.is_some()
    }

    /// Claim the transmit slot; fails while a transmission is in flight
    pub fn begin_transmit(&mut self, text: &str) -> Result<()> {
        if let Some(active) = &self.transmitting {
            return Err(EngineError::busy(format!(
                "already transmitting {active:?}"
            )));
        }
        self.transmitting = Some(text.to_string());
        Ok(())
    }

    pub fn finish_transmit(&mut self) {
        self.transmitting = None;
    }

    pub fn set_local_receiving(&mut self, active: bool) {
        self.local_receiving = active;
    }

    pub fn set_remote_active(&mut self, active: bool) {
        self.remote_active = active;
    }

    /// Append a decoded word to the transcript
    pub fn append_word(&mut self, word: &str) {
        if !self.transcript.is_empty() {
            self.transcript.push(' ');
        }
        self.transcript.push_str(word);
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transmit_slot_is_exclusive() {
        let mut session = Session::new();
        session.begin_transmit("SOS").unwrap();
        assert_eq!(session.mode(), EngineMode::Transmitting);
        assert!(matches!(
            session.begin_transmit("CQ"),
            Err(EngineError::Busy { .. })
        ));
        session.finish_transmit();
        session.begin_transmit("CQ").unwrap();
    }

    #[test]
    fn test_mode_precedence() {
        let mut session = Session::new();
        assert_eq!(session.mode(), EngineMode::Idle);
        session.set_remote_active(true);
        assert_eq!(session.mode(), EngineMode::ReceivingRemote);
        session.set_local_receiving(true);
        assert_eq!(session.mode(), EngineMode::Receiving);
        session.begin_transmit("E").unwrap();
        assert_eq!(session.mode(), EngineMode::Transmitting);
    }

    #[test]
    fn test_transcript_accumulates_with_spaces() {
        let mut session = Session::new();
        session.append_word("HELLO");
        session.append_word("WORLD");
        assert_eq!(session.transcript(), "HELLO WORLD");
        session.clear_transcript();
        assert_eq!(session.transcript(), "");
    }
}
