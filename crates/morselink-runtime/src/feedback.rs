//! Feedback gate: serialized access to the shared LED/buzzer
//!
//! Transmit and remote-receive feedback both render through one
//! [`FeedbackGate`]. A single async lock is held for exactly one pulse
//! render, so overlapping requests queue rather than interleave and the
//! actuators never flicker from two pulses at once. Input sampling is
//! unaffected; the lock covers only feedback.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::trace;

use morselink_core::{FeedbackConfig, FeedbackKind, HardwareIo};

#[derive(Debug)]
pub struct FeedbackGate {
    hardware: Arc<dyn HardwareIo>,
    config: FeedbackConfig,
    lock: Mutex<()>,
}

impl FeedbackGate {
    pub fn new(hardware: Arc<dyn HardwareIo>, config: FeedbackConfig) -> Arc<Self> {
        Arc::new(Self {
            hardware,
            config,
            lock: Mutex::new(()),
        })
    }

    /// Render one feedback pulse of `duration_ms` on the enabled actuators
    ///
    /// Holds the gate for the full pulse; callers run this detached so the
    /// pulse train is never delayed by feedback.
    pub async fn render(&self, duration_ms: u64) {
        if !self.config.any_enabled() {
            return;
        }
        let _guard = self.lock.lock().await;
        trace!(duration_ms, "rendering feedback pulse");
        if self.config.led_enabled {
            self.hardware.start_feedback(FeedbackKind::Led);
        }
        if self.config.buzzer_enabled {
            self.hardware.start_feedback(FeedbackKind::Buzzer);
        }
        tokio::time::sleep(Duration::from_millis(duration_ms)).await;
        if self.config.led_enabled {
            self.hardware.stop_feedback(FeedbackKind::Led);
        }
        if self.config.buzzer_enabled {
            self.hardware.stop_feedback(FeedbackKind::Buzzer);
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
