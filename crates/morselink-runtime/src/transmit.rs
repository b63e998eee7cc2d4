//! Transmit task: plays a scheduled pulse train in real time
//!
//! Drives the output line interval by interval, forwards every interval to
//! the peer as an effect, and renders local feedback for high intervals
//! through the feedback gate. Cancellation is checked only at interval
//! boundaries; an interval that has started always finishes, and the line
//! is left low either way.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, warn};

use morselink_core::{
    Effect, EffectSender, Event, EventSender, HardwareIo, PulseEvent, TransmitOutcome,
};

use crate::feedback::FeedbackGate;

/// Handle for cancelling an in-flight transmission
pub type CancelSender = watch::Sender<bool>;

/// Spawn the transmit task for one pulse train
pub fn spawn_transmit(
    pulses: Vec<PulseEvent>,
    hardware: Arc<dyn HardwareIo>,
    gate: Arc<FeedbackGate>,
    effects: EffectSender,
    events: EventSender,
) -> (JoinHandle<()>, CancelSender) {
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let handle = tokio::spawn(run(pulses, hardware, gate, effects, events, cancel_rx));
    (handle, cancel_tx)
}

async fn run(
    pulses: Vec<PulseEvent>,
    hardware: Arc<dyn HardwareIo>,
    gate: Arc<FeedbackGate>,
    effects: EffectSender,
    events: EventSender,
    cancel: watch::Receiver<bool>,
) {
    let mut outcome = TransmitOutcome::Completed;

    for pulse in pulses {
        if *cancel.borrow() {
            outcome = TransmitOutcome::Cancelled;
            break;
        }

        hardware.set_output(pulse.level.is_high());
        if pulse.level.is_high() {
            // Feedback runs detached; the pulse train never waits for it
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                gate.render(pulse.duration_ms).await;
            });
        }
        if effects.send(Effect::SendPulse { pulse }).is_err() {
            debug!("no transport subscribed, pulse not forwarded");
        }
        tokio::time::sleep(Duration::from_millis(pulse.duration_ms)).await;
    }

    hardware.set_output(false);

    if events
        .send(Event::TransmitFinished { outcome })
        .await
        .is_err()
    {
        warn!("coordinator gone before transmit completion could be reported");
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
