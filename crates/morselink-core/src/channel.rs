//! Channel protocol connecting the UI, the engine core, and transports
//!
//! Four message families flow over dedicated channels:
//!
//! - [`Command`]: UI to core (mpsc)
//! - [`Event`]: transports and internal tasks to core (mpsc)
//! - [`Effect`]: core to transports (broadcast, every transport sees each)
//! - [`AppEvent`]: core to UI (mpsc)
//!
//! All channels are bounded; sizes come from [`ChannelConfig`].

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};

use crate::errors::EngineError;
use crate::types::{PulseEvent, RemoteSignal, SignalSource};

// ----------------------------------------------------------------------------
// Channel Configuration
// ----------------------------------------------------------------------------

/// Buffer sizes for the bounded channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
    pub effect_buffer_size: usize,
    pub app_event_buffer_size: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            command_buffer_size: 32,
            event_buffer_size: 256,
            effect_buffer_size: 256,
            app_event_buffer_size: 64,
        }
    }
}

// ----------------------------------------------------------------------------
// Messages
// ----------------------------------------------------------------------------

/// UI to core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Encode and transmit a line of text
    SendText { text: String },
    /// Abort the active transmission at the next interval boundary
    CancelTransmit,
    /// Request the accumulated transcript
    GetTranscript,
    /// Clear the accumulated transcript
    ClearTranscript,
    /// Stop the engine loop
    Shutdown,
}

/// How a transmission run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitOutcome {
    Completed,
    Cancelled,
}

/// Transports and internal tasks to core
#[derive(Debug, Clone)]
pub enum Event {
    /// Signal received from the peer
    RemoteSignal { signal: RemoteSignal },
    /// A transport failed; local operation continues
    TransportError { name: String, error: String },
    /// The transmit task finished its pulse train
    TransmitFinished { outcome: TransmitOutcome },
}

/// Core to transports
#[derive(Debug, Clone)]
pub enum Effect {
    /// Forward one transmit interval to the peer
    SendPulse { pulse: PulseEvent },
}

/// Core to UI
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A word finished decoding
    WordDecoded { word: String, source: SignalSource },
    /// Transcript contents, in response to [`Command::GetTranscript`]
    Transcript { text: String },
    /// A transmission began
    TransmitStarted { text: String },
    /// The active transmission played out fully
    TransmitCompleted,
    /// The active transmission stopped at an interval boundary
    TransmitCancelled,
    /// A send was refused (engine busy, encode failure)
    TransmitRejected { reason: String },
    /// A non-fatal engine error surfaced to the operator
    EngineError { message: String },
}

// ----------------------------------------------------------------------------
// Channel Types
// ----------------------------------------------------------------------------

pub type CommandSender = mpsc::Sender<Command>;
pub type CommandReceiver = mpsc::Receiver<Command>;
pub type EventSender = mpsc::Sender<Event>;
pub type EventReceiver = mpsc::Receiver<Event>;
pub type EffectSender = broadcast::Sender<Effect>;
pub type EffectReceiver = broadcast::Receiver<Effect>;
pub type AppEventSender = mpsc::Sender<AppEvent>;
pub type AppEventReceiver = mpsc::Receiver<AppEvent>;

// ----------------------------------------------------------------------------
// Constructors
// ----------------------------------------------------------------------------

pub fn create_command_channel(config: &ChannelConfig) -> (CommandSender, CommandReceiver) {
    mpsc::channel(config.command_buffer_size)
}

pub fn create_event_channel(config: &ChannelConfig) -> (EventSender, EventReceiver) {
    mpsc::channel(config.event_buffer_size)
}

pub fn create_effect_channel(config: &ChannelConfig) -> (EffectSender, EffectReceiver) {
    broadcast::channel(config.effect_buffer_size)
}

/// Additional subscriber on an existing effect channel
pub fn create_effect_receiver(sender: &EffectSender) -> EffectReceiver {
    sender.subscribe()
}

pub fn create_app_event_channel(config: &ChannelConfig) -> (AppEventSender, AppEventReceiver) {
    mpsc::channel(config.app_event_buffer_size)
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl AppEvent {
    pub fn engine_error(error: &EngineError) -> Self {
        AppEvent::EngineError {
            message: error.to_string(),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
