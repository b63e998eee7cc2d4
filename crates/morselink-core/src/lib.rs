//! MorseLink Core Engine
//!
//! This crate provides the timing-critical heart of the MorseLink system: the
//! classification of switch press/release durations into Morse tokens, the
//! bidirectional Morse codec, the transmit scheduler, and the receive decoder,
//! together with the channel protocol used to coordinate them across tasks.
//!
//! Everything here is deterministic over injected clock readings so the full
//! pipeline is testable without hardware; the runtime crate supplies the
//! tasks, the feedback lock, and the transport plumbing.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod alphabet;
pub mod channel;
pub mod classifier;
pub mod codec;
pub mod config;
pub mod errors;
pub mod hardware;
pub mod profile;
pub mod receive;
pub mod sampler;
pub mod scheduler;
pub mod transport;
pub mod types;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use alphabet::{Alphabet, AlphabetOverride, Element, MorseSymbol};
pub use channel::{
    create_app_event_channel, create_command_channel, create_effect_channel,
    create_effect_receiver, create_event_channel, AppEvent, AppEventReceiver, AppEventSender,
    ChannelConfig, Command, CommandReceiver, CommandSender, Effect, EffectReceiver, EffectSender,
    Event, EventReceiver, EventSender, TransmitOutcome,
};
pub use classifier::{classify_gap, classify_press, GapClass};
pub use codec::{
    decode, Codec, EncodePolicy, EncodedUnit, TokenDecoder, UNKNOWN_SYMBOL_SENTINEL,
};
pub use config::{EngineConfig, FeedbackConfig};
pub use errors::{AlphabetError, EngineError, ProfileError, Result};
pub use hardware::{HardwareIo, HardwareOp, SimulatedHardware};
pub use profile::TimingProfile;
pub use receive::ReceiveDecoder;
pub use sampler::DebouncedSampler;
pub use scheduler::{schedule, total_duration_ms};
pub use transport::TransportTask;
pub use types::{
    Clock, Edge, FeedbackKind, Level, ManualClock, MorseToken, PulseEvent, RemoteSignal,
    SignalSource, SystemClock, Timestamp, TimingEvent,
};
