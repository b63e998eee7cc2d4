//! MorseLink Runtime
//!
//! Tokio wiring for the core engine: the coordinator event loop, the
//! real-time transmit task, the serialized feedback gate, and the runtime
//! lifecycle that binds them to transports. The core crate stays free of
//! task spawning; everything that runs lives here.

pub mod coordinator;
pub mod feedback;
pub mod loopback;
pub mod runtime;
pub mod session;
pub mod transmit;

pub use coordinator::Coordinator;
pub use feedback::FeedbackGate;
pub use loopback::LoopbackTransport;
pub use runtime::EngineRuntime;
pub use session::{EngineMode, Session};
pub use transmit::{spawn_transmit, CancelSender};
