//! Hardware abstraction
//!
//! The engine never touches pins directly; it works against [`HardwareIo`],
//! shared as `Arc<dyn HardwareIo>` between the sampling loop and the
//! feedback path. Implementations use interior mutability so input reads
//! are never blocked by an in-flight feedback pulse. [`SimulatedHardware`]
//! backs tests and the loopback demo with an atomic input line and an
//! operation log.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::types::FeedbackKind;

// ----------------------------------------------------------------------------
// Trait
// ----------------------------------------------------------------------------

/// Switch input, output line, and feedback actuators
pub trait HardwareIo: Send + Sync + std::fmt::Debug {
    /// Current raw switch level (true = pressed); may bounce
    fn read_input(&self) -> bool;

    /// Drive the output line mirroring the transmit signal
    fn set_output(&self, high: bool);

    /// Start a feedback actuation; returns immediately, the caller owns
    /// the pulse duration
    fn start_feedback(&self, kind: FeedbackKind);

    /// Stop a feedback actuation
    fn stop_feedback(&self, kind: FeedbackKind);
}

// ----------------------------------------------------------------------------
// Simulation
// ----------------------------------------------------------------------------

/// A recorded hardware operation, in call order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareOp {
    Output(bool),
    FeedbackOn(FeedbackKind),
    FeedbackOff(FeedbackKind),
}

/// In-memory hardware for tests and the loopback demo
#[derive(Debug, Clone, Default)]
pub struct SimulatedHardware {
    input: Arc<AtomicBool>,
    ops: Arc<Mutex<Vec<HardwareOp>>>,
}

impl SimulatedHardware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for driving the simulated switch from a test
    pub fn input_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.input)
    }

    pub fn set_input(&self, pressed: bool) {
        self.input.store(pressed, Ordering::SeqCst);
    }

    /// Snapshot of every operation performed so far
    pub fn ops(&self) -> Vec<HardwareOp> {
        self.ops.lock().expect("ops lock poisoned").clone()
    }
}

impl HardwareIo for SimulatedHardware {
    fn read_input(&self) -> bool {
        self.input.load(Ordering::SeqCst)
    }

    fn set_output(&self, high: bool) {
        self.ops
            .lock()
            .expect("ops lock poisoned")
            .push(HardwareOp::Output(high));
    }

    fn start_feedback(&self, kind: FeedbackKind) {
        self.ops
            .lock()
            .expect("ops lock poisoned")
            .push(HardwareOp::FeedbackOn(kind));
    }

    fn stop_feedback(&self, kind: FeedbackKind) {
        self.ops
            .lock()
            .expect("ops lock poisoned")
            .push(HardwareOp::FeedbackOff(kind));
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
