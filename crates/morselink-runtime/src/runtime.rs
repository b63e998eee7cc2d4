//! Engine runtime lifecycle
//!
//! [`EngineRuntime`] owns the channel plumbing and task handles for one
//! engine instance: it wires the coordinator to the attached transports,
//! spawns everything on `start`, and tears it down on `stop` or drop. The
//! UI side talks to a running engine only through the command sender and
//! the app event receiver.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use morselink_core::{
    create_app_event_channel, create_command_channel, create_effect_channel, create_event_channel,
    AppEventReceiver, Command, CommandReceiver, CommandSender, EffectSender, EngineConfig,
    EngineError, Event, EventSender, HardwareIo, Result, TransportTask,
};

use crate::coordinator::Coordinator;

pub struct EngineRuntime {
    config: EngineConfig,
    hardware: Arc<dyn HardwareIo>,
    transports: Vec<Box<dyn TransportTask>>,

    command_tx: CommandSender,
    command_rx: Option<CommandReceiver>,
    event_tx: EventSender,
    event_rx: Option<morselink_core::EventReceiver>,
    effect_tx: EffectSender,
    app_event_rx: Option<AppEventReceiver>,
    app_event_tx: morselink_core::AppEventSender,

    handles: Vec<JoinHandle<()>>,
    running: bool,
}

impl EngineRuntime {
    /// Build an engine over the given hardware; fails fast on bad config
    pub fn new(config: EngineConfig, hardware: Arc<dyn HardwareIo>) -> Result<Self> {
        config.validate()?;
        let channels = config.channels;
        let (command_tx, command_rx) = create_command_channel(&channels);
        let (event_tx, event_rx) = create_event_channel(&channels);
        let (effect_tx, _effect_rx) = create_effect_channel(&channels);
        let (app_event_tx, app_event_rx) = create_app_event_channel(&channels);
        Ok(Self {
            config,
            hardware,
            transports: Vec::new(),
            command_tx,
            command_rx: Some(command_rx),
            event_tx,
            event_rx: Some(event_rx),
            effect_tx,
            app_event_rx: Some(app_event_rx),
            app_event_tx,
            handles: Vec::new(),
            running: false,
        })
    }

    /// Register a transport; must happen before `start`
    pub fn add_transport(&mut self, transport: Box<dyn TransportTask>) {
        self.transports.push(transport);
    }

    /// Handle the UI uses to issue commands
    pub fn command_sender(&self) -> CommandSender {
        self.command_tx.clone()
    }

    /// Receiver for decoded words and status updates; can be taken once
    pub fn take_app_event_receiver(&mut self) -> Option<AppEventReceiver> {
        self.app_event_rx.take()
    }

    /// Spawn the coordinator and every attached transport
    pub async fn start(&mut self) -> Result<()> {
        if self.running {
            return Err(EngineError::config_error("engine already started"));
        }
        if self.transports.is_empty() {
            return Err(EngineError::config_error(
                "at least one transport is required",
            ));
        }

        let coordinator = Coordinator::new(
            self.config.clone(),
            Arc::clone(&self.hardware),
            self.command_rx
                .take()
                .ok_or_else(|| EngineError::config_error("engine cannot be restarted"))?,
            self.event_rx
                .take()
                .ok_or_else(|| EngineError::config_error("engine cannot be restarted"))?,
            self.event_tx.clone(),
            self.effect_tx.clone(),
            self.app_event_tx.clone(),
        )?;
        self.handles.push(tokio::spawn(async move {
            if let Err(e) = coordinator.run().await {
                error!(error = %e, "coordinator exited with error");
            }
        }));

        for mut transport in self.transports.drain(..) {
            transport.attach_channels(self.event_tx.clone(), self.effect_tx.subscribe());
            let event_tx = self.event_tx.clone();
            self.handles.push(tokio::spawn(async move {
                let name = transport.name();
                info!(transport = name, "transport started");
                if let Err(e) = transport.run().await {
                    warn!(transport = name, error = %e, "transport failed");
                    let _ = event_tx
                        .send(Event::TransportError {
                            name: name.to_string(),
                            error: e.to_string(),
                        })
                        .await;
                }
            }));
        }

        self.running = true;
        info!("engine runtime started");
        Ok(())
    }

    /// Request shutdown and abort anything still running
    pub async fn stop(&mut self) {
        if !self.running {
            return;
        }
        let _ = self.command_tx.send(Command::Shutdown).await;
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        self.running = false;
        info!("engine runtime stopped");
    }
}

impl Drop for EngineRuntime {
    fn drop(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}
