//! Coordinator task: the engine's single event loop
//!
//! Owns the session state, the local sampler/decoder pair, and the remote
//! decoder. A `tokio::select!` multiplexes UI commands, transport events,
//! and a sampling tick; nothing here blocks, so remote reception continues
//! through local keying and vice versa. Local sampling pauses while a
//! transmission plays so the operator's own key cannot corrupt the outgoing
//! train.

use std::sync::Arc;

use tokio::time::Duration;
use tracing::{debug, info, warn};

use morselink_core::{
    schedule, Alphabet, AppEvent, AppEventSender, Clock, Codec, Command, CommandReceiver,
    DebouncedSampler, EffectSender, EngineConfig, Event, EventReceiver, EventSender, HardwareIo,
    Level, PulseEvent, ReceiveDecoder, RemoteSignal, Result, SignalSource, SystemClock,
    TransmitOutcome,
};

use crate::feedback::FeedbackGate;
use crate::session::Session;
use crate::transmit::{spawn_transmit, CancelSender};

pub struct Coordinator {
    config: EngineConfig,
    session: Session,
    sampler: DebouncedSampler,
    local_decoder: ReceiveDecoder,
    remote_decoder: ReceiveDecoder,
    codec: Codec,
    hardware: Arc<dyn HardwareIo>,
    clock: Arc<dyn Clock>,
    gate: Arc<FeedbackGate>,

    commands: CommandReceiver,
    events: EventReceiver,
    event_tx: EventSender,
    effect_tx: EffectSender,
    app_events: AppEventSender,

    cancel: Option<CancelSender>,
    busy_key_notified: bool,
}

impl Coordinator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: EngineConfig,
        hardware: Arc<dyn HardwareIo>,
        commands: CommandReceiver,
        events: EventReceiver,
        event_tx: EventSender,
        effect_tx: EffectSender,
        app_events: AppEventSender,
    ) -> Result<Self> {
        config.validate()?;
        let alphabet = Alphabet::with_overrides(&config.alphabet_overrides)?;
        let profile = config.profile;
        Ok(Self {
            sampler: DebouncedSampler::new(&profile),
            local_decoder: ReceiveDecoder::new(profile, Arc::clone(&alphabet)),
            remote_decoder: ReceiveDecoder::new(profile, Arc::clone(&alphabet)),
            codec: Codec::new(alphabet, config.encode_policy),
            gate: FeedbackGate::new(Arc::clone(&hardware), config.feedback),
            clock: Arc::new(SystemClock::new()),
            session: Session::new(),
            config,
            hardware,
            commands,
            events,
            event_tx,
            effect_tx,
            app_events,
            cancel: None,
            busy_key_notified: false,
        })
    }

    /// Run the event loop until shutdown
    pub async fn run(mut self) -> Result<()> {
        info!("engine coordinator started");
        let mut tick =
            tokio::time::interval(Duration::from_millis(self.config.profile.tick_interval_ms()));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command).await,
                },
                event = self.events.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => break,
                },
                _ = tick.tick() => self.on_tick().await,
            }
        }

        info!("engine coordinator stopped");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::SendText { text } => self.start_transmit(text).await,
            Command::CancelTransmit => {
                match &self.cancel {
                    Some(cancel) => {
                        debug!("cancel requested");
                        let _ = cancel.send(true);
                    }
                    None => debug!("cancel requested with no transmission in flight"),
                }
            }
            Command::GetTranscript => {
                self.emit(AppEvent::Transcript {
                    text: self.session.transcript().to_string(),
                })
                .await;
            }
            Command::ClearTranscript => self.session.clear_transcript(),
            Command::Shutdown => unreachable!("handled in the select loop"),
        }
    }

    async fn start_transmit(&mut self, text: String) {
        if let Err(error) = self.session.begin_transmit(&text) {
            warn!(%error, "send rejected");
            self.emit(AppEvent::TransmitRejected {
                reason: error.to_string(),
            })
            .await;
            return;
        }

        let units = match self.codec.encode(&text) {
            Ok(units) => units,
            Err(error) => {
                self.session.finish_transmit();
                warn!(%error, "encode failed");
                self.emit(AppEvent::TransmitRejected {
                    reason: error.to_string(),
                })
                .await;
                return;
            }
        };
        let pulses = schedule(&units, &self.config.profile);
        if pulses.is_empty() {
            self.session.finish_transmit();
            self.emit(AppEvent::TransmitRejected {
                reason: "nothing to transmit".to_string(),
            })
            .await;
            return;
        }

        info!(%text, intervals = pulses.len(), "transmission started");
        let (_handle, cancel) = spawn_transmit(
            pulses,
            Arc::clone(&self.hardware),
            Arc::clone(&self.gate),
            self.effect_tx.clone(),
            self.event_tx.clone(),
        );
        self.cancel = Some(cancel);
        self.emit(AppEvent::TransmitStarted { text }).await;
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    async fn handle_event(&mut self, event: Event) {
        match event {
            Event::RemoteSignal { signal } => self.on_remote_signal(signal).await,
            Event::TransportError { name, error } => {
                warn!(transport = %name, %error, "transport failed, remote reception degraded");
                self.emit(AppEvent::EngineError {
                    message: format!("transport {name}: {error}"),
                })
                .await;
            }
            Event::TransmitFinished { outcome } => {
                self.session.finish_transmit();
                self.cancel = None;
                self.busy_key_notified = false;
                match outcome {
                    TransmitOutcome::Completed => {
                        info!("transmission completed");
                        self.emit(AppEvent::TransmitCompleted).await;
                    }
                    TransmitOutcome::Cancelled => {
                        info!("transmission cancelled");
                        self.emit(AppEvent::TransmitCancelled).await;
                    }
                }
            }
        }
    }

    async fn on_remote_signal(&mut self, signal: RemoteSignal) {
        // Remote high pulses render feedback detached, same as transmit
        if let RemoteSignal::Pulse(PulseEvent { level: Level::High, duration_ms }) = signal {
            let gate = Arc::clone(&self.gate);
            tokio::spawn(async move {
                gate.render(duration_ms).await;
            });
        }
        if let Some(word) = self.remote_decoder.on_signal(signal, self.clock.now()) {
            self.deliver_word(word, SignalSource::Remote).await;
        }
        self.session
            .set_remote_active(self.remote_decoder.is_active());
    }

    // ------------------------------------------------------------------------
    // Sampling tick
    // ------------------------------------------------------------------------

    async fn on_tick(&mut self) {
        let now = self.clock.now();

        // The key is ignored while our own transmission plays; tell the
        // operator once per transmission so their keying isn't silently dead
        if self.session.is_transmitting() {
            if self.hardware.read_input() && !self.busy_key_notified {
                self.busy_key_notified = true;
                debug!("key input ignored during transmission");
                self.emit(AppEvent::EngineError {
                    message: "engine busy: key input ignored during transmission".to_string(),
                })
                .await;
            }
        } else {
            let raw = self.hardware.read_input();
            if let Some(edge) = self.sampler.poll(raw, now) {
                if let Some(word) = self.local_decoder.on_event(edge) {
                    self.deliver_word(word, SignalSource::Local).await;
                }
            }
            if let Some(word) = self.local_decoder.on_tick(now) {
                self.deliver_word(word, SignalSource::Local).await;
            }
            self.session
                .set_local_receiving(self.local_decoder.is_active());
        }

        if let Some(word) = self.remote_decoder.on_tick(now) {
            self.deliver_word(word, SignalSource::Remote).await;
        }
        self.session
            .set_remote_active(self.remote_decoder.is_active());
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    async fn deliver_word(&mut self, word: String, source: SignalSource) {
        debug!(%word, ?source, "word decoded");
        if source == SignalSource::Remote {
            self.session.append_word(&word);
        }
        self.emit(AppEvent::WordDecoded { word, source }).await;
    }

    async fn emit(&self, event: AppEvent) {
        if self.app_events.send(event).await.is_err() {
            debug!("app event receiver dropped");
        }
    }
}
