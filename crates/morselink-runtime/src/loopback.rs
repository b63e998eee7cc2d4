//! In-process loopback transport
//!
//! Connects two engines over a pair of mpsc channels: each side's outbound
//! effects become the other side's remote pulse events. Backs the demo
//! command and the end-to-end tests; no reliability or reconnect concerns.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use morselink_core::{
    Effect, EffectReceiver, EngineError, Event, EventSender, PulseEvent, RemoteSignal, Result,
    TransportTask,
};

const PEER_BUFFER: usize = 256;

pub struct LoopbackTransport {
    name: &'static str,
    to_peer: mpsc::Sender<PulseEvent>,
    from_peer: Option<mpsc::Receiver<PulseEvent>>,
    event_tx: Option<EventSender>,
    effect_rx: Option<EffectReceiver>,
}

impl LoopbackTransport {
    /// Two connected transports, one per engine
    pub fn pair() -> (Self, Self) {
        let (a_to_b, b_from_a) = mpsc::channel(PEER_BUFFER);
        let (b_to_a, a_from_b) = mpsc::channel(PEER_BUFFER);
        (
            Self {
                name: "loopback-a",
                to_peer: a_to_b,
                from_peer: Some(a_from_b),
                event_tx: None,
                effect_rx: None,
            },
            Self {
                name: "loopback-b",
                to_peer: b_to_a,
                from_peer: Some(b_from_a),
                event_tx: None,
                effect_rx: None,
            },
        )
    }
}

#[async_trait]
impl TransportTask for LoopbackTransport {
    fn attach_channels(&mut self, event_sender: EventSender, effect_receiver: EffectReceiver) {
        self.event_tx = Some(event_sender);
        self.effect_rx = Some(effect_receiver);
    }

    async fn run(&mut self) -> Result<()> {
        let event_tx = self
            .event_tx
            .take()
            .ok_or_else(|| EngineError::transport_error("channels not attached"))?;
        let mut effect_rx = self
            .effect_rx
            .take()
            .ok_or_else(|| EngineError::transport_error("channels not attached"))?;
        let mut from_peer = self
            .from_peer
            .take()
            .ok_or_else(|| EngineError::transport_error("transport already ran"))?;

        loop {
            tokio::select! {
                effect = effect_rx.recv() => match effect {
                    Ok(Effect::SendPulse { pulse }) => {
                        if self.to_peer.send(pulse).await.is_err() {
                            debug!(transport = self.name, "peer disconnected");
                            return Ok(());
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(transport = self.name, missed, "dropped pulses, falling behind");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => return Ok(()),
                },
                pulse = from_peer.recv() => match pulse {
                    Some(pulse) => {
                        let event = Event::RemoteSignal {
                            signal: RemoteSignal::Pulse(pulse),
                        };
                        if event_tx.send(event).await.is_err() {
                            return Ok(());
                        }
                    }
                    None => {
                        debug!(transport = self.name, "peer closed");
                        return Ok(());
                    }
                },
            }
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use morselink_core::{create_effect_channel, create_event_channel, ChannelConfig, Level};

    #[tokio::test]
    async fn test_pair_carries_pulses_both_ways() {
        let (mut a, mut b) = LoopbackTransport::pair();
        let config = ChannelConfig::default();

        let (a_effect_tx, a_effect_rx) = create_effect_channel(&config);
        let (a_event_tx, _a_events) = create_event_channel(&config);
        a.attach_channels(a_event_tx, a_effect_rx);

        let (b_effect_tx, b_effect_rx) = create_effect_channel(&config);
        let (b_event_tx, mut b_events) = create_event_channel(&config);
        b.attach_channels(b_event_tx, b_effect_rx);

        let a_task = tokio::spawn(async move { a.run().await });
        let b_task = tokio::spawn(async move { b.run().await });

        a_effect_tx
            .send(Effect::SendPulse {
                pulse: PulseEvent::high(100),
            })
            .unwrap();

        match b_events.recv().await.unwrap() {
            Event::RemoteSignal {
                signal: RemoteSignal::Pulse(pulse),
            } => {
                assert_eq!(pulse.level, Level::High);
                assert_eq!(pulse.duration_ms, 100);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        drop(a_effect_tx);
        drop(b_effect_tx);
        a_task.await.unwrap().unwrap();
        b_task.await.unwrap().unwrap();
    }
}
