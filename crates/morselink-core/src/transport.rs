//! Transport task interface
//!
//! A transport carries the pulse stream between paired devices. The runtime
//! attaches channels before spawning [`run`](TransportTask::run): outbound
//! effects arrive on a broadcast receiver, inbound signals go back to the
//! core as events. Transport failures are reported as events; the engine
//! keeps operating locally when a transport dies.

use async_trait::async_trait;

use crate::channel::{EffectReceiver, EventSender};
use crate::errors::Result;

#[async_trait]
pub trait TransportTask: Send {
    /// Wire the transport into the engine's channels
    ///
    /// Called exactly once, before [`run`](Self::run).
    fn attach_channels(&mut self, event_sender: EventSender, effect_receiver: EffectReceiver);

    /// Drive the transport until shutdown or unrecoverable failure
    async fn run(&mut self) -> Result<()>;

    /// Short name used in logs and error events
    fn name(&self) -> &'static str;
}
