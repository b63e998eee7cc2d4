//! Command implementations
//!
//! `demo` pairs two simulated engines over the in-process loopback link and
//! sends a message from one to the other; `key` drives a simulated switch
//! from a dot/dash pattern and decodes it through the local sampling path;
//! `table` prints the alphabet.

use std::sync::Arc;

use tokio::time::{sleep, Duration};
use tracing::info;

use morselink_core::{
    Alphabet, AppEvent, Command, EngineError, SignalSource, SimulatedHardware,
};
use morselink_runtime::{EngineRuntime, LoopbackTransport};

use crate::config::AppConfig;
use crate::error::{CliError, Result};

// ----------------------------------------------------------------------------
// demo
// ----------------------------------------------------------------------------

/// Transmit `message` from one engine, print what the other decodes
pub async fn run_demo(
    config: AppConfig,
    message: String,
    cancel_after_ms: Option<u64>,
) -> Result<()> {
    let (transport_a, transport_b) = LoopbackTransport::pair();

    let mut sender = EngineRuntime::new(config.engine.clone(), Arc::new(SimulatedHardware::new()))?;
    sender.add_transport(Box::new(transport_a));
    let mut receiver =
        EngineRuntime::new(config.engine.clone(), Arc::new(SimulatedHardware::new()))?;
    receiver.add_transport(Box::new(transport_b));

    let mut sender_events = sender
        .take_app_event_receiver()
        .expect("fresh runtime has its receiver");
    let mut receiver_events = receiver
        .take_app_event_receiver()
        .expect("fresh runtime has its receiver");
    sender.start().await?;
    receiver.start().await?;

    let commands = sender.command_sender();
    commands
        .send(Command::SendText {
            text: message.clone(),
        })
        .await
        .map_err(|_| EngineError::channel_error("engine stopped before send"))?;

    if let Some(after_ms) = cancel_after_ms {
        let commands = commands.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(after_ms)).await;
            let _ = commands.send(Command::CancelTransmit).await;
        });
    }

    // Run both event streams until the transmission finishes
    loop {
        tokio::select! {
            event = sender_events.recv() => match event {
                Some(AppEvent::TransmitStarted { text }) => info!(%text, "transmitting"),
                Some(AppEvent::TransmitCompleted) => {
                    info!("transmission complete");
                    break;
                }
                Some(AppEvent::TransmitCancelled) => {
                    info!("transmission cancelled");
                    break;
                }
                Some(AppEvent::TransmitRejected { reason }) => {
                    return Err(CliError::Config(format!("send rejected: {reason}")));
                }
                Some(_) => {}
                None => break,
            },
            event = receiver_events.recv() => {
                print_decoded(event.as_ref(), config.cli.live_output);
                if event.is_none() {
                    break;
                }
            }
        }
    }

    // Give the receiver its idle flush, then drain the stragglers
    let settle = config.engine.profile.word_gap_threshold_ms + 100;
    let deadline = sleep(Duration::from_millis(settle));
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            event = receiver_events.recv() => {
                print_decoded(event.as_ref(), config.cli.live_output);
                if event.is_none() {
                    break;
                }
            }
            _ = &mut deadline => break,
        }
    }

    let receiver_commands = receiver.command_sender();
    receiver_commands
        .send(Command::GetTranscript)
        .await
        .map_err(|_| EngineError::channel_error("receiver stopped early"))?;
    while let Some(event) = receiver_events.recv().await {
        if let AppEvent::Transcript { text } = event {
            println!("received: {text}");
            break;
        }
    }

    sender.stop().await;
    receiver.stop().await;
    Ok(())
}

fn print_decoded(event: Option<&AppEvent>, live_output: bool) {
    if let Some(AppEvent::WordDecoded { word, source }) = event {
        if live_output && *source == SignalSource::Remote {
            println!("{word}");
        }
    }
}

// ----------------------------------------------------------------------------
// key
// ----------------------------------------------------------------------------

/// Key `pattern` on a simulated switch and print the local decode
///
/// Pattern glyphs: `.` and `-` key elements, a space separates characters,
/// `/` separates words. Timing follows the profile's transmit unit, so the
/// pattern always lands inside the classification windows.
pub async fn run_key(config: AppConfig, pattern: String) -> Result<()> {
    let hardware = SimulatedHardware::new();
    let (transport, _peer) = LoopbackTransport::pair();

    let mut engine = EngineRuntime::new(config.engine.clone(), Arc::new(hardware.clone()))?;
    engine.add_transport(Box::new(transport));
    let mut events = engine
        .take_app_event_receiver()
        .expect("fresh runtime has its receiver");
    engine.start().await?;

    let profile = config.engine.profile;
    let unit = Duration::from_millis(profile.dot_duration_ms);
    let switch = hardware.input_handle();

    for glyph in pattern.chars() {
        match glyph {
            '.' => {
                switch.store(true, std::sync::atomic::Ordering::SeqCst);
                sleep(unit).await;
                switch.store(false, std::sync::atomic::Ordering::SeqCst);
                sleep(unit).await;
            }
            '-' => {
                switch.store(true, std::sync::atomic::Ordering::SeqCst);
                sleep(unit * 3).await;
                switch.store(false, std::sync::atomic::Ordering::SeqCst);
                sleep(unit).await;
            }
            ' ' => sleep(unit * 2).await,
            '/' => sleep(unit * 6).await,
            other => {
                return Err(CliError::Config(format!(
                    "pattern glyph {other:?} is not one of '.', '-', ' ', '/'"
                )));
            }
        }
    }

    // Wait out the idle flush, then collect everything decoded
    let settle = profile.word_gap_threshold_ms + 100;
    let deadline = sleep(Duration::from_millis(settle));
    tokio::pin!(deadline);
    let mut words = Vec::new();
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(AppEvent::WordDecoded { word, source: SignalSource::Local }) => {
                    words.push(word);
                }
                Some(_) => {}
                None => break,
            },
            _ = &mut deadline => break,
        }
    }

    println!("decoded: {}", words.join(" "));
    engine.stop().await;
    Ok(())
}

// ----------------------------------------------------------------------------
// table
// ----------------------------------------------------------------------------

/// Print the alphabet table, overrides applied
pub fn print_table(config: &AppConfig) -> Result<()> {
    let alphabet = Alphabet::with_overrides(&config.engine.alphabet_overrides)
        .map_err(EngineError::from)?;
    let mut entries: Vec<_> = alphabet
        .entries()
        .map(|(c, s)| (c, s.to_string()))
        .collect();
    entries.sort();
    for (character, pattern) in entries {
        println!("{character}  {pattern}");
    }
    Ok(())
}
