//! End-to-end engine tests over the loopback transport, run on a paused
//! tokio clock so second-scale pulse trains finish instantly.

use std::sync::Arc;

use tokio::time::{timeout, Duration};

use morselink_core::{
    AppEvent, AppEventReceiver, Command, EngineConfig, SignalSource, SimulatedHardware,
};
use morselink_runtime::{EngineRuntime, LoopbackTransport};

struct TestPair {
    a: EngineRuntime,
    b: EngineRuntime,
    a_events: AppEventReceiver,
    b_events: AppEventReceiver,
}

async fn start_pair() -> TestPair {
    let config = EngineConfig::default();
    let (ta, tb) = LoopbackTransport::pair();

    let mut a = EngineRuntime::new(config.clone(), Arc::new(SimulatedHardware::new())).unwrap();
    a.add_transport(Box::new(ta));
    let mut b = EngineRuntime::new(config, Arc::new(SimulatedHardware::new())).unwrap();
    b.add_transport(Box::new(tb));

    let a_events = a.take_app_event_receiver().unwrap();
    let b_events = b.take_app_event_receiver().unwrap();
    a.start().await.unwrap();
    b.start().await.unwrap();

    TestPair {
        a,
        b,
        a_events,
        b_events,
    }
}

/// Receive app events until one satisfies `pred`; panics after thirty
/// virtual seconds
async fn wait_for<F>(events: &mut AppEventReceiver, mut pred: F) -> AppEvent
where
    F: FnMut(&AppEvent) -> bool,
{
    timeout(Duration::from_secs(30), async {
        loop {
            let event = events.recv().await.expect("app event channel closed");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("expected app event never arrived")
}

#[tokio::test(start_paused = true)]
async fn message_crosses_the_link() {
    let mut pair = start_pair().await;

    pair.a
        .command_sender()
        .send(Command::SendText {
            text: "HELLO WORLD".to_string(),
        })
        .await
        .unwrap();

    wait_for(&mut pair.a_events, |e| {
        matches!(e, AppEvent::TransmitStarted { .. })
    })
    .await;

    let mut received = Vec::new();
    for _ in 0..2 {
        match wait_for(&mut pair.b_events, |e| {
            matches!(e, AppEvent::WordDecoded { .. })
        })
        .await
        {
            AppEvent::WordDecoded { word, source } => {
                assert_eq!(source, SignalSource::Remote);
                received.push(word);
            }
            _ => unreachable!(),
        }
    }
    assert_eq!(received, vec!["HELLO", "WORLD"]);

    wait_for(&mut pair.a_events, |e| {
        matches!(e, AppEvent::TransmitCompleted)
    })
    .await;

    pair.a.stop().await;
    pair.b.stop().await;
}

#[tokio::test(start_paused = true)]
async fn send_while_transmitting_is_rejected() {
    let mut pair = start_pair().await;
    let commands = pair.a.command_sender();

    commands
        .send(Command::SendText {
            text: "PARIS PARIS PARIS".to_string(),
        })
        .await
        .unwrap();
    wait_for(&mut pair.a_events, |e| {
        matches!(e, AppEvent::TransmitStarted { .. })
    })
    .await;

    // Second send lands while the first train is still playing
    commands
        .send(Command::SendText {
            text: "QRM".to_string(),
        })
        .await
        .unwrap();
    match wait_for(&mut pair.a_events, |e| {
        matches!(
            e,
            AppEvent::TransmitRejected { .. } | AppEvent::TransmitCompleted
        )
    })
    .await
    {
        AppEvent::TransmitRejected { reason } => {
            assert!(reason.contains("busy"), "unexpected reason: {reason}");
        }
        other => panic!("first transmission finished before rejection: {other:?}"),
    }

    // The in-flight transmission is unaffected
    wait_for(&mut pair.a_events, |e| {
        matches!(e, AppEvent::TransmitCompleted)
    })
    .await;

    pair.a.stop().await;
    pair.b.stop().await;
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_a_long_transmission() {
    let mut pair = start_pair().await;
    let commands = pair.a.command_sender();

    commands
        .send(Command::SendText {
            text: "0000000000 0000000000".to_string(),
        })
        .await
        .unwrap();
    wait_for(&mut pair.a_events, |e| {
        matches!(e, AppEvent::TransmitStarted { .. })
    })
    .await;

    commands.send(Command::CancelTransmit).await.unwrap();
    wait_for(&mut pair.a_events, |e| {
        matches!(e, AppEvent::TransmitCancelled)
    })
    .await;

    // The engine accepts new work immediately after cancellation
    commands
        .send(Command::SendText {
            text: "E".to_string(),
        })
        .await
        .unwrap();
    wait_for(&mut pair.a_events, |e| {
        matches!(e, AppEvent::TransmitStarted { .. })
    })
    .await;
    wait_for(&mut pair.a_events, |e| {
        matches!(e, AppEvent::TransmitCompleted)
    })
    .await;

    pair.a.stop().await;
    pair.b.stop().await;
}

#[tokio::test(start_paused = true)]
async fn transcript_accumulates_and_clears() {
    let mut pair = start_pair().await;

    pair.a
        .command_sender()
        .send(Command::SendText {
            text: "CQ DX".to_string(),
        })
        .await
        .unwrap();

    for _ in 0..2 {
        wait_for(&mut pair.b_events, |e| {
            matches!(e, AppEvent::WordDecoded { .. })
        })
        .await;
    }

    let b_commands = pair.b.command_sender();
    b_commands.send(Command::GetTranscript).await.unwrap();
    match wait_for(&mut pair.b_events, |e| {
        matches!(e, AppEvent::Transcript { .. })
    })
    .await
    {
        AppEvent::Transcript { text } => assert_eq!(text, "CQ DX"),
        _ => unreachable!(),
    }

    b_commands.send(Command::ClearTranscript).await.unwrap();
    b_commands.send(Command::GetTranscript).await.unwrap();
    match wait_for(&mut pair.b_events, |e| {
        matches!(e, AppEvent::Transcript { .. })
    })
    .await
    {
        AppEvent::Transcript { text } => assert_eq!(text, ""),
        _ => unreachable!(),
    }

    pair.a.stop().await;
    pair.b.stop().await;
}

#[tokio::test(start_paused = true)]
async fn keying_during_transmission_reports_busy() {
    let config = EngineConfig::default();
    let (ta, tb) = LoopbackTransport::pair();

    let hw = SimulatedHardware::new();
    let mut a = EngineRuntime::new(config.clone(), Arc::new(hw.clone())).unwrap();
    a.add_transport(Box::new(ta));
    let mut b = EngineRuntime::new(config, Arc::new(SimulatedHardware::new())).unwrap();
    b.add_transport(Box::new(tb));

    let mut a_events = a.take_app_event_receiver().unwrap();
    let _b_events = b.take_app_event_receiver().unwrap();
    a.start().await.unwrap();
    b.start().await.unwrap();

    a.command_sender()
        .send(Command::SendText {
            text: "PARIS PARIS".to_string(),
        })
        .await
        .unwrap();
    wait_for(&mut a_events, |e| {
        matches!(e, AppEvent::TransmitStarted { .. })
    })
    .await;

    // Press the key while the train is playing
    hw.set_input(true);
    match wait_for(&mut a_events, |e| matches!(e, AppEvent::EngineError { .. })).await {
        AppEvent::EngineError { message } => {
            assert!(message.contains("busy"), "unexpected message: {message}");
        }
        _ => unreachable!(),
    }
    hw.set_input(false);

    // The press never reaches the decoder as a local word
    wait_for(&mut a_events, |e| {
        assert!(
            !matches!(
                e,
                AppEvent::WordDecoded {
                    source: SignalSource::Local,
                    ..
                }
            ),
            "local keying leaked through during transmission"
        );
        matches!(e, AppEvent::TransmitCompleted)
    })
    .await;

    a.stop().await;
    b.stop().await;
}

#[tokio::test(start_paused = true)]
async fn unsendable_text_is_rejected() {
    let mut pair = start_pair().await;

    // Whitespace-only text schedules nothing
    pair.a
        .command_sender()
        .send(Command::SendText {
            text: "   ".to_string(),
        })
        .await
        .unwrap();
    wait_for(&mut pair.a_events, |e| {
        matches!(e, AppEvent::TransmitRejected { .. })
    })
    .await;

    pair.a.stop().await;
    pair.b.stop().await;
}
