extern crate midistate;

use crossbeam::channel::unbounded;
use midistate::event_loop::{spawn_engine_pump, EventLoop};
use midistate::midi::{ConnectionState, DeviceState, InputEvent, MockMidiEngine, PortInfo};
use midistate::registry::InputRegistry;
use std::sync::{Arc, Mutex};
use std::thread;

fn message(device_id: &str, bytes: &[u8]) -> InputEvent {
    InputEvent::Message {
        device_id: device_id.to_string(),
        bytes: bytes.to_vec(),
    }
}

#[test]
fn integration_test_event_loop_applies_in_order() {
    let (event_tx, event_rx) = unbounded();
    let mut event_loop = EventLoop::new(InputRegistry::new(), event_rx);

    // Spawn the event loop in a separate thread.
    let handle = thread::spawn(move || {
        event_loop.run();
        event_loop.into_registry()
    });

    event_tx.send(message("D1", &[0x90, 60, 64])).unwrap();
    event_tx.send(message("D1", &[0x90, 67, 50])).unwrap();
    // Undecodable input is logged and skipped
    event_tx.send(message("D1", &[0xF8])).unwrap();
    event_tx.send(message("D1", &[0x90, 64, 70])).unwrap();

    // Close the channel so that the event loop will exit.
    drop(event_tx);
    let registry = handle.join().expect("event loop thread panicked");

    let channel = registry.input("D1").unwrap().channel(0).unwrap();
    assert_eq!(channel.notes.len(), 8);
    assert_eq!(channel.active_notes().collect::<Vec<u8>>(), vec![60, 64, 67]);
}

#[test]
fn integration_test_engine_pump_feeds_event_loop() {
    let engine = MockMidiEngine::new(vec![
        InputEvent::Discovered(PortInfo {
            name: Some("Mock Device 1".to_string()),
            ..PortInfo::new("mock-1")
        }),
        InputEvent::StateChange {
            device_id: "mock-1".to_string(),
            device_state: DeviceState::Connected,
            connection_state: ConnectionState::Open,
        },
        message("mock-1", &[0x90, 60, 64]),
        message("mock-1", &[0xB0, 64, 127]),
        message("mock-1", &[0x80, 60, 0]),
    ]);

    let mut registry = InputRegistry::new();
    let notified = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&notified);
    registry.add_message_listener("mock-1", move |message| {
        log.lock().unwrap().push(message.to_bytes());
    });

    let (event_tx, event_rx) = unbounded();
    // The pump stops once the mock queue runs dry, which drops the sender
    let pump = spawn_engine_pump(engine, event_tx);
    let mut event_loop = EventLoop::new(registry, event_rx);
    event_loop.run();
    pump.join().unwrap();

    let input = event_loop.registry().input("mock-1").unwrap();
    assert_eq!(input.name.as_deref(), Some("Mock Device 1"));
    assert_eq!(input.device_state, DeviceState::Connected);
    assert_eq!(input.connection_state, ConnectionState::Open);
    // Held by the damper
    assert!(input.channel(0).unwrap().note(60).unwrap().on);

    assert_eq!(
        *notified.lock().unwrap(),
        vec![vec![0x90, 60, 64], vec![0xB0, 64, 127], vec![0x80, 60, 0]]
    );
}

#[test]
fn integration_test_process_single_event() {
    let (_event_tx, event_rx) = unbounded();
    let mut event_loop = EventLoop::new(InputRegistry::new(), event_rx);

    let applied = event_loop.process(message("D1", &[0xC0, 5])).unwrap();
    assert_eq!(applied.map(|m| m.to_bytes()), Some(vec![0xC0, 5]));
    assert!(event_loop.process(message("D1", &[0xF0, 1, 2])).is_err());
    assert_eq!(
        event_loop
            .registry()
            .input("D1")
            .unwrap()
            .channel(0)
            .unwrap()
            .program
            .program,
        5
    );
}
