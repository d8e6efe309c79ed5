// event_loop.rs

use crate::midi::{InputEvent, Message, MidiEngine, Result};
use crate::registry::InputRegistry;
use crossbeam::channel::{Receiver, Sender};
use log::{debug, error, info, warn};
use std::thread::{self, JoinHandle};

/// Single consumer of driver events.
///
/// Events are handled one at a time in arrival order, so the state of a
/// device is never touched by two events at once.
pub struct EventLoop {
    registry: InputRegistry,
    event_rx: Receiver<InputEvent>,
}

impl EventLoop {
    pub fn new(registry: InputRegistry, event_rx: Receiver<InputEvent>) -> Self {
        EventLoop { registry, event_rx }
    }

    /// Runs until every sender of the event channel has been dropped
    pub fn run(&mut self) {
        loop {
            // Block until the driver delivers something.
            match self.event_rx.recv() {
                Ok(event) => {
                    let device_id = event.device_id().to_string();
                    if let Err(e) = self.process(event) {
                        warn!("Dropped message from {}: {}", device_id, e);
                    }
                }
                Err(_) => {
                    info!("Event channel closed, stopping event loop");
                    break;
                }
            }
        }
    }

    /// Handles one event to completion
    pub fn process(&mut self, event: InputEvent) -> Result<Option<Message>> {
        let message = self.registry.process(event)?;
        if let Some(message) = &message {
            debug!("Applied {}", message);
        }
        Ok(message)
    }

    pub fn registry(&self) -> &InputRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut InputRegistry {
        &mut self.registry
    }

    pub fn into_registry(self) -> InputRegistry {
        self.registry
    }
}

/// Moves events from a driver into a channel on a dedicated thread.
///
/// The thread ends when the driver reports an error (a closed or exhausted
/// source) or when the receiving side is gone.
pub fn spawn_engine_pump<T>(mut engine: T, event_tx: Sender<InputEvent>) -> JoinHandle<()>
where
    T: MidiEngine + 'static,
{
    thread::spawn(move || loop {
        match engine.recv() {
            Ok(event) => {
                if event_tx.send(event).is_err() {
                    debug!("Event receiver dropped, stopping engine pump");
                    break;
                }
            }
            Err(e) => {
                error!("MIDI engine stopped: {}", e);
                break;
            }
        }
    })
}
