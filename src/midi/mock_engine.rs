use crate::midi::{InputEvent, MidiEngine, MidiError, Result};
use std::collections::VecDeque;

/// Replays a scripted list of events and records everything sent to it.
#[derive(Debug, Default)]
pub struct MockMidiEngine {
    events: VecDeque<InputEvent>,
    devices: Vec<String>,
    sent: Vec<Vec<u8>>,
}

impl MockMidiEngine {
    pub fn new(events: Vec<InputEvent>) -> Self {
        Self {
            events: events.into(),
            devices: Self::default_devices(),
            sent: Vec::new(),
        }
    }

    pub fn default_devices() -> Vec<String> {
        vec!["Mock Device 1".to_string(), "Mock Device 2".to_string()]
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Bytes passed to `send`, in order
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }
}

impl MidiEngine for MockMidiEngine {
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        self.sent.push(bytes.to_vec());
        Ok(())
    }

    fn recv(&mut self) -> Result<InputEvent> {
        self.events
            .pop_front()
            .ok_or_else(|| MidiError::Recv("mock event queue exhausted".to_string()))
    }

    fn list_devices(&self) -> Vec<String> {
        self.devices.clone()
    }
}
