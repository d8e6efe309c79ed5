use crate::midi::error::Result;
use serde::{Deserialize, Serialize};

/// Whether the physical device is present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceState {
    Connected,
    #[default]
    Disconnected,
}

/// Whether the port is open for messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Open,
    #[default]
    Closed,
    Pending,
}

/// Identity of an input port as reported by the driver
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortInfo {
    pub id: String,
    pub manufacturer: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub device_state: DeviceState,
    pub connection_state: ConnectionState,
}

impl PortInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// An event delivered by a MIDI driver
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A port became known to the driver
    Discovered(PortInfo),
    /// Raw bytes of one complete message
    Message { device_id: String, bytes: Vec<u8> },
    /// Hotplug or open/close of a port
    StateChange {
        device_id: String,
        device_state: DeviceState,
        connection_state: ConnectionState,
    },
}

impl InputEvent {
    pub fn device_id(&self) -> &str {
        match self {
            InputEvent::Discovered(info) => &info.id,
            InputEvent::Message { device_id, .. } => device_id,
            InputEvent::StateChange { device_id, .. } => device_id,
        }
    }
}

/// Trait defining the interface for MIDI driver implementations
pub trait MidiEngine: Send {
    /// Sends raw MIDI bytes to the bound output
    fn send(&mut self, bytes: &[u8]) -> Result<()>;

    /// Blocks until the next driver event
    fn recv(&mut self) -> Result<InputEvent>;

    /// Lists the names of the available input ports
    fn list_devices(&self) -> Vec<String>;
}
