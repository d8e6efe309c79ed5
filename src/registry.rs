//! Per-device state and listener bookkeeping.
//!
//! [`InputRegistry`] owns every [`Input`], the pedal-deferred note offs of
//! each channel and the listeners registered against each device. Each
//! inbound buffer runs decode, reduce and notify to completion before the
//! call returns; listeners only ever receive shared references.

use crate::midi::{decode, ConnectionState, DeviceState, InputEvent, Message, PortInfo, Result};
use crate::state::{apply_voice_message, ChannelState, PendingChanges};
use log::{debug, info};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Callback invoked with every message decoded for a device
pub type MessageListener = Box<dyn FnMut(&Message) + Send>;

/// Callback invoked with the device after its state changed
pub type StateChangeListener = Box<dyn FnMut(&Input) + Send>;

/// Handle returned when registering a listener, used to remove it again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// A MIDI input device and the state of all channels seen on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub id: String,
    pub manufacturer: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub device_state: DeviceState,
    pub connection_state: ConnectionState,
    pub channels: BTreeMap<u8, ChannelState>,
}

/// Serializable copy of an [`Input`].
///
/// Connection bookkeeping is left out; channel notes are keyed by their
/// note number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSnapshot {
    pub id: String,
    pub manufacturer: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub channels: BTreeMap<u8, ChannelState>,
}

impl Input {
    pub fn new(id: impl Into<String>) -> Self {
        Self::from_port(PortInfo::new(id))
    }

    pub fn from_port(port: PortInfo) -> Self {
        Self {
            id: port.id,
            manufacturer: port.manufacturer,
            name: port.name,
            version: port.version,
            device_state: port.device_state,
            connection_state: port.connection_state,
            channels: BTreeMap::new(),
        }
    }

    pub fn channel(&self, number: u8) -> Option<&ChannelState> {
        self.channels.get(&number)
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            id: self.id.clone(),
            manufacturer: self.manufacturer.clone(),
            name: self.name.clone(),
            version: self.version.clone(),
            channels: self.channels.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.snapshot())
    }
}

/// Owner of all device state, keyed by device id
#[derive(Default)]
pub struct InputRegistry {
    inputs: HashMap<String, Input>,
    pending: HashMap<String, BTreeMap<u8, PendingChanges>>,
    message_listeners: HashMap<String, Vec<(ListenerId, MessageListener)>>,
    state_listeners: HashMap<String, Vec<(ListenerId, StateChangeListener)>>,
    next_listener_id: u64,
}

impl InputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self, device_id: &str) -> Option<&Input> {
        self.inputs.get(device_id)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Input> {
        self.inputs.values()
    }

    /// Note offs currently held back by a pedal on one channel
    pub fn pending(&self, device_id: &str, channel: u8) -> Option<&PendingChanges> {
        self.pending.get(device_id)?.get(&channel)
    }

    pub fn add_message_listener<F>(&mut self, device_id: &str, listener: F) -> ListenerId
    where
        F: FnMut(&Message) + Send + 'static,
    {
        let id = self.next_id();
        self.message_listeners
            .entry(device_id.to_string())
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if no such listener was registered for the device
    pub fn remove_message_listener(&mut self, device_id: &str, id: ListenerId) -> bool {
        remove_listener(&mut self.message_listeners, device_id, id)
    }

    pub fn add_state_change_listener<F>(&mut self, device_id: &str, listener: F) -> ListenerId
    where
        F: FnMut(&Input) + Send + 'static,
    {
        let id = self.next_id();
        self.state_listeners
            .entry(device_id.to_string())
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    pub fn remove_state_change_listener(&mut self, device_id: &str, id: ListenerId) -> bool {
        remove_listener(&mut self.state_listeners, device_id, id)
    }

    /// Records a device announced by the driver.
    ///
    /// A known device keeps its channel state; only its identity and
    /// connection fields are refreshed. No listeners are notified.
    pub fn initialize_input(&mut self, port: PortInfo) -> &Input {
        info!("Discovered MIDI input: {}", port.id);
        match self.inputs.entry(port.id.clone()) {
            std::collections::hash_map::Entry::Occupied(entry) => {
                let input = entry.into_mut();
                input.manufacturer = port.manufacturer;
                input.name = port.name;
                input.version = port.version;
                input.device_state = port.device_state;
                input.connection_state = port.connection_state;
                input
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(Input::from_port(port))
            }
        }
    }

    /// Decodes one raw buffer from a device and folds it into that device's state.
    ///
    /// On a decode error nothing is mutated and nobody is notified. A buffer
    /// that decodes to no message only registers the device. Otherwise message
    /// listeners then state-change listeners are invoked, each in registration
    /// order, after the state has been updated.
    pub fn handle_message(&mut self, device_id: &str, bytes: &[u8]) -> Result<Option<Message>> {
        let decoded = decode(bytes)?;

        let input = self
            .inputs
            .entry(device_id.to_string())
            .or_insert_with(|| Input::new(device_id));

        let Some(message) = decoded else {
            debug!("Ignoring buffer without status byte from {}", device_id);
            return Ok(None);
        };

        let Message::ChannelVoice {
            channel,
            message: voice,
        } = message;

        let channel_state = input
            .channels
            .entry(channel)
            .or_insert_with(|| ChannelState::new(channel));
        let pending = self
            .pending
            .entry(device_id.to_string())
            .or_default()
            .entry(channel)
            .or_default();
        apply_voice_message(channel_state, pending, &voice);

        if let Some(listeners) = self.message_listeners.get_mut(device_id) {
            for (_, listener) in listeners.iter_mut() {
                listener(&message);
            }
        }
        if let Some(listeners) = self.state_listeners.get_mut(device_id) {
            for (_, listener) in listeners.iter_mut() {
                listener(input);
            }
        }

        Ok(Some(message))
    }

    /// Updates the connection bookkeeping of a device and notifies its state listeners
    pub fn handle_state_change(
        &mut self,
        device_id: &str,
        device_state: DeviceState,
        connection_state: ConnectionState,
    ) {
        let input = self
            .inputs
            .entry(device_id.to_string())
            .or_insert_with(|| Input::new(device_id));
        input.device_state = device_state;
        input.connection_state = connection_state;
        info!(
            "MIDI input {} is {:?} / {:?}",
            device_id, device_state, connection_state
        );

        if let Some(listeners) = self.state_listeners.get_mut(device_id) {
            for (_, listener) in listeners.iter_mut() {
                listener(input);
            }
        }
    }

    /// Dispatches one driver event
    pub fn process(&mut self, event: InputEvent) -> Result<Option<Message>> {
        match event {
            InputEvent::Discovered(port) => {
                self.initialize_input(port);
                Ok(None)
            }
            InputEvent::Message { device_id, bytes } => self.handle_message(&device_id, &bytes),
            InputEvent::StateChange {
                device_id,
                device_state,
                connection_state,
            } => {
                self.handle_state_change(&device_id, device_state, connection_state);
                Ok(None)
            }
        }
    }

    fn next_id(&mut self) -> ListenerId {
        self.next_listener_id += 1;
        ListenerId(self.next_listener_id)
    }
}

fn remove_listener<L>(
    listeners: &mut HashMap<String, Vec<(ListenerId, L)>>,
    device_id: &str,
    id: ListenerId,
) -> bool {
    let Some(registered) = listeners.get_mut(device_id) else {
        return false;
    };
    let before = registered.len();
    registered.retain(|(listener_id, _)| *listener_id != id);
    registered.len() != before
}
