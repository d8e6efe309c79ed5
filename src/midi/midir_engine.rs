use crate::midi::{
    ConnectionState, DeviceState, InputEvent, MidiEngine, MidiError, PortInfo, Result,
};
use crossbeam::channel::{unbounded, Receiver, Sender};
use log::{info, warn};
use midir::{Ignore, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use std::fmt::Display;

/// Hardware driver backed by midir.
///
/// Binds the first input port whose name contains the requested device name,
/// and the matching output port when one exists.
pub struct MidirEngine {
    #[allow(dead_code)]
    input: Option<MidiInputConnection<()>>,
    input_port: Option<String>,
    output: Option<MidiOutputConnection>,
    rx: Receiver<InputEvent>,
    client_name: String,
}

impl MidirEngine {
    pub fn new(device_name: Option<String>, client_name: &str) -> Result<Self> {
        let (tx, rx) = unbounded();

        let (input, input_port) = match &device_name {
            Some(name) => {
                let (connection, port_name) = Self::connect_input(name, client_name, tx)?;
                (Some(connection), Some(port_name))
            }
            None => (None, None),
        };

        let output = match &device_name {
            Some(name) => Self::connect_output(name, client_name)?,
            None => None,
        };

        Ok(MidirEngine {
            input,
            input_port,
            output,
            rx,
            client_name: client_name.to_string(),
        })
    }

    fn connect_input(
        name: &str,
        client_name: &str,
        tx: Sender<InputEvent>,
    ) -> Result<(MidiInputConnection<()>, String)> {
        let mut midi_in = MidiInput::new(&format!("{}-in", client_name)).map_err(connection_error)?;
        midi_in.ignore(Ignore::None);

        // Find input port by name
        let in_ports = midi_in.ports();
        let in_port = in_ports
            .iter()
            .find(|p| midi_in.port_name(p).unwrap_or_default().contains(name))
            .ok_or_else(|| MidiError::Connection(format!("input device '{}' not found", name)))?;
        let port_name = midi_in.port_name(in_port).map_err(connection_error)?;

        let _ = tx.send(InputEvent::Discovered(PortInfo {
            name: Some(port_name.clone()),
            device_state: DeviceState::Connected,
            connection_state: ConnectionState::Open,
            ..PortInfo::new(port_name.clone())
        }));

        let device_id = port_name.clone();
        let message_tx = tx.clone();
        let connection = midi_in
            .connect(
                in_port,
                &format!("{}-input", client_name),
                move |_stamp, message, _| {
                    let _ = message_tx.send(InputEvent::Message {
                        device_id: device_id.clone(),
                        bytes: message.to_vec(),
                    });
                },
                (),
            )
            .map_err(connection_error)?;

        info!("Connected to MIDI input port: {}", port_name);
        let _ = tx.send(InputEvent::StateChange {
            device_id: port_name.clone(),
            device_state: DeviceState::Connected,
            connection_state: ConnectionState::Open,
        });

        Ok((connection, port_name))
    }

    /// Full name of the bound input port, which is also its device id
    pub fn input_port_name(&self) -> Option<&str> {
        self.input_port.as_deref()
    }

    fn connect_output(name: &str, client_name: &str) -> Result<Option<MidiOutputConnection>> {
        let midi_out =
            MidiOutput::new(&format!("{}-out", client_name)).map_err(connection_error)?;

        // Find output port by name
        let out_ports = midi_out.ports();
        let Some(out_port) = out_ports
            .iter()
            .find(|p| midi_out.port_name(p).unwrap_or_default().contains(name))
        else {
            warn!("No MIDI output port matches '{}', sending disabled", name);
            return Ok(None);
        };

        let connection = midi_out
            .connect(out_port, &format!("{}-output", client_name))
            .map_err(connection_error)?;
        Ok(Some(connection))
    }
}

fn connection_error<E: Display>(error: E) -> MidiError {
    MidiError::Connection(error.to_string())
}

impl MidiEngine for MidirEngine {
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(output) = &mut self.output {
            output
                .send(bytes)
                .map_err(|e| MidiError::Send(e.to_string()))?;
        }
        Ok(())
    }

    fn recv(&mut self) -> Result<InputEvent> {
        self.rx.recv().map_err(|e| MidiError::Recv(e.to_string()))
    }

    fn list_devices(&self) -> Vec<String> {
        let mut devices = Vec::new();

        if let Ok(midi_in) = MidiInput::new(&format!("{}-list", self.client_name)) {
            for port in midi_in.ports() {
                if let Ok(name) = midi_in.port_name(&port) {
                    devices.push(name);
                }
            }
        }

        devices
    }
}
