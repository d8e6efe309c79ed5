//! MIDI wire layer for midistate
//!
//! This module turns raw device buffers into typed messages and back:
//! - Byte range predicates and 14-bit value helpers
//! - Note number / pitch conversion
//! - Control change classification
//! - Channel voice decoding and encoding
//! - The driver boundary ([`MidiEngine`]) with midir and mock implementations
//!
mod bytes;
mod channel;
mod control;
mod engine;
mod error;
mod message;
mod pitch;

#[cfg(feature = "midi-io")]
pub mod midir_engine;
pub mod mock_engine;

pub use bytes::{
    calculate_multi_byte_value, is_byte, is_channel_number, is_data_byte, is_multi_byte_value,
    is_status_byte, msb_and_lsb, MAX_MULTI_BYTE_VALUE,
};
pub use channel::{
    decode_channel_message, encode_channel_message, is_channel_message, is_channel_mode_message,
    ChannelModeCode, VoiceMessage, ALL_NOTES_OFF, ALL_SOUND_OFF, CHANNEL_MODE, CHANNEL_PRESSURE,
    CONTROL_CHANGE, LOCAL_CONTROL, MONO_OFF, MONO_ON, NOTE_OFF, NOTE_ON, OMNI_OFF, OMNI_ON,
    PERCUSSION_CHANNEL, PITCH_BEND, POLYPHONIC_KEY_PRESSURE, PROGRAM_CHANGE,
    RESET_ALL_CONTROLLERS,
};
pub use control::{
    control_label, control_shape, is_control_number, is_multi_byte_control_lsb,
    is_multi_byte_control_msb, is_non_registered_lsb, is_non_registered_msb, is_registered_lsb,
    is_registered_msb, is_registered_parameter_number, is_single_byte_control_number,
    is_switch_control_number, parse_control_change, ControlChange, ControlLabel, ControlShape,
    ControlValue, RegisteredParameter, UNDEFINED_CONTROL_NUMBERS,
};
pub use engine::{ConnectionState, DeviceState, InputEvent, MidiEngine, PortInfo};
pub use error::{MidiError, Result};
pub use message::{decode, Message};
pub use pitch::{
    get_note_number, get_notes, get_pitch, NoteRange, Pitch, Semitone, Tone, BASE_NOTES,
    DEFAULT_START_PITCH,
};

#[cfg(feature = "midi-io")]
pub use midir_engine::MidirEngine;
pub use mock_engine::MockMidiEngine;

// Set default engine type
#[cfg(feature = "midi-io")]
pub type DefaultMidiEngine = MidirEngine;

/// Names of the input ports the driver can bind to
#[cfg(all(feature = "midi-io", not(feature = "test-mock")))]
pub fn list_devices() -> Vec<String> {
    let mut devices = Vec::new();

    if let Ok(midi_in) = midir::MidiInput::new("midistate-list") {
        for port in midi_in.ports() {
            if let Ok(name) = midi_in.port_name(&port) {
                devices.push(name);
            }
        }
    }

    devices
}

#[cfg(feature = "test-mock")]
pub fn list_devices() -> Vec<String> {
    // Mock implementation for tests
    MockMidiEngine::default_devices()
}

#[cfg(all(not(feature = "midi-io"), not(feature = "test-mock")))]
pub fn list_devices() -> Vec<String> {
    Vec::new()
}
