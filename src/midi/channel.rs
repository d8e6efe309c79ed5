//! Channel voice decoding and encoding.

use crate::midi::bytes::{calculate_multi_byte_value, msb_and_lsb};
use crate::midi::control::{parse_control_change, ControlChange, ControlValue};
use crate::midi::error::{MidiError, Result};
use crate::midi::message::Message;
use crate::midi::pitch::{get_pitch, Pitch};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

// Status constants
pub const NOTE_OFF: u8 = 0x80;
pub const NOTE_ON: u8 = 0x90;
pub const POLYPHONIC_KEY_PRESSURE: u8 = 0xA0;
pub const CONTROL_CHANGE: u8 = 0xB0;
pub const CHANNEL_MODE: u8 = 0xB0;
pub const PROGRAM_CHANGE: u8 = 0xC0;
pub const CHANNEL_PRESSURE: u8 = 0xD0;
pub const PITCH_BEND: u8 = 0xE0;

// Channel mode selectors
pub const ALL_SOUND_OFF: u8 = 120;
pub const RESET_ALL_CONTROLLERS: u8 = 121;
pub const LOCAL_CONTROL: u8 = 122;
pub const ALL_NOTES_OFF: u8 = 123;
pub const OMNI_OFF: u8 = 124;
pub const OMNI_ON: u8 = 125;
pub const MONO_ON: u8 = 126;
pub const MONO_OFF: u8 = 127;

/// Conventionally reserved for percussion sounds. The state model treats it
/// like any other channel.
pub const PERCUSSION_CHANNEL: u8 = 10;

/// Channel mode message selected by the first data byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelModeCode {
    AllSoundOff,
    ResetAllControllers,
    LocalControl,
    AllNotesOff,
    OmniOff,
    OmniOn,
    MonoOn,
    MonoOff,
}

impl ChannelModeCode {
    pub fn from_number(value: u8) -> Option<Self> {
        match value {
            ALL_SOUND_OFF => Some(Self::AllSoundOff),
            RESET_ALL_CONTROLLERS => Some(Self::ResetAllControllers),
            LOCAL_CONTROL => Some(Self::LocalControl),
            ALL_NOTES_OFF => Some(Self::AllNotesOff),
            OMNI_OFF => Some(Self::OmniOff),
            OMNI_ON => Some(Self::OmniOn),
            MONO_ON => Some(Self::MonoOn),
            MONO_OFF => Some(Self::MonoOff),
            _ => None,
        }
    }
}

pub fn is_channel_message(status: u8) -> bool {
    (0x80..=0xEF).contains(&status)
}

pub fn is_channel_mode_message(status: u8, first_data_byte: u8) -> bool {
    status & 0xF0 == CHANNEL_MODE && (120..=127).contains(&first_data_byte)
}

/// A message scoped to one channel describing a note, control or program event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "messageAction", rename_all_fields = "camelCase")]
pub enum VoiceMessage {
    #[serde(rename = "Note Off")]
    NoteOff { note_number: u8, pitch: Pitch },
    /// `velocity` is never zero; a zero-velocity note on decodes as `NoteOff`.
    #[serde(rename = "Note On")]
    NoteOn {
        note_number: u8,
        pitch: Pitch,
        velocity: u8,
    },
    #[serde(rename = "Polyphonic Key Pressure")]
    PolyphonicKeyPressure {
        note_number: u8,
        pitch: Pitch,
        aftertouch: u8,
    },
    #[serde(rename = "Control Change")]
    ControlChange(ControlChange),
    #[serde(rename = "Program Change")]
    ProgramChange { program: u8 },
    #[serde(rename = "Channel Pressure")]
    ChannelPressure { aftertouch: u8 },
    #[serde(rename = "Pitch Bend")]
    PitchBend { pitch_bend: u16 },
}

impl VoiceMessage {
    pub fn note_off(note_number: u8) -> Self {
        VoiceMessage::NoteOff {
            note_number,
            pitch: get_pitch(note_number),
        }
    }

    pub fn note_on(note_number: u8, velocity: u8) -> Self {
        VoiceMessage::NoteOn {
            note_number,
            pitch: get_pitch(note_number),
            velocity,
        }
    }

    pub fn polyphonic_key_pressure(note_number: u8, aftertouch: u8) -> Self {
        VoiceMessage::PolyphonicKeyPressure {
            note_number,
            pitch: get_pitch(note_number),
            aftertouch,
        }
    }

    /// High nibble of the status byte for this message
    pub fn status(&self) -> u8 {
        match self {
            VoiceMessage::NoteOff { .. } => NOTE_OFF,
            VoiceMessage::NoteOn { .. } => NOTE_ON,
            VoiceMessage::PolyphonicKeyPressure { .. } => POLYPHONIC_KEY_PRESSURE,
            VoiceMessage::ControlChange(_) => CONTROL_CHANGE,
            VoiceMessage::ProgramChange { .. } => PROGRAM_CHANGE,
            VoiceMessage::ChannelPressure { .. } => CHANNEL_PRESSURE,
            VoiceMessage::PitchBend { .. } => PITCH_BEND,
        }
    }
}

impl fmt::Display for VoiceMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoiceMessage::NoteOff { note_number, pitch } => {
                write!(f, "Note Off {} ({})", pitch, note_number)
            }
            VoiceMessage::NoteOn {
                note_number,
                pitch,
                velocity,
            } => write!(f, "Note On {} ({}) velocity {}", pitch, note_number, velocity),
            VoiceMessage::PolyphonicKeyPressure {
                note_number,
                pitch,
                aftertouch,
            } => write!(
                f,
                "Polyphonic Key Pressure {} ({}) aftertouch {}",
                pitch, note_number, aftertouch
            ),
            VoiceMessage::ControlChange(control) => write!(
                f,
                "Control Change {:?} ({}) {:?}",
                control.label, control.control_number, control.value
            ),
            VoiceMessage::ProgramChange { program } => write!(f, "Program Change {}", program),
            VoiceMessage::ChannelPressure { aftertouch } => {
                write!(f, "Channel Pressure {}", aftertouch)
            }
            VoiceMessage::PitchBend { pitch_bend } => write!(f, "Pitch Bend {}", pitch_bend),
        }
    }
}

/// Decodes a channel message from its status, channel and data bytes.
///
/// `status` may carry the channel in its low nibble; only the high nibble is
/// read. Returns `Ok(None)` when a control change carries nothing to apply.
/// Channel mode messages are recognised but always fail as unimplemented.
pub fn decode_channel_message(
    status: u8,
    channel: u8,
    first_data_byte: u8,
    second_data_byte: u8,
) -> Result<Option<Message>> {
    let status = status & 0xF0;

    if is_channel_mode_message(status, first_data_byte) {
        if let Some(code) = ChannelModeCode::from_number(first_data_byte) {
            debug!("Channel {} mode message observed: {:?}", channel, code);
        }
        return Err(MidiError::Unimplemented(
            "channel mode messages not implemented".to_string(),
        ));
    }

    let message = match status {
        NOTE_OFF => VoiceMessage::note_off(first_data_byte),
        NOTE_ON if second_data_byte == 0 => VoiceMessage::note_off(first_data_byte),
        NOTE_ON => VoiceMessage::note_on(first_data_byte, second_data_byte),
        POLYPHONIC_KEY_PRESSURE => {
            VoiceMessage::polyphonic_key_pressure(first_data_byte, second_data_byte)
        }
        CONTROL_CHANGE => match parse_control_change(first_data_byte, second_data_byte) {
            Some(control) => VoiceMessage::ControlChange(control),
            None => return Ok(None),
        },
        PROGRAM_CHANGE => VoiceMessage::ProgramChange {
            program: first_data_byte,
        },
        CHANNEL_PRESSURE => VoiceMessage::ChannelPressure {
            aftertouch: first_data_byte,
        },
        PITCH_BEND => VoiceMessage::PitchBend {
            pitch_bend: calculate_multi_byte_value(first_data_byte, second_data_byte),
        },
        _ => {
            return Err(MidiError::Unimplemented(format!(
                "status {:#04X} is not a channel voice message",
                status
            )))
        }
    };

    Ok(Some(Message::ChannelVoice {
        channel: channel & 0x0F,
        message,
    }))
}

/// Encodes a channel voice message as wire bytes.
///
/// Note off is written with velocity 0. A multi-byte control change without
/// an MSB is written to the LSB control number (`n + 32`).
pub fn encode_channel_message(channel: u8, message: &VoiceMessage) -> Vec<u8> {
    let status = message.status() | (channel & 0x0F);

    match *message {
        VoiceMessage::NoteOff { note_number, .. } => vec![status, note_number, 0],
        VoiceMessage::NoteOn {
            note_number,
            velocity,
            ..
        } => vec![status, note_number, velocity],
        VoiceMessage::PolyphonicKeyPressure {
            note_number,
            aftertouch,
            ..
        } => vec![status, note_number, aftertouch],
        VoiceMessage::ControlChange(control) => {
            let (control_number, value) = match control.value {
                ControlValue::MultiByte { msb: Some(msb), .. } => (control.control_number, msb),
                ControlValue::MultiByte { msb: None, lsb } => (control.control_number + 32, lsb),
                ControlValue::Switch { enabled } => {
                    (control.control_number, if enabled { 127 } else { 0 })
                }
                ControlValue::SingleByte { value } => (control.control_number, value),
                ControlValue::ParameterNumberLsb { lsb } => (control.control_number, lsb),
                ControlValue::ParameterNumberMsb { msb } => (control.control_number, msb),
            };
            vec![status, control_number, value]
        }
        VoiceMessage::ProgramChange { program } => vec![status, program],
        VoiceMessage::ChannelPressure { aftertouch } => vec![status, aftertouch],
        VoiceMessage::PitchBend { pitch_bend } => {
            let (msb, lsb) = msb_and_lsb(pitch_bend);
            vec![status, msb, lsb]
        }
    }
}
