//! Top level decoding of raw MIDI buffers.

use crate::midi::bytes::{is_data_byte, is_status_byte};
use crate::midi::channel::{decode_channel_message, encode_channel_message, VoiceMessage};
use crate::midi::error::{MidiError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A decoded MIDI message.
///
/// Only channel voice messages are produced; system and channel mode
/// messages are rejected by [`decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Message {
    ChannelVoice { channel: u8, message: VoiceMessage },
}

impl Message {
    pub fn channel(&self) -> u8 {
        match self {
            Message::ChannelVoice { channel, .. } => *channel,
        }
    }

    /// Encodes the message back into wire bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Message::ChannelVoice { channel, message } => encode_channel_message(*channel, message),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::ChannelVoice { channel, message } => write!(f, "ch {} {}", channel, message),
        }
    }
}

/// Decodes one complete message from a raw buffer.
///
/// Buffers that do not start with a status byte yield `Ok(None)`. Running
/// status is expected to be expanded by the driver, so this only guards
/// against stray data. Missing or out-of-range data bytes read as 0.
pub fn decode(raw: &[u8]) -> Result<Option<Message>> {
    let status = match raw.first() {
        Some(&byte) if is_status_byte(i32::from(byte)) => byte,
        _ => return Ok(None),
    };

    let msb = status & 0xF0;
    let lsb = status & 0x0F;
    let first_data_byte = data_byte_at(raw, 1);
    let second_data_byte = data_byte_at(raw, 2);

    if (0x80..=0xE0).contains(&msb) {
        return decode_channel_message(msb, lsb, first_data_byte, second_data_byte);
    }

    Err(MidiError::Unimplemented(
        "system messages not implemented yet".to_string(),
    ))
}

fn data_byte_at(raw: &[u8], index: usize) -> u8 {
    raw.get(index)
        .copied()
        .filter(|byte| is_data_byte(i32::from(*byte)))
        .unwrap_or(0)
}
