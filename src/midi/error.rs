use crate::midi::pitch::Pitch;
use thiserror::Error;

/// Error type for MIDI decoding, pitch conversion and device I/O
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MidiError {
    /// The message category is recognised but not supported
    #[error("unimplemented: {0}")]
    Unimplemented(String),
    /// The pitch lies outside the 0-127 note range
    #[error("pitch {0} cannot be represented as a MIDI note")]
    InvalidPitch(Pitch),
    /// Error when connecting to a MIDI device
    #[error("MIDI connection error: {0}")]
    Connection(String),
    /// Error when sending a MIDI message
    #[error("MIDI send error: {0}")]
    Send(String),
    /// Error when receiving a MIDI message
    #[error("MIDI receive error: {0}")]
    Recv(String),
}

/// Result type for MIDI operations
pub type Result<T> = std::result::Result<T, MidiError>;
