use crate::midi::{
    calculate_multi_byte_value, get_pitch, ControlLabel, Pitch, RegisteredParameter,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Centred pitch wheel
pub const DEFAULT_PITCH_BEND: u16 = 8192;

/// Live state of one key.
///
/// `sustain` is latched by the sostenuto pedal while the note is on and is
/// independent of the damper pedal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteState {
    #[serde(flatten)]
    pub pitch: Pitch,
    pub note_number: u8,
    pub on: bool,
    pub sustain: bool,
    pub velocity: u8,
    pub aftertouch: u8,
}

impl NoteState {
    pub fn new(note_number: u8) -> Self {
        Self::with_pitch(note_number, get_pitch(note_number))
    }

    pub fn with_pitch(note_number: u8, pitch: Pitch) -> Self {
        Self {
            pitch,
            note_number,
            on: false,
            sustain: false,
            velocity: 0,
            aftertouch: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MultiByteControlState {
    pub msb: u8,
    pub lsb: u8,
    pub value: u16,
}

impl MultiByteControlState {
    pub fn new(msb: u8, lsb: u8) -> Self {
        Self {
            msb,
            lsb,
            value: calculate_multi_byte_value(msb, lsb),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchState {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleByteControlState {
    pub value: u8,
}

/// Stored value of one controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlState {
    MultiByte(MultiByteControlState),
    Switch(SwitchState),
    SingleByte(SingleByteControlState),
}

/// Controller values of a channel.
///
/// Named controllers are keyed by label, reserved numbers by their control
/// number. The parameter maps are reserved for resolved RPN/NRPN values and
/// are not populated by the reducer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelControlState {
    #[serde(flatten)]
    pub labeled: BTreeMap<ControlLabel, ControlState>,
    pub undefined: BTreeMap<u8, ControlState>,
    pub registered_parameters: BTreeMap<RegisteredParameter, MultiByteControlState>,
    pub non_registered_parameters: BTreeMap<u16, MultiByteControlState>,
}

impl ChannelControlState {
    pub fn get(&self, label: ControlLabel) -> Option<&ControlState> {
        self.labeled.get(&label)
    }

    pub fn multi_byte(&self, label: ControlLabel) -> Option<&MultiByteControlState> {
        match self.labeled.get(&label) {
            Some(ControlState::MultiByte(state)) => Some(state),
            _ => None,
        }
    }

    /// `false` when the switch has never been seen
    pub fn switch_enabled(&self, label: ControlLabel) -> bool {
        matches!(
            self.labeled.get(&label),
            Some(ControlState::Switch(SwitchState { enabled: true }))
        )
    }

    pub fn single_byte(&self, label: ControlLabel) -> Option<u8> {
        match self.labeled.get(&label) {
            Some(ControlState::SingleByte(state)) => Some(state.value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgramState {
    pub program: u8,
    pub bank: u8,
    pub sound: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMode {
    pub omni: bool,
    pub mono: bool,
}

impl Default for ChannelMode {
    fn default() -> Self {
        Self {
            omni: true,
            mono: false,
        }
    }
}

/// Everything known about one MIDI channel of a device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelState {
    pub number: u8,
    /// Ordered by note number
    pub notes: BTreeMap<u8, NoteState>,
    pub aftertouch: u8,
    pub pitch_bend: u16,
    pub program: ProgramState,
    pub controls: ChannelControlState,
    pub mode: ChannelMode,
}

impl ChannelState {
    pub fn new(number: u8) -> Self {
        Self {
            number,
            notes: BTreeMap::new(),
            aftertouch: 0,
            pitch_bend: DEFAULT_PITCH_BEND,
            program: ProgramState::default(),
            controls: ChannelControlState::default(),
            mode: ChannelMode::default(),
        }
    }

    pub fn note(&self, note_number: u8) -> Option<&NoteState> {
        self.notes.get(&note_number)
    }

    /// Note numbers currently sounding
    pub fn active_notes(&self) -> impl Iterator<Item = u8> + '_ {
        self.notes
            .values()
            .filter(|note| note.on)
            .map(|note| note.note_number)
    }
}

impl Default for ChannelState {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Note offs held back by a pedal, per channel
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingChanges {
    pub note_off: BTreeSet<u8>,
}
