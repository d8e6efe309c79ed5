//! Conversion between note numbers and named pitches.
//!
//! The chromatic table is anchored at A so that octave numbers change at C,
//! giving middle C (60) as `C4`.

use crate::midi::error::{MidiError, Result};
use crate::state::NoteState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tone {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Tone::A => 'A',
            Tone::B => 'B',
            Tone::C => 'C',
            Tone::D => 'D',
            Tone::E => 'E',
            Tone::F => 'F',
            Tone::G => 'G',
        };
        write!(f, "{}", letter)
    }
}

/// Accidental applied to a tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Semitone {
    Flat,
    Natural,
    Sharp,
}

impl Semitone {
    pub fn symbol(self) -> char {
        match self {
            Semitone::Flat => '♭',
            Semitone::Natural => '♮',
            Semitone::Sharp => '♯',
        }
    }

    /// Offset from the natural tone, in whole tones
    pub fn value(self) -> f32 {
        match self {
            Semitone::Flat => -0.5,
            Semitone::Natural => 0.0,
            Semitone::Sharp => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    pub tone: Tone,
    pub semitone: Semitone,
    pub octave: i32,
}

impl Pitch {
    pub const fn new(tone: Tone, semitone: Semitone, octave: i32) -> Self {
        Self {
            tone,
            semitone,
            octave,
        }
    }

    pub const fn natural(tone: Tone, octave: i32) -> Self {
        Self::new(tone, Semitone::Natural, octave)
    }

    pub const fn sharp(tone: Tone, octave: i32) -> Self {
        Self::new(tone, Semitone::Sharp, octave)
    }

    pub const fn flat(tone: Tone, octave: i32) -> Self {
        Self::new(tone, Semitone::Flat, octave)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.semitone {
            Semitone::Natural => write!(f, "{}{}", self.tone, self.octave),
            other => write!(f, "{}{}{}", self.tone, other.symbol(), self.octave),
        }
    }
}

/// One octave of pitches starting from A.
pub const BASE_NOTES: [(Tone, Semitone); 12] = [
    (Tone::A, Semitone::Natural),
    (Tone::A, Semitone::Sharp),
    (Tone::B, Semitone::Natural),
    (Tone::C, Semitone::Natural),
    (Tone::C, Semitone::Sharp),
    (Tone::D, Semitone::Natural),
    (Tone::D, Semitone::Sharp),
    (Tone::E, Semitone::Natural),
    (Tone::F, Semitone::Natural),
    (Tone::F, Semitone::Sharp),
    (Tone::G, Semitone::Natural),
    (Tone::G, Semitone::Sharp),
];

/// Lowest key of an 88-key piano, used when no starting pitch is given.
pub const DEFAULT_START_PITCH: Pitch = Pitch::natural(Tone::A, 0);

pub fn get_pitch(note_number: u8) -> Pitch {
    let number = i32::from(note_number);
    let (tone, semitone) = BASE_NOTES[((number + 3) % 12) as usize];

    Pitch {
        tone,
        semitone,
        octave: number / 12 - 1,
    }
}

/// Converts a pitch back to its note number.
///
/// Accidentals resolve to the enharmonic note one semitone off the natural
/// tone, so `B♭4` and `A♯4` are both 70.
/// Fails with [`MidiError::InvalidPitch`] when the result falls outside 0-127.
pub fn get_note_number(pitch: &Pitch) -> Result<u8> {
    let natural = chromatic_number(natural_index(pitch.tone), i64::from(pitch.octave));
    let number = match pitch.semitone {
        Semitone::Flat => natural - 1,
        Semitone::Natural => natural,
        Semitone::Sharp => natural + 1,
    };

    u8::try_from(number)
        .ok()
        .filter(|n| *n <= 127)
        .ok_or(MidiError::InvalidPitch(*pitch))
}

fn natural_index(tone: Tone) -> i64 {
    match tone {
        Tone::A => 0,
        Tone::B => 2,
        Tone::C => 3,
        Tone::D => 5,
        Tone::E => 7,
        Tone::F => 8,
        Tone::G => 10,
    }
}

fn chromatic_number(index: i64, octave: i64) -> i64 {
    if index < 3 {
        (octave + 2) * 12 - (3 - index)
    } else {
        (octave + 1) * 12 + (index - 3)
    }
}

/// Selects a contiguous run of notes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoteRange {
    /// `count` notes beginning at `start` (or [`DEFAULT_START_PITCH`])
    Count { count: i32, start: Option<Pitch> },
    /// Every note from `start` to `end`, inclusive
    Between { start: Pitch, end: Pitch },
}

/// Builds default note states for a run of notes, ordered by note number.
///
/// Non-positive counts and ranges whose end precedes the start produce an
/// empty map. The run never extends past note 127.
pub fn get_notes(range: NoteRange) -> Result<BTreeMap<u8, NoteState>> {
    let (start, end) = match range {
        NoteRange::Count { count, start } => {
            if count <= 0 {
                return Ok(BTreeMap::new());
            }
            let first = i32::from(get_note_number(&start.unwrap_or(DEFAULT_START_PITCH))?);
            (first, first.saturating_add(count).min(128))
        }
        NoteRange::Between { start, end } => (
            i32::from(get_note_number(&start)?),
            i32::from(get_note_number(&end)?) + 1,
        ),
    };

    Ok((start..end)
        .filter_map(|n| u8::try_from(n).ok())
        .map(|n| (n, NoteState::new(n)))
        .collect())
}
