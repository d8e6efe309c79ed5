//! Folds decoded voice messages into channel state.
//!
//! Every transition is total: a well-formed message always applies and
//! never fails. Messages for one channel must be applied in arrival order,
//! since key-range inference and pedal deferral depend on earlier state.

use crate::midi::{ControlChange, ControlLabel, ControlValue, Pitch, VoiceMessage};
use crate::state::types::{
    ChannelState, ControlState, MultiByteControlState, NoteState, PendingChanges,
    SingleByteControlState, SwitchState,
};
use log::debug;
use std::ops::Bound;

/// Applies one voice message to a channel and its pending note offs.
pub fn apply_voice_message(
    channel: &mut ChannelState,
    pending: &mut PendingChanges,
    message: &VoiceMessage,
) {
    match *message {
        VoiceMessage::NoteOff { note_number, pitch } => {
            note_off(channel, pending, note_number, pitch)
        }
        VoiceMessage::NoteOn {
            note_number,
            pitch,
            velocity,
        } => note_on(channel, pending, note_number, pitch, velocity),
        VoiceMessage::PolyphonicKeyPressure {
            note_number,
            pitch,
            aftertouch,
        } => {
            channel
                .notes
                .entry(note_number)
                .and_modify(|note| note.aftertouch = aftertouch)
                // Pressure on an unseen key does not sound it
                .or_insert_with(|| NoteState::with_pitch(note_number, pitch));
        }
        VoiceMessage::ChannelPressure { aftertouch } => {
            channel.aftertouch = aftertouch;
            for note in channel.notes.values_mut() {
                note.aftertouch = aftertouch;
            }
        }
        VoiceMessage::PitchBend { pitch_bend } => channel.pitch_bend = pitch_bend,
        VoiceMessage::ProgramChange { program } => {
            let bank_select = channel.controls.multi_byte(ControlLabel::BankSelect);
            channel.program.program = program;
            channel.program.bank = bank_select.map_or(0, |bank| bank.msb);
            channel.program.sound = bank_select.map_or(0, |bank| bank.lsb);
        }
        VoiceMessage::ControlChange(control) => control_change(channel, pending, &control),
    }
}

fn note_off(channel: &mut ChannelState, pending: &mut PendingChanges, note_number: u8, pitch: Pitch) {
    let sustained = channel
        .notes
        .get(&note_number)
        .is_some_and(|note| note.sustain);

    if sustained || channel.controls.switch_enabled(ControlLabel::DamperPedal) {
        debug!(
            "Channel {} note {} off deferred by pedal",
            channel.number, note_number
        );
        pending.note_off.insert(note_number);
        return;
    }

    let aftertouch = channel.aftertouch;
    let note = channel
        .notes
        .entry(note_number)
        .or_insert_with(|| NoteState::with_pitch(note_number, pitch));
    note.on = false;
    note.velocity = 0;
    note.aftertouch = aftertouch;
}

fn note_on(
    channel: &mut ChannelState,
    pending: &mut PendingChanges,
    note_number: u8,
    pitch: Pitch,
    velocity: u8,
) {
    let aftertouch = channel.aftertouch;
    let note = channel
        .notes
        .entry(note_number)
        .or_insert_with(|| NoteState::with_pitch(note_number, pitch));
    note.on = true;
    note.velocity = velocity;
    note.aftertouch = aftertouch;

    // Once two keys have been struck, assume every key between them exists
    if channel.notes.len() > 1 {
        let neighbour = channel
            .notes
            .range(..note_number)
            .next_back()
            .or_else(|| {
                channel
                    .notes
                    .range((Bound::Excluded(note_number), Bound::Unbounded))
                    .next()
            })
            .map(|(number, _)| *number);

        if let Some(neighbour) = neighbour {
            let (low, high) = if neighbour < note_number {
                (neighbour, note_number)
            } else {
                (note_number, neighbour)
            };
            for number in low + 1..high {
                channel.notes.entry(number).or_insert_with(|| NoteState {
                    aftertouch,
                    ..NoteState::new(number)
                });
            }
        }
    }

    // A fresh press supersedes any release still held by a pedal
    pending.note_off.remove(&note_number);
}

fn control_change(channel: &mut ChannelState, pending: &mut PendingChanges, control: &ControlChange) {
    match control.value {
        ControlValue::MultiByte { msb, lsb } => {
            let empty = ControlState::MultiByte(MultiByteControlState::default());
            let slot = if control.label == ControlLabel::Undefined {
                channel
                    .controls
                    .undefined
                    .entry(control.control_number)
                    .or_insert(empty)
            } else {
                channel.controls.labeled.entry(control.label).or_insert(empty)
            };
            merge_multi_byte(slot, msb, lsb);
        }
        ControlValue::Switch { enabled } => {
            channel
                .controls
                .labeled
                .insert(control.label, ControlState::Switch(SwitchState { enabled }));

            match control.label {
                ControlLabel::DamperPedal if !enabled => release_damper(channel, pending),
                ControlLabel::SostenutoPedal if enabled => latch_sostenuto(channel),
                ControlLabel::SostenutoPedal => release_sostenuto(channel, pending),
                _ => {}
            }
        }
        ControlValue::SingleByte { value } => {
            let state = ControlState::SingleByte(SingleByteControlState { value });
            if control.label == ControlLabel::Undefined {
                channel
                    .controls
                    .undefined
                    .insert(control.control_number, state);
            } else {
                channel.controls.labeled.insert(control.label, state);
            }
        }
        // TODO: resolve RPN/NRPN selection into registered_parameters once data entry (6/38) is tracked
        ControlValue::ParameterNumberLsb { .. } | ControlValue::ParameterNumberMsb { .. } => {}
    }
}

/// An MSB resets the LSB to 0; an LSB alone keeps the stored MSB.
fn merge_multi_byte(slot: &mut ControlState, msb: Option<u8>, lsb: u8) {
    let stored_msb = match slot {
        ControlState::MultiByte(state) => state.msb,
        _ => 0,
    };
    *slot = ControlState::MultiByte(MultiByteControlState::new(msb.unwrap_or(stored_msb), lsb));
}

fn release_damper(channel: &mut ChannelState, pending: &mut PendingChanges) {
    pending.note_off.retain(|number| match channel.notes.get_mut(number) {
        Some(note) if note.sustain => true,
        Some(note) => {
            note.on = false;
            note.velocity = 0;
            false
        }
        None => false,
    });
    debug!(
        "Channel {} damper released, {} note offs still held",
        channel.number,
        pending.note_off.len()
    );
}

fn latch_sostenuto(channel: &mut ChannelState) {
    for note in channel.notes.values_mut().filter(|note| note.on) {
        note.sustain = true;
    }
}

fn release_sostenuto(channel: &mut ChannelState, pending: &mut PendingChanges) {
    for note in channel.notes.values_mut() {
        if note.sustain && pending.note_off.remove(&note.note_number) {
            note.on = false;
            note.velocity = 0;
        }
        note.sustain = false;
    }
    debug!("Channel {} sostenuto released", channel.number);
}
