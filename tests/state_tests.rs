use midistate::midi::{decode, ControlLabel, Message};
use midistate::state::{
    apply_voice_message, ChannelState, MultiByteControlState, PendingChanges, ProgramState,
    DEFAULT_PITCH_BEND,
};

struct Channel {
    state: ChannelState,
    pending: PendingChanges,
}

impl Channel {
    fn new() -> Self {
        Channel {
            state: ChannelState::new(0),
            pending: PendingChanges::default(),
        }
    }

    fn feed(&mut self, bytes: &[u8]) -> &mut Self {
        let Some(Message::ChannelVoice { message, .. }) = decode(bytes).unwrap() else {
            panic!("{:?} decoded to nothing", bytes);
        };
        apply_voice_message(&mut self.state, &mut self.pending, &message);
        self
    }

    fn is_on(&self, note: u8) -> bool {
        self.state.note(note).is_some_and(|n| n.on)
    }
}

#[test]
fn test_new_channel_defaults() {
    let channel = ChannelState::new(3);
    assert_eq!(channel.number, 3);
    assert!(channel.notes.is_empty());
    assert_eq!(channel.pitch_bend, DEFAULT_PITCH_BEND);
    assert_eq!(channel.program, ProgramState::default());
    assert!(channel.mode.omni);
    assert!(!channel.mode.mono);
}

#[test]
fn test_note_on_and_off() {
    let mut channel = Channel::new();
    channel.feed(&[0x90, 60, 64]);

    let note = channel.state.note(60).unwrap();
    assert!(note.on);
    assert_eq!(note.velocity, 64);
    assert_eq!(note.pitch.to_string(), "C4");

    channel.feed(&[0x80, 60, 30]);
    let note = channel.state.note(60).unwrap();
    assert!(!note.on);
    assert_eq!(note.velocity, 0);
    assert!(channel.pending.note_off.is_empty());
}

#[test]
fn test_gap_fill_between_struck_keys() {
    let mut channel = Channel::new();
    channel
        .feed(&[0x90, 60, 64])
        .feed(&[0x90, 67, 50])
        .feed(&[0x90, 64, 70]);

    let numbers: Vec<u8> = channel.state.notes.keys().copied().collect();
    assert_eq!(numbers, (60..=67).collect::<Vec<u8>>());

    for n in [61, 62, 63, 65, 66] {
        let note = channel.state.note(n).unwrap();
        assert!(!note.on, "note {}", n);
        assert_eq!(note.velocity, 0);
    }
    assert_eq!(
        channel.state.active_notes().collect::<Vec<u8>>(),
        vec![60, 64, 67]
    );
}

#[test]
fn test_gap_fill_below_lowest_key() {
    let mut channel = Channel::new();
    channel.feed(&[0x90, 72, 64]).feed(&[0x90, 65, 64]);

    let numbers: Vec<u8> = channel.state.notes.keys().copied().collect();
    assert_eq!(numbers, (65..=72).collect::<Vec<u8>>());
}

#[test]
fn test_gap_fill_uses_channel_aftertouch() {
    let mut channel = Channel::new();
    channel
        .feed(&[0xD0, 30])
        .feed(&[0x90, 60, 64])
        .feed(&[0x90, 62, 64]);

    assert_eq!(channel.state.note(61).unwrap().aftertouch, 30);
    assert_eq!(channel.state.note(62).unwrap().aftertouch, 30);
}

#[test]
fn test_damper_defers_note_off() {
    let mut channel = Channel::new();
    channel
        .feed(&[0x90, 60, 64])
        .feed(&[0xB0, 64, 127])
        .feed(&[0x80, 60, 0]);

    assert!(channel.is_on(60));
    assert!(channel.pending.note_off.contains(&60));

    channel.feed(&[0xB0, 64, 0]);
    let note = channel.state.note(60).unwrap();
    assert!(!note.on);
    assert_eq!(note.velocity, 0);
    assert!(channel.pending.note_off.is_empty());
}

#[test]
fn test_repressed_note_survives_damper_release() {
    let mut channel = Channel::new();
    channel
        .feed(&[0x90, 60, 64])
        .feed(&[0xB0, 64, 127])
        .feed(&[0x80, 60, 0])
        .feed(&[0x90, 60, 90]);

    assert!(channel.pending.note_off.is_empty());

    channel.feed(&[0xB0, 64, 0]);
    assert!(channel.is_on(60));
    assert_eq!(channel.state.note(60).unwrap().velocity, 90);
}

#[test]
fn test_sostenuto_latches_held_notes() {
    let mut channel = Channel::new();
    channel.feed(&[0x90, 60, 64]).feed(&[0xB0, 66, 127]);
    assert!(channel.state.note(60).unwrap().sustain);

    // Pressed after the pedal went down, so not latched
    channel.feed(&[0x90, 62, 64]);
    assert!(!channel.state.note(62).unwrap().sustain);

    channel.feed(&[0x80, 60, 0]).feed(&[0x80, 62, 0]);
    assert!(channel.is_on(60));
    assert!(!channel.is_on(62));
    assert_eq!(channel.pending.note_off.iter().copied().collect::<Vec<u8>>(), vec![60]);

    channel.feed(&[0xB0, 66, 0]);
    let note = channel.state.note(60).unwrap();
    assert!(!note.on);
    assert!(!note.sustain);
    assert!(channel.pending.note_off.is_empty());
}

#[test]
fn test_damper_release_keeps_sostenuto_notes() {
    let mut channel = Channel::new();
    channel
        .feed(&[0x90, 60, 64])
        .feed(&[0xB0, 66, 127])
        .feed(&[0xB0, 64, 127])
        .feed(&[0x80, 60, 0])
        .feed(&[0xB0, 64, 0]);

    assert!(channel.is_on(60));
    assert!(channel.pending.note_off.contains(&60));

    channel.feed(&[0xB0, 66, 0]);
    assert!(!channel.is_on(60));
    assert!(channel.pending.note_off.is_empty());
}

#[test]
fn test_multi_byte_merge() {
    let mut channel = Channel::new();
    channel.feed(&[0xB0, 8, 80]).feed(&[0xB0, 40, 64]);
    assert_eq!(
        channel.state.controls.multi_byte(ControlLabel::Balance),
        Some(&MultiByteControlState {
            msb: 80,
            lsb: 64,
            value: 10304
        })
    );

    // A new MSB resets the LSB
    channel.feed(&[0xB0, 8, 81]);
    assert_eq!(
        channel.state.controls.multi_byte(ControlLabel::Balance),
        Some(&MultiByteControlState::new(81, 0))
    );
}

#[test]
fn test_lsb_without_msb() {
    let mut channel = Channel::new();
    channel.feed(&[0xB0, 33, 5]);
    assert_eq!(
        channel
            .state
            .controls
            .multi_byte(ControlLabel::ModulationWheel)
            .map(|c| c.value),
        Some(5)
    );
}

#[test]
fn test_undefined_controls_keyed_by_number() {
    let mut channel = Channel::new();
    channel.feed(&[0xB0, 3, 10]).feed(&[0xB0, 85, 7]);

    assert!(channel.state.controls.get(ControlLabel::Undefined).is_none());
    assert_eq!(channel.state.controls.undefined.len(), 2);
    assert!(channel.state.controls.undefined.contains_key(&3));
    assert!(channel.state.controls.undefined.contains_key(&85));
}

#[test]
fn test_single_byte_and_switch_storage() {
    let mut channel = Channel::new();
    channel.feed(&[0xB0, 74, 99]).feed(&[0xB0, 67, 127]);

    assert_eq!(
        channel.state.controls.single_byte(ControlLabel::Brightness),
        Some(99)
    );
    assert!(channel.state.controls.switch_enabled(ControlLabel::SoftPedal));
    assert!(!channel.state.controls.switch_enabled(ControlLabel::DamperPedal));
}

#[test]
fn test_program_change_reads_bank_select() {
    let mut channel = Channel::new();
    channel.feed(&[0xC0, 4]);
    assert_eq!(
        channel.state.program,
        ProgramState {
            program: 4,
            bank: 0,
            sound: 0
        }
    );

    channel
        .feed(&[0xB0, 0, 2])
        .feed(&[0xB0, 32, 3])
        .feed(&[0xC0, 15]);
    assert_eq!(
        channel.state.program,
        ProgramState {
            program: 15,
            bank: 2,
            sound: 3
        }
    );
}

#[test]
fn test_channel_pressure_fans_out() {
    let mut channel = Channel::new();
    channel
        .feed(&[0x90, 60, 64])
        .feed(&[0x90, 62, 64])
        .feed(&[0x80, 62, 0])
        .feed(&[0xD0, 50]);

    assert_eq!(channel.state.aftertouch, 50);
    for note in channel.state.notes.values() {
        assert_eq!(note.aftertouch, 50, "note {}", note.note_number);
    }
}

#[test]
fn test_polyphonic_pressure() {
    let mut channel = Channel::new();
    channel.feed(&[0x90, 60, 64]).feed(&[0xA0, 60, 40]);
    assert_eq!(channel.state.note(60).unwrap().aftertouch, 40);

    // An unseen key is tracked but not sounded
    channel.feed(&[0xA0, 72, 40]);
    let note = channel.state.note(72).unwrap();
    assert!(!note.on);
    assert_eq!(note.aftertouch, 0);
}

#[test]
fn test_pitch_bend_replaces() {
    let mut channel = Channel::new();
    channel.feed(&[0xE0, 0, 0]);
    assert_eq!(channel.state.pitch_bend, 0);
    channel.feed(&[0xE0, 0x7F, 0x7F]);
    assert_eq!(channel.state.pitch_bend, 16383);
}

#[test]
fn test_parameter_number_selection_is_ignored() {
    let mut channel = Channel::new();
    channel.feed(&[0xB0, 101, 0]).feed(&[0xB0, 100, 0]);

    assert!(channel.state.controls.registered_parameters.is_empty());
    assert!(channel.state.controls.non_registered_parameters.is_empty());
}
