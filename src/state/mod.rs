//! Channel and note state tracking
//!
//! [`apply_voice_message`] is the only mutator of the records defined in
//! [`types`]; everything else reads them.

mod reducer;
pub mod types;

pub use reducer::apply_voice_message;
pub use types::{
    ChannelControlState, ChannelMode, ChannelState, ControlState, MultiByteControlState,
    NoteState, PendingChanges, ProgramState, SingleByteControlState, SwitchState,
    DEFAULT_PITCH_BEND,
};
