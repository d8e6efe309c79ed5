pub mod cli;
pub mod config;
pub mod event_loop;
pub mod logging;
pub mod midi;
pub mod registry;
pub mod state;

pub use event_loop::{spawn_engine_pump, EventLoop};
pub use midi::{decode, InputEvent, Message, MidiEngine, MidiError, VoiceMessage};
pub use registry::{Input, InputRegistry, InputSnapshot, ListenerId};
pub use state::{apply_voice_message, ChannelState, NoteState, PendingChanges};
