//! MIDI input curation for midisense.
//!
//! Connects a host's MIDI inputs to the classifier in `midisense-core`:
//! every input gets a message hook, hot-plug changes trigger re-curation,
//! and subscribers receive semantic events.
//!
//! Feature gates: `midi-io` (hardware inputs through midir, on by default).
//! Without it, any [`MidiAccess`] implementation (such as
//! [`VirtualMidiAccess`]) can drive a [`MidiListener`].

pub mod error;
pub use error::{Error, Result};

pub mod access;
pub use access::{
    ConnectionState, DeviceState, MessageHook, MidiAccess, PortInfo, PortType, StateChangeHook,
};

mod virtual_access;
pub use virtual_access::VirtualMidiAccess;

pub mod curator;
pub use curator::{CurationOutcome, InputCurator};

mod system;
pub use system::{MidiListener, MidiListenerBuilder};

#[cfg(feature = "midi-io")]
pub(crate) mod io;

#[cfg(feature = "midi-io")]
pub use io::{MidirAccess, DEFAULT_CLIENT_NAME, DEFAULT_POLL_INTERVAL};

pub use midisense_core::{
    EventBus, EventKind, InputChange, MidiHandlers, MidiInputEvent, ModWheelEvent, NoteEvent,
    PadEvent, ParsedMessage, PitchBendEvent, Subscription,
};
