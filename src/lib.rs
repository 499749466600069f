//! # midisense - MIDI Input Curation
//!
//! Turns raw MIDI input into semantic events and keeps track of which inputs
//! are live.
//!
//! ## Architecture
//!
//! midisense is an umbrella crate over:
//! - **midisense-core** - Message decoding, classification, per-kind event routing
//! - **midisense-io** - Host access, input curation, hardware inputs via midir
//!
//! ## Quick Start
//!
//! ```ignore
//! use midisense::prelude::*;
//!
//! let listener = MidiListener::builder()
//!     .io()
//!     .on_input_change(|change| println!("inputs: {:?}", change.input_names))
//!     .on_note(|note| println!("{:?} Hz, velocity {:?}", note.frequency, note.velocity))
//!     .on_pad(|pad| println!("pad {:?}", pad.code))
//!     .build()?;
//!
//! // Later
//! listener.clear();
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Hardware inputs
//! - `midi-io` - Hardware inputs through midir

/// Re-export of midisense-core for direct access
pub use midisense_core as core;

/// Re-export of midisense-io for direct access
pub use midisense_io as io;

// Events and classification
pub use midisense_core::{
    classify, events_from_bytes, EventKind, InputChange, MidiInputEvent, ModWheelEvent,
    NoteEvent, PadEvent, ParsedMessage, PitchBendEvent, MOD_WHEEL_CC,
};

// Routing
pub use midisense_core::{EventBus, MidiHandlers, Subscription};

// Conversions
pub use midisense_core::{data_to_unit, gain_to_velocity, hz_to_note, note_to_hz, velocity_to_gain};

// Host access and curation
pub use midisense_io::{
    ConnectionState, CurationOutcome, DeviceState, Error, MidiAccess, MidiListener,
    MidiListenerBuilder, PortInfo, PortType, Result, VirtualMidiAccess,
};

#[cfg(feature = "midi-io")]
pub use midisense_io::MidirAccess;

pub mod prelude {
    // Main entry point
    pub use crate::{MidiListener, MidiListenerBuilder};

    // Handlers and events
    pub use crate::{
        InputChange, MidiHandlers, MidiInputEvent, ModWheelEvent, NoteEvent, PadEvent,
        ParsedMessage, PitchBendEvent, Subscription,
    };

    // Hosts
    pub use crate::{MidiAccess, PortInfo, VirtualMidiAccess};

    #[cfg(feature = "midi-io")]
    pub use crate::MidirAccess;
}
