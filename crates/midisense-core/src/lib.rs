//! Core types for turning raw MIDI input into semantic events.
//!
//! - **Decoding**: [`ParsedMessage`] splits a 1-3 byte message into command,
//!   channel, code and a 0.0..=1.0 value
//! - **Classification**: [`classify`] / [`events_from_bytes`] map messages to
//!   notes, pads, pitch bend and mod wheel events
//! - **Routing**: [`EventBus`] delivers events to [`MidiHandlers`] subscribers
//!
//! No I/O happens here; host integration lives in `midisense-io`.
//!
//! # Example
//!
//! ```ignore
//! use midisense_core::{EventBus, MidiHandlers};
//! use std::sync::Arc;
//!
//! let bus = Arc::new(EventBus::new());
//! let sub = bus.subscribe(MidiHandlers::new().on_note(|note| {
//!     println!("{:?} Hz at {:?}", note.frequency, note.velocity);
//! }));
//! bus.handle_bytes(&[0x90, 60, 127]);
//! sub.unsubscribe();
//! ```

pub mod bus;
pub mod classify;
pub mod event;
pub mod message;
pub mod subscribers;
pub(crate) mod utils;

pub use bus::{EventBus, MidiHandlers, Subscription};
pub use classify::{classify, events_from_bytes, ClassifiedEvents};
pub use event::{
    EventKind, InputChange, MidiInputEvent, ModWheelEvent, NoteEvent, PadEvent, PitchBendEvent,
};
pub use message::{ParsedMessage, MOD_WHEEL_CC};
pub use subscribers::{Callback, CallbackId, CallbackList};
pub use utils::{data_to_unit, gain_to_velocity, hz_to_note, note_to_hz, velocity_to_gain};
