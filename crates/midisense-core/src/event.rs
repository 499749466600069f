//! Semantic MIDI input events.
//!
//! Every event is a plain value built from one [`ParsedMessage`] or one device
//! snapshot. Fields that depend on data bytes the message did not carry are
//! `None`.

use crate::message::ParsedMessage;
use serde::{Deserialize, Serialize};

/// The set of input names changed size.
///
/// `input_names` is the full list of inputs known to the host, not a diff.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputChange {
    pub input_names: Vec<String>,
}

/// Key pressed or released on a keyboard channel.
///
/// `velocity` is positive on press and negative on release.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub code: Option<u8>,
    pub velocity: Option<f32>,
    pub frequency: Option<f32>,
}

/// Pad hit or released on the pad channel. Same sign convention as [`NoteEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PadEvent {
    pub code: Option<u8>,
    pub velocity: Option<f32>,
}

/// Pitch wheel position, 0.0..=1.0 from the most significant data byte.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchBendEvent {
    pub value: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModWheelEvent {
    pub value: Option<f32>,
}

/// Discriminant of [`MidiInputEvent`], used to route events to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    InputChange,
    Message,
    Note,
    Pad,
    PitchBend,
    ModWheel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MidiInputEvent {
    InputChange(InputChange),
    Message(ParsedMessage),
    Note(NoteEvent),
    Pad(PadEvent),
    PitchBend(PitchBendEvent),
    ModWheel(ModWheelEvent),
}

impl MidiInputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            MidiInputEvent::InputChange(_) => EventKind::InputChange,
            MidiInputEvent::Message(_) => EventKind::Message,
            MidiInputEvent::Note(_) => EventKind::Note,
            MidiInputEvent::Pad(_) => EventKind::Pad,
            MidiInputEvent::PitchBend(_) => EventKind::PitchBend,
            MidiInputEvent::ModWheel(_) => EventKind::ModWheel,
        }
    }

    /// Signed velocity of note and pad events.
    pub fn velocity(&self) -> Option<f32> {
        match self {
            MidiInputEvent::Note(e) => e.velocity,
            MidiInputEvent::Pad(e) => e.velocity,
            _ => None,
        }
    }

    #[inline]
    pub fn is_press(&self) -> bool {
        self.velocity().is_some_and(|v| v > 0.0)
    }

    /// True for releases with a nonzero velocity. A zero-velocity release
    /// carries `-0.0` and cannot be told apart from a zero-velocity press.
    #[inline]
    pub fn is_release(&self) -> bool {
        self.velocity().is_some_and(|v| v < 0.0)
    }
}

impl From<InputChange> for MidiInputEvent {
    fn from(event: InputChange) -> Self {
        MidiInputEvent::InputChange(event)
    }
}

impl From<ParsedMessage> for MidiInputEvent {
    fn from(message: ParsedMessage) -> Self {
        MidiInputEvent::Message(message)
    }
}

impl From<NoteEvent> for MidiInputEvent {
    fn from(event: NoteEvent) -> Self {
        MidiInputEvent::Note(event)
    }
}

impl From<PadEvent> for MidiInputEvent {
    fn from(event: PadEvent) -> Self {
        MidiInputEvent::Pad(event)
    }
}

impl From<PitchBendEvent> for MidiInputEvent {
    fn from(event: PitchBendEvent) -> Self {
        MidiInputEvent::PitchBend(event)
    }
}

impl From<ModWheelEvent> for MidiInputEvent {
    fn from(event: ModWheelEvent) -> Self {
        MidiInputEvent::ModWheel(event)
    }
}
