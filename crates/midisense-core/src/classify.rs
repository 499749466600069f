//! Message classification.
//!
//! Dispatch on command and channel, first match wins:
//!
//! | command | channel | event |
//! |---|---|---|
//! | note off / on | 0 or 15 | [`NoteEvent`] |
//! | note off / on | 9 | [`PadEvent`] |
//! | control change | any, controller 1 | [`ModWheelEvent`] |
//! | pitch bend | any | [`PitchBendEvent`] |
//!
//! Anything else produces no specialized event. A zero-velocity note-on stays
//! a press; it is not rewritten into a release.

use crate::event::{MidiInputEvent, ModWheelEvent, NoteEvent, PadEvent, PitchBendEvent};
use crate::message::{channel, command, ParsedMessage, MOD_WHEEL_CC};
use crate::utils::note_to_hz;
use smallvec::SmallVec;

/// Events produced by one raw message: the generic message, then at most one
/// specialized event.
pub type ClassifiedEvents = SmallVec<[MidiInputEvent; 2]>;

/// Map a parsed message to its specialized event, if any.
pub fn classify(message: &ParsedMessage) -> Option<MidiInputEvent> {
    let ParsedMessage {
        command: cmd,
        channel: ch,
        code,
        value,
    } = *message;

    match (cmd, ch) {
        (command::NOTE_OFF | command::NOTE_ON, _) if channel::KEYS.contains(&ch) => {
            Some(MidiInputEvent::Note(NoteEvent {
                code,
                velocity: signed_velocity(cmd, value),
                frequency: code.map(|c| note_to_hz(c as f32)),
            }))
        }
        (command::NOTE_OFF | command::NOTE_ON, channel::PADS) => {
            Some(MidiInputEvent::Pad(PadEvent {
                code,
                velocity: signed_velocity(cmd, value),
            }))
        }
        (command::CONTROL_CHANGE, _) if code == Some(MOD_WHEEL_CC) => {
            Some(MidiInputEvent::ModWheel(ModWheelEvent { value }))
        }
        (command::PITCH_BEND, _) => Some(MidiInputEvent::PitchBend(PitchBendEvent { value })),
        _ => None,
    }
}

/// Decode and classify one raw message.
///
/// Returns nothing for an empty slice, otherwise the generic
/// [`MidiInputEvent::Message`] followed by the specialized event if one applies.
pub fn events_from_bytes(raw: &[u8]) -> ClassifiedEvents {
    let mut events = ClassifiedEvents::new();
    let Some(message) = ParsedMessage::from_bytes(raw) else {
        tracing::trace!("Dropping empty MIDI message");
        return events;
    };

    events.push(MidiInputEvent::Message(message));
    if let Some(event) = classify(&message) {
        events.push(event);
    }

    tracing::trace!(
        command = message.command,
        channel = message.channel,
        events = events.len(),
        "Classified MIDI message"
    );
    events
}

/// Release velocities are negated; `-0.0` is left as is.
#[inline]
fn signed_velocity(cmd: u8, value: Option<f32>) -> Option<f32> {
    if cmd == command::NOTE_OFF {
        value.map(|v| -v)
    } else {
        value
    }
}
