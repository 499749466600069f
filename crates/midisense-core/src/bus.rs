//! Per-kind event routing.
//!
//! [`MidiHandlers`] is the set of optional callbacks an application hands in;
//! [`EventBus`] keeps one [`CallbackList`] per event kind and returns a
//! [`Subscription`] for every handler set it accepts.

use crate::classify::events_from_bytes;
use crate::event::{
    InputChange, MidiInputEvent, ModWheelEvent, NoteEvent, PadEvent, PitchBendEvent,
};
use crate::message::ParsedMessage;
use crate::subscribers::{Callback, CallbackId, CallbackList};
use std::fmt;
use std::sync::{Arc, Weak};

/// Optional callbacks, one per event kind. Absent callbacks are no-ops.
///
/// # Example
///
/// ```ignore
/// let handlers = MidiHandlers::new()
///     .on_note(|note| println!("note {:?} {:?}", note.code, note.velocity))
///     .on_input_change(|change| println!("inputs: {:?}", change.input_names));
/// ```
#[derive(Clone, Default)]
pub struct MidiHandlers {
    pub on_input_change: Option<Callback<InputChange>>,
    pub on_message: Option<Callback<ParsedMessage>>,
    pub on_note: Option<Callback<NoteEvent>>,
    pub on_pad: Option<Callback<PadEvent>>,
    pub on_pitch_bend: Option<Callback<PitchBendEvent>>,
    pub on_mod_wheel: Option<Callback<ModWheelEvent>>,
}

impl MidiHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_input_change(mut self, f: impl Fn(&InputChange) + Send + Sync + 'static) -> Self {
        self.on_input_change = Some(Arc::new(f));
        self
    }

    pub fn on_message(mut self, f: impl Fn(&ParsedMessage) + Send + Sync + 'static) -> Self {
        self.on_message = Some(Arc::new(f));
        self
    }

    pub fn on_note(mut self, f: impl Fn(&NoteEvent) + Send + Sync + 'static) -> Self {
        self.on_note = Some(Arc::new(f));
        self
    }

    pub fn on_pad(mut self, f: impl Fn(&PadEvent) + Send + Sync + 'static) -> Self {
        self.on_pad = Some(Arc::new(f));
        self
    }

    pub fn on_pitch_bend(mut self, f: impl Fn(&PitchBendEvent) + Send + Sync + 'static) -> Self {
        self.on_pitch_bend = Some(Arc::new(f));
        self
    }

    pub fn on_mod_wheel(mut self, f: impl Fn(&ModWheelEvent) + Send + Sync + 'static) -> Self {
        self.on_mod_wheel = Some(Arc::new(f));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.on_input_change.is_none()
            && self.on_message.is_none()
            && self.on_note.is_none()
            && self.on_pad.is_none()
            && self.on_pitch_bend.is_none()
            && self.on_mod_wheel.is_none()
    }
}

impl fmt::Debug for MidiHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MidiHandlers")
            .field("on_input_change", &self.on_input_change.is_some())
            .field("on_message", &self.on_message.is_some())
            .field("on_note", &self.on_note.is_some())
            .field("on_pad", &self.on_pad.is_some())
            .field("on_pitch_bend", &self.on_pitch_bend.is_some())
            .field("on_mod_wheel", &self.on_mod_wheel.is_some())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct EventBus {
    input_change: CallbackList<InputChange>,
    message: CallbackList<ParsedMessage>,
    note: CallbackList<NoteEvent>,
    pad: CallbackList<PadEvent>,
    pitch_bend: CallbackList<PitchBendEvent>,
    mod_wheel: CallbackList<ModWheelEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every callback present in `handlers`.
    pub fn subscribe(self: &Arc<Self>, handlers: MidiHandlers) -> Subscription {
        let ids = SubscriptionIds {
            input_change: handlers.on_input_change.map(|f| self.input_change.add(f)),
            message: handlers.on_message.map(|f| self.message.add(f)),
            note: handlers.on_note.map(|f| self.note.add(f)),
            pad: handlers.on_pad.map(|f| self.pad.add(f)),
            pitch_bend: handlers.on_pitch_bend.map(|f| self.pitch_bend.add(f)),
            mod_wheel: handlers.on_mod_wheel.map(|f| self.mod_wheel.add(f)),
        };
        Subscription {
            bus: Arc::downgrade(self),
            ids,
        }
    }

    /// Remove every subscriber of every kind.
    pub fn clear(&self) {
        self.input_change.clear();
        self.message.clear();
        self.note.clear();
        self.pad.clear();
        self.pitch_bend.clear();
        self.mod_wheel.clear();
        tracing::debug!("Cleared all MIDI event subscribers");
    }

    pub fn emit(&self, event: &MidiInputEvent) {
        match event {
            MidiInputEvent::InputChange(e) => self.input_change.emit(e),
            MidiInputEvent::Message(e) => self.message.emit(e),
            MidiInputEvent::Note(e) => self.note.emit(e),
            MidiInputEvent::Pad(e) => self.pad.emit(e),
            MidiInputEvent::PitchBend(e) => self.pitch_bend.emit(e),
            MidiInputEvent::ModWheel(e) => self.mod_wheel.emit(e),
        }
    }

    /// Classify one raw message and emit the resulting events in order.
    pub fn handle_bytes(&self, raw: &[u8]) {
        for event in events_from_bytes(raw) {
            self.emit(&event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.input_change.len()
            + self.message.len()
            + self.note.len()
            + self.pad.len()
            + self.pitch_bend.len()
            + self.mod_wheel.len()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct SubscriptionIds {
    input_change: Option<CallbackId>,
    message: Option<CallbackId>,
    note: Option<CallbackId>,
    pad: Option<CallbackId>,
    pitch_bend: Option<CallbackId>,
    mod_wheel: Option<CallbackId>,
}

/// Handle to the callbacks registered by one [`EventBus::subscribe`] call.
///
/// Dropping the handle keeps the callbacks registered; call
/// [`unsubscribe`](Subscription::unsubscribe) to remove them. Safe to call from
/// inside one of the subscribed callbacks.
#[derive(Debug, Clone)]
pub struct Subscription {
    bus: Weak<EventBus>,
    ids: SubscriptionIds,
}

impl Subscription {
    /// Remove exactly the callbacks this handle registered.
    ///
    /// Returns `true` if at least one callback was still registered.
    /// Repeated calls are no-ops.
    pub fn unsubscribe(&self) -> bool {
        let Some(bus) = self.bus.upgrade() else {
            return false;
        };
        let ids = self.ids;
        let mut removed = false;
        removed |= ids.input_change.is_some_and(|id| bus.input_change.remove(id));
        removed |= ids.message.is_some_and(|id| bus.message.remove(id));
        removed |= ids.note.is_some_and(|id| bus.note.remove(id));
        removed |= ids.pad.is_some_and(|id| bus.pad.remove(id));
        removed |= ids.pitch_bend.is_some_and(|id| bus.pitch_bend.remove(id));
        removed |= ids.mod_wheel.is_some_and(|id| bus.mod_wheel.remove(id));
        removed
    }
}
