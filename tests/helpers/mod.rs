//! Test helpers and fixtures for midisense integration tests
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Byte scaling and sign flips
//! - `FREQ_EPSILON` (1e-3): Note frequencies
//! - `DATA_STEP` (1/127): One data byte step

#![allow(dead_code)]

pub mod tolerances;

use midisense::prelude::*;
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared, ordered record of delivered events.
pub type EventLog = Arc<Mutex<Vec<MidiInputEvent>>>;

/// Handlers that append every event of every kind to one log.
pub fn recording_handlers() -> (MidiHandlers, EventLog) {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let handlers = MidiHandlers::new()
        .on_input_change({
            let log = log.clone();
            move |ev| log.lock().push(ev.clone().into())
        })
        .on_message({
            let log = log.clone();
            move |ev| log.lock().push((*ev).into())
        })
        .on_note({
            let log = log.clone();
            move |ev| log.lock().push((*ev).into())
        })
        .on_pad({
            let log = log.clone();
            move |ev| log.lock().push((*ev).into())
        })
        .on_pitch_bend({
            let log = log.clone();
            move |ev| log.lock().push((*ev).into())
        })
        .on_mod_wheel({
            let log = log.clone();
            move |ev| log.lock().push((*ev).into())
        });
    (handlers, log)
}

/// A virtual host with one open keyboard input (`"kbd"`) and a recording
/// listener attached. The log starts empty.
pub fn keyboard_fixture() -> (Arc<VirtualMidiAccess>, MidiListener, EventLog) {
    let access = Arc::new(VirtualMidiAccess::new());
    access.connect_input("kbd", "Test Keyboard");
    let (handlers, log) = recording_handlers();
    let listener = MidiListener::new(access.clone(), handlers);
    log.lock().clear();
    (access, listener, log)
}

/// Input names carried by every [`InputChange`] in the log.
pub fn input_changes(log: &EventLog) -> Vec<Vec<String>> {
    log.lock()
        .iter()
        .filter_map(|ev| match ev {
            MidiInputEvent::InputChange(change) => Some(change.input_names.clone()),
            _ => None,
        })
        .collect()
}
