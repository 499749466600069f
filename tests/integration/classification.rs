//! Classification integration tests
//!
//! Drives raw bytes through a virtual input and checks the events handlers see.

use crate::helpers::tolerances::{DATA_STEP, FLOAT_EPSILON, FREQ_EPSILON};
use crate::helpers::*;
use approx::assert_relative_eq;
use midisense::prelude::*;
use midisense::{events_from_bytes, note_to_hz, EventKind};

/// Send `raw` on the keyboard input and return the specialized event, if any.
fn specialized(raw: &[u8]) -> Option<MidiInputEvent> {
    let (access, _listener, log) = keyboard_fixture();
    assert!(access.send("kbd", raw));
    let events = log.lock().clone();
    assert!(matches!(events.first(), Some(MidiInputEvent::Message(_))));
    events.get(1).cloned()
}

#[test]
fn test_keyboard_note_on() {
    match specialized(&[0x90, 60, 127]) {
        Some(MidiInputEvent::Note(note)) => {
            assert_eq!(note.code, Some(60));
            assert_relative_eq!(note.velocity.unwrap(), 1.0, epsilon = FLOAT_EPSILON);
            assert_relative_eq!(note.frequency.unwrap(), 261.6256, epsilon = FREQ_EPSILON);
        }
        other => panic!("expected note, got {other:?}"),
    }
}

#[test]
fn test_keyboard_note_off_is_negative() {
    match specialized(&[0x80, 60, 64]) {
        Some(MidiInputEvent::Note(note)) => {
            assert_relative_eq!(note.velocity.unwrap(), -64.0 * DATA_STEP, epsilon = FLOAT_EPSILON);
            assert_relative_eq!(note.velocity.unwrap(), -0.504, epsilon = 1e-3);
        }
        other => panic!("expected note, got {other:?}"),
    }
}

#[test]
fn test_channel_nine_is_pad_not_note() {
    match specialized(&[0x99, 40, 100]) {
        Some(MidiInputEvent::Pad(pad)) => {
            assert_eq!(pad.code, Some(40));
            assert_relative_eq!(pad.velocity.unwrap(), 0.787, epsilon = 1e-3);
        }
        other => panic!("expected pad, got {other:?}"),
    }
}

#[test]
fn test_mod_wheel_only_on_controller_one() {
    match specialized(&[0xB0, 1, 64]) {
        Some(MidiInputEvent::ModWheel(wheel)) => {
            assert_relative_eq!(wheel.value.unwrap(), 0.504, epsilon = 1e-3);
        }
        other => panic!("expected mod wheel, got {other:?}"),
    }
    assert_eq!(specialized(&[0xB0, 2, 64]), None);
}

#[test]
fn test_pitch_bend_on_any_channel() {
    match specialized(&[0xE3, 0, 127]) {
        Some(MidiInputEvent::PitchBend(bend)) => {
            assert_relative_eq!(bend.value.unwrap(), 1.0, epsilon = FLOAT_EPSILON);
        }
        other => panic!("expected pitch bend, got {other:?}"),
    }
}

#[test]
fn test_octave_doubles_frequency() {
    assert_relative_eq!(note_to_hz(69.0), 440.0, epsilon = FREQ_EPSILON);
    assert_relative_eq!(note_to_hz(81.0), 880.0, epsilon = FREQ_EPSILON);
}

#[test]
fn test_zero_velocity_note_on_stays_press_shaped() {
    let events = events_from_bytes(&[0x90, 60, 0]);
    assert_eq!(events[1].kind(), EventKind::Note);
    assert_eq!(events[1].velocity(), Some(0.0));
    assert!(!events[1].is_release());
}

#[test]
fn test_umbrella_listener_routes_pads_separately() {
    let (access, listener, _log) = keyboard_fixture();
    let pads = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
    let p = pads.clone();
    let sub = listener.subscribe(MidiHandlers::new().on_pad(move |pad| p.lock().push(pad.code)));

    access.send("kbd", &[0x90, 36, 100]);
    access.send("kbd", &[0x99, 36, 100]);
    access.send("kbd", &[0x89, 36, 0]);
    sub.unsubscribe();
    access.send("kbd", &[0x99, 38, 100]);

    assert_eq!(*pads.lock(), vec![Some(36), Some(36)]);
}
