//! Curation integration tests
//!
//! Hot-plug sequences on a virtual host and the InputChange events they produce.

use crate::helpers::*;
use midisense::prelude::*;
use midisense::ConnectionState;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn ports(n: usize) -> Vec<PortInfo> {
    (0..n)
        .map(|i| PortInfo::input(format!("in-{i}"), format!("Input {i}")))
        .collect()
}

/// Open count 0 -> 2 -> 2 -> 1: the first pass and both count changes fire.
#[test]
fn test_open_count_sequence() {
    let access = Arc::new(VirtualMidiAccess::new());
    let (handlers, log) = recording_handlers();
    let listener = MidiListener::new(access.clone(), handlers);

    // 0 -> 2
    for port in ports(2) {
        access.add_input(port);
    }
    let after_plug = input_changes(&log).len();

    // 2 -> 2: a closed input appears
    access.add_input(PortInfo::input("in-2", "Input 2").with_connection(ConnectionState::Closed));
    assert_eq!(input_changes(&log).len(), after_plug);

    // 2 -> 1
    access.disconnect_input("in-0");

    let changes = input_changes(&log);
    assert_eq!(changes.first(), Some(&Vec::new()));
    assert_eq!(
        changes.last(),
        Some(&vec![
            "Input 0".to_string(),
            "Input 1".to_string(),
            "Input 2".to_string(),
        ])
    );
    assert_eq!(changes.len(), after_plug + 1);
    assert_eq!(listener.open_count(), Some(1));
}

#[test]
fn test_listener_from_umbrella_builder() {
    let access = Arc::new(VirtualMidiAccess::with_inputs(ports(3)));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();

    let listener = MidiListener::builder()
        .access(access.clone())
        .on_input_change(move |change| s.lock().push(change.input_names.len()))
        .build()
        .unwrap();

    assert_eq!(*seen.lock(), vec![3]);
    assert_eq!(listener.input_names().len(), 3);
    for port in ports(3) {
        assert_eq!(access.message_hook_installs(&port.id), 1);
    }
}

#[test]
fn test_new_input_receives_messages_after_plug() {
    let (access, _listener, log) = keyboard_fixture();
    assert!(!access.send("pads", &[0x99, 36, 100]));

    access.connect_input("pads", "Drum Pads");
    assert!(access.send("pads", &[0x99, 36, 100]));

    assert!(log
        .lock()
        .iter()
        .any(|ev| matches!(ev, MidiInputEvent::Pad(_))));
}

#[test]
fn test_two_listeners_share_messages_last_state_hook_wins() {
    let access = Arc::new(VirtualMidiAccess::new());
    access.connect_input("kbd", "Keyboard");

    let first_notes = Arc::new(AtomicUsize::new(0));
    let f = first_notes.clone();
    let first = MidiListener::new(
        access.clone(),
        MidiHandlers::new().on_note(move |_| {
            f.fetch_add(1, Ordering::SeqCst);
        }),
    );
    let second = MidiListener::new(access.clone(), MidiHandlers::new());

    // The second listener replaced the only message hook slot
    access.send("kbd", &[0x90, 60, 100]);
    assert_eq!(first_notes.load(Ordering::SeqCst), 0);

    access.connect_input("pads", "Drum Pads");
    assert_eq!(second.open_count(), Some(2));
    assert_eq!(first.open_count(), Some(1));
}
