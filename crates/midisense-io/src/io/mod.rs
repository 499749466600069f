//! Hardware MIDI input.
//!
//! Port enumeration, hot-plug polling and real-time input via midir.
//! Requires the `midi-io` feature.

mod midir_access;

pub use midir_access::{MidirAccess, DEFAULT_CLIENT_NAME, DEFAULT_POLL_INTERVAL};
