//! Decoding of raw MIDI input bytes.

use crate::utils::data_to_unit;
use serde::{Deserialize, Serialize};

/// Command nibbles the classifier dispatches on.
pub mod command {
    pub const NOTE_OFF: u8 = 0x8;
    pub const NOTE_ON: u8 = 0x9;
    pub const CONTROL_CHANGE: u8 = 0xB;
    pub const PITCH_BEND: u8 = 0xE;
}

/// Channel conventions used when classifying notes.
pub mod channel {
    /// Channels treated as a keyboard.
    pub const KEYS: [u8; 2] = [0, 15];
    /// Channel treated as a drum pad controller.
    pub const PADS: u8 = 9;
}

/// Controller number of the modulation wheel.
pub const MOD_WHEEL_CC: u8 = 1;

/// Fields decoded from one raw MIDI message.
///
/// `code` and `value` are `None` when the message was too short to carry
/// them. `value` is the second data byte scaled to 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParsedMessage {
    pub command: u8,
    pub channel: u8,
    pub code: Option<u8>,
    pub value: Option<f32>,
}

impl ParsedMessage {
    /// Decode a raw message. Only an empty slice fails to decode.
    ///
    /// Missing data bytes become `None`; bytes past the third are ignored.
    pub fn from_bytes(raw: &[u8]) -> Option<Self> {
        let (&status, data) = raw.split_first()?;
        Some(Self {
            command: status >> 4,
            channel: status & 0x0F,
            code: data.first().copied(),
            value: data.get(1).copied().map(data_to_unit),
        })
    }

    #[inline]
    pub fn is_note_on(&self) -> bool {
        self.command == command::NOTE_ON
    }

    #[inline]
    pub fn is_note_off(&self) -> bool {
        self.command == command::NOTE_OFF
    }
}
