//! Pitch and velocity conversions.

/// Largest value a 7-bit MIDI data byte can carry.
pub const DATA_BYTE_MAX: f32 = 127.0;

/// MIDI note number of concert A.
pub const A4_NOTE: f32 = 69.0;

/// Frequency of concert A in Hz.
pub const A4_HZ: f32 = 440.0;

/// Equal-tempered frequency of a (possibly fractional) MIDI note number.
///
/// Total over all finite input: note 69 is 440 Hz and every 12 semitones double it.
#[inline]
pub fn note_to_hz(note: f32) -> f32 {
    A4_HZ * 2.0_f32.powf((note - A4_NOTE) / 12.0)
}

#[inline]
pub fn hz_to_note(hz: f32) -> f32 {
    A4_NOTE + 12.0 * (hz / A4_HZ).log2()
}

/// Data byte scaled to 0.0..=1.0.
///
/// Bytes above 127 are not valid MIDI data; they are clamped so the result
/// stays in range.
#[inline]
pub fn data_to_unit(byte: u8) -> f32 {
    (byte as f32 / DATA_BYTE_MAX).min(1.0)
}

#[inline]
pub fn velocity_to_gain(velocity: u8) -> f32 {
    data_to_unit(velocity)
}

#[inline]
pub fn gain_to_velocity(gain: f32) -> u8 {
    (gain.clamp(0.0, 1.0) * DATA_BYTE_MAX).round() as u8
}
