//! Tolerance constants for MIDI value testing.

/// Floating point rounding errors (byte / 127 divisions, negation).
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Equal-temperament frequencies computed with `powf`.
pub const FREQ_EPSILON: f32 = 1e-3;

/// One step of a 7-bit data byte on the 0.0..=1.0 scale.
pub const DATA_STEP: f32 = 1.0 / 127.0;
