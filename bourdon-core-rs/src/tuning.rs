//! Equal-tempered tuning: encoder positions to note numbers to frequencies.
//!
//! Each encoder contributes its raw accumulated position on top of a fixed
//! base note; the sum is clamped to the playable window and converted to
//! Hz with the standard MIDI reference (note 69 = 440 Hz).
//!
//! The conversion is built from an exact power-of-two octave shift and a
//! 12-entry semitone ratio table rather than a floating-point `powf`, so
//! `note_to_hz(69) == 440.0` and `note_to_hz(n + 12) == 2.0 * note_to_hz(n)`
//! hold exactly in `f32`.

/// Lowest note number an encoder can reach.
pub const NOTE_FLOOR: i32 = 35;

/// Highest note number an encoder can reach.
pub const NOTE_CEILING: i32 = 140;

/// Base note for the right encoder at position zero.
pub const RIGHT_BASE_NOTE: i32 = 80;

/// Base note for the left encoder at position zero.
pub const LEFT_BASE_NOTE: i32 = 75;

/// Reference pitch: note number 69 sounds at 440 Hz.
pub const CONCERT_A_NOTE: i32 = 69;
pub const CONCERT_A_HZ: f32 = 440.0;

/// Ratios 2^(k/12) for k in 0..12, one equal-tempered octave.
const SEMITONE_RATIOS: [f32; 12] = [
    1.0,
    1.059_463_1,
    1.122_462_0,
    1.189_207_1,
    1.259_921_1,
    1.334_839_9,
    1.414_213_6,
    1.498_307_1,
    1.587_401_1,
    1.681_792_9,
    1.781_797_4,
    1.887_748_6,
];

/// Clamp a raw note number into the playable window
/// [[`NOTE_FLOOR`], [`NOTE_CEILING`]].
pub fn clamp_note(note: i32) -> i32 {
    note.clamp(NOTE_FLOOR, NOTE_CEILING)
}

/// Convert a note number to a frequency in Hz.
///
/// `note` must already be clamped into [[`NOTE_FLOOR`], [`NOTE_CEILING`]];
/// [`PitchMapper::map`] guarantees this for encoder-driven values.
pub fn note_to_hz(note: i32) -> f32 {
    let semitones = note - CONCERT_A_NOTE;
    let octave = semitones.div_euclid(12);
    let within = semitones.rem_euclid(12) as usize;
    let octave_scale = if octave >= 0 {
        (1i64 << octave) as f32
    } else {
        1.0 / (1i64 << -octave) as f32
    };
    CONCERT_A_HZ * octave_scale * SEMITONE_RATIOS[within]
}

/// One cycle's mapped pitch state for the two encoder-driven voices.
///
/// Index 0 is the right encoder's voice, index 1 the left's.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PitchPair {
    /// Clamped note numbers.
    pub notes: [i32; 2],
    /// The corresponding frequencies in Hz.
    pub hz: [f32; 2],
}

/// Maps raw encoder positions to clamped note numbers and frequencies.
///
/// Pure and stateless: the same positions always produce the same pitch.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PitchMapper {
    pub right_base: i32,
    pub left_base: i32,
}

impl Default for PitchMapper {
    fn default() -> Self {
        Self {
            right_base: RIGHT_BASE_NOTE,
            left_base: LEFT_BASE_NOTE,
        }
    }
}

impl PitchMapper {
    /// Map the two absolute encoder positions to a [`PitchPair`].
    ///
    /// Positions are unbounded accumulated counts (they may be negative);
    /// the clamp keeps the result inside the playable window regardless.
    pub fn map(&self, right_position: i32, left_position: i32) -> PitchPair {
        let right_note = clamp_note(self.right_base.saturating_add(right_position));
        let left_note = clamp_note(self.left_base.saturating_add(left_position));
        PitchPair {
            notes: [right_note, left_note],
            hz: [note_to_hz(right_note), note_to_hz(left_note)],
        }
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
