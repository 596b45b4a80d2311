//! Voice parameter model shared by the control loop and the audio path.
//!
//! A [`VoiceBank`] holds the two or three persistent voices of the drone.
//! Voices are created once at startup and mutated in place every cycle;
//! the bank crosses the task boundary to the audio engine as a plain
//! `Copy` snapshot, so nothing here is fallible and nothing blocks.

/// Maximum number of voices a bank can hold.
pub const MAX_VOICES: usize = 3;

/// Fixed per-voice amplitude.
pub const VOICE_AMPLITUDE: f32 = 0.5;

/// Frequency ratio of the third voice relative to the second.
pub const DETUNE_RATIO: f32 = 1.005;

/// Rate of the pitch-bend LFO attached while the bend button is held.
pub const BEND_LFO_HZ: f32 = 5.0;

/// Pitch-bend modulator attached to a voice.
///
/// The bend value is in octaves: an active LFO swings the voice between
/// half and double its base frequency.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bend {
    /// No modulation; the voice sounds at its base frequency.
    #[default]
    None,
    /// Periodic bend driven by a sine LFO at `rate_hz`.
    Lfo { rate_hz: f32 },
}

/// Amplitude envelope shape (attack and release ramps, in seconds).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnvelopeShape {
    pub attack_s: f32,
    pub release_s: f32,
}

impl Default for EnvelopeShape {
    fn default() -> Self {
        Self {
            attack_s: 0.5,
            release_s: 0.5,
        }
    }
}

/// Parameters of one synthesizer voice.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoteParams {
    /// Base frequency in Hz. Always positive: encoder-driven values come
    /// through the tuning clamp.
    pub frequency_hz: f32,
    pub amplitude: f32,
    pub envelope: EnvelopeShape,
    pub bend: Bend,
}

impl Default for NoteParams {
    fn default() -> Self {
        Self {
            frequency_hz: 100.0,
            amplitude: VOICE_AMPLITUDE,
            envelope: EnvelopeShape::default(),
            bend: Bend::None,
        }
    }
}

/// The persistent voice set.
///
/// Pressing and releasing act on the whole set, matching the instrument's
/// single gate button: voices never leave the bank, they only open and
/// close together.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VoiceBank {
    /// Voice parameters; only the first [`voice_count`](Self::voice_count)
    /// entries are sounding voices.
    pub notes: [NoteParams; MAX_VOICES],
    voice_count: usize,
    gate: bool,
}

impl VoiceBank {
    /// Create a bank of `voice_count` voices (limited to 1..=[`MAX_VOICES`]),
    /// initially released.
    pub fn new(voice_count: usize) -> Self {
        Self {
            notes: [NoteParams::default(); MAX_VOICES],
            voice_count: voice_count.clamp(1, MAX_VOICES),
            gate: false,
        }
    }

    /// Number of sounding voices in the bank.
    pub fn voice_count(&self) -> usize {
        self.voice_count
    }

    /// Open the gate for the full voice set.
    pub fn press_all(&mut self) {
        self.gate = true;
    }

    /// Close the gate: all voices fall silent through their release ramps,
    /// but keep their parameters.
    pub fn release_all(&mut self) {
        self.gate = false;
    }

    /// Whether the voice set is currently pressed.
    pub fn is_pressed(&self) -> bool {
        self.gate
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
