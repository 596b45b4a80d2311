//! Input sampling contract and the per-cycle voice controller.
//!
//! The firmware's input tasks own the hardware; the control loop only sees
//! an [`InputFrame`]: the two absolute encoder positions and at most one
//! pending key edge. [`DroneControl::apply`] turns one frame into voice
//! parameter writes (key edges first, then the frequency mapping, then
//! the third voice's detune) with no other state transitions.

use crate::tuning::PitchMapper;
use crate::voices::{Bend, VoiceBank, BEND_LFO_HZ, DETUNE_RATIO};

/// Key index of the bend button: a 5 Hz pitch LFO rides on voice 1 while
/// this button is held.
pub const BEND_KEY: u8 = 0;

/// Key index of the mute button: the voice set is released while held and
/// re-pressed in full on release.
pub const MUTE_KEY: u8 = 1;

/// A debounced button transition: which key, and its new level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEdge {
    pub key: u8,
    pub pressed: bool,
}

/// Everything the control loop samples in one cycle.
///
/// Encoder positions are unbounded accumulated counts; `key` carries at
/// most one edge per cycle. The input queue is drained one event per
/// poll, so a second edge waits for the next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputFrame {
    pub right_position: i32,
    pub left_position: i32,
    pub key: Option<KeyEdge>,
}

/// The voice controller: maps one [`InputFrame`] onto a [`VoiceBank`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DroneControl {
    mapper: PitchMapper,
}

impl DroneControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one cycle's input to the bank.
    ///
    /// * A [`BEND_KEY`] edge attaches the bend LFO to voice 1 on press and
    ///   detaches it on release: a toggle keyed to the physical level,
    ///   never a latch.
    /// * A [`MUTE_KEY`] edge releases the whole voice set on press and
    ///   re-presses the full set on release.
    /// * Voices 1 and 2 then take the mapped encoder frequencies; in a
    ///   three-voice bank the third voice detunes off the second by
    ///   [`DETUNE_RATIO`].
    ///
    /// Edges for any other key index are ignored.
    pub fn apply(&self, input: &InputFrame, bank: &mut VoiceBank) {
        if let Some(edge) = input.key {
            match edge.key {
                BEND_KEY => {
                    bank.notes[0].bend = if edge.pressed {
                        Bend::Lfo { rate_hz: BEND_LFO_HZ }
                    } else {
                        Bend::None
                    };
                }
                MUTE_KEY => {
                    if edge.pressed {
                        bank.release_all();
                    } else {
                        bank.press_all();
                    }
                }
                _ => {}
            }
        }

        let pitch = self.mapper.map(input.right_position, input.left_position);
        bank.notes[0].frequency_hz = pitch.hz[0];
        bank.notes[1].frequency_hz = pitch.hz[1];
        if bank.voice_count() > 2 {
            bank.notes[2].frequency_hz = pitch.hz[1] * DETUNE_RATIO;
        }
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{note_to_hz, LEFT_BASE_NOTE, RIGHT_BASE_NOTE};

    fn edge(key: u8, pressed: bool) -> InputFrame {
        InputFrame {
            key: Some(KeyEdge { key, pressed }),
            ..InputFrame::default()
        }
    }

    fn pressed_bank(voices: usize) -> VoiceBank {
        let mut bank = VoiceBank::new(voices);
        bank.press_all();
        bank
    }

    // ── Frequency mapping ────────────────────────────────────────────

    #[test]
    fn centered_encoders_map_to_base_notes() {
        let control = DroneControl::new();
        let mut bank = pressed_bank(2);
        control.apply(&InputFrame::default(), &mut bank);
        assert_eq!(bank.notes[0].frequency_hz, note_to_hz(RIGHT_BASE_NOTE));
        assert_eq!(bank.notes[1].frequency_hz, note_to_hz(LEFT_BASE_NOTE));
    }

    #[test]
    fn third_voice_detunes_off_the_second() {
        let control = DroneControl::new();
        let mut bank = pressed_bank(3);
        control.apply(&InputFrame::default(), &mut bank);
        let expected = bank.notes[1].frequency_hz * DETUNE_RATIO;
        assert_eq!(bank.notes[2].frequency_hz, expected);
    }

    #[test]
    fn two_voice_bank_leaves_third_slot_alone() {
        let control = DroneControl::new();
        let mut bank = pressed_bank(2);
        let before = bank.notes[2].frequency_hz;
        control.apply(&InputFrame::default(), &mut bank);
        assert_eq!(bank.notes[2].frequency_hz, before);
    }

    #[test]
    fn encoder_movement_retunes_every_cycle() {
        let control = DroneControl::new();
        let mut bank = pressed_bank(2);
        control.apply(
            &InputFrame {
                right_position: 12,
                left_position: -12,
                key: None,
            },
            &mut bank,
        );
        assert_eq!(bank.notes[0].frequency_hz, note_to_hz(RIGHT_BASE_NOTE + 12));
        assert_eq!(bank.notes[1].frequency_hz, note_to_hz(LEFT_BASE_NOTE - 12));
    }

    // ── Bend button ──────────────────────────────────────────────────

    #[test]
    fn bend_key_attaches_lfo_while_held() {
        let control = DroneControl::new();
        let mut bank = pressed_bank(2);

        control.apply(&edge(BEND_KEY, true), &mut bank);
        assert_eq!(bank.notes[0].bend, Bend::Lfo { rate_hz: BEND_LFO_HZ });
        // Only voice 1 carries the bend.
        assert_eq!(bank.notes[1].bend, Bend::None);

        control.apply(&edge(BEND_KEY, false), &mut bank);
        assert_eq!(bank.notes[0].bend, Bend::None);
    }

    #[test]
    fn repeated_bend_toggles_are_idempotent() {
        let control = DroneControl::new();
        let mut bank = pressed_bank(2);
        for _ in 0..5 {
            control.apply(&edge(BEND_KEY, true), &mut bank);
            control.apply(&edge(BEND_KEY, false), &mut bank);
        }
        assert_eq!(bank.notes[0].bend, Bend::None);
    }

    // ── Mute button ──────────────────────────────────────────────────

    #[test]
    fn mute_key_gates_while_held() {
        let control = DroneControl::new();
        let mut bank = pressed_bank(3);

        control.apply(&edge(MUTE_KEY, true), &mut bank);
        assert!(!bank.is_pressed());

        control.apply(&edge(MUTE_KEY, false), &mut bank);
        assert!(bank.is_pressed());
        // The full set comes back, third voice included.
        assert_eq!(bank.voice_count(), 3);
    }

    #[test]
    fn tuning_keeps_tracking_while_muted() {
        let control = DroneControl::new();
        let mut bank = pressed_bank(2);
        control.apply(&edge(MUTE_KEY, true), &mut bank);
        control.apply(
            &InputFrame {
                right_position: 7,
                left_position: 0,
                key: None,
            },
            &mut bank,
        );
        assert!(!bank.is_pressed());
        assert_eq!(bank.notes[0].frequency_hz, note_to_hz(RIGHT_BASE_NOTE + 7));
    }

    // ── Other keys ───────────────────────────────────────────────────

    #[test]
    fn unknown_key_edges_are_ignored() {
        let control = DroneControl::new();
        let mut bank = pressed_bank(2);
        control.apply(&edge(5, true), &mut bank);
        assert!(bank.is_pressed());
        assert_eq!(bank.notes[0].bend, Bend::None);
    }
}
