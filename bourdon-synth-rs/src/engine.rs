//! The drone engine: per-voice sawtooth oscillators, linear gate
//! envelopes, and one free-running pitch LFO.
//!
//! [`DroneSynth::render`] fills a mono i16 buffer from the most recently
//! applied [`VoiceBank`] snapshot. Oscillator phases, envelope levels,
//! and the LFO phase persist across calls; the bank itself is replaced
//! wholesale by [`DroneSynth::apply`].

use core::f32::consts::TAU;

use micromath::F32Ext;

use bourdon::voices::{Bend, VoiceBank, BEND_LFO_HZ, MAX_VOICES};

use crate::wavetable::saw_sample;

pub struct DroneSynth {
    sample_rate_hz: f32,
    bank: VoiceBank,
    /// Oscillator phase per voice, in wave cycles `[0, 1)`.
    phases: [f32; MAX_VOICES],
    /// Envelope level per voice, `0.0` silent to `1.0` full.
    levels: [f32; MAX_VOICES],
    /// Shared bend LFO phase, in LFO cycles `[0, 1)`.
    lfo_phase: f32,
}

impl DroneSynth {
    /// Create an engine for `voice_count` voices at the given sample rate.
    ///
    /// The initial bank is released; the first applied snapshot normally
    /// arrives before the first buffer fill.
    pub fn new(sample_rate_hz: u32, voice_count: usize) -> Self {
        Self {
            sample_rate_hz: sample_rate_hz as f32,
            bank: VoiceBank::new(voice_count),
            phases: [0.0; MAX_VOICES],
            levels: [0.0; MAX_VOICES],
            lfo_phase: 0.0,
        }
    }

    /// Replace the voice parameters. Oscillator and envelope state carry
    /// over, so retuning a sounding voice never clicks.
    pub fn apply(&mut self, bank: VoiceBank) {
        self.bank = bank;
    }

    /// Fill `out` with mono samples.
    pub fn render(&mut self, out: &mut [i16]) {
        let dt = 1.0 / self.sample_rate_hz;

        // One LFO serves every bent voice; it keeps running while
        // detached so a re-press resumes mid-swing, like a hardware LFO.
        let lfo_rate = self.bank.notes[..self.bank.voice_count()]
            .iter()
            .find_map(|n| match n.bend {
                Bend::Lfo { rate_hz } => Some(rate_hz),
                Bend::None => None,
            })
            .unwrap_or(BEND_LFO_HZ);

        let gate_target = if self.bank.is_pressed() { 1.0 } else { 0.0 };

        for slot in out.iter_mut() {
            let lfo = (TAU * self.lfo_phase).sin();
            self.lfo_phase += lfo_rate * dt;
            if self.lfo_phase >= 1.0 {
                self.lfo_phase -= 1.0;
            }

            let mut mix = 0.0f32;
            for v in 0..self.bank.voice_count() {
                let note = &self.bank.notes[v];

                let step = if gate_target > self.levels[v] {
                    dt / note.envelope.attack_s.max(dt)
                } else {
                    dt / note.envelope.release_s.max(dt)
                };
                if self.levels[v] < gate_target {
                    self.levels[v] = (self.levels[v] + step).min(gate_target);
                } else if self.levels[v] > gate_target {
                    self.levels[v] = (self.levels[v] - step).max(gate_target);
                }

                // Bend is in octaves: the LFO swings the voice across
                // half to double its base frequency.
                let bend_factor = match note.bend {
                    Bend::None => 1.0,
                    Bend::Lfo { .. } => 2.0f32.powf(lfo),
                };
                let hz = note.frequency_hz * bend_factor;

                self.phases[v] += hz * dt;
                while self.phases[v] >= 1.0 {
                    self.phases[v] -= 1.0;
                }

                mix += saw_sample(self.phases[v]) * note.amplitude * self.levels[v];
            }

            *slot = (mix.clamp(-1.0, 1.0) * 32_767.0) as i16;
        }
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_RATE: u32 = 1_000;

    fn pressed_bank(voices: usize) -> VoiceBank {
        let mut bank = VoiceBank::new(voices);
        bank.press_all();
        for v in 0..voices {
            bank.notes[v].frequency_hz = 110.0;
        }
        bank
    }

    fn rms(buf: &[i16]) -> f32 {
        let sum: f64 = buf.iter().map(|&s| (s as f64) * (s as f64)).sum();
        ((sum / buf.len() as f64) as f32).sqrt()
    }

    #[test]
    fn released_engine_is_silent() {
        let mut synth = DroneSynth::new(TEST_RATE, 2);
        let mut buf = [0i16; 256];
        synth.render(&mut buf);
        assert!(buf.iter().all(|&s| s == 0));
    }

    #[test]
    fn attack_ramps_toward_full_level() {
        let mut synth = DroneSynth::new(TEST_RATE, 2);
        synth.apply(pressed_bank(2));

        // One second: the 0.5 s attack completes halfway through.
        let mut buf = [0i16; TEST_RATE as usize];
        synth.render(&mut buf);

        let early = rms(&buf[..250]);
        let late = rms(&buf[750..]);
        assert!(late > early * 2.0, "early={} late={}", early, late);
        assert!(late > 1_000.0);
    }

    #[test]
    fn release_decays_to_exact_silence() {
        let mut synth = DroneSynth::new(TEST_RATE, 2);
        let mut bank = pressed_bank(2);
        synth.apply(bank);
        let mut buf = [0i16; TEST_RATE as usize];
        synth.render(&mut buf);

        bank.release_all();
        synth.apply(bank);
        synth.render(&mut buf);

        // The 0.5 s release ramp is long past by the end of the buffer.
        assert!(buf[750..].iter().all(|&s| s == 0));
    }

    #[test]
    fn rendering_is_deterministic() {
        let mut a = DroneSynth::new(TEST_RATE, 3);
        let mut b = DroneSynth::new(TEST_RATE, 3);
        a.apply(pressed_bank(3));
        b.apply(pressed_bank(3));

        let mut buf_a = [0i16; 512];
        let mut buf_b = [0i16; 512];
        a.render(&mut buf_a);
        b.render(&mut buf_b);
        assert_eq!(buf_a, buf_b);
    }

    #[test]
    fn bend_detunes_the_output() {
        let mut plain = DroneSynth::new(TEST_RATE, 2);
        let mut bent = DroneSynth::new(TEST_RATE, 2);
        plain.apply(pressed_bank(2));
        let mut bank = pressed_bank(2);
        bank.notes[0].bend = Bend::Lfo { rate_hz: BEND_LFO_HZ };
        bent.apply(bank);

        let mut buf_plain = [0i16; TEST_RATE as usize];
        let mut buf_bent = [0i16; TEST_RATE as usize];
        plain.render(&mut buf_plain);
        bent.render(&mut buf_bent);
        assert_ne!(buf_plain, buf_bent);
    }

    #[test]
    fn retuning_does_not_reset_the_envelope() {
        let mut synth = DroneSynth::new(TEST_RATE, 2);
        let mut bank = pressed_bank(2);
        synth.apply(bank);
        let mut buf = [0i16; TEST_RATE as usize];
        synth.render(&mut buf);

        bank.notes[0].frequency_hz = 220.0;
        synth.apply(bank);
        synth.render(&mut buf);
        // Still at full level right away, no re-attack dip.
        assert!(rms(&buf[..100]) > 1_000.0);
    }
}
