//! Synthesizer voices with trigger-attack-release note handling.

use super::dsp::{Adsr, AdsrState, Oscillator};
use crate::music::VoiceSpec;

/// One sounding note
#[derive(Debug, Clone)]
struct Slot {
    osc: Oscillator,
    env: AdsrState,
    freq_hz: f32,
    velocity: f32,
    /// Samples left before the release stage begins
    gate_remaining: u32,
    /// Trigger order, used to steal the oldest note when full
    started_at: u64,
}

/// A synthesizer voice: one slot when monophonic, several when polyphonic
#[derive(Debug, Clone)]
pub struct Voice {
    slots: Vec<Slot>,
    adsr: Adsr,
    gain: f32,
    sample_rate: f32,
    triggers: u64,
}

impl Voice {
    pub fn new(spec: &VoiceSpec, polyphony: usize, gain: f32, sample_rate: f32) -> Self {
        let count = if spec.polyphonic { polyphony.max(1) } else { 1 };
        let slot = Slot {
            osc: Oscillator::new(spec.waveform),
            env: AdsrState::default(),
            freq_hz: 0.0,
            velocity: 0.0,
            gate_remaining: 0,
            started_at: 0,
        };
        Self {
            slots: vec![slot; count],
            adsr: Adsr::from_envelope(&spec.envelope, sample_rate),
            gain,
            sample_rate,
            triggers: 0,
        }
    }

    /// Start a note that releases by itself after `duration_s`
    pub fn trigger_attack_release(&mut self, freq_hz: f32, duration_s: f32, velocity: f32) {
        self.triggers += 1;
        let index = self.free_slot();
        let polyphonic = self.slots.len() > 1;
        let slot = &mut self.slots[index];

        // A stolen polyphonic slot restarts from silence; a monophonic
        // retrigger ramps up from the current envelope level instead
        if slot.env.is_active() && polyphonic {
            slot.env.kill();
            slot.osc.reset();
        }
        slot.freq_hz = freq_hz;
        slot.velocity = velocity.clamp(0.0, 1.0);
        // At least one sample, so every note reaches its release stage
        slot.gate_remaining = ((duration_s.max(0.0) * self.sample_rate).round() as u32).max(1);
        slot.started_at = self.triggers;
        slot.env.note_on();
    }

    /// Move every sounding note into its release stage
    pub fn release_all(&mut self) {
        for slot in &mut self.slots {
            slot.gate_remaining = 0;
            slot.env.note_off();
        }
    }

    /// Notes currently producing sound (including release tails)
    pub fn active_notes(&self) -> usize {
        self.slots.iter().filter(|s| s.env.is_active()).count()
    }

    /// Total notes triggered since creation
    pub fn trigger_count(&self) -> u64 {
        self.triggers
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let mut out = 0.0;
        for slot in &mut self.slots {
            if !slot.env.is_active() {
                continue;
            }
            if slot.gate_remaining > 0 {
                slot.gate_remaining -= 1;
                if slot.gate_remaining == 0 {
                    slot.env.note_off();
                }
            }
            let amp = slot.env.next(&self.adsr);
            out += slot.osc.next_sample(slot.freq_hz, self.sample_rate) * amp * slot.velocity;
        }
        out * self.gain
    }

    /// Idle slot if any, otherwise the oldest one
    fn free_slot(&self) -> usize {
        self.slots
            .iter()
            .position(|s| !s.env.is_active())
            .or_else(|| {
                self.slots
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, s)| s.started_at)
                    .map(|(i, _)| i)
            })
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::{Envelope, Waveform};

    const SR: f32 = 1000.0;

    fn spec(polyphonic: bool) -> VoiceSpec {
        VoiceSpec {
            waveform: Waveform::Square,
            envelope: Envelope {
                attack_s: 0.01,
                decay_s: 0.01,
                sustain: 0.5,
                release_s: 0.05,
            },
            polyphonic,
        }
    }

    #[test]
    fn test_note_releases_after_duration() {
        let mut voice = Voice::new(&spec(false), 4, 1.0, SR);
        voice.trigger_attack_release(100.0, 0.1, 1.0);
        assert_eq!(voice.active_notes(), 1);

        // 100 samples gate + 50 samples release (+ a little slack)
        for _ in 0..160 {
            voice.next_sample();
        }
        assert_eq!(voice.active_notes(), 0);
        assert_eq!(voice.next_sample(), 0.0);
    }

    #[test]
    fn test_sub_sample_gate_still_releases() {
        let mut voice = Voice::new(&spec(true), 4, 1.0, SR);
        voice.trigger_attack_release(100.0, 0.0004, 1.0);
        voice.trigger_attack_release(150.0, 0.0, 1.0);
        assert_eq!(voice.active_notes(), 2);

        // One gate sample plus the 50-sample release
        for _ in 0..60 {
            voice.next_sample();
        }
        assert_eq!(voice.active_notes(), 0);
    }

    #[test]
    fn test_polyphonic_voice_layers_notes() {
        let mut voice = Voice::new(&spec(true), 4, 1.0, SR);
        voice.trigger_attack_release(100.0, 1.0, 1.0);
        voice.trigger_attack_release(150.0, 1.0, 1.0);
        voice.trigger_attack_release(200.0, 1.0, 1.0);
        assert_eq!(voice.active_notes(), 3);
    }

    #[test]
    fn test_polyphonic_voice_steals_oldest_when_full() {
        let mut voice = Voice::new(&spec(true), 2, 1.0, SR);
        for freq in [100.0, 150.0, 200.0] {
            voice.trigger_attack_release(freq, 1.0, 1.0);
        }
        assert_eq!(voice.active_notes(), 2);
        assert_eq!(voice.trigger_count(), 3);
    }

    #[test]
    fn test_monophonic_voice_retriggers() {
        let mut voice = Voice::new(&spec(false), 4, 1.0, SR);
        voice.trigger_attack_release(100.0, 1.0, 1.0);
        voice.trigger_attack_release(150.0, 1.0, 1.0);
        assert_eq!(voice.active_notes(), 1);
    }

    #[test]
    fn test_release_all_fades_out() {
        let mut voice = Voice::new(&spec(true), 4, 1.0, SR);
        voice.trigger_attack_release(100.0, 10.0, 1.0);
        voice.trigger_attack_release(200.0, 10.0, 1.0);
        for _ in 0..30 {
            voice.next_sample();
        }
        voice.release_all();
        for _ in 0..60 {
            voice.next_sample();
        }
        assert_eq!(voice.active_notes(), 0);
    }
}
