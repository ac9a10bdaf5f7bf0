//! Randomization ranges for the procedural music generator.
//!
//! Every session draws its parameters uniformly from these ranges, so two
//! sessions share structure but never sound quite the same.

/// Half-open numeric range `[min, max)` for uniform draws
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Linear interpolation: `t = 0` gives `min`, `t -> 1` approaches `max`
    pub fn at(&self, t: f64) -> f64 {
        self.min + t * (self.max - self.min)
    }

    /// Inclusive containment check (upper bound included for float slack)
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Attack/decay/sustain/release ranges for one voice
#[derive(Debug, Clone)]
pub struct EnvelopeRanges {
    /// Attack time (seconds)
    pub attack_s: ValueRange,
    /// Decay time (seconds)
    pub decay_s: ValueRange,
    /// Sustain level (fraction of peak)
    pub sustain: ValueRange,
    /// Release time (seconds)
    pub release_s: ValueRange,
}

/// All per-session random ranges and probabilities
#[derive(Debug, Clone)]
pub struct MusicRanges {
    // Transport
    /// Tempo (BPM, floored to an integer)
    pub tempo_bpm: ValueRange,

    /// Semitone transposition shared by lead and bass (floored, so -3..=+3)
    pub transposition: ValueRange,

    // Pattern density
    /// Arpeggio notes per chord (floored, so 6..=9)
    pub notes_per_chord: ValueRange,

    /// Bass notes per bass-line step (floored, so 1..=2)
    pub notes_per_bass: ValueRange,

    // Effects
    /// Feedback delay: regeneration amount ("echo")
    pub delay_feedback: ValueRange,

    /// Feedback delay time (seconds)
    pub delay_time_s: ValueRange,

    /// Feedback delay wet mix
    pub delay_wet: ValueRange,

    /// Reverb decay time (seconds, RT60)
    pub reverb_decay_s: ValueRange,

    /// Reverb wet mix
    pub reverb_wet: ValueRange,

    /// Low-pass filter base cutoff (Hz)
    pub filter_cutoff_hz: ValueRange,

    /// Low-pass filter resonance (Q)
    pub filter_q: ValueRange,

    /// Filter sweep LFO rate (Hz)
    pub lfo_rate_hz: ValueRange,

    /// Filter sweep lower bound (Hz)
    pub lfo_min_hz: ValueRange,

    /// Filter sweep upper bound (Hz)
    pub lfo_max_hz: ValueRange,

    // Voices
    /// Lead (polyphonic) envelope
    pub lead_envelope: EnvelopeRanges,

    /// Bass (monophonic) envelope
    pub bass_envelope: EnvelopeRanges,

    // Arpeggio variation
    /// Probability a note keeps its cyclic chord tone
    pub arp_cyclic_tone_probability: f64,

    /// Probability a note keeps its position-derived octave shift
    pub arp_cyclic_octave_probability: f64,

    /// Probability an arpeggio note is skipped
    pub arp_skip_probability: f64,

    /// Arpeggio velocity band
    pub arp_velocity: ValueRange,

    /// Arpeggio note length (seconds)
    pub arp_duration_s: ValueRange,

    // Bass variation
    /// Probability a bass note is dropped
    pub bass_skip_probability: f64,

    /// Bass velocity band
    pub bass_velocity: ValueRange,

    /// Bass note length as a multiple of the half-note slot
    pub bass_duration_scale: ValueRange,
}

impl Default for MusicRanges {
    fn default() -> Self {
        Self {
            tempo_bpm: ValueRange::new(100.0, 140.0),
            transposition: ValueRange::new(-3.0, 4.0),

            notes_per_chord: ValueRange::new(6.0, 10.0),
            notes_per_bass: ValueRange::new(1.0, 3.0),

            delay_feedback: ValueRange::new(0.3, 0.5),
            delay_time_s: ValueRange::new(0.2, 0.4),
            delay_wet: ValueRange::new(0.2, 0.4),
            reverb_decay_s: ValueRange::new(3.0, 7.0),
            reverb_wet: ValueRange::new(0.3, 0.6),
            filter_cutoff_hz: ValueRange::new(1500.0, 2500.0),
            filter_q: ValueRange::new(3.0, 7.0),
            lfo_rate_hz: ValueRange::new(0.05, 0.2),
            lfo_min_hz: ValueRange::new(400.0, 600.0),
            lfo_max_hz: ValueRange::new(2500.0, 3500.0),

            lead_envelope: EnvelopeRanges {
                attack_s: ValueRange::new(0.01, 0.05),
                decay_s: ValueRange::new(0.1, 0.3),
                sustain: ValueRange::new(0.2, 0.4),
                release_s: ValueRange::new(0.4, 0.8),
            },
            bass_envelope: EnvelopeRanges {
                attack_s: ValueRange::new(0.05, 0.1),
                decay_s: ValueRange::new(0.2, 0.4),
                sustain: ValueRange::new(0.6, 0.9),
                release_s: ValueRange::new(0.8, 1.2),
            },

            arp_cyclic_tone_probability: 0.8,
            arp_cyclic_octave_probability: 0.7,
            arp_skip_probability: 0.1,
            arp_velocity: ValueRange::new(0.6, 1.0),
            arp_duration_s: ValueRange::new(0.1, 0.2),

            bass_skip_probability: 0.3,
            bass_velocity: ValueRange::new(0.7, 1.0),
            bass_duration_scale: ValueRange::new(0.8, 1.2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_range_interpolation() {
        let range = ValueRange::new(100.0, 140.0);
        assert_eq!(range.at(0.0), 100.0);
        assert_eq!(range.at(0.5), 120.0);
        assert!(range.contains(139.9));
        assert!(!range.contains(99.0));
    }

    #[test]
    fn test_transposition_floors_to_three_semitones_each_way() {
        let ranges = MusicRanges::default();
        assert_eq!(ranges.transposition.at(0.0).floor(), -3.0);
        assert_eq!(ranges.transposition.at(0.999).floor(), 3.0);
    }
}
