//! Procedural composition: randomized session parameters plus the arpeggio
//! and bass patterns built from fixed harmonic skeletons.

use super::graph::{
    DelaySpec, EffectChainSpec, Envelope, FilterSpec, LfoSpec, ReverbSpec, VoiceSpec,
    BASS_WAVEFORMS, LEAD_WAVEFORMS,
};
use super::pattern::{NoteEvent, Pattern, PatternKind, EIGHTH_NOTE_BEATS, HALF_NOTE_BEATS};
use super::pitch::{transpose_all, Note};
use super::random::RandomSource;
use crate::params::{EnvelopeRanges, MusicRanges};

/// Four-chord progression: Cmaj7, Am7, Fmaj7, G7
pub const BASE_CHORDS: [[Note; 4]; 4] = [
    [
        Note::from_parts(0, 4),
        Note::from_parts(4, 4),
        Note::from_parts(7, 4),
        Note::from_parts(11, 4),
    ],
    [
        Note::from_parts(9, 3),
        Note::from_parts(0, 4),
        Note::from_parts(4, 4),
        Note::from_parts(7, 4),
    ],
    [
        Note::from_parts(5, 3),
        Note::from_parts(9, 3),
        Note::from_parts(0, 4),
        Note::from_parts(4, 4),
    ],
    [
        Note::from_parts(7, 3),
        Note::from_parts(11, 3),
        Note::from_parts(2, 4),
        Note::from_parts(5, 4),
    ],
];

/// Bass roots under each chord: C2, A1, F1, G1
pub const BASE_BASS: [Note; 4] = [
    Note::from_parts(0, 2),
    Note::from_parts(9, 1),
    Note::from_parts(5, 1),
    Note::from_parts(7, 1),
];

/// Everything one session plays: voices, effects, tempo and both patterns
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub tempo_bpm: f64,
    /// Semitone offset applied to both the chords and the bass line
    pub transposition: i32,
    pub notes_per_chord: usize,
    pub notes_per_bass: usize,
    pub lead: VoiceSpec,
    pub bass: VoiceSpec,
    pub effects: EffectChainSpec,
    pub arpeggio: Pattern,
    pub bass_line: Pattern,
}

/// Draw a fresh set of session parameters and build both patterns
pub fn compose(rng: &mut impl RandomSource, ranges: &MusicRanges) -> Composition {
    // Session-wide draws
    let delay_feedback = rng.uniform(ranges.delay_feedback);
    let notes_per_chord = rng.uniform_floor(ranges.notes_per_chord).max(1) as usize;
    let notes_per_bass = rng.uniform_floor(ranges.notes_per_bass).max(1) as usize;
    let tempo_bpm = rng.uniform(ranges.tempo_bpm).floor();

    let effects = draw_effects(rng, ranges, delay_feedback);

    let lead = VoiceSpec {
        waveform: rng.pick(&LEAD_WAVEFORMS),
        envelope: draw_envelope(rng, &ranges.lead_envelope),
        polyphonic: true,
    };
    let bass = VoiceSpec {
        waveform: rng.pick(&BASS_WAVEFORMS),
        envelope: draw_envelope(rng, &ranges.bass_envelope),
        polyphonic: false,
    };

    // One transposition keeps lead and bass in the same key
    let transposition = rng.uniform_floor(ranges.transposition);
    let chords: Vec<[Note; 4]> = BASE_CHORDS
        .iter()
        .map(|chord| chord.map(|note| note.transpose(transposition)))
        .collect();
    let bass_notes = transpose_all(&BASE_BASS, transposition);

    let seconds_per_beat = 60.0 / tempo_bpm;
    let arpeggio = arpeggio_pattern(rng, ranges, &chords, notes_per_chord);
    let bass_line = bass_pattern(rng, ranges, &bass_notes, notes_per_bass, seconds_per_beat);

    log::info!(
        "Composed session: {} BPM, transposed {:+} semitones, lead {:?}, bass {:?}",
        tempo_bpm,
        transposition,
        lead.waveform,
        bass.waveform
    );
    log::debug!(
        "Arpeggio: {} events over {} beats; bass: {} events over {} beats",
        arpeggio.events().len(),
        arpeggio.loop_end_beats(),
        bass_line.events().len(),
        bass_line.loop_end_beats()
    );

    Composition {
        tempo_bpm,
        transposition,
        notes_per_chord,
        notes_per_bass,
        lead,
        bass,
        effects,
        arpeggio,
        bass_line,
    }
}

fn draw_effects(
    rng: &mut impl RandomSource,
    ranges: &MusicRanges,
    delay_feedback: f64,
) -> EffectChainSpec {
    let reverb_decay_s = rng.uniform(ranges.reverb_decay_s);
    let cutoff_hz = rng.uniform(ranges.filter_cutoff_hz);
    let q = rng.uniform(ranges.filter_q);
    let lfo_rate_hz = rng.uniform(ranges.lfo_rate_hz);

    let reverb = ReverbSpec {
        decay_s: reverb_decay_s,
        wet: rng.uniform(ranges.reverb_wet),
    };
    let delay = DelaySpec {
        time_s: rng.uniform(ranges.delay_time_s),
        feedback: delay_feedback,
        wet: rng.uniform(ranges.delay_wet),
    };
    let lfo = LfoSpec {
        rate_hz: lfo_rate_hz,
        min_hz: rng.uniform(ranges.lfo_min_hz),
        max_hz: rng.uniform(ranges.lfo_max_hz),
    };

    EffectChainSpec {
        filter: FilterSpec { cutoff_hz, q },
        delay,
        reverb,
        lfo,
    }
}

fn draw_envelope(rng: &mut impl RandomSource, ranges: &EnvelopeRanges) -> Envelope {
    Envelope {
        attack_s: rng.uniform(ranges.attack_s),
        decay_s: rng.uniform(ranges.decay_s),
        sustain: rng.uniform(ranges.sustain),
        release_s: rng.uniform(ranges.release_s),
    }
}

/// Arpeggiate each chord for `notes_per_chord` eighth notes.
///
/// Tone choice and octave normally follow the note's position; both are
/// occasionally randomized, and some notes are dropped.
pub fn arpeggio_pattern(
    rng: &mut impl RandomSource,
    ranges: &MusicRanges,
    chords: &[[Note; 4]],
    notes_per_chord: usize,
) -> Pattern {
    let mut events = Vec::with_capacity(chords.len() * notes_per_chord);

    for (i, chord) in chords.iter().enumerate() {
        let chord_start = (i * notes_per_chord) as f64 * EIGHTH_NOTE_BEATS;

        for j in 0..notes_per_chord {
            let tone = if rng.chance(ranges.arp_cyclic_tone_probability) {
                j % chord.len()
            } else {
                rng.index(chord.len())
            };
            let octave_up = if rng.chance(ranges.arp_cyclic_octave_probability) {
                (j / 4) % 2 == 1
            } else {
                rng.index(2) == 1
            };

            if rng.chance(ranges.arp_skip_probability) {
                continue;
            }

            // Only the middle register is lifted; octave 5 and up stays put
            let note = chord[tone];
            let note = if octave_up && matches!(note.octave(), 3 | 4) {
                note.shift_octave(1)
            } else {
                note
            };

            events.push(NoteEvent {
                time_beats: chord_start + j as f64 * EIGHTH_NOTE_BEATS,
                note,
                velocity: rng.uniform(ranges.arp_velocity) as f32,
                duration_s: Some(rng.uniform(ranges.arp_duration_s)),
            });
        }
    }

    let loop_end = (chords.len() * notes_per_chord) as f64 * EIGHTH_NOTE_BEATS;
    Pattern::new(PatternKind::Arpeggio, events, EIGHTH_NOTE_BEATS, loop_end)
}

/// Repeat each bass note `notes_per_bass` half notes, dropping some at random
pub fn bass_pattern(
    rng: &mut impl RandomSource,
    ranges: &MusicRanges,
    bass_notes: &[Note],
    notes_per_bass: usize,
    seconds_per_beat: f64,
) -> Pattern {
    let mut events = Vec::with_capacity(bass_notes.len() * notes_per_bass);
    let slot_s = HALF_NOTE_BEATS * seconds_per_beat;

    for (i, &note) in bass_notes.iter().enumerate() {
        let step_start = (i * notes_per_bass) as f64 * HALF_NOTE_BEATS;

        for j in 0..notes_per_bass {
            if rng.chance(ranges.bass_skip_probability) {
                continue;
            }

            events.push(NoteEvent {
                time_beats: step_start + j as f64 * HALF_NOTE_BEATS,
                note,
                velocity: rng.uniform(ranges.bass_velocity) as f32,
                duration_s: Some(slot_s * rng.uniform(ranges.bass_duration_scale)),
            });
        }
    }

    let loop_end = (bass_notes.len() * notes_per_bass) as f64 * HALF_NOTE_BEATS;
    Pattern::new(PatternKind::Bass, events, HALF_NOTE_BEATS, loop_end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::graph::Waveform;
    use crate::music::random::{FixedRandom, SeededRandom};

    fn names(pattern: &Pattern) -> Vec<String> {
        pattern.events().iter().map(|e| e.note.to_string()).collect()
    }

    #[test]
    fn test_fixed_source_composition_is_reproducible() {
        let ranges = MusicRanges::default();
        let a = compose(&mut FixedRandom::new(0.5), &ranges);
        let b = compose(&mut FixedRandom::new(0.5), &ranges);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fixed_source_arpeggio_snapshot() {
        let composition = compose(&mut FixedRandom::new(0.5), &MusicRanges::default());

        assert_eq!(composition.tempo_bpm, 120.0);
        assert_eq!(composition.transposition, 0);
        assert_eq!(composition.notes_per_chord, 8);
        assert_eq!(composition.lead.waveform, Waveform::Triangle);
        assert_eq!(composition.bass.waveform, Waveform::Sine);

        let arp = &composition.arpeggio;
        assert_eq!(arp.events().len(), 32);
        assert_eq!(arp.loop_end_beats(), 16.0);
        assert_eq!(
            names(arp)[..16],
            [
                "C4", "E4", "G4", "B4", "C5", "E5", "G5", "B5", // Cmaj7, second half lifted
                "A3", "C4", "E4", "G4", "A4", "C5", "E5", "G5", // Am7
            ]
        );
        // G7 second half lifted from octaves 3 and 4
        assert_eq!(names(arp)[28..], ["G4", "B4", "D5", "F5"]);

        for (i, event) in arp.events().iter().enumerate() {
            assert_eq!(event.time_beats, i as f64 * 0.5);
            assert!((event.velocity - 0.8).abs() < 1e-6);
            let duration = event.duration_s.unwrap();
            assert!((duration - 0.15).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fixed_source_bass_snapshot() {
        let composition = compose(&mut FixedRandom::new(0.5), &MusicRanges::default());
        let bass = &composition.bass_line;

        assert_eq!(composition.notes_per_bass, 2);
        assert_eq!(
            names(bass),
            ["C2", "C2", "A1", "A1", "F1", "F1", "G1", "G1"]
        );
        assert_eq!(bass.loop_end_beats(), 16.0);
        let times: Vec<f64> = bass.events().iter().map(|e| e.time_beats).collect();
        assert_eq!(times, [0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0]);

        // Half note at 120 BPM is one second; scale draw is exactly 1.0
        let duration = bass.events()[0].duration_s.unwrap();
        assert!((duration - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_low_draws_skip_every_note() {
        let composition = compose(&mut FixedRandom::new(0.05), &MusicRanges::default());
        assert!(composition.arpeggio.is_empty());
        assert!(composition.bass_line.is_empty());
        assert!(composition.arpeggio.loop_end_beats() > 0.0);
    }

    #[test]
    fn test_event_times_lie_within_loop() {
        let ranges = MusicRanges::default();
        for seed in 0..200 {
            let composition = compose(&mut SeededRandom::new(seed), &ranges);
            for pattern in [&composition.arpeggio, &composition.bass_line] {
                for event in pattern.events() {
                    assert!(event.time_beats >= 0.0);
                    assert!(event.time_beats < pattern.loop_end_beats());
                }
            }
        }
    }

    #[test]
    fn test_session_parameters_respect_ranges() {
        let ranges = MusicRanges::default();
        for seed in 0..200 {
            let c = compose(&mut SeededRandom::new(seed), &ranges);
            assert!((100.0..140.0).contains(&c.tempo_bpm));
            assert_eq!(c.tempo_bpm.fract(), 0.0);
            assert!((-3..=3).contains(&c.transposition));
            assert!((6..=9).contains(&c.notes_per_chord));
            assert!((1..=2).contains(&c.notes_per_bass));
            assert!(ranges.delay_feedback.contains(c.effects.delay.feedback));
            assert!(ranges.reverb_decay_s.contains(c.effects.reverb.decay_s));
            assert!(ranges.filter_q.contains(c.effects.filter.q));
            assert!(ranges.lfo_min_hz.contains(c.effects.lfo.min_hz));
            assert!(ranges.lfo_max_hz.contains(c.effects.lfo.max_hz));
            assert!(ranges.lead_envelope.sustain.contains(c.lead.envelope.sustain));
            assert!(ranges.bass_envelope.release_s.contains(c.bass.envelope.release_s));
            assert!(c.lead.polyphonic);
            assert!(!c.bass.polyphonic);
            assert_ne!(c.bass.waveform, Waveform::Square);
            for event in c.arpeggio.events() {
                assert!(ranges.arp_velocity.contains(event.velocity as f64));
            }
        }
    }

    #[test]
    fn test_bass_shares_transposition_with_chords() {
        let ranges = MusicRanges::default();
        for seed in 0..100 {
            let c = compose(&mut SeededRandom::new(seed), &ranges);
            let expected = transpose_all(&BASE_BASS, c.transposition);
            for event in c.bass_line.events() {
                assert!(expected.contains(&event.note));
            }
            let chord_tones: Vec<u8> = BASE_CHORDS
                .iter()
                .flatten()
                .map(|n| n.transpose(c.transposition).pitch_class())
                .collect();
            for event in c.arpeggio.events() {
                assert!(chord_tones.contains(&event.note.pitch_class()));
            }
        }
    }
}
