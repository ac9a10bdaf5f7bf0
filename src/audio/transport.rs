//! Beat clock that plays looping patterns at sample-accurate offsets.

use crate::music::{Pattern, PatternKind};

/// A note due at a specific sample within the current block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledNote {
    /// Offset from the start of the block (samples)
    pub offset: usize,
    pub kind: PatternKind,
    pub freq_hz: f32,
    pub duration_s: f32,
    pub velocity: f32,
}

/// A pattern registered with the transport
#[derive(Debug, Clone)]
struct Part {
    pattern: Pattern,
    /// Transport position (beats) the part started at; `None` = not started
    started_at: Option<f64>,
}

/// Shared tempo clock for all parts
#[derive(Debug, Clone)]
pub struct Transport {
    bpm: f64,
    /// Samples elapsed since the transport last started
    position_samples: u64,
    /// Sample rate the position was last advanced at
    sample_rate: f32,
    running: bool,
    parts: Vec<Part>,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            position_samples: 0,
            sample_rate: 44100.0,
            running: false,
            parts: Vec::new(),
        }
    }
}

impl Transport {
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn set_bpm(&mut self, bpm: f64) {
        self.bpm = bpm.max(1.0);
    }

    pub fn position_beats(&self) -> f64 {
        self.samples_to_beats(self.position_samples, self.sample_rate)
    }

    fn samples_to_beats(&self, samples: u64, sample_rate: f32) -> f64 {
        samples as f64 / (self.seconds_per_beat() * sample_rate as f64)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm
    }

    /// Register a pattern (not yet started)
    pub fn add_part(&mut self, pattern: Pattern) {
        self.parts.push(Part {
            pattern,
            started_at: None,
        });
    }

    /// Drop every registered pattern
    pub fn clear_parts(&mut self) {
        self.parts.clear();
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Rewind to zero and start every part from the top
    pub fn start_from_zero(&mut self) {
        self.position_samples = 0;
        for part in &mut self.parts {
            part.started_at = Some(0.0);
        }
        self.running = true;
    }

    /// Halt the clock and stop every part
    pub fn stop(&mut self) {
        self.running = false;
        self.position_samples = 0;
        for part in &mut self.parts {
            part.started_at = None;
        }
    }

    /// Advance by `frames` samples, returning the notes due in that window
    /// ordered by offset.
    pub fn advance(&mut self, frames: usize, sample_rate: f32, out: &mut Vec<ScheduledNote>) {
        out.clear();
        if !self.running || frames == 0 {
            return;
        }

        // Beats are derived from the sample count so long sessions do not drift
        self.sample_rate = sample_rate;
        let seconds_per_beat = self.seconds_per_beat();
        let samples_per_beat = seconds_per_beat * sample_rate as f64;
        let end_samples = self.position_samples + frames as u64;
        let window_start = self.samples_to_beats(self.position_samples, sample_rate);
        let window_end = self.samples_to_beats(end_samples, sample_rate);

        for part in &self.parts {
            let Some(started_at) = part.started_at else {
                continue;
            };
            let local_start = window_start - started_at;
            let local_end = window_end - started_at;

            for (at, event) in part.pattern.occurrences(local_start, local_end) {
                let offset = ((at - local_start) * samples_per_beat).round() as usize;
                out.push(ScheduledNote {
                    offset: offset.min(frames - 1),
                    kind: part.pattern.kind,
                    freq_hz: event.note.frequency_hz(),
                    duration_s: part.pattern.gate_seconds(event, seconds_per_beat) as f32,
                    velocity: event.velocity,
                });
            }
        }

        out.sort_by_key(|note| note.offset);
        self.position_samples = end_samples;
    }
}
