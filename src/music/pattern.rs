//! Looping note patterns.
//!
//! Event times are measured in beats (quarter notes) from the start of the
//! loop, so a pattern is independent of tempo until the transport plays it.

use super::pitch::Note;

/// Beats in one eighth-note slot
pub const EIGHTH_NOTE_BEATS: f64 = 0.5;

/// Beats in one half-note slot
pub const HALF_NOTE_BEATS: f64 = 2.0;

/// One note in a pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    /// Offset from loop start (beats)
    pub time_beats: f64,
    pub note: Note,
    /// Velocity in `[0, 1]`
    pub velocity: f32,
    /// Gate length (seconds); `None` plays for one slot
    pub duration_s: Option<f64>,
}

/// Which voice a pattern drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Arpeggio,
    Bass,
}

/// Time-ordered looping sequence of note events
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    events: Vec<NoteEvent>,
    /// Slot length (beats), used for events without an explicit duration
    slot_beats: f64,
    loop_end_beats: f64,
}

impl Pattern {
    /// Build a pattern; events are sorted by time and must lie in `[0, loop_end_beats)`
    pub fn new(
        kind: PatternKind,
        mut events: Vec<NoteEvent>,
        slot_beats: f64,
        loop_end_beats: f64,
    ) -> Self {
        debug_assert!(loop_end_beats > 0.0);
        debug_assert!(events
            .iter()
            .all(|e| e.time_beats >= 0.0 && e.time_beats < loop_end_beats));
        events.sort_by(|a, b| a.time_beats.total_cmp(&b.time_beats));
        Self {
            kind,
            events,
            slot_beats,
            loop_end_beats,
        }
    }

    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    pub fn loop_end_beats(&self) -> f64 {
        self.loop_end_beats
    }

    pub fn slot_beats(&self) -> f64 {
        self.slot_beats
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Gate length of `event` in seconds at the given tempo
    pub fn gate_seconds(&self, event: &NoteEvent, seconds_per_beat: f64) -> f64 {
        event
            .duration_s
            .unwrap_or(self.slot_beats * seconds_per_beat)
    }

    /// Events whose looped occurrence falls in `[start_beats, end_beats)`,
    /// measured from the moment the pattern started.
    ///
    /// Yields `(absolute_beat, event)` in time order.
    pub fn occurrences(
        &self,
        start_beats: f64,
        end_beats: f64,
    ) -> impl Iterator<Item = (f64, &NoteEvent)> + '_ {
        let loop_len = self.loop_end_beats;
        let first_loop = (start_beats.max(0.0) / loop_len).floor() as u64;
        let last_loop = if end_beats <= 0.0 {
            0
        } else {
            (end_beats / loop_len).floor() as u64
        };

        (first_loop..=last_loop).flat_map(move |iteration| {
            let loop_start = iteration as f64 * loop_len;
            self.events.iter().filter_map(move |event| {
                let at = loop_start + event.time_beats;
                (at >= start_beats && at < end_beats).then_some((at, event))
            })
        })
    }
}
