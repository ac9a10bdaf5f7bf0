//! Note names, semitone transposition and pitch-to-frequency conversion.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseNoteError;

/// Sharp-spelled pitch-class names, indexed by pitch class (C = 0)
const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A concrete note: pitch class 0-11 plus octave number (scientific pitch, C4 = middle C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pitch_class: u8,
    octave: i32,
}

impl Note {
    /// Build a note, folding any out-of-range pitch class into the octave
    pub fn new(pitch_class: i32, octave: i32) -> Self {
        let mut pc = pitch_class;
        let mut octave = octave;
        while pc >= 12 {
            pc -= 12;
            octave += 1;
        }
        while pc < 0 {
            pc += 12;
            octave -= 1;
        }
        Self {
            pitch_class: pc as u8,
            octave,
        }
    }

    /// Const constructor for fixed note tables; `pitch_class` must be below 12
    pub const fn from_parts(pitch_class: u8, octave: i32) -> Self {
        assert!(pitch_class < 12);
        Self {
            pitch_class,
            octave,
        }
    }

    pub fn pitch_class(&self) -> u8 {
        self.pitch_class
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    /// Shift by `semitones`, carrying across octave boundaries
    pub fn transpose(self, semitones: i32) -> Self {
        Self::new(self.pitch_class as i32 + semitones, self.octave)
    }

    /// Same pitch class, `octaves` higher (negative = lower)
    pub fn shift_octave(self, octaves: i32) -> Self {
        Self {
            octave: self.octave + octaves,
            ..self
        }
    }

    /// MIDI note number (C-1 = 0, A4 = 69)
    pub fn midi(&self) -> i32 {
        (self.octave + 1) * 12 + self.pitch_class as i32
    }

    /// Equal-tempered frequency with A4 = 440 Hz
    pub fn frequency_hz(&self) -> f32 {
        440.0 * 2f32.powf((self.midi() - 69) as f32 / 12.0)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            PITCH_CLASS_NAMES[self.pitch_class as usize], self.octave
        )
    }
}

impl FromStr for Note {
    type Err = ParseNoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseNoteError::Empty);
        }

        // Longest matching name first so "C#" wins over "C"
        let (pitch_class, rest) = PITCH_CLASS_NAMES
            .iter()
            .enumerate()
            .filter_map(|(pc, name)| s.strip_prefix(name).map(|rest| (pc, name.len(), rest)))
            .max_by_key(|(_, len, _)| *len)
            .map(|(pc, _, rest)| (pc, rest))
            .ok_or_else(|| ParseNoteError::UnknownPitchClass(s.to_string()))?;

        let octave = rest
            .parse::<i32>()
            .map_err(|_| ParseNoteError::InvalidOctave(s.to_string()))?;

        Ok(Self::new(pitch_class as i32, octave))
    }
}

/// Transpose every note of a chord or line by the same amount
pub fn transpose_all(notes: &[Note], semitones: i32) -> Vec<Note> {
    notes.iter().map(|note| note.transpose(semitones)).collect()
}
