//! Procedural ambient chiptune generation.
//!
//! Builds a two-voice synthesis graph description and two looping note
//! patterns (arpeggio + bass) from per-session random parameters, and drives
//! them through an [`AudioBackend`] with a start/stop/cleanup lifecycle.

pub mod generator;
pub mod graph;
pub mod pattern;
pub mod pitch;
pub mod random;
pub mod session;

// Re-export public types
pub use generator::{compose, Composition};
pub use graph::{EffectChainSpec, Envelope, VoiceSpec, Waveform};
pub use pattern::{NoteEvent, Pattern, PatternKind};
pub use pitch::Note;
pub use random::{FixedRandom, RandomSource, SeededRandom};
pub use session::{AudioBackend, MusicSession, PlaybackState};
