//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (seconds, Hz, pixels, etc.)
//! - Documented ranges and meanings
//! - Type safety where possible

mod audio;
mod music;
mod render;
mod starfield;

// Re-export all types
pub use audio::{audio_constants, AudioConfig};
pub use music::{EnvelopeRanges, MusicRanges, ValueRange};
pub use render::{RecordingConfig, RenderConfig};
pub use starfield::{StarfieldParams, ToggleStyle};
