//! Audio synthesis and output.
//!
//! A small in-crate synthesis engine (voices, filter, delay, reverb and a
//! beat transport) rendered either to the default output device or offline.

pub mod dsp;
pub mod engine;
pub mod offline;
pub mod system;
pub mod transport;
pub mod voice;

// Re-export public types
pub use engine::Engine;
pub use offline::OfflineBackend;
pub use system::AudioSystem;
