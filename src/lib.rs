//! Spacey library - starfield landing page with a procedural chiptune soundtrack

pub mod audio;
pub mod cli;
pub mod error;
pub mod music;
pub mod params;
pub mod rendering;
pub mod starfield;
pub mod toggle;
