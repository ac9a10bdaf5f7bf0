//! Error types for audio output, rendering and note parsing.

/// Errors raised while opening or driving audio output
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Invalid audio config: {0}")]
    InvalidConfig(String),

    #[error("No audio output device found")]
    NoOutputDevice,

    #[error("Unsupported sample format {0:?} (expected f32)")]
    UnsupportedSampleFormat(cpal::SampleFormat),

    #[error("Failed to get audio config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("Failed to list audio configs: {0}")]
    SupportedConfigs(#[from] cpal::SupportedStreamConfigsError),

    #[error("Failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("WAV output failed: {0}")]
    Wav(#[from] hound::Error),
}

/// Errors raised while setting up the wgpu presentation surface
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("Failed to find suitable GPU adapter")]
    NoAdapter,

    #[error("Surface reports no supported texture formats")]
    NoSurfaceFormat,

    #[error("Failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("Failed to save frame: {0}")]
    SaveFrame(#[from] image::ImageError),
}

/// Error parsing a note name such as `C#4`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseNoteError {
    #[error("empty note name")]
    Empty,

    #[error("unknown pitch class in {0:?}")]
    UnknownPitchClass(String),

    #[error("missing or invalid octave in {0:?}")]
    InvalidOctave(String),
}
