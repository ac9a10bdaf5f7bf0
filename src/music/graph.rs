//! Description of the synthesis graph a session asks the audio engine to build.
//!
//! These are plain parameter records; the engine turns them into running DSP.

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
}

/// Waveforms the lead voice may use
pub const LEAD_WAVEFORMS: [Waveform; 3] = [Waveform::Square, Waveform::Triangle, Waveform::Sine];

/// Waveforms the bass voice may use
pub const BASS_WAVEFORMS: [Waveform; 2] = [Waveform::Triangle, Waveform::Sine];

/// ADSR envelope (times in seconds, sustain as fraction of peak)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub attack_s: f64,
    pub decay_s: f64,
    pub sustain: f64,
    pub release_s: f64,
}

/// One synthesizer voice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSpec {
    pub waveform: Waveform,
    pub envelope: Envelope,
    /// Polyphonic voices layer overlapping notes; monophonic ones retrigger
    pub polyphonic: bool,
}

/// Resonant low-pass filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    pub cutoff_hz: f64,
    pub q: f64,
}

/// Feedback delay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelaySpec {
    pub time_s: f64,
    pub feedback: f64,
    pub wet: f64,
}

/// Algorithmic reverb
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbSpec {
    pub decay_s: f64,
    pub wet: f64,
}

/// Sine LFO sweeping the filter cutoff between `min_hz` and `max_hz`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LfoSpec {
    pub rate_hz: f64,
    pub min_hz: f64,
    pub max_hz: f64,
}

/// Shared effects chain: filter -> delay -> reverb, with the LFO on the filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectChainSpec {
    pub filter: FilterSpec,
    pub delay: DelaySpec,
    pub reverb: ReverbSpec,
    pub lfo: LfoSpec,
}
