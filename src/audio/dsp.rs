//! DSP building blocks: oscillator, ADSR envelope, resonant low-pass,
//! LFO, feedback delay and a Schroeder reverb.
//!
//! Everything is mono, per-sample and allocation-free after construction.

use std::f32::consts::PI;

use crate::music::{Envelope, Waveform};

/// Mono sample processor
pub trait Effect {
    /// Process one sample
    fn process(&mut self, input: f32) -> f32;
}

/// Phase-accumulator oscillator producing output in `[-1, 1]`
#[derive(Debug, Clone)]
pub struct Oscillator {
    /// Current phase [0.0, 1.0)
    phase: f32,
    pub waveform: Waveform,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            phase: 0.0,
            waveform,
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    #[inline]
    pub fn next_sample(&mut self, freq_hz: f32, sample_rate: f32) -> f32 {
        let phase = self.phase;
        let out = match self.waveform {
            Waveform::Sine => (phase * 2.0 * PI).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => {
                if phase < 0.5 {
                    4.0 * phase - 1.0
                } else {
                    3.0 - 4.0 * phase
                }
            }
        };
        self.phase += freq_hz / sample_rate;
        self.phase -= self.phase.floor();
        out
    }
}

/// ADSR parameters converted to samples
#[derive(Debug, Clone, Copy)]
pub struct Adsr {
    pub attack: u32,
    pub decay: u32,
    /// Sustain level [0.0, 1.0]
    pub sustain: f32,
    pub release: u32,
}

impl Adsr {
    pub fn from_envelope(envelope: &Envelope, sample_rate: f32) -> Self {
        let to_samples = |seconds: f64| (seconds as f32 * sample_rate).round() as u32;
        Self {
            attack: to_samples(envelope.attack_s),
            decay: to_samples(envelope.decay_s),
            sustain: (envelope.sustain as f32).clamp(0.0, 1.0),
            release: to_samples(envelope.release_s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdsrPhase {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Linear-segment envelope state for one note
#[derive(Debug, Clone)]
pub struct AdsrState {
    phase: AdsrPhase,
    counter: u32,
    level: f32,
    /// Level at the moment release began
    release_from: f32,
}

impl Default for AdsrState {
    fn default() -> Self {
        Self {
            phase: AdsrPhase::Idle,
            counter: 0,
            level: 0.0,
            release_from: 0.0,
        }
    }
}

impl AdsrState {
    pub fn note_on(&mut self) {
        self.phase = AdsrPhase::Attack;
        self.counter = 0;
    }

    pub fn note_off(&mut self) {
        if self.phase != AdsrPhase::Idle && self.phase != AdsrPhase::Release {
            self.phase = AdsrPhase::Release;
            self.counter = 0;
            self.release_from = self.level;
        }
    }

    /// Cut to silence immediately
    pub fn kill(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.phase != AdsrPhase::Idle
    }

    pub fn phase(&self) -> AdsrPhase {
        self.phase
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    /// Advance by one sample and return the amplitude multiplier
    #[inline]
    pub fn next(&mut self, params: &Adsr) -> f32 {
        match self.phase {
            AdsrPhase::Idle => {
                self.level = 0.0;
            }
            AdsrPhase::Attack => {
                // Retriggers ramp up from wherever the level currently is
                if params.attack == 0 || self.counter >= params.attack {
                    self.level = 1.0;
                    self.phase = AdsrPhase::Decay;
                    self.counter = 0;
                } else {
                    let step = (1.0 - self.level) / (params.attack - self.counter) as f32;
                    self.level += step;
                    self.counter += 1;
                }
            }
            AdsrPhase::Decay => {
                if params.decay == 0 || self.counter >= params.decay {
                    self.level = params.sustain;
                    self.phase = AdsrPhase::Sustain;
                    self.counter = 0;
                } else {
                    let t = self.counter as f32 / params.decay as f32;
                    self.level = 1.0 - (1.0 - params.sustain) * t;
                    self.counter += 1;
                }
            }
            AdsrPhase::Sustain => {
                self.level = params.sustain;
            }
            AdsrPhase::Release => {
                if params.release == 0 || self.counter >= params.release {
                    self.level = 0.0;
                    self.phase = AdsrPhase::Idle;
                    self.counter = 0;
                } else {
                    let t = self.counter as f32 / params.release as f32;
                    self.level = self.release_from * (1.0 - t);
                    self.counter += 1;
                }
            }
        }
        self.level
    }
}

/// Resonant low-pass biquad (RBJ cookbook), direct form I
#[derive(Debug, Clone)]
pub struct LowPassFilter {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
    q: f32,
    sample_rate: f32,
}

impl LowPassFilter {
    pub fn new(cutoff_hz: f32, q: f32, sample_rate: f32) -> Self {
        let mut filter = Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
            q: q.max(0.1),
            sample_rate,
        };
        filter.set_cutoff(cutoff_hz);
        filter
    }

    /// Recompute coefficients for a new cutoff (Nyquist-clamped)
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        let cutoff = cutoff_hz.clamp(10.0, self.sample_rate * 0.45);
        let w0 = 2.0 * PI * cutoff / self.sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * self.q);

        let a0 = 1.0 + alpha;
        let inv_a0 = a0.recip();
        self.b0 = (1.0 - cos_w0) * 0.5 * inv_a0;
        self.b1 = (1.0 - cos_w0) * inv_a0;
        self.b2 = self.b0;
        self.a1 = -2.0 * cos_w0 * inv_a0;
        self.a2 = (1.0 - alpha) * inv_a0;
    }
}

impl Effect for LowPassFilter {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let out = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = out;
        out
    }
}

/// Sine LFO mapped onto `[min, max]`
#[derive(Debug, Clone)]
pub struct Lfo {
    phase: f32,
    rate_hz: f32,
    min: f32,
    max: f32,
}

impl Lfo {
    pub fn new(rate_hz: f32, min: f32, max: f32) -> Self {
        Self {
            phase: 0.0,
            rate_hz,
            min,
            max,
        }
    }

    /// Advance by `samples` and return the current value
    #[inline]
    pub fn advance(&mut self, samples: usize, sample_rate: f32) -> f32 {
        let unit = 0.5 * (1.0 + (self.phase * 2.0 * PI).sin());
        self.phase += self.rate_hz * samples as f32 / sample_rate;
        self.phase -= self.phase.floor();
        self.min + (self.max - self.min) * unit
    }
}

/// Feedback delay with wet/dry mix (circular buffer)
#[derive(Debug, Clone)]
pub struct FeedbackDelay {
    buffer: Vec<f32>,
    write_pos: usize,
    /// Feedback amount [0.0, 1.0)
    pub feedback: f32,
    /// Wet/dry mix [0.0, 1.0]
    pub wet: f32,
}

impl FeedbackDelay {
    pub fn new(delay_s: f32, feedback: f32, wet: f32, sample_rate: f32) -> Self {
        let samples = (delay_s * sample_rate) as usize;
        Self {
            buffer: vec![0.0; samples.max(1)],
            write_pos: 0,
            feedback: feedback.clamp(0.0, 0.95),
            wet: wet.clamp(0.0, 1.0),
        }
    }
}

impl Effect for FeedbackDelay {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.write_pos];
        self.buffer[self.write_pos] = input + delayed * self.feedback;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        input * (1.0 - self.wet) + delayed * self.wet
    }
}

/// Schroeder reverb: four parallel combs into two series allpasses
#[derive(Debug, Clone)]
pub struct Reverb {
    combs: [Vec<f32>; 4],
    comb_pos: [usize; 4],
    comb_feedback: [f32; 4],
    allpasses: [Vec<f32>; 2],
    allpass_pos: [usize; 2],
    /// Wet/dry mix [0.0, 1.0]
    pub wet: f32,
}

impl Reverb {
    /// Classic Schroeder delay lengths at 44.1kHz
    const COMB_DELAYS: [usize; 4] = [1116, 1188, 1277, 1356];
    const ALLPASS_DELAYS: [usize; 2] = [556, 441];
    const ALLPASS_GAIN: f32 = 0.5;

    /// Build a reverb whose tail falls 60 dB over `decay_s`
    pub fn new(decay_s: f32, wet: f32, sample_rate: f32) -> Self {
        let scale = sample_rate / 44100.0;
        let combs = Self::COMB_DELAYS.map(|d| vec![0.0; ((d as f32 * scale) as usize).max(1)]);
        let allpasses =
            Self::ALLPASS_DELAYS.map(|d| vec![0.0; ((d as f32 * scale) as usize).max(1)]);

        // RT60: gain per pass g = 10^(-3 * delay / (decay * sr))
        let decay_samples = (decay_s * sample_rate).max(1.0);
        let mut comb_feedback = [0.0; 4];
        for (feedback, comb) in comb_feedback.iter_mut().zip(&combs) {
            *feedback = 10f32.powf(-3.0 * comb.len() as f32 / decay_samples).min(0.98);
        }

        Self {
            combs,
            comb_pos: [0; 4],
            comb_feedback,
            allpasses,
            allpass_pos: [0; 2],
            wet: wet.clamp(0.0, 1.0),
        }
    }
}

impl Effect for Reverb {
    fn process(&mut self, input: f32) -> f32 {
        let mut sum = 0.0;
        for i in 0..4 {
            let buf = &mut self.combs[i];
            let pos = self.comb_pos[i];
            let delayed = buf[pos];
            buf[pos] = input + delayed * self.comb_feedback[i];
            self.comb_pos[i] = (pos + 1) % buf.len();
            sum += delayed;
        }
        let mut out = sum * 0.25;

        for i in 0..2 {
            let buf = &mut self.allpasses[i];
            let pos = self.allpass_pos[i];
            let delayed = buf[pos];
            let fed = out + delayed * Self::ALLPASS_GAIN;
            buf[pos] = fed;
            self.allpass_pos[i] = (pos + 1) % buf.len();
            out = delayed - fed * Self::ALLPASS_GAIN;
        }

        input * (1.0 - self.wet) + out * self.wet
    }
}
