//! Audio output configuration and constants.

/// Audio output configuration
#[derive(Debug, Clone)]
pub struct AudioConfig {
    /// Sample rate used for offline rendering (Hz).
    /// Real-time output follows the device's default rate instead.
    pub sample_rate_hz: u32,

    /// Number of interleaved output channels for offline rendering
    pub channels: u16,

    /// Hard clip applied to every output sample (linear amplitude)
    pub output_limit: f32,

    /// Gain applied to each lead voice (PolySynth voices are summed)
    pub lead_gain: f32,

    /// Gain applied to the bass voice
    pub bass_gain: f32,

    /// Maximum simultaneous notes for the polyphonic lead voice
    pub lead_polyphony: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            channels: 2,
            output_limit: 0.5, // Safety limiter to prevent ear damage
            lead_gain: 0.12,
            bass_gain: 0.25,
            lead_polyphony: 8,
        }
    }
}

impl AudioConfig {
    /// Validate configuration (sample rate and channel count must be non-zero, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate_hz == 0 {
            return Err("Sample rate must be > 0".to_string());
        }
        if self.channels == 0 {
            return Err("Channel count must be > 0".to_string());
        }
        if self.lead_polyphony == 0 {
            return Err("Lead polyphony must be > 0".to_string());
        }
        if !(self.output_limit > 0.0 && self.output_limit <= 1.0) {
            return Err(format!(
                "Output limit must be in (0, 1], got {}",
                self.output_limit
            ));
        }
        Ok(())
    }
}

/// Audio constants (compile-time, match engine setup)
pub mod audio_constants {
    /// Audio block size (samples per scheduling window)
    /// 128 = 2.9ms @ 44.1kHz
    pub const BLOCK_SIZE: usize = 128;

    /// Filter coefficients are recomputed from the LFO every this many samples
    pub const CONTROL_RATE_DIVISOR: usize = 32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AudioConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_sample_rate() {
        let config = AudioConfig {
            sample_rate_hz: 0,
            ..AudioConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_loud_limit() {
        let config = AudioConfig {
            output_limit: 1.5,
            ..AudioConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
