//! Real-time audio output through the default cpal device.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex, MutexGuard};

use super::engine::Engine;
use crate::error::AudioError;
use crate::music::{AudioBackend, Composition};
use crate::params::{AudioConfig, RecordingConfig};

type WavWriter = hound::WavWriter<std::io::BufWriter<std::fs::File>>;

/// Audio system: shared engine plus the output stream opened on first unlock
pub struct AudioSystem {
    /// Engine shared with the audio callback
    engine: Arc<Mutex<Engine>>,

    device: cpal::Device,
    stream_config: cpal::StreamConfig,

    /// Audio output stream (kept alive once opened)
    stream: Option<cpal::Stream>,

    /// WAV capture of everything sent to the device
    wav_writer: Option<Arc<Mutex<WavWriter>>>,
}

impl AudioSystem {
    /// Resolve the default output device. No audio is produced until
    /// [`unlock`](AudioBackend::unlock) is called from a user gesture.
    pub fn new(
        config: AudioConfig,
        recording_config: Option<&RecordingConfig>,
    ) -> Result<Self, AudioError> {
        config.validate().map_err(AudioError::InvalidConfig)?;

        // Setup audio output device
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let default_config = device.default_output_config()?;
        let supported = if default_config.sample_format() == cpal::SampleFormat::F32 {
            default_config
        } else {
            log::warn!(
                "Default output format is {:?}; looking for an f32 config",
                default_config.sample_format()
            );
            select_f32_config(default_config, device.supported_output_configs()?)?
        };
        let stream_config: cpal::StreamConfig = supported.into();

        log::info!(
            "Audio: {} @ {}Hz, {} channels",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            stream_config.sample_rate.0,
            stream_config.channels
        );

        // Create WAV writer if recording
        let wav_writer = match recording_config {
            Some(recording) => {
                let spec = hound::WavSpec {
                    channels: stream_config.channels,
                    sample_rate: stream_config.sample_rate.0,
                    bits_per_sample: 32,
                    sample_format: hound::SampleFormat::Float,
                };
                let writer = hound::WavWriter::create(recording.audio_path(), spec)?;
                Some(Arc::new(Mutex::new(writer)))
            }
            None => None,
        };

        let engine = Engine::new(config, stream_config.sample_rate.0 as f32);

        Ok(Self {
            engine: Arc::new(Mutex::new(engine)),
            device,
            stream_config,
            stream: None,
            wav_writer,
        })
    }

    /// Flush and close the WAV capture, if any
    pub fn finish_recording(&mut self) -> Result<(), AudioError> {
        let Some(writer) = self.wav_writer.take() else {
            return Ok(());
        };
        // Stop the callback from holding the other reference
        self.stream = None;
        match Arc::try_unwrap(writer) {
            Ok(mutex) => {
                let writer = mutex.into_inner().unwrap_or_else(|e| e.into_inner());
                writer.finalize()?;
            }
            Err(_) => log::warn!("WAV writer still shared; recording left unfinalized"),
        }
        Ok(())
    }

    /// Lock the engine, recovering from a poisoned lock
    fn engine(&self) -> MutexGuard<'_, Engine> {
        self.engine.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn build_stream(&self) -> Result<cpal::Stream, AudioError> {
        let engine = Arc::clone(&self.engine);
        let wav_writer = self.wav_writer.clone();
        let channels = self.stream_config.channels as usize;

        let stream = self.device.build_output_stream(
            &self.stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                match engine.lock() {
                    Ok(mut engine) => engine.render_interleaved(data, channels),
                    Err(_) => data.fill(0.0),
                }

                // Record to WAV if recording
                if let Some(ref writer) = wav_writer {
                    if let Ok(mut w) = writer.lock() {
                        for &sample in data.iter() {
                            let _ = w.write_sample(sample);
                        }
                    }
                }
            },
            |err| log::error!("Audio stream error: {}", err),
            None,
        )?;
        Ok(stream)
    }
}

impl AudioBackend for AudioSystem {
    async fn unlock(&mut self) -> Result<(), AudioError> {
        if self.stream.is_none() {
            let stream = self.build_stream()?;
            stream.play()?;
            log::info!("Audio output unlocked");
            self.stream = Some(stream);
        }
        Ok(())
    }

    fn load(&mut self, composition: &Composition) {
        self.engine().load(composition);
    }

    fn start_transport(&mut self) {
        self.engine().start();
    }

    fn stop_transport(&mut self) {
        self.engine().stop();
    }

    fn unload(&mut self) {
        self.engine().unload();
    }
}

/// The default config if it is f32, otherwise an f32 config at the default
/// sample rate (same channel count preferred)
fn select_f32_config(
    default: cpal::SupportedStreamConfig,
    candidates: impl IntoIterator<Item = cpal::SupportedStreamConfigRange>,
) -> Result<cpal::SupportedStreamConfig, AudioError> {
    if default.sample_format() == cpal::SampleFormat::F32 {
        return Ok(default);
    }
    let rate = default.sample_rate();
    let mut matching: Vec<_> = candidates
        .into_iter()
        .filter(|range| {
            range.sample_format() == cpal::SampleFormat::F32
                && range.min_sample_rate() <= rate
                && rate <= range.max_sample_rate()
        })
        .collect();
    matching.sort_by_key(|range| range.channels() != default.channels());
    matching
        .into_iter()
        .next()
        .map(|range| range.with_sample_rate(rate))
        .ok_or(AudioError::UnsupportedSampleFormat(default.sample_format()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpal::{
        SampleFormat, SampleRate, SupportedBufferSize, SupportedStreamConfig,
        SupportedStreamConfigRange,
    };

    fn default_config(format: SampleFormat) -> SupportedStreamConfig {
        SupportedStreamConfig::new(2, SampleRate(48000), SupportedBufferSize::Unknown, format)
    }

    fn range(
        channels: u16,
        min: u32,
        max: u32,
        format: SampleFormat,
    ) -> SupportedStreamConfigRange {
        SupportedStreamConfigRange::new(
            channels,
            SampleRate(min),
            SampleRate(max),
            SupportedBufferSize::Unknown,
            format,
        )
    }

    #[test]
    fn test_f32_default_is_kept() {
        let config = select_f32_config(default_config(SampleFormat::F32), Vec::new()).unwrap();
        assert_eq!(config.sample_format(), SampleFormat::F32);
        assert_eq!(config.sample_rate(), SampleRate(48000));
    }

    #[test]
    fn test_falls_back_to_f32_range_at_default_rate() {
        let candidates = vec![
            range(2, 44100, 48000, SampleFormat::I16),
            range(1, 8000, 96000, SampleFormat::F32),
            range(2, 8000, 96000, SampleFormat::F32),
        ];
        let config = select_f32_config(default_config(SampleFormat::I16), candidates).unwrap();
        assert_eq!(config.sample_format(), SampleFormat::F32);
        assert_eq!(config.sample_rate(), SampleRate(48000));
        assert_eq!(config.channels(), 2);
    }

    #[test]
    fn test_no_f32_at_default_rate_is_an_error() {
        let candidates = vec![
            range(2, 8000, 96000, SampleFormat::I16),
            range(2, 8000, 44100, SampleFormat::F32),
        ];
        assert!(matches!(
            select_f32_config(default_config(SampleFormat::I16), candidates),
            Err(AudioError::UnsupportedSampleFormat(SampleFormat::I16))
        ));
    }
}
