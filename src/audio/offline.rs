//! Device-less backend: renders the engine into memory or a WAV file.

use super::engine::Engine;
use crate::error::AudioError;
use crate::music::{AudioBackend, Composition};
use crate::params::AudioConfig;

/// Backend with no output device; audio is pulled explicitly with [`render`](Self::render)
pub struct OfflineBackend {
    engine: Engine,
    channels: u16,
    unlocked: bool,
}

impl OfflineBackend {
    pub fn new(config: AudioConfig) -> Result<Self, AudioError> {
        config.validate().map_err(AudioError::InvalidConfig)?;
        let sample_rate = config.sample_rate_hz as f32;
        let channels = config.channels;
        Ok(Self {
            engine: Engine::new(config, sample_rate),
            channels,
            unlocked: false,
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Render `seconds` of interleaved audio
    pub fn render(&mut self, seconds: f32) -> Vec<f32> {
        let frames = (seconds.max(0.0) * self.engine.sample_rate()) as usize;
        let mut out = vec![0.0; frames * self.channels as usize];
        self.engine
            .render_interleaved(&mut out, self.channels as usize);
        out
    }

    /// Render `seconds` of audio into a 32-bit float WAV file
    pub fn bounce_to_wav(&mut self, seconds: f32, path: &str) -> Result<usize, AudioError> {
        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.engine.sample_rate() as u32,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;
        let samples = self.render(seconds);
        for &sample in &samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(samples.len() / self.channels as usize)
    }
}

impl AudioBackend for OfflineBackend {
    async fn unlock(&mut self) -> Result<(), AudioError> {
        self.unlocked = true;
        Ok(())
    }

    fn load(&mut self, composition: &Composition) {
        self.engine.load(composition);
    }

    fn start_transport(&mut self) {
        self.engine.start();
    }

    fn stop_transport(&mut self) {
        self.engine.stop();
    }

    fn unload(&mut self) {
        self.engine.unload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::{FixedRandom, MusicSession, PlaybackState, SeededRandom};
    use crate::params::MusicRanges;

    fn config() -> AudioConfig {
        AudioConfig {
            sample_rate_hz: 8000,
            ..AudioConfig::default()
        }
    }

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn test_start_then_immediate_stop_fires_nothing_afterwards() {
        let backend = OfflineBackend::new(config()).unwrap();
        let mut session = MusicSession::new(backend, SeededRandom::new(11), MusicRanges::default());

        session.initialize();
        pollster::block_on(session.start()).unwrap();
        session.stop();

        let engine_triggers = session.backend().engine().trigger_count();
        let _ = session.backend_mut().render(5.0);
        assert_eq!(session.backend().engine().trigger_count(), engine_triggers);
        assert_eq!(engine_triggers, 0);
        assert!(!session.backend().engine().is_running());
    }

    #[test]
    fn test_session_plays_through_offline_backend() {
        let backend = OfflineBackend::new(config()).unwrap();
        let mut session = MusicSession::new(backend, FixedRandom::new(0.5), MusicRanges::default());

        pollster::block_on(session.start()).unwrap();
        assert!(session.backend().is_unlocked());
        let audio = session.backend_mut().render(2.0);
        assert_eq!(audio.len(), 2 * 8000 * 2);
        assert!(peak(&audio) > 0.01);
    }

    #[test]
    fn test_cleanup_silences_and_unloads() {
        let backend = OfflineBackend::new(config()).unwrap();
        let mut session = MusicSession::new(backend, SeededRandom::new(5), MusicRanges::default());

        pollster::block_on(session.start()).unwrap();
        let _ = session.backend_mut().render(1.0);
        session.stop();
        session.cleanup();
        assert_eq!(session.state(), PlaybackState::Uninitialized);
        assert!(!session.backend().engine().is_loaded());
        assert_eq!(peak(&session.backend_mut().render(0.5)), 0.0);
    }

    #[test]
    fn test_bounce_writes_wav() {
        let dir = std::env::temp_dir().join("spacey_bounce_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bounce.wav");

        let backend = OfflineBackend::new(config()).unwrap();
        let mut session = MusicSession::new(backend, FixedRandom::new(0.5), MusicRanges::default());
        pollster::block_on(session.start()).unwrap();
        let frames = session
            .backend_mut()
            .bounce_to_wav(2.0, path.to_str().unwrap())
            .unwrap();
        assert_eq!(frames, 16000);

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 8000);
        assert_eq!(spec.bits_per_sample, 32);
        assert_eq!(spec.sample_format, hound::SampleFormat::Float);

        let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), 2 * 16000);
        assert!(peak(&samples) > 0.01);
        assert!(peak(&samples) <= AudioConfig::default().output_limit);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad = AudioConfig {
            channels: 0,
            ..AudioConfig::default()
        };
        assert!(matches!(
            OfflineBackend::new(bad),
            Err(AudioError::InvalidConfig(_))
        ));
    }
}
