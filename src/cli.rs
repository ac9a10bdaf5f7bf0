//! Command-line argument parsing.

use clap::Parser;

use crate::music::SeededRandom;
use crate::params::{RecordingConfig, RenderConfig, StarfieldParams};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Spacey")]
#[command(about = "Starfield landing page with a procedural chiptune soundtrack", long_about = None)]
pub struct Args {
    /// Seed for the session's music and star layout (random if omitted)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Number of stars
    #[arg(long, value_name = "N", default_value = "100")]
    pub stars: usize,

    /// Initial window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "1280")]
    pub width: u32,

    /// Initial window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "720")]
    pub height: u32,

    /// Record frames and audio under recording/ (duration in seconds), then exit
    #[arg(long, value_name = "SECONDS", conflicts_with = "bounce")]
    pub record: Option<f32>,

    /// Render one session offline to a WAV file (duration in seconds); no window
    #[arg(long, value_name = "SECONDS")]
    pub bounce: Option<f32>,

    /// Output path for --bounce
    #[arg(long, value_name = "PATH", default_value = "bounce.wav")]
    pub output: String,
}

impl Args {
    /// Random source for this run, seeded from `--seed` or entropy
    pub fn random_source(&self) -> SeededRandom {
        match self.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width,
            window_height: self.height,
            ..RenderConfig::default()
        }
    }

    pub fn starfield_params(&self) -> StarfieldParams {
        StarfieldParams {
            star_count: self.stars,
            ..StarfieldParams::default()
        }
    }

    /// Create recording configuration if recording mode is enabled
    pub fn create_recording_config(&self) -> std::io::Result<Option<RecordingConfig>> {
        let Some(duration) = self.record else {
            return Ok(None);
        };
        let config = RecordingConfig::new(duration);

        // Create output directories
        std::fs::create_dir_all(config.frames_dir())?;
        std::fs::create_dir_all(&config.output_dir)?;

        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["spacey"]);
        assert_eq!(args.stars, 100);
        assert_eq!((args.width, args.height), (1280, 720));
        assert!(args.record.is_none() && args.bounce.is_none());
        assert_eq!(args.starfield_params().star_count, 100);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let args = Args::parse_from(["spacey", "--seed", "42"]);
        assert_eq!(args.random_source().seed(), 42);
    }

    #[test]
    fn test_bounce_with_output() {
        let args = Args::parse_from(["spacey", "--bounce", "8", "--output", "out.wav"]);
        assert_eq!(args.bounce, Some(8.0));
        assert_eq!(args.output, "out.wav");
    }

    #[test]
    fn test_record_conflicts_with_bounce() {
        assert!(Args::try_parse_from(["spacey", "--record", "2", "--bounce", "2"]).is_err());
    }

    #[test]
    fn test_window_size_flows_into_render_config() {
        let args = Args::parse_from(["spacey", "--width", "640", "--height", "480"]);
        let config = args.render_config();
        assert_eq!((config.window_width, config.window_height), (640, 480));
    }
}
