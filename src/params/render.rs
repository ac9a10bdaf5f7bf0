//! Window and recording configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Initial window width (pixels)
    pub window_width: u32,

    /// Initial window height (pixels)
    pub window_height: u32,

    /// Landing page heading, shown in the window title
    pub heading: String,

    /// Landing page tagline, shown after the heading
    pub tagline: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            heading: "Frontend Developer".to_string(),
            tagline: "// Decoding Dev Mysteries for Actual Humans".to_string(),
        }
    }
}

impl RenderConfig {
    /// Window title for the given toggle label
    pub fn title(&self, toggle_label: &str) -> String {
        format!("{} | {} | {}", self.heading, self.tagline, toggle_label)
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames and audio
    pub output_dir: String,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: "recording".to_string(),
            fps: 60,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil() as usize
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> String {
        format!("{}/frames", self.output_dir)
    }

    /// Audio file path
    pub fn audio_path(&self) -> String {
        format!("{}/audio.wav", self.output_dir)
    }

    /// Path of a single captured frame
    pub fn frame_path(&self, frame_num: usize) -> String {
        format!("{}/frame_{:05}.png", self.frames_dir(), frame_num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_frame_count_rounds_up() {
        let config = RecordingConfig::new(1.01);
        assert_eq!(config.total_frames(), 61);
    }

    #[test]
    fn test_recording_paths() {
        let config = RecordingConfig::new(2.0);
        assert_eq!(config.audio_path(), "recording/audio.wav");
        assert_eq!(config.frame_path(7), "recording/frames/frame_00007.png");
    }

    #[test]
    fn test_title_includes_toggle_label() {
        let config = RenderConfig::default();
        assert!(config.title("Play Music").ends_with("| Play Music"));
    }
}
