//! Starfield and toggle-button appearance.

/// Starfield particle parameters
#[derive(Debug, Clone)]
pub struct StarfieldParams {
    /// Number of stars
    pub star_count: usize,

    /// Horizontal speed range (pixels per frame)
    pub speed_px_per_frame: (f32, f32),

    /// Side length of each star square (pixels)
    pub star_size_px: f32,

    /// Star colour (RGBA, 0-255)
    pub star_color: [u8; 4],

    /// Per-frame trail fill colour (RGB) and its opacity
    /// Lower opacity = longer trails
    pub trail_color: [u8; 3],
    pub trail_alpha: f32,

    /// Page background the canvas starts from
    pub background_color: [u8; 3],
}

impl Default for StarfieldParams {
    fn default() -> Self {
        Self {
            star_count: 100,
            speed_px_per_frame: (1.0, 4.0),
            star_size_px: 2.0,
            star_color: [255, 255, 255, 255],
            trail_color: [24, 24, 36],
            trail_alpha: 0.2,
            background_color: [12, 12, 29], // #0c0c1d
        }
    }
}

/// Play/stop toggle appearance
#[derive(Debug, Clone)]
pub struct ToggleStyle {
    /// Button side length (pixels)
    pub size_px: f32,

    /// Distance from the bottom edge of the canvas (pixels)
    pub bottom_margin_px: f32,

    /// Button face colour
    pub face_color: [u8; 4],

    /// Icon colour (accent green from the landing page)
    pub icon_color: [u8; 4],
}

impl Default for ToggleStyle {
    fn default() -> Self {
        Self {
            size_px: 48.0,
            bottom_margin_px: 32.0,
            face_color: [40, 40, 64, 220],
            icon_color: [102, 255, 102, 255], // #66ff66
        }
    }
}
