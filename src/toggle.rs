//! Two-state Play/Stop control drawn onto the canvas.

use glam::Vec2;

use crate::params::ToggleStyle;
use crate::starfield::{Canvas, Rgba};

/// Axis-aligned button bounds (pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ButtonRect {
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmplt(self.max).all()
    }
}

/// Play/Stop button centred near the bottom of the canvas
pub struct PlayToggle {
    style: ToggleStyle,
    rect: ButtonRect,
}

impl PlayToggle {
    pub fn new(style: ToggleStyle, width: u32, height: u32) -> Self {
        let rect = layout(&style, width, height);
        Self { style, rect }
    }

    /// Text shown for the current playback state
    pub fn label(playing: bool) -> &'static str {
        if playing {
            "Stop Music"
        } else {
            "Play Music"
        }
    }

    pub fn rect(&self) -> ButtonRect {
        self.rect
    }

    /// Re-centre for a new canvas size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.rect = layout(&self.style, width, height);
    }

    pub fn hit_test(&self, point: Vec2) -> bool {
        self.rect.contains(point)
    }

    /// Draw the button face with a play triangle (stopped) or stop square (playing)
    pub fn draw(&self, canvas: &mut Canvas, playing: bool) {
        let size = self.rect.size();
        let face = Rgba::from_array(self.style.face_color);
        let icon = Rgba::from_array(self.style.icon_color);
        canvas.fill_rect(self.rect.min.x, self.rect.min.y, size.x, size.y, face);

        let icon_half = size.x * 0.25;
        let c = self.rect.center();
        if playing {
            canvas.fill_rect(
                c.x - icon_half,
                c.y - icon_half,
                icon_half * 2.0,
                icon_half * 2.0,
                icon,
            );
        } else {
            // Right-pointing triangle, one row at a time
            let top = (c.y - icon_half).floor() as i32;
            let rows = (icon_half * 2.0).ceil() as i32;
            let left = c.x - icon_half * 0.8;
            for i in 0..rows {
                let y = (top + i) as f32 + 0.5;
                let t = 1.0 - ((y - c.y).abs() / icon_half).min(1.0);
                let span = icon_half * 1.8 * t;
                if span >= 0.5 {
                    canvas.fill_rect(left, (top + i) as f32, span, 1.0, icon);
                }
            }
        }
    }
}

fn layout(style: &ToggleStyle, width: u32, height: u32) -> ButtonRect {
    let side = style.size_px;
    let x = (width as f32 - side) * 0.5;
    let y = (height as f32 - style.bottom_margin_px - side).max(0.0);
    ButtonRect {
        min: Vec2::new(x, y),
        max: Vec2::new(x + side, y + side),
    }
}
