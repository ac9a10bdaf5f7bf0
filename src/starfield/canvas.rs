//! CPU-side RGBA canvas with source-over rectangle fills.

use bytemuck::{Pod, Zeroable};

/// One 8-bit RGBA pixel, laid out exactly as the GPU texture expects
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn from_array([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }

    /// Composite `self` over `dst` (straight alpha, opaque destination)
    #[inline]
    fn over(self, dst: Rgba, opacity: f32) -> Rgba {
        let alpha = (self.a as f32 / 255.0) * opacity.clamp(0.0, 1.0);
        let mix = |s: u8, d: u8| (s as f32 * alpha + d as f32 * (1.0 - alpha)).round() as u8;
        Rgba {
            r: mix(self.r, dst.r),
            g: mix(self.g, dst.g),
            b: mix(self.b, dst.b),
            a: 255,
        }
    }
}

/// Fixed-size drawable surface, always fully opaque
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    background: Rgba,
    pixels: Vec<Rgba>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        Self {
            width,
            height,
            background,
            pixels: vec![background; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reallocate at the new size; contents are cleared to the background
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .resize((width as usize) * (height as usize), self.background);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Blend `color` at `opacity` over the whole canvas
    pub fn fill(&mut self, color: Rgba, opacity: f32) {
        for px in &mut self.pixels {
            *px = color.over(*px, opacity);
        }
    }

    /// Blend `color` over the rectangle, clipped to the canvas
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        let x0 = x.floor().max(0.0) as i64;
        let y0 = y.floor().max(0.0) as i64;
        let x1 = ((x + w).ceil() as i64).min(self.width as i64);
        let y1 = ((y + h).ceil() as i64).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let stride = self.width as usize;
        for row in y0 as usize..y1 as usize {
            let line = &mut self.pixels[row * stride..(row + 1) * stride];
            for px in &mut line[x0 as usize..x1 as usize] {
                *px = color.over(*px, 1.0);
            }
        }
    }

    /// Raw RGBA8 bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}
