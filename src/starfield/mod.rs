//! Starfield background: particles drifting right over a fading trail.

pub mod canvas;

pub use canvas::{Canvas, Rgba};

use glam::Vec2;

use crate::music::RandomSource;
use crate::params::{StarfieldParams, ValueRange};

/// A single particle (top-left corner of its square)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    /// Horizontal speed (pixels per frame)
    pub speed: f32,
}

/// Fixed-size particle set bound to a canvas size
pub struct Starfield {
    params: StarfieldParams,
    stars: Vec<Star>,
    size: Vec2,
}

impl Starfield {
    /// Scatter `params.star_count` stars uniformly over a `width` x `height` area
    pub fn new<R: RandomSource>(
        params: StarfieldParams,
        width: u32,
        height: u32,
        rng: &mut R,
    ) -> Self {
        let size = Vec2::new(width as f32, height as f32);
        let (min_speed, max_speed) = params.speed_px_per_frame;
        let speed = ValueRange::new(min_speed as f64, max_speed as f64);

        let stars = (0..params.star_count)
            .map(|_| Star {
                pos: Vec2::new(
                    (rng.next_unit() as f32) * size.x,
                    (rng.next_unit() as f32) * size.y,
                ),
                speed: rng.uniform(speed) as f32,
            })
            .collect();

        Self {
            params,
            stars,
            size,
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Canvas matching this starfield, cleared to the page background
    pub fn create_canvas(&self) -> Canvas {
        Canvas::new(
            self.size.x as u32,
            self.size.y as u32,
            Rgba::opaque(self.params.background_color),
        )
    }

    /// Adopt new dimensions; y is wrapped now, x wraps on the next step
    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = Vec2::new(width as f32, height as f32);
        for star in &mut self.stars {
            star.pos.y = wrap(star.pos.y, self.size.y);
        }
        log::debug!("Starfield resized to {}x{}", width, height);
    }

    /// Advance every star and paint one frame: trail fill, then the stars
    pub fn step_and_draw(&mut self, canvas: &mut Canvas) {
        canvas.fill(
            Rgba::opaque(self.params.trail_color),
            self.params.trail_alpha,
        );

        let star_color = Rgba::from_array(self.params.star_color);
        let side = self.params.star_size_px;
        for star in &mut self.stars {
            star.pos.x = wrap(star.pos.x + star.speed, self.size.x);
            canvas.fill_rect(star.pos.x, star.pos.y, side, side, star_color);
        }
    }
}

/// `value` modulo `extent`, kept in `[0, extent)`; zero extent pins to zero
fn wrap(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::{FixedRandom, SeededRandom};

    #[test]
    fn test_stars_start_inside_the_canvas() {
        let field = Starfield::new(
            StarfieldParams::default(),
            640,
            480,
            &mut SeededRandom::new(3),
        );
        assert_eq!(field.stars().len(), 100);
        for star in field.stars() {
            assert!(star.pos.x >= 0.0 && star.pos.x < 640.0);
            assert!(star.pos.y >= 0.0 && star.pos.y < 480.0);
            assert!(star.speed >= 1.0 && star.speed <= 4.0);
        }
    }

    #[test]
    fn test_star_wraps_around_right_edge() {
        let params = StarfieldParams {
            star_count: 1,
            ..StarfieldParams::default()
        };
        let mut field = Starfield::new(params, 10, 10, &mut FixedRandom::new(0.0));
        field.stars[0] = Star {
            pos: Vec2::new(9.0, 5.0),
            speed: 3.0,
        };
        let mut canvas = field.create_canvas();
        field.step_and_draw(&mut canvas);
        assert!((field.stars()[0].pos.x - 2.0).abs() < 1e-5);
        assert_eq!(canvas.pixel(2, 5), Some(Rgba::opaque([255, 255, 255])));
    }

    #[test]
    fn test_resize_keeps_stars_in_new_bounds() {
        let mut field = Starfield::new(
            StarfieldParams::default(),
            800,
            600,
            &mut SeededRandom::new(21),
        );
        field.resize(200, 100);
        let mut canvas = field.create_canvas();
        field.step_and_draw(&mut canvas);

        assert_eq!((canvas.width(), canvas.height()), (200, 100));
        for star in field.stars() {
            assert!(star.pos.x >= 0.0 && star.pos.x < 200.0);
            assert!(star.pos.y >= 0.0 && star.pos.y < 100.0);
        }
    }

    #[test]
    fn test_trail_fades_previous_frame() {
        let params = StarfieldParams {
            star_count: 1,
            ..StarfieldParams::default()
        };
        let mut field = Starfield::new(params, 20, 4, &mut FixedRandom::new(0.0));
        let mut canvas = field.create_canvas();
        field.step_and_draw(&mut canvas);
        let x = field.stars()[0].pos.x as u32;
        let lit = canvas.pixel(x, 0).unwrap();
        field.step_and_draw(&mut canvas);
        let faded = canvas.pixel(x, 0).unwrap();
        assert_eq!(lit.r, 255);
        assert!(faded.r < lit.r && faded.r > 24);
    }

    #[test]
    fn test_wrap_handles_degenerate_extent() {
        assert_eq!(wrap(5.0, 0.0), 0.0);
        assert!((wrap(-1.0, 4.0) - 3.0).abs() < 1e-6);
    }
}
