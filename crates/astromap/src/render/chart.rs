use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut};

use crate::config::ChartConfig;
use crate::error::RenderError;
use crate::sky::ProjectedStarSet;

const STAR_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BORDER_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

const POINTS_PER_INCH: f64 = 72.0;

/// Draws projected stars as white markers on a transparent square canvas
/// whose inscribed circle is the horizon.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    side: u32,
    dpi: u32,
}

impl ChartRenderer {
    pub fn new(side: u32, dpi: u32) -> Self {
        Self { side, dpi }
    }

    pub fn from_config(config: &ChartConfig) -> Self {
        Self::new(config.canvas_side(), config.dpi)
    }

    fn pixels_per_point(&self) -> f64 {
        f64::from(self.dpi) / POINTS_PER_INCH
    }

    /// Marker radius in pixels. `marker_size` is an area in points², the
    /// point marker's diameter is half its square root.
    pub fn marker_radius(&self, marker_size: f64) -> f64 {
        0.25 * marker_size.max(0.0).sqrt() * self.pixels_per_point()
    }

    pub fn render(&self, stars: &ProjectedStarSet) -> Result<RgbaImage, RenderError> {
        let _span = tracing::info_span!("render.chart", stars = stars.len()).entered();

        if self.side < 3 {
            return Err(RenderError::InvalidCanvas { side: self.side });
        }

        let mut canvas = RgbaImage::from_pixel(self.side, self.side, TRANSPARENT);
        let center = f64::from(self.side - 1) / 2.0;
        let horizon = center;

        for star in &stars.stars {
            let r2 = star.x * star.x + star.y * star.y;
            if !(r2 <= 1.0) {
                continue;
            }

            let px = center + star.x * horizon;
            let py = center - star.y * horizon;
            let radius = self.marker_radius(star.marker_size);

            if radius >= 1.0 {
                draw_filled_circle_mut(
                    &mut canvas,
                    (px.round() as i32, py.round() as i32),
                    radius.round() as i32,
                    STAR_COLOR,
                );
            } else {
                let coverage = (std::f64::consts::PI * radius * radius).min(1.0);
                blend_pixel(&mut canvas, px.round() as u32, py.round() as u32, coverage);
            }
        }

        clip_to_horizon(&mut canvas, center, horizon);

        let border = self.pixels_per_point().max(1.0).round() as i32;
        let outer = horizon.floor() as i32;
        for offset in 0..border {
            draw_hollow_circle_mut(
                &mut canvas,
                (center.round() as i32, center.round() as i32),
                outer - offset,
                BORDER_COLOR,
            );
        }

        log::debug!("Rendered {} stars on a {}px canvas", stars.len(), self.side);
        Ok(canvas)
    }
}

/// Accumulates white coverage onto a pixel, keeping the colour white.
fn blend_pixel(canvas: &mut RgbaImage, x: u32, y: u32, coverage: f64) {
    if x >= canvas.width() || y >= canvas.height() {
        return;
    }
    let pixel = canvas.get_pixel_mut(x, y);
    let existing = f64::from(pixel[3]) / 255.0;
    let alpha = coverage + existing * (1.0 - coverage);
    *pixel = Rgba([255, 255, 255, (alpha * 255.0).round() as u8]);
}

fn clip_to_horizon(canvas: &mut RgbaImage, center: f64, horizon: f64) {
    let limit = (horizon + 0.5) * (horizon + 0.5);
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let dx = f64::from(x) - center;
        let dy = f64::from(y) - center;
        if dx * dx + dy * dy > limit {
            *pixel = TRANSPARENT;
        }
    }
}
