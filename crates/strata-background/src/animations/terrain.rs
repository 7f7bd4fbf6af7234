//! Noise-driven line fields: geological strata and topographic contours (stateless).

use strata_core::{FrameState, Point, Rgba, Surface};

use crate::fade::{strata_fade_in, topography_fade_in};
use crate::noise::NoiseField;

/// Number of strata bands.
pub const STRATA_BANDS: usize = 30;
/// Number of contour lines.
pub const CONTOUR_LINES: usize = 15;

const STRATA_STEP: f64 = 10.0;
const STRATA_SCALE: f64 = 0.0015;
const STRATA_AMPLITUDE: f64 = 80.0;
/// Strata phase advances at this fraction of elapsed time.
const STRATA_TIME_RATE: f64 = 0.2;

const CONTOUR_STEP: f64 = 5.0;
const CONTOUR_SCALE: f64 = 0.002;
/// Contour phase advances with scroll, not time.
const CONTOUR_SCROLL_RATE: f64 = 0.0005;

/// Horizontal bands that bend with slowly evolving noise.
pub fn draw_strata(
    surface: &mut dyn Surface,
    noise: &NoiseField,
    frame: &FrameState,
    fade_out: f64,
    color: Rgba,
) {
    let opacity = strata_fade_in(frame.scroll) * fade_out;
    if opacity <= 0.0 {
        return;
    }

    let width = frame.viewport.width;
    let height = frame.viewport.height;
    let phase = frame.time * STRATA_TIME_RATE;
    let line_opacity = opacity * 0.15;
    let mut points = Vec::new();

    for band in 0..STRATA_BANDS {
        let i = band as f64;
        let alpha = line_opacity * (0.5 + (i * 0.5 + phase).sin() * 0.5);
        if alpha <= 0.0 {
            continue;
        }

        // Bands span 1.5x the viewport height, centred on it.
        let base_y = (i / STRATA_BANDS as f64) * height * 1.5 - height * 0.25;

        points.clear();
        let mut x = -STRATA_STEP;
        while x < width + STRATA_STEP {
            let n = noise.evaluate(x * STRATA_SCALE, base_y * STRATA_SCALE, phase + i * 0.1);
            points.push(Point::new(x, base_y + n * STRATA_AMPLITUDE));
            x += STRATA_STEP;
        }
        surface.stroke_path(&points, false, color.with_alpha(alpha), 1.5);
    }
}

/// Contour lines whose shape shifts as the page scrolls.
pub fn draw_topography(
    surface: &mut dyn Surface,
    noise: &NoiseField,
    frame: &FrameState,
    fade_out: f64,
    color: Rgba,
) {
    let opacity = topography_fade_in(frame.scroll) * fade_out;
    if opacity <= 0.0 {
        return;
    }

    let width = frame.viewport.width;
    let height = frame.viewport.height;
    let phase = frame.scroll * CONTOUR_SCROLL_RATE;
    let stroke = color.with_alpha(opacity * 0.25);
    let mut points = Vec::new();

    for line in 0..CONTOUR_LINES {
        let row = line as f64 / CONTOUR_LINES as f64 * 5.0;

        points.clear();
        let mut x = 0.0;
        while x < width {
            let n = noise.evaluate(x * CONTOUR_SCALE, row, phase);
            points.push(Point::new(x, n * height * 0.4 + height * 0.5));
            x += CONTOUR_STEP;
        }
        surface.stroke_path(&points, false, stroke, 0.5);
    }
}
