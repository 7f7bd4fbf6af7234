//! Color utility functions for background animations.

use ratatui::style::Color;
use strata_core::{ColorTheme, Rgba};

/// Gain curve applied to alpha before blending onto the terminal background.
/// A cell grid cannot stack translucent strokes, so faint ones are lifted.
const TERMINAL_ALPHA_GAMMA: f64 = 0.5;

/// Colors used by the layers for one theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Particle discs and links.
    pub particle: Rgba,
    /// Strata, contours, drones and the geoid.
    pub accent: Rgba,
}

impl Palette {
    pub fn for_theme(theme: ColorTheme) -> Self {
        match theme.hue() {
            Some(hue) => Self {
                particle: hsl_to_rgb(hue + 30.0, 1.0, 0.7),
                accent: hsl_to_rgb(hue, 1.0, 0.5),
            },
            None => Self {
                particle: hsl_to_rgb(0.0, 0.0, 0.75),
                accent: hsl_to_rgb(0.0, 0.0, 0.95),
            },
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::for_theme(ColorTheme::default())
    }
}

/// Flatten a translucent color onto a black terminal background.
pub fn to_terminal_color(color: Rgba) -> Color {
    let gain = color.a.clamp(0.0, 1.0).powf(TERMINAL_ALPHA_GAMMA);
    let scale = |c: u8| (c as f64 * gain).round() as u8;
    Color::Rgb(scale(color.r), scale(color.g), scale(color.b))
}

/// Convert HSL to an opaque RGB color. Hue in degrees, wraps.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgba {
    if s == 0.0 {
        let v = (l * 255.0) as u8;
        return Rgba::rgb(v, v, v);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let h = h.rem_euclid(360.0) / 360.0;

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    Rgba::rgb(
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
