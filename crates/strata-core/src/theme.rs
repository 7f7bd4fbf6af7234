//! User-selectable appearance and pacing settings.

use std::str::FromStr;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Color theme for the background and status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    #[default]
    Cyan,
    Green,
    Magenta,
    Yellow,
    Red,
    Blue,
    White,
}

impl ColorTheme {
    /// Cycle to the next color theme.
    pub fn next(self) -> Self {
        match self {
            ColorTheme::Cyan => ColorTheme::Green,
            ColorTheme::Green => ColorTheme::Magenta,
            ColorTheme::Magenta => ColorTheme::Yellow,
            ColorTheme::Yellow => ColorTheme::Red,
            ColorTheme::Red => ColorTheme::Blue,
            ColorTheme::Blue => ColorTheme::White,
            ColorTheme::White => ColorTheme::Cyan,
        }
    }

    /// Accent hue in degrees, `None` for the achromatic theme.
    pub fn hue(self) -> Option<f32> {
        match self {
            ColorTheme::Cyan => Some(180.0),
            ColorTheme::Green => Some(120.0),
            ColorTheme::Magenta => Some(300.0),
            ColorTheme::Yellow => Some(50.0),
            ColorTheme::Red => Some(0.0),
            ColorTheme::Blue => Some(225.0),
            ColorTheme::White => None,
        }
    }

    /// Convert theme to a ratatui color for text.
    pub fn color(self) -> Color {
        match self {
            ColorTheme::Cyan => Color::Cyan,
            ColorTheme::Green => Color::Green,
            ColorTheme::Magenta => Color::Magenta,
            ColorTheme::Yellow => Color::Yellow,
            ColorTheme::Red => Color::Red,
            ColorTheme::Blue => Color::Blue,
            ColorTheme::White => Color::White,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorTheme::Cyan => "cyan",
            ColorTheme::Green => "green",
            ColorTheme::Magenta => "magenta",
            ColorTheme::Yellow => "yellow",
            ColorTheme::Red => "red",
            ColorTheme::Blue => "blue",
            ColorTheme::White => "white",
        }
    }
}

impl FromStr for ColorTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut theme = ColorTheme::default();
        loop {
            if theme.name().eq_ignore_ascii_case(s) {
                return Ok(theme);
            }
            theme = theme.next();
            if theme == ColorTheme::default() {
                return Err(format!("unknown color theme `{s}`"));
            }
        }
    }
}

/// Animation pacing. Each frame advances the time accumulator by a fixed step,
/// so the effective speed also depends on the frame rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl AnimationSpeed {
    /// Time units added to the accumulator per frame.
    pub fn time_step(self) -> f64 {
        match self {
            AnimationSpeed::Slow => 0.005,
            AnimationSpeed::Medium => 0.01,
            AnimationSpeed::Fast => 0.02,
        }
    }

    pub fn next(self) -> Self {
        match self {
            AnimationSpeed::Slow => AnimationSpeed::Medium,
            AnimationSpeed::Medium => AnimationSpeed::Fast,
            AnimationSpeed::Fast => AnimationSpeed::Slow,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AnimationSpeed::Slow => "slow",
            AnimationSpeed::Medium => "medium",
            AnimationSpeed::Fast => "fast",
        }
    }
}

impl FromStr for AnimationSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slow" => Ok(AnimationSpeed::Slow),
            "medium" => Ok(AnimationSpeed::Medium),
            "fast" => Ok(AnimationSpeed::Fast),
            _ => Err(format!("unknown animation speed `{s}`")),
        }
    }
}

/// Which background layers are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layers {
    pub particles: bool,
    pub strata: bool,
    pub topography: bool,
    pub drones: bool,
    pub geoid: bool,
}

impl Default for Layers {
    fn default() -> Self {
        Self {
            particles: true,
            strata: true,
            topography: true,
            drones: true,
            geoid: true,
        }
    }
}
