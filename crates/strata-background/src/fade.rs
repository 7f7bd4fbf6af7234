//! Scroll-driven opacity curves shared by the layers.

/// Scroll distance over which the particle layer fades out completely.
pub const PARTICLE_FADE_DISTANCE: f64 = 600.0;

/// Scroll offset where drones start fading in, and how long the ramp is.
pub const DRONE_FADE_START: f64 = 800.0;
pub const DRONE_FADE_DURATION: f64 = 400.0;

pub const STRATA_FADE_START: f64 = 100.0;
pub const STRATA_FADE_DURATION: f64 = 800.0;

pub const TOPOGRAPHY_FADE_START: f64 = 300.0;
pub const TOPOGRAPHY_FADE_DURATION: f64 = 800.0;

/// Fraction of the scrollable distance where the geoid begins to appear
/// and everything else begins to disappear.
pub const GEOID_START: f64 = 0.6;
/// Fraction of the scrollable distance the geoid takes to reach full opacity.
pub const GEOID_FADE_SPAN: f64 = 0.4;
/// Fraction of the scrollable distance the other layers take to vanish.
pub const FADE_OUT_SPAN: f64 = 0.35;

/// Linear ramp from 0 at `start` to 1 at `start + duration`, clamped.
///
/// Returns exactly 0 at or below `start` and exactly 1 at or beyond the end,
/// including when `duration` is zero.
pub fn ramp(value: f64, start: f64, duration: f64) -> f64 {
    if value <= start {
        0.0
    } else if duration <= 0.0 || value >= start + duration {
        1.0
    } else {
        (value - start) / duration
    }
}

/// Opacity of the particle layer: 1 at the top of the page, 0 after 600 units.
pub fn particle_opacity(scroll: f64) -> f64 {
    1.0 - ramp(scroll, 0.0, PARTICLE_FADE_DISTANCE)
}

pub fn drone_fade_in(scroll: f64) -> f64 {
    ramp(scroll, DRONE_FADE_START, DRONE_FADE_DURATION)
}

pub fn strata_fade_in(scroll: f64) -> f64 {
    ramp(scroll, STRATA_FADE_START, STRATA_FADE_DURATION)
}

pub fn topography_fade_in(scroll: f64) -> f64 {
    ramp(scroll, TOPOGRAPHY_FADE_START, TOPOGRAPHY_FADE_DURATION)
}

/// Fade-out fraction shared by the drones and terrain layers.
///
/// 1 until 60% of the scrollable distance, then falls linearly to 0 over
/// the next 35%.
pub fn fade_out_fraction(scroll: f64, scrollable: f64) -> f64 {
    let scrollable = scrollable.max(0.0);
    1.0 - ramp(scroll, scrollable * GEOID_START, scrollable * FADE_OUT_SPAN)
}

/// Geoid opacity, or `None` while the geoid must not be drawn at all.
pub fn geoid_fade(scroll: f64, scrollable: f64) -> Option<f64> {
    let scrollable = scrollable.max(0.0);
    let start = scrollable * GEOID_START;
    if scroll < start {
        return None;
    }
    let fade = ramp(scroll, start, scrollable * GEOID_FADE_SPAN);
    (fade > 0.0).then_some(fade)
}
