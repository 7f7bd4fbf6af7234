//! Rotating, noise-distorted wireframe geoid with orbiting satellites (stateless).
//!
//! The mesh is rebuilt from scratch every frame because the distortion is
//! time-varying. The origin sits at the bottom-left corner of the surface.

use std::f64::consts::{FRAC_PI_4, PI, TAU};

use glam::DVec3;
use strata_core::{FrameState, Point, Rgba, Surface};

use crate::fade::geoid_fade;
use crate::noise::NoiseField;

/// Latitude subdivisions; the grid has one more row than this.
pub const LAT_STEPS: usize = 40;
/// Longitude subdivisions; the grid has one more column than this.
pub const LON_STEPS: usize = 60;
pub const SATELLITES: usize = 5;

/// Sphere radius as a fraction of the viewport width.
const RADIUS_FRACTION: f64 = 0.9;
/// Maximum radial noise displacement as a fraction of the radius.
const DISTORTION_FRACTION: f64 = 0.05;
const NOISE_FREQUENCY: f64 = 2.5;
const NOISE_TIME_RATE: f64 = 0.1;
/// Vertical squash that turns the sphere into an ellipsoid.
const POLAR_SCALE: f64 = 0.95;
/// Points deeper than this fraction of the radius behind the centre are hidden.
const CULL_DEPTH: f64 = -0.5;

const SPIN_RATE: f64 = 0.05;
const TILT_PER_SCROLL: f64 = 0.0002;

/// Two composed rotations: spin about the vertical axis driven by time,
/// then tilt about the horizontal axis driven by scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    spin: (f64, f64),
    tilt: (f64, f64),
}

impl Rotation {
    pub fn new(spin: f64, tilt: f64) -> Self {
        Self {
            spin: spin.sin_cos(),
            tilt: tilt.sin_cos(),
        }
    }

    pub fn for_frame(frame: &FrameState) -> Self {
        Self::new(frame.time * SPIN_RATE, frame.scroll * TILT_PER_SCROLL)
    }

    pub fn apply(&self, p: DVec3) -> DVec3 {
        let (sin_s, cos_s) = self.spin;
        let (sin_t, cos_t) = self.tilt;

        let x = p.x * cos_s - p.z * sin_s;
        let z = p.x * sin_s + p.z * cos_s;

        let y = p.y * cos_t - z * sin_t;
        let z = p.y * sin_t + z * cos_t;

        DVec3::new(x, y, z)
    }
}

/// A rotated mesh vertex, dropped onto the screen plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Position relative to the geoid origin.
    pub position: Point,
    pub depth: f64,
    pub visible: bool,
}

/// The distorted latitude/longitude grid, `(LAT_STEPS + 1) x (LON_STEPS + 1)`.
pub fn build_mesh(noise: &NoiseField, time: f64, radius: f64) -> Vec<Vec<DVec3>> {
    let distortion = radius * DISTORTION_FRACTION;

    (0..=LAT_STEPS)
        .map(|i| {
            let lat = (i as f64 / LAT_STEPS as f64 - 0.5) * PI;
            (0..=LON_STEPS)
                .map(|j| {
                    let lon = j as f64 / LON_STEPS as f64 * TAU;
                    let unit = DVec3::new(lon.cos() * lat.cos(), lat.sin(), lon.sin() * lat.cos());
                    let n = noise.evaluate(
                        unit.x * NOISE_FREQUENCY,
                        unit.y * NOISE_FREQUENCY,
                        unit.z * NOISE_FREQUENCY + time * NOISE_TIME_RATE,
                    );
                    let r = radius + n * distortion;
                    DVec3::new(unit.x * r, unit.y * r * POLAR_SCALE, unit.z * r)
                })
                .collect()
        })
        .collect()
}

/// Rotate every vertex and mark the ones that survive the coarse depth cull.
pub fn project_mesh(mesh: &[Vec<DVec3>], rotation: &Rotation, radius: f64) -> Vec<Vec<Projected>> {
    let cull = radius * CULL_DEPTH;
    mesh.iter()
        .map(|row| {
            row.iter()
                .map(|&p| {
                    let r = rotation.apply(p);
                    Projected {
                        position: Point::new(r.x, r.y),
                        depth: r.z,
                        visible: r.z > cull,
                    }
                })
                .collect()
        })
        .collect()
}

/// A satellite after rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Satellite {
    pub position: Point,
    pub depth: f64,
    pub orbit_radius: f64,
}

impl Satellite {
    /// Grows linearly with depth; stands in for a perspective divide.
    pub fn scale(&self) -> f64 {
        (self.depth + self.orbit_radius) / (self.orbit_radius * 2.0)
    }
}

/// Position of satellite `index` at `time`, before the shared rotation.
fn orbit(index: usize, time: f64, radius: f64) -> (DVec3, f64) {
    let k = index as f64;
    let orbit_radius = radius * (0.8 + k * 0.05);
    let angle = time * (0.3 + k * 0.15) + k * 2.5;
    let inclination = FRAC_PI_4 * (k - 2.0);
    let p = DVec3::new(
        angle.cos() * orbit_radius,
        inclination.sin() * angle.cos() * orbit_radius,
        angle.sin() * orbit_radius,
    );
    (p, orbit_radius)
}

pub fn satellites(time: f64, rotation: &Rotation, radius: f64) -> Vec<Satellite> {
    (0..SATELLITES)
        .map(|index| {
            let (p, orbit_radius) = orbit(index, time, radius);
            let r = rotation.apply(p);
            Satellite {
                position: Point::new(r.x, r.y),
                depth: r.z,
                orbit_radius,
            }
        })
        .collect()
}

/// Draw the geoid if the page has been scrolled far enough.
///
/// Returns the opacity used, or `None` when nothing was drawn.
pub fn draw_geoid(
    surface: &mut dyn Surface,
    noise: &NoiseField,
    frame: &FrameState,
    color: Rgba,
) -> Option<f64> {
    let fade = geoid_fade(frame.scroll, frame.scrollable)?;

    let origin = Point::new(0.0, frame.viewport.height);
    let radius = frame.viewport.width * RADIUS_FRACTION;
    let rotation = Rotation::for_frame(frame);

    let mesh = build_mesh(noise, frame.time, radius);
    let projected = project_mesh(&mesh, &rotation, radius);

    // An edge with a hidden endpoint is skipped, leaving the mesh cut open.
    let stroke = color.with_alpha(fade * 0.5);
    for i in 0..LAT_STEPS {
        for j in 0..LON_STEPS {
            let p1 = projected[i][j];
            for p2 in [projected[i + 1][j], projected[i][j + 1]] {
                if p1.visible && p2.visible {
                    surface.stroke_line(origin + p1.position, origin + p2.position, stroke, 0.8);
                }
            }
        }
    }

    for satellite in satellites(frame.time, &rotation, radius) {
        if satellite.depth > 0.0 {
            let scale = satellite.scale();
            surface.fill_circle(
                origin + satellite.position,
                2.0 * scale,
                color.with_alpha(fade * (0.7 + scale * 0.3)),
            );
        }
    }

    Some(fade)
}
