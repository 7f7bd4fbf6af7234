//! Upward-drifting drone glyphs (stateful, recycled in place).

use rand::Rng;
use strata_core::{FrameState, Point, Rgba, Surface, Viewport};

use crate::fade::drone_fade_in;

/// Fixed swarm size.
pub const DRONE_COUNT: usize = 7;
/// How far a drone may leave the viewport before it is recycled.
pub const RECYCLE_MARGIN: f64 = 30.0;
/// Height of the band below the viewport where drones respawn.
pub const SPAWN_BAND: f64 = 100.0;

/// Glyph variant, chosen once per drone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DroneKind {
    /// Fuselage with four swept wings.
    Cross,
    /// Closed arrowhead polygon.
    Chevron,
}

/// State for a single drone.
#[derive(Debug, Clone, PartialEq)]
pub struct Drone {
    pub position: Point,
    /// Half-span of the glyph.
    pub size: f64,
    pub velocity: Point,
    pub opacity: f64,
    pub kind: DroneKind,
}

/// A fixed arena of drones addressed by index.
#[derive(Debug, Clone, Default)]
pub struct DroneSwarm {
    drones: Vec<Drone>,
}

impl DroneSwarm {
    /// Create [`DRONE_COUNT`] drones waiting below the viewport.
    pub fn spawn<R: Rng + ?Sized>(viewport: Viewport, rng: &mut R) -> Self {
        let drones = (0..DRONE_COUNT)
            .map(|_| Drone {
                position: spawn_position(viewport, rng),
                size: rng.gen_range(10.0..25.0),
                velocity: Point::new(rng.gen_range(-0.5..0.5), -rng.gen_range(0.8..2.3)),
                opacity: 0.0,
                kind: if rng.gen_bool(0.5) {
                    DroneKind::Cross
                } else {
                    DroneKind::Chevron
                },
            })
            .collect();
        Self { drones }
    }

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    pub fn len(&self) -> usize {
        self.drones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drones.is_empty()
    }

    /// Send drone `index` back to the spawn band, fully transparent.
    ///
    /// Size, velocity and kind are kept.
    pub fn reset<R: Rng + ?Sized>(&mut self, index: usize, viewport: Viewport, rng: &mut R) {
        if let Some(drone) = self.drones.get_mut(index) {
            drone.position = spawn_position(viewport, rng);
            drone.opacity = 0.0;
        }
    }

    /// Move every drone, recompute its opacity and recycle the ones that left.
    pub fn update<R: Rng + ?Sized>(&mut self, frame: &FrameState, fade_out: f64, rng: &mut R) {
        let viewport = frame.viewport;
        let opacity = drone_fade_in(frame.scroll) * fade_out;

        for index in 0..self.drones.len() {
            let drone = &mut self.drones[index];
            drone.position = drone.position + drone.velocity;
            drone.opacity = opacity;

            let p = drone.position;
            if p.y < -RECYCLE_MARGIN
                || p.x < -RECYCLE_MARGIN
                || p.x > viewport.width + RECYCLE_MARGIN
            {
                self.reset(index, viewport, rng);
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface, color: Rgba) {
        for drone in &self.drones {
            draw_drone(surface, drone, color);
        }
    }
}

fn spawn_position<R: Rng + ?Sized>(viewport: Viewport, rng: &mut R) -> Point {
    Point::new(
        rng.gen_range(0.0..viewport.width.max(1.0)),
        viewport.height + rng.gen_range(0.0..SPAWN_BAND),
    )
}

fn draw_drone(surface: &mut dyn Surface, drone: &Drone, color: Rgba) {
    if drone.opacity <= 0.0 {
        return;
    }

    let stroke = color.with_alpha(drone.opacity * 0.9);
    let s = drone.size;
    let at = |dx: f64, dy: f64| drone.position + Point::new(dx, dy);

    match drone.kind {
        DroneKind::Cross => {
            surface.stroke_line(at(0.0, -s * 0.8), at(0.0, s * 0.8), stroke, 1.5);
            for (root, tip_y) in [(-0.2, -1.0), (0.2, 1.0)] {
                for tip_x in [-1.0, 1.0] {
                    surface.stroke_line(at(0.0, s * root), at(s * tip_x, s * tip_y), stroke, 1.5);
                }
            }
        }
        DroneKind::Chevron => {
            let outline = [at(0.0, -s), at(s, s), at(0.0, s * 0.5), at(-s, s)];
            surface.stroke_path(&outline, true, stroke, 1.5);
            surface.fill_polygon(&outline, color.with_alpha(drone.opacity * 0.25));
        }
    }
}
