//! Drifting particle field with pointer repulsion and proximity links (stateful).

use rand::Rng;
use strata_core::{Point, Rgba, Surface, Viewport};

/// Pointer influence radius.
pub const INTERACTION_RADIUS: f64 = 150.0;
/// Particles closer than this are joined by a line.
pub const LINK_DISTANCE: f64 = 120.0;
/// How far past an edge a particle may travel before wrapping.
pub const WRAP_MARGIN: f64 = 10.0;
/// Viewport area per particle.
pub const AREA_PER_PARTICLE: f64 = 9000.0;
/// Upper bound on the population, whatever the viewport size.
pub const MAX_PARTICLES: usize = 1200;
/// Repulsion displacement per unit of particle radius at zero distance.
const REPULSION_STRENGTH: f64 = 5.0;

/// State for a single particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Point,
    /// Disc radius, also scales how hard the pointer pushes it.
    pub radius: f64,
    /// Constant drift per frame.
    pub velocity: Point,
}

impl Particle {
    fn random<R: Rng + ?Sized>(viewport: Viewport, rng: &mut R) -> Self {
        Self {
            position: Point::new(
                rng.gen_range(0.0..viewport.width.max(1.0)),
                rng.gen_range(0.0..viewport.height.max(1.0)),
            ),
            radius: rng.gen_range(1.0..3.0),
            velocity: Point::new(rng.gen_range(-0.2..0.2), rng.gen_range(-0.2..0.2)),
        }
    }

    /// Advance one frame: repulsion, drift, then toroidal wrap.
    ///
    /// Drift is added after the push, so near the rim of the interaction
    /// radius, where the push is weaker than the drift, a particle can still
    /// end the frame closer to the pointer.
    pub fn update(&mut self, pointer: Option<Point>, viewport: Viewport) {
        if let Some(pointer) = pointer {
            let away = self.position - pointer;
            let distance = away.length();
            if distance > 0.0 && distance < INTERACTION_RADIUS {
                let force = (INTERACTION_RADIUS - distance) / INTERACTION_RADIUS;
                let push = force * self.radius * REPULSION_STRENGTH / distance;
                self.position.x += away.x * push;
                self.position.y += away.y * push;
            }
        }

        self.position = self.position + self.velocity;
        self.position.x = wrap(self.position.x, viewport.width);
        self.position.y = wrap(self.position.y, viewport.height);
    }
}

/// Send a coordinate that left `[-margin, extent + margin]` to the opposite edge.
fn wrap(value: f64, extent: f64) -> f64 {
    if value > extent + WRAP_MARGIN {
        -WRAP_MARGIN
    } else if value < -WRAP_MARGIN {
        extent + WRAP_MARGIN
    } else {
        value
    }
}

/// Number of particles for a viewport, capped at [`MAX_PARTICLES`].
pub fn population_for(viewport: Viewport) -> usize {
    if viewport.is_empty() {
        return 0;
    }
    let count = (viewport.area() / AREA_PER_PARTICLE).round();
    if count >= MAX_PARTICLES as f64 {
        MAX_PARTICLES
    } else {
        count as usize
    }
}

/// The full particle population. Rebuilt wholesale on resize.
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Scatter a fresh population over the viewport.
    pub fn populate<R: Rng + ?Sized>(viewport: Viewport, rng: &mut R) -> Self {
        let particles = (0..population_for(viewport))
            .map(|_| Particle::random(viewport, rng))
            .collect();
        Self { particles }
    }

    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn update(&mut self, pointer: Option<Point>, viewport: Viewport) {
        for particle in &mut self.particles {
            particle.update(pointer, viewport);
        }
    }

    /// Draw discs, then a link for every unordered pair within [`LINK_DISTANCE`].
    ///
    /// Quadratic in the population, which stays bounded by viewport area.
    pub fn draw(&self, surface: &mut dyn Surface, opacity: f64, color: Rgba) {
        if opacity <= 0.0 {
            return;
        }

        let fill = color.with_alpha(opacity * 0.5);
        for particle in &self.particles {
            surface.fill_circle(particle.position, particle.radius, fill);
        }

        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let distance = a.position.distance(b.position);
                if distance < LINK_DISTANCE {
                    let alpha = (1.0 - distance / LINK_DISTANCE) * opacity;
                    surface.stroke_line(a.position, b.position, color.with_alpha(alpha), 0.5);
                }
            }
        }
    }
}
