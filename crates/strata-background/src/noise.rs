//! Seeded 3D gradient noise (improved Perlin noise).

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Number of distinct lattice coordinates before the field repeats.
const PERIOD: usize = 256;

/// A 3D gradient-noise field backed by a shuffled permutation table.
///
/// The table is built once and never changes, so [`NoiseField::evaluate`]
/// is a pure function of its arguments.
#[derive(Debug, Clone)]
pub struct NoiseField {
    /// Permutation of `0..256` stored twice so `perm[i + 1]` never needs a wrap.
    perm: [u8; PERIOD * 2],
}

impl NoiseField {
    /// Build a field with a permutation shuffled by `rng`.
    pub fn new<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        table.shuffle(rng);

        let mut perm = [0u8; PERIOD * 2];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i % PERIOD];
        }
        Self { perm }
    }

    /// Build a reproducible field from a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(&mut StdRng::seed_from_u64(seed))
    }

    /// Sample the field. Output lies in roughly `[-1, 1]` and is exactly 0 on
    /// integer lattice points.
    pub fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        let (xi, xf) = split(x);
        let (yi, yf) = split(y);
        let (zi, zf) = split(z);

        let u = fade(xf);
        let v = fade(yf);
        let w = fade(zf);

        let p = |i: usize| self.perm[i] as usize;
        let a = p(xi) + yi;
        let aa = p(a) + zi;
        let ab = p(a + 1) + zi;
        let b = p(xi + 1) + yi;
        let ba = p(b) + zi;
        let bb = p(b + 1) + zi;

        lerp(
            w,
            lerp(
                v,
                lerp(u, grad(p(aa), xf, yf, zf), grad(p(ba), xf - 1.0, yf, zf)),
                lerp(
                    u,
                    grad(p(ab), xf, yf - 1.0, zf),
                    grad(p(bb), xf - 1.0, yf - 1.0, zf),
                ),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad(p(aa + 1), xf, yf, zf - 1.0),
                    grad(p(ba + 1), xf - 1.0, yf, zf - 1.0),
                ),
                lerp(
                    u,
                    grad(p(ab + 1), xf, yf - 1.0, zf - 1.0),
                    grad(p(bb + 1), xf - 1.0, yf - 1.0, zf - 1.0),
                ),
            ),
        )
    }
}

/// Split a coordinate into its wrapped lattice cell and the offset inside it.
fn split(v: f64) -> (usize, f64) {
    let floor = v.floor();
    // Two's-complement masking keeps negative cells in 0..256.
    let cell = (floor as i64 & (PERIOD as i64 - 1)) as usize;
    (cell, v - floor)
}

/// Quintic smoothing curve `6t^5 - 15t^4 + 10t^3`.
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product with one of 12 edge-midpoint gradients picked by the low hash bits.
fn grad(hash: usize, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}
