//! Background starfield

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_STAR_COUNT: usize = 400;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: DVec3,
    /// 0..1
    pub brightness: f32,
}

/// Stars scattered on a shell around the origin, well outside any orbit
pub fn generate_stars(count: usize, seed: u64) -> Vec<Star> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let radius = rng.gen_range(300.0..400.0);
            // Uniform on the sphere
            let u: f64 = rng.gen_range(-1.0..1.0);
            let theta: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
            let r_xy = (1.0 - u * u).sqrt();
            Star {
                position: DVec3::new(r_xy * theta.cos(), u, r_xy * theta.sin()) * radius,
                brightness: rng.gen_range(0.3..1.0),
            }
        })
        .collect()
}
