//! The galaxy point generator
//!
//! Maps a validated [`GenerationParameters`] snapshot to a fresh
//! [`PointBuffer`]. The generator is pure: it never touches GPU state and
//! is deterministic for a given randomness source, which is what makes
//! golden-buffer tests possible.
//!
//! Points are arranged along `branches` spiral arms. Radial distance is
//! sampled uniformly on `[0, radius)`, deliberately not area-uniform, so
//! density rises towards the core like a real galactic bulge. Each point is
//! then scattered off its arm by a powered random offset; higher
//! `randomness_power` concentrates points near the arm line.

use crate::buffer::PointBuffer;
use crate::params::GenerationParameters;
use crate::Result;
use glam::Vec3;
use std::f32::consts::TAU;

/// Source of uniform random values in [0, 1)
///
/// Production code uses [`rand::rng`] through the blanket impl below; tests
/// inject a fixed sequence to make generated buffers reproducible.
pub trait RandomSource {
    /// Next uniform value in [0, 1)
    fn next_unit(&mut self) -> f32;
}

impl<R: rand::Rng> RandomSource for R {
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Generate a point cloud using the thread-local RNG
pub fn generate(params: &GenerationParameters) -> Result<PointBuffer> {
    generate_with(params, &mut rand::rng())
}

/// Generate a point cloud from an explicit randomness source
///
/// Draw order per point is fixed (radial distance, then magnitude and sign
/// per axis, then scale) so seeded runs reproduce exactly.
pub fn generate_with(
    params: &GenerationParameters,
    rng: &mut impl RandomSource,
) -> Result<PointBuffer> {
    params.validate()?;

    let mut buffer = PointBuffer::with_capacity(params.count as usize);
    let branches = params.branches as f32;

    for i in 0..params.count {
        let branch_angle = (i % params.branches) as f32 / branches * TAU;
        let radial = rng.next_unit() * params.radius;

        let offset = Vec3::new(
            axis_offset(rng, params, radial),
            axis_offset(rng, params, radial),
            axis_offset(rng, params, radial),
        );

        let position = Vec3::new(
            branch_angle.cos() * radial,
            0.0,
            branch_angle.sin() * radial,
        ) + offset;

        let t = (radial / params.radius).clamp(0.0, 1.0);
        let color = params.inside_color.lerp(params.outside_color, t);

        let scale = rng.next_unit();

        buffer.push(position, color, scale);
    }

    debug_assert!(buffer.is_consistent());
    Ok(buffer)
}

/// Signed scatter for one axis: `u^power * sign * randomness * radial`
///
/// The power draw shapes the falloff (offsets cluster near zero), the sign
/// draw mirrors it, and scaling by `radial` keeps the scatter proportional
/// to distance from the core.
fn axis_offset(rng: &mut impl RandomSource, params: &GenerationParameters, radial: f32) -> f32 {
    let magnitude = rng.next_unit().powf(params.randomness_power);
    let sign = if rng.next_unit() < 0.5 { 1.0 } else { -1.0 };
    magnitude * sign * params.randomness * radial
}
