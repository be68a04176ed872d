//! Spiral galaxy particle field generator.
//!
//! Distributes points along `branch_count` evenly spaced arms. Each point
//! sits at a random distance from the center, is twisted by `spin` in
//! proportion to that distance, and is pushed off the arm by a per-axis
//! jitter whose spread is controlled by `randomness_power`. Colors fade
//! linearly from the inner color at the center to the outer color at the rim.

use crate::config::ParticleFieldParameters;
use crate::error::BackdropError;
use crate::prng::RandomSource;
use glam::Vec3;
use std::f64::consts::TAU;

/// Positions and colors of a generated point cloud, index-aligned.
///
/// Built once and never mutated: the visible rotation is a transform on the
/// whole cloud.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleBuffer {
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
}

impl ParticleBuffer {
    /// Builds a buffer from explicit points.
    ///
    /// Returns `BackdropError::InvalidParameter` if the two slices differ in
    /// length.
    pub fn from_parts(positions: Vec<Vec3>, colors: Vec<Vec3>) -> Result<Self, BackdropError> {
        if positions.len() != colors.len() {
            return Err(BackdropError::InvalidParameter {
                name: "colors".into(),
                reason: format!("{} colors for {} positions", colors.len(), positions.len()),
            });
        }
        Ok(Self { positions, colors })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True for a zero-count field.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Point positions in model space, in generation order.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Linear-interpolated RGB per point, channels in [0, 1].
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Iterates `(position, color)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.positions.iter().copied().zip(self.colors.iter().copied())
    }
}

/// Angle of the arm point `index` belongs to.
///
/// Arms are assigned by index residue rather than by a random draw, so
/// consecutive points cycle through every arm. A `branch_count` of 0 is
/// treated as a single arm.
pub fn branch_angle(index: usize, branch_count: usize) -> f64 {
    let branches = branch_count.max(1);
    (index % branches) as f64 / branches as f64 * TAU
}

/// Signed jitter in (-1, 1): a uniform draw raised to `power`, with a random sign.
fn jitter(rng: &mut impl RandomSource, power: f64) -> f64 {
    rng.next_f64().powf(power) * rng.next_sign()
}

/// Generates `params.count` points.
///
/// Not seeded internally: the field only repeats if `rng` does.
pub fn generate(params: &ParticleFieldParameters, rng: &mut impl RandomSource) -> ParticleBuffer {
    let mut positions = Vec::with_capacity(params.count);
    let mut colors = Vec::with_capacity(params.count);

    for i in 0..params.count {
        let r = rng.next_f64() * params.radius;
        let angle = branch_angle(i, params.branch_count) + r * params.spin;

        let jx = jitter(rng, params.randomness_power);
        let jy = jitter(rng, params.randomness_power);
        let jz = jitter(rng, params.randomness_power);

        positions.push(Vec3::new(
            (angle.cos() * r + jx) as f32,
            (jy * params.vertical_flatten) as f32,
            (angle.sin() * r + jz) as f32,
        ));

        let t = if params.radius > 0.0 { r / params.radius } else { 0.0 };
        colors.push(params.inner_color.lerp(params.outer_color, t).to_vec3());
    }

    log::debug!(
        "generated particle field: {} points, {} arms, radius {}",
        params.count,
        params.branch_count,
        params.radius
    );

    ParticleBuffer { positions, colors }
}
