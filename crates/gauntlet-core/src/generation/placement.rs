//! Bounded random scalars used throughout generation.
//!
//! Each helper consumes exactly one draw, so a seeded stream replays the same
//! layout as long as call order is unchanged.

use crate::backend::RandomStream;

/// Uniform in `[-range / 2, range / 2]`
pub fn rand_in_range_centered(rng: &mut impl RandomStream, range: f32) -> f32 {
    rng.rand() * range - range / 2.0
}

/// Uniform in `[min, max]`
pub fn rand_between(rng: &mut impl RandomStream, min: f32, max: f32) -> f32 {
    rng.rand() * (max - min) + min
}
