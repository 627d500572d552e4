//! Per-pixel random number streams.
//!
//! Every pixel gets its own generator, seeded from the pixel index and the
//! current frame index. That keeps the parallel pixel loop free of shared
//! mutable state and makes whole renders reproducible: the same scene,
//! camera, settings and frame index always produce the same image.
//!
//! Two interchangeable strategies are offered. The fast path is a PCG
//! hash over a single `u32` of state; the slow path is the reference
//! generator from the `rand` crate. Both are uniform, so switching only
//! trades speed against generator quality, never correctness.

use lumen_math::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A per-pixel random stream.
pub enum PixelRng {
    /// PCG-hash generator, one u32 of state
    Fast(u32),
    /// Reference generator from `rand`
    Slow(SmallRng),
}

impl PixelRng {
    /// Seed a stream for one pixel of one frame.
    pub fn new(slow: bool, pixel_index: u32, frame_index: u32) -> Self {
        if slow {
            let seed = ((pixel_index as u64) << 32) | frame_index as u64;
            Self::Slow(SmallRng::seed_from_u64(seed))
        } else {
            // Decorrelate neighboring pixels and consecutive frames before
            // the first hash
            let seed = pixel_index
                .wrapping_mul(9781)
                .wrapping_add(frame_index.wrapping_mul(6271))
                | 1;
            Self::Fast(seed)
        }
    }

    /// Uniform sample in [0, 1).
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        match self {
            Self::Fast(state) => {
                *state = pcg_hash(*state);
                // Top 24 bits, so the result is exactly representable
                (*state >> 8) as f32 / (1u32 << 24) as f32
            }
            Self::Slow(rng) => rng.gen(),
        }
    }

    /// Uniform sample in [-1, 1).
    #[inline]
    pub fn next_signed_f32(&mut self) -> f32 {
        self.next_f32() * 2.0 - 1.0
    }

    /// Uniformly distributed unit vector on the sphere.
    ///
    /// Rejection sampling inside the unit cube, then normalize.
    pub fn unit_vector(&mut self) -> Vec3 {
        loop {
            let v = Vec3::new(
                self.next_signed_f32(),
                self.next_signed_f32(),
                self.next_signed_f32(),
            );
            let len_sq = v.length_squared();
            if len_sq > 1e-6 && len_sq <= 1.0 {
                return v / len_sq.sqrt();
            }
        }
    }
}

/// PCG hash (XSH-RR output permutation over an LCG step).
#[inline]
fn pcg_hash(input: u32) -> u32 {
    let state = input.wrapping_mul(747796405).wrapping_add(2891336453);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277803737);
    (word >> 22) ^ word
}
