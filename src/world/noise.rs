//! 2D noise sources for terrain height.
//!
//! The generator only needs a pure function of two coordinates, so anything
//! implementing [`NoiseSource`] works, including plain closures in tests.

use fastnoise_lite::{FastNoiseLite, NoiseType};

/// Deterministic 2D noise. Output is expected in roughly `[-1, 1]`.
pub trait NoiseSource: Send + Sync {
    fn noise_2d(&self, x: f32, z: f32) -> f32;
}

impl<F> NoiseSource for F
where
    F: Fn(f32, f32) -> f32 + Send + Sync,
{
    fn noise_2d(&self, x: f32, z: f32) -> f32 {
        self(x, z)
    }
}

/// OpenSimplex2 noise with unit frequency.
///
/// Frequency is left at 1.0 so the caller's own coordinate scale is the only
/// thing controlling feature size.
pub struct SimplexNoise {
    noise: FastNoiseLite,
    seed: u32,
}

impl SimplexNoise {
    pub fn new(seed: u32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed as i32);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(1.0));
        SimplexNoise { noise, seed }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl NoiseSource for SimplexNoise {
    fn noise_2d(&self, x: f32, z: f32) -> f32 {
        self.noise.get_noise_2d(x, z)
    }
}
