//! Per-pixel random number streams.
//!
//! Every pixel owns a ChaCha8 generator. All generators share one seed and
//! differ by stream id, so they are independent, reproducible and keep
//! their state from one accumulation pass to the next.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform f64 in [0, 1).
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen()
}

/// One random stream per pixel, indexed `x + y * size_x`.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    size_x: usize,
    size_y: usize,
    generators: Vec<ChaCha8Rng>,
}

impl RandomGenerator {
    pub fn new(size_x: usize, size_y: usize, seed: u64) -> Self {
        let generators = (0..size_x * size_y)
            .map(|index| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(index as u64);
                rng
            })
            .collect();

        Self {
            size_x,
            size_y,
            generators,
        }
    }

    pub fn size_x(&self) -> usize {
        self.size_x
    }

    pub fn size_y(&self) -> usize {
        self.size_y
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Stream for pixel (x, y).
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut ChaCha8Rng {
        &mut self.generators[x + y * self.size_x]
    }

    pub fn generators_mut(&mut self) -> &mut [ChaCha8Rng] {
        &mut self.generators
    }
}
