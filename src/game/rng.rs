use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of randomness used for food placement
///
/// Injected into the session so spawning stays deterministic under test.
pub trait RandomSource {
    /// Uniform index in `0..upper`. Callers never pass zero.
    fn index(&mut self, upper: usize) -> usize;
}

/// Seedable default random source
pub struct SessionRng {
    rng: StdRng,
    seed: u64,
}

impl SessionRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_random() -> Self {
        let seed: u64 = rand::thread_rng().gen();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SessionRng {
    fn index(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper)
    }
}
