use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Uniformly random permutation of `items` (Fisher-Yates).
///
/// Empty and single-element inputs come back unchanged.
pub fn permute<T, R: Rng + ?Sized>(mut items: Vec<T>, rng: &mut R) -> Vec<T> {
    if items.len() > 1 {
        items.as_mut_slice().shuffle(rng);
    }
    items
}

/// Session-local random source for presentation order.
#[derive(Debug, Clone)]
pub struct Shuffler {
    rng: StdRng,
}

impl Shuffler {
    /// Reproducible shuffles, mainly for tests.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded from the thread-local generator.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn permute<T>(&mut self, items: Vec<T>) -> Vec<T> {
        permute(items, &mut self.rng)
    }
}

impl Default for Shuffler {
    fn default() -> Self {
        Self::from_entropy()
    }
}
