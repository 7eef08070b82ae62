#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Uniform target placement for Goblin Hunt boards.

use goblin_hunt_core::{BoardGeometry, CellIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Samples a cell uniformly from `[0, size²)` using the provided generator.
///
/// Every call is independent of previous ones; repeats are allowed.
pub fn generate<R>(rng: &mut R, geometry: BoardGeometry) -> CellIndex
where
    R: Rng + ?Sized,
{
    CellIndex::new(rng.gen_range(0..geometry.cell_count()))
}

/// Source of target positions backed by a seedable ChaCha stream.
#[derive(Clone, Debug)]
pub struct PositionGenerator {
    rng: ChaCha8Rng,
}

impl PositionGenerator {
    /// Creates a generator whose sequence is fully determined by `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a generator seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Creates a seeded generator, or an entropy-seeded one when `seed` is absent.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::from_seed)
    }

    /// Produces the next target position for the board.
    pub fn generate(&mut self, geometry: BoardGeometry) -> CellIndex {
        generate(&mut self.rng, geometry)
    }
}
