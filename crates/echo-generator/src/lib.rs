//! Shuffle generation for the Echo sliding puzzle.
//!
//! [`ShuffleGenerator`] produces a randomized, never-solved [`GridState`].
//! Every shuffle is driven by a [`ShuffleSeed`]; the same seed, side, and
//! strategy always produce the same grid.
//!
//! # Strategies
//!
//! - [`ShuffleStrategy::RandomWalk`] (default) walks the blank randomly from the
//!   solved grid. The result is always solvable.
//! - [`ShuffleStrategy::UniformPermutation`] draws a uniformly random permutation
//!   and only rejects the identity. About half of these grids cannot be solved
//!   by legal moves; [`GeneratedShuffle::is_solvable`] reports which.
//!
//! # Examples
//!
//! ```
//! use echo_generator::{ShuffleGenerator, ShuffleStrategy};
//!
//! let generator = ShuffleGenerator::new(ShuffleStrategy::default());
//! let shuffle = generator.shuffle(3)?;
//! assert!(!shuffle.grid.is_solved());
//! assert!(shuffle.is_solvable());
//!
//! let again = generator.shuffle_with_seed(3, shuffle.seed)?;
//! assert_eq!(again.grid, shuffle.grid);
//! # Ok::<(), echo_core::GridError>(())
//! ```

use echo_core::{Direction, GridError, GridState};
use rand::{Rng as _, SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg64;
use sha2::{Digest as _, Sha256};

pub use self::seed::{SeedParseError, ShuffleSeed};

mod seed;

/// Number of blank moves a default random walk takes.
pub const DEFAULT_WALK_STEPS: usize = 200;

/// How a shuffle is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ShuffleStrategy {
    /// Uniform random permutation, re-drawn while it equals the identity.
    UniformPermutation,
    /// Random legal blank moves from the identity, never undoing the previous
    /// move, continued past `steps` while the grid is still solved.
    RandomWalk {
        /// Minimum number of moves.
        steps: usize,
    },
}

impl Default for ShuffleStrategy {
    fn default() -> Self {
        Self::RandomWalk {
            steps: DEFAULT_WALK_STEPS,
        }
    }
}

/// A shuffled grid together with the seed that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedShuffle {
    /// The shuffled grid. Never solved.
    pub grid: GridState,
    /// Seed that reproduces `grid`.
    pub seed: ShuffleSeed,
    /// Strategy that produced `grid`.
    pub strategy: ShuffleStrategy,
}

impl GeneratedShuffle {
    /// Returns whether the shuffled grid can be solved by legal moves.
    #[must_use]
    pub fn is_solvable(&self) -> bool {
        self.grid.is_solvable()
    }
}

/// Produces shuffled grids.
#[derive(Debug, Clone, Default)]
pub struct ShuffleGenerator {
    strategy: ShuffleStrategy,
}

impl ShuffleGenerator {
    /// Creates a generator using `strategy`.
    #[must_use]
    pub fn new(strategy: ShuffleStrategy) -> Self {
        Self { strategy }
    }

    /// Returns the configured strategy.
    #[must_use]
    pub fn strategy(&self) -> ShuffleStrategy {
        self.strategy
    }

    /// Shuffles a grid of the given side with a fresh random seed.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSide`] if `side` is unsupported.
    pub fn shuffle(&self, side: usize) -> Result<GeneratedShuffle, GridError> {
        self.shuffle_with_seed(side, ShuffleSeed::random())
    }

    /// Shuffles a grid of the given side deterministically from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSide`] if `side` is unsupported.
    pub fn shuffle_with_seed(
        &self,
        side: usize,
        seed: ShuffleSeed,
    ) -> Result<GeneratedShuffle, GridError> {
        let mut grid = GridState::solved(side)?;
        let mut rng = rng_for(seed, side);

        match self.strategy {
            ShuffleStrategy::UniformPermutation => {
                let mut cells = grid.cells().to_vec();
                while grid.is_solved() {
                    cells.shuffle(&mut rng);
                    grid = GridState::from_cells(side, cells.clone())?;
                }
            }
            ShuffleStrategy::RandomWalk { steps } => {
                let mut previous: Option<Direction> = None;
                let mut taken = 0;
                while taken < steps || grid.is_solved() {
                    let choices: Vec<Direction> = grid
                        .legal_moves()
                        .filter(|&dir| Some(dir.opposite()) != previous)
                        .collect();
                    let direction = choices[rng.random_range(0..choices.len())];
                    grid.apply(direction);
                    previous = Some(direction);
                    taken += 1;
                }
            }
        }

        log::debug!(
            "shuffled {side}x{side} grid with {:?} (seed {seed}, solvable: {})",
            self.strategy,
            grid.is_solvable()
        );
        Ok(GeneratedShuffle {
            grid,
            seed,
            strategy: self.strategy,
        })
    }
}

fn rng_for(seed: ShuffleSeed, side: usize) -> Pcg64 {
    let digest: [u8; 32] = Sha256::new()
        .chain_update(b"echo-shuffle")
        .chain_update(seed.as_bytes())
        .chain_update(side.to_le_bytes())
        .finalize()
        .into();
    Pcg64::from_seed(digest)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const SEED: &str = "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";

    fn seed() -> ShuffleSeed {
        SEED.parse().unwrap()
    }

    #[test]
    fn test_same_seed_same_grid() {
        for strategy in [
            ShuffleStrategy::UniformPermutation,
            ShuffleStrategy::default(),
        ] {
            let generator = ShuffleGenerator::new(strategy);
            assert_eq!(generator.strategy(), strategy);
            let a = generator.shuffle_with_seed(3, seed()).unwrap();
            let b = generator.shuffle_with_seed(3, seed()).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.seed, seed());
            assert_eq!(a.strategy, strategy);
        }
    }

    #[test]
    fn test_side_changes_the_stream() {
        let generator = ShuffleGenerator::default();
        let small = generator.shuffle_with_seed(3, seed()).unwrap();
        let large = generator.shuffle_with_seed(4, seed()).unwrap();
        assert_eq!(small.grid.side(), 3);
        assert_eq!(large.grid.side(), 4);
    }

    #[test]
    fn test_zero_step_walk_still_leaves_solved_state() {
        let generator = ShuffleGenerator::new(ShuffleStrategy::RandomWalk { steps: 0 });
        let shuffle = generator.shuffle_with_seed(2, seed()).unwrap();
        assert!(!shuffle.grid.is_solved());
        assert!(shuffle.is_solvable());
    }

    #[test]
    fn test_invalid_side() {
        let generator = ShuffleGenerator::default();
        assert_eq!(
            generator.shuffle(1),
            Err(GridError::InvalidSide { side: 1 })
        );
    }

    #[test]
    fn test_uniform_shuffles_include_unsolvable_grids() {
        let generator = ShuffleGenerator::new(ShuffleStrategy::UniformPermutation);
        let unsolvable = (0..64)
            .map(|i| {
                let mut bytes = [0; 32];
                bytes[0] = i;
                generator
                    .shuffle_with_seed(3, ShuffleSeed::from_bytes(bytes))
                    .unwrap()
            })
            .filter(|shuffle| !shuffle.is_solvable())
            .count();
        assert!(unsolvable > 0);
        assert!(unsolvable < 64);
    }

    fn any_seed() -> impl Strategy<Value = ShuffleSeed> {
        any::<[u8; 32]>().prop_map(ShuffleSeed::from_bytes)
    }

    proptest! {
        #[test]
        fn prop_shuffle_is_never_solved(seed in any_seed(), side in 2_usize..=5) {
            for strategy in [ShuffleStrategy::UniformPermutation, ShuffleStrategy::RandomWalk { steps: 8 }] {
                let shuffle = ShuffleGenerator::new(strategy).shuffle_with_seed(side, seed).unwrap();
                prop_assert!(!shuffle.grid.is_solved());
                prop_assert_eq!(shuffle.grid.cell_count(), side * side);
            }
        }

        #[test]
        fn prop_random_walk_is_solvable(seed in any_seed(), side in 2_usize..=6) {
            let shuffle = ShuffleGenerator::default().shuffle_with_seed(side, seed).unwrap();
            prop_assert!(shuffle.is_solvable());
        }
    }
}
