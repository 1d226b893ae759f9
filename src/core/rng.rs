//! Deterministic random number generation for wall shuffling.
//!
//! Every kyoku's wall is shuffled from a stream forked off the match
//! RNG, so an entire match replays identically from its seed.
//!
//! ```
//! use riichi_engine::core::GameRng;
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//!
//! let mut wall_a: Vec<u8> = (0..136).collect();
//! let mut wall_b = wall_a.clone();
//! a.fork().shuffle(&mut wall_a);
//! b.fork().shuffle(&mut wall_b);
//! assert_eq!(wall_a, wall_b);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Golden-ratio step between successive kyoku seeds.
const FORK_STEP: u64 = 0x9E37_79B9_7F4A_7C15;

/// Match RNG. Hands out one forked stream per kyoku.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    kyoku_forks: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            kyoku_forks: 0,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The next kyoku's stream. The n-th fork of a seed never changes.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.kyoku_forks += 1;
        Self::new(self.seed.wrapping_add(self.kyoku_forks.wrapping_mul(FORK_STEP)))
    }

    /// A stream keyed by name, independent of any forks taken so far.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub fn shuffle<T>(&mut self, tiles: &mut [T]) {
        tiles.shuffle(&mut self.inner);
    }

    /// Position of this RNG, enough to resume the match's wall sequence.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            kyoku_forks: self.kyoku_forks,
        }
    }

    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            kyoku_forks: state.kyoku_forks,
        }
    }
}

/// Serializable RNG position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    /// ChaCha8 word position
    pub word_pos: u128,
    /// Forks taken so far; the next kyoku uses `kyoku_forks + 1`.
    pub kyoku_forks: u64,
}
