//! The wall: live draw queue, dead wall and dora indicators.
//!
//! ## Layout
//!
//! After shuffling, the last 14 tiles become the dead wall. Positions
//! in the dead wall are counted from its original front:
//!
//! - 0..4: replacement (rinshan) tiles, drawn from the front
//! - 4 + 2n: the n-th dora indicator
//! - 5 + 2n: the uradora indicator under it
//!
//! Every replacement draw is immediately backfilled from the tail of
//! the live queue, so the dead wall stays at 14 tiles.

use std::collections::VecDeque;

use super::{Tile, TileKind};
use crate::core::GameRng;
use crate::error::{EngineError, EngineResult};

/// Tiles held back in the dead wall.
pub const DEAD_WALL_SIZE: usize = 14;

/// Maximum number of dora indicators (initial + four kans).
pub const MAX_INDICATORS: usize = 5;

const FIRST_INDICATOR_SLOT: usize = 4;

/// Wall state for one kyoku.
#[derive(Clone, Debug)]
pub struct Wall {
    live: VecDeque<Tile>,
    dead: VecDeque<Tile>,
    replacement_draws: usize,
    indicators: Vec<Tile>,
    total: usize,
}

impl Wall {
    /// Build the full tile set for a variant, unshuffled.
    ///
    /// Four-player: 136 tiles. Three-player: 108 tiles, man 2-8 removed.
    /// With `red_fives`, one five of each present number suit is red.
    #[must_use]
    pub fn tile_set(three_player: bool, red_fives: bool) -> Vec<Tile> {
        let mut tiles = Vec::with_capacity(136);
        let mut id: u8 = 0;
        for kind in TileKind::all() {
            let is_man = kind.suit() == super::Suit::Man;
            if three_player && is_man && !kind.is_terminal() {
                continue;
            }
            for copy in 0..4 {
                let red = red_fives && copy == 0 && !kind.is_honor() && kind.rank() == 5;
                tiles.push(Tile::new(kind, red, id));
                id += 1;
            }
        }
        tiles
    }

    /// Shuffle a fresh tile set and separate the dead wall.
    #[must_use]
    pub fn shuffled(three_player: bool, red_fives: bool, rng: &mut GameRng) -> Self {
        let mut supply = Self::tile_set(three_player, red_fives);
        rng.shuffle(&mut supply);
        Self::from_ordered(supply)
    }

    /// Build a wall from an already ordered supply: the first tiles are
    /// drawn first, the last 14 form the dead wall.
    #[must_use]
    pub fn from_ordered(mut supply: Vec<Tile>) -> Self {
        let total = supply.len();
        let split = supply.len().saturating_sub(DEAD_WALL_SIZE);
        let dead: VecDeque<Tile> = supply.split_off(split).into();
        Self {
            live: supply.into(),
            dead,
            replacement_draws: 0,
            indicators: Vec::new(),
            total,
        }
    }

    /// Build a wall with chosen tiles at the front of the live queue and
    /// of the dead wall; remaining tiles of `set` fill the rest in order.
    ///
    /// Used for fixed deals in replays and tests.
    pub fn arranged(set: Vec<Tile>, live_front: &[TileKind], dead_front: &[TileKind]) -> EngineResult<Self> {
        let mut pool = set;
        let total = pool.len();
        let mut take = |kind: TileKind| -> EngineResult<Tile> {
            let pos = pool
                .iter()
                .position(|t| t.kind() == kind && !t.is_red())
                .or_else(|| pool.iter().position(|t| t.kind() == kind))
                .ok_or_else(|| EngineError::Parse {
                    input: kind.to_string(),
                    message: "no copies of this tile left to arrange".to_string(),
                })?;
            Ok(pool.remove(pos))
        };

        let mut front = Vec::with_capacity(live_front.len());
        for &kind in live_front {
            front.push(take(kind)?);
        }
        let mut dead = Vec::with_capacity(DEAD_WALL_SIZE);
        for &kind in dead_front {
            dead.push(take(kind)?);
        }
        if dead.len() > DEAD_WALL_SIZE {
            return Err(EngineError::Parse {
                input: format!("{} dead wall tiles", dead.len()),
                message: "dead wall holds 14 tiles".to_string(),
            });
        }

        let filler = DEAD_WALL_SIZE - dead.len();
        let tail_start = pool.len().saturating_sub(filler);
        dead.extend(pool.split_off(tail_start));
        front.extend(pool);

        Ok(Self {
            live: front.into(),
            dead: dead.into(),
            replacement_draws: 0,
            indicators: Vec::new(),
            total,
        })
    }

    /// Draw from the live queue. `None` means the wall is exhausted.
    pub fn draw(&mut self) -> Option<Tile> {
        self.live.pop_front()
    }

    /// Draw a kan replacement tile and backfill the dead wall.
    pub fn draw_replacement(&mut self) -> Option<Tile> {
        let tile = self.dead.pop_front()?;
        self.replacement_draws += 1;
        if let Some(backfill) = self.live.pop_back() {
            self.dead.push_back(backfill);
        }
        Some(tile)
    }

    /// Reveal the next dora indicator.
    pub fn reveal_dora(&mut self) -> Option<Tile> {
        if self.indicators.len() >= MAX_INDICATORS {
            return None;
        }
        let slot = FIRST_INDICATOR_SLOT + 2 * self.indicators.len();
        let tile = *self.dead.get(slot.checked_sub(self.replacement_draws)?)?;
        self.indicators.push(tile);
        Some(tile)
    }

    /// Revealed dora indicators, in reveal order.
    #[must_use]
    pub fn dora_indicators(&self) -> &[Tile] {
        &self.indicators
    }

    /// Uradora indicators: the slot under each revealed indicator.
    #[must_use]
    pub fn uradora_indicators(&self) -> Vec<Tile> {
        (0..self.indicators.len())
            .filter_map(|n| {
                let slot = FIRST_INDICATOR_SLOT + 2 * n + 1;
                self.dead.get(slot.checked_sub(self.replacement_draws)?).copied()
            })
            .collect()
    }

    /// Tiles left to draw from the live queue.
    #[must_use]
    pub fn live_remaining(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn dead_wall_len(&self) -> usize {
        self.dead.len()
    }

    #[must_use]
    pub fn replacement_draws(&self) -> usize {
        self.replacement_draws
    }

    /// Size of the tile set this wall was built from.
    #[must_use]
    pub fn total_tiles(&self) -> usize {
        self.total
    }
}
