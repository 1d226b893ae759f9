//! Tiles, melds and the wall.
//!
//! - [`Tile`] / [`TileKind`]: physical tiles and their 34 rank/suit values
//! - [`Meld`]: called or closed sets
//! - [`Wall`]: live queue, dead wall and dora indicators

mod meld;
mod tile;
mod wall;

pub use meld::{Meld, MeldType};
pub use tile::{parse_hand, parse_kinds, Suit, Tile, TileKind, Wind};
pub use wall::{Wall, DEAD_WALL_SIZE, MAX_INDICATORS};

/// Count tiles per kind.
#[must_use]
pub fn kind_counts<I>(kinds: I) -> [u8; TileKind::COUNT]
where
    I: IntoIterator<Item = TileKind>,
{
    let mut counts = [0u8; TileKind::COUNT];
    for kind in kinds {
        counts[kind.index()] += 1;
    }
    counts
}
