//! Melds: runs, triplets and quads formed by calls or closed kans.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{Tile, TileKind};
use crate::core::PlayerId;

/// Meld type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeldType {
    /// Run claimed from the previous seat.
    Chi,
    /// Open triplet.
    Pon,
    /// Closed quad from the own hand.
    Ankan,
    /// Open quad claimed from a discard.
    Daiminkan,
    /// Pon upgraded with the fourth tile.
    Kakan,
}

impl MeldType {
    #[must_use]
    pub const fn is_kan(self) -> bool {
        matches!(self, MeldType::Ankan | MeldType::Daiminkan | MeldType::Kakan)
    }
}

/// A declared meld.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    pub meld_type: MeldType,
    /// All tiles of the meld, sorted.
    pub tiles: SmallVec<[Tile; 4]>,
    /// The claimed discard, for called melds.
    pub called: Option<Tile>,
    /// Seat the claimed discard came from.
    pub from: Option<PlayerId>,
}

impl Meld {
    /// Create a meld; tiles are sorted for presentation.
    #[must_use]
    pub fn new(meld_type: MeldType, tiles: &[Tile], called: Option<Tile>, from: Option<PlayerId>) -> Self {
        let mut tiles: SmallVec<[Tile; 4]> = SmallVec::from_slice(tiles);
        tiles.sort_by_key(|t| t.sort_key());
        Self {
            meld_type,
            tiles,
            called,
            from,
        }
    }

    /// Does this meld break a closed hand?
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self.meld_type, MeldType::Ankan)
    }

    #[must_use]
    pub const fn is_kan(&self) -> bool {
        self.meld_type.is_kan()
    }

    /// Lowest kind in the meld; the triplet kind for pon/kan.
    #[must_use]
    pub fn base_kind(&self) -> TileKind {
        self.tiles
            .iter()
            .map(|t| t.kind())
            .min()
            .unwrap_or(TileKind::EAST)
    }

    /// Number of red fives in the meld.
    #[must_use]
    pub fn red_count(&self) -> u8 {
        self.tiles.iter().filter(|t| t.is_red()).count() as u8
    }

    /// Upgrade a pon to an added kan.
    pub fn upgrade_to_kakan(&mut self, tile: Tile) {
        debug_assert_eq!(self.meld_type, MeldType::Pon);
        self.meld_type = MeldType::Kakan;
        self.tiles.push(tile);
        self.tiles.sort_by_key(|t| t.sort_key());
    }

    /// Wire representation, e.g. `["3m", "4m", "0m"]`.
    #[must_use]
    pub fn wire_tiles(&self) -> Vec<String> {
        self.tiles.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(s: &str, id: u8) -> Tile {
        let (kind, red) = TileKind::parse(s).unwrap();
        Tile::new(kind, red, id)
    }

    #[test]
    fn test_meld_sorted_and_open() {
        let meld = Meld::new(
            MeldType::Chi,
            &[tile("4m", 1), tile("3m", 2), tile("0m", 3)],
            Some(tile("3m", 2)),
            Some(PlayerId::new(3)),
        );
        assert_eq!(meld.wire_tiles(), vec!["3m", "4m", "0m"]);
        assert!(meld.is_open());
        assert_eq!(meld.base_kind(), "3m".parse().unwrap());
        assert_eq!(meld.red_count(), 1);
    }

    #[test]
    fn test_kakan_upgrade() {
        let mut meld = Meld::new(
            MeldType::Pon,
            &[tile("7z", 1), tile("7z", 2), tile("7z", 3)],
            Some(tile("7z", 3)),
            Some(PlayerId::new(0)),
        );
        meld.upgrade_to_kakan(tile("7z", 4));
        assert_eq!(meld.meld_type, MeldType::Kakan);
        assert_eq!(meld.tiles.len(), 4);
        assert!(meld.is_kan());
    }

    #[test]
    fn test_ankan_is_closed() {
        let meld = Meld::new(
            MeldType::Ankan,
            &[tile("1p", 1), tile("1p", 2), tile("1p", 3), tile("1p", 4)],
            None,
            None,
        );
        assert!(!meld.is_open());
    }
}
