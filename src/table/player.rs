//! Per-seat kyoku state: hand, discards, melds, flags and points.

use serde::Serialize;
use smallvec::SmallVec;

use crate::core::PlayerId;
use crate::hand::HandEvaluator;
use crate::tiles::{Meld, MeldType, Tile, TileKind};

/// One entry of a discard pile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Discard {
    pub tile: Tile,
    /// The discarded tile was the one just drawn.
    pub tsumogiri: bool,
    /// This discard declared riichi.
    pub riichi: bool,
    /// Claimed by another seat; the tile now lives in that meld.
    pub called: bool,
}

/// The three furiten sources.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Furiten {
    /// A wait is in the seat's own discard pile.
    pub discard: bool,
    /// A ron was passed since the seat's last discard.
    pub temporary: bool,
    /// A ron was passed while in riichi; lasts the whole kyoku.
    pub riichi: bool,
}

impl Furiten {
    #[must_use]
    pub const fn any(&self) -> bool {
        self.discard || self.temporary || self.riichi
    }
}

/// Yakuman a seat can be held liable for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PaoKind {
    Daisangen,
    Daisuushii,
}

#[derive(Clone, Debug, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub points: i32,
    pub is_dealer: bool,
    hand: Vec<Tile>,
    last_drawn: Option<Tile>,
    discards: Vec<Discard>,
    melds: Vec<Meld>,
    pub riichi: bool,
    pub double_riichi: bool,
    pub ippatsu: bool,
    pub furiten: Furiten,
    /// Discards so far are all terminals/honors and none were called.
    pub nagashi_eligible: bool,
    /// Kinds barred from the next discard after a call.
    pub kuikae: SmallVec<[TileKind; 2]>,
    /// Liability for a yakuman completed off a discard.
    pub pao: Option<(PaoKind, PlayerId)>,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, points: i32) -> Self {
        Self {
            id,
            name: name.into(),
            points,
            is_dealer: false,
            hand: Vec::with_capacity(14),
            last_drawn: None,
            discards: Vec::new(),
            melds: Vec::new(),
            riichi: false,
            double_riichi: false,
            ippatsu: false,
            furiten: Furiten::default(),
            nagashi_eligible: true,
            kuikae: SmallVec::new(),
            pao: None,
        }
    }

    /// Clear everything except identity and points.
    pub fn reset_kyoku_state(&mut self, is_dealer: bool) {
        self.is_dealer = is_dealer;
        self.hand.clear();
        self.last_drawn = None;
        self.discards.clear();
        self.melds.clear();
        self.riichi = false;
        self.double_riichi = false;
        self.ippatsu = false;
        self.furiten = Furiten::default();
        self.nagashi_eligible = true;
        self.kuikae.clear();
        self.pao = None;
    }

    #[must_use]
    pub fn hand(&self) -> &[Tile] {
        &self.hand
    }

    #[must_use]
    pub fn last_drawn(&self) -> Option<Tile> {
        self.last_drawn
    }

    #[must_use]
    pub fn discards(&self) -> &[Discard] {
        &self.discards
    }

    #[must_use]
    pub fn melds(&self) -> &[Meld] {
        &self.melds
    }

    /// Deal a tile without marking it as drawn.
    pub fn deal(&mut self, tile: Tile) {
        self.hand.push(tile);
        self.sort_hand();
    }

    /// Take a drawn tile into the hand.
    pub fn draw(&mut self, tile: Tile) {
        self.hand.push(tile);
        self.last_drawn = Some(tile);
        self.sort_hand();
    }

    /// Find a hand tile matching a wire string, red-sensitive.
    #[must_use]
    pub fn find_tile(&self, kind: TileKind, red: bool) -> Option<Tile> {
        let mut matching = self.hand.iter().filter(|t| t.matches(kind, red));
        // prefer keeping the drawn tile's identity when it matches
        match self.last_drawn.filter(|t| t.matches(kind, red)) {
            Some(drawn) => Some(drawn),
            None => matching.next().copied(),
        }
    }

    /// Discard by wire string; `None` if no such tile is in hand.
    pub fn discard(&mut self, tile: &str, riichi: bool) -> Option<Discard> {
        let (kind, red) = TileKind::parse(tile).ok()?;
        let found = self.find_tile(kind, red)?;
        Some(self.discard_tile(found, riichi))
    }

    /// Discard a specific tile known to be in hand.
    pub fn discard_tile(&mut self, tile: Tile, riichi: bool) -> Discard {
        if let Some(pos) = self.hand.iter().position(|t| t.id() == tile.id()) {
            self.hand.remove(pos);
        }
        let discard = Discard {
            tile,
            tsumogiri: self.last_drawn.is_some_and(|t| t.id() == tile.id()),
            riichi,
            called: false,
        };
        if !tile.kind().is_terminal_or_honor() {
            self.nagashi_eligible = false;
        }
        self.discards.push(discard);
        self.last_drawn = None;
        self.kuikae.clear();
        self.furiten.temporary = false;
        discard
    }

    /// Mark this seat's latest discard as claimed.
    pub fn mark_last_discard_called(&mut self) {
        if let Some(last) = self.discards.last_mut() {
            last.called = true;
        }
        self.nagashi_eligible = false;
    }

    /// Remove tiles by identity; all or nothing.
    pub fn remove_tiles(&mut self, tiles: &[Tile]) -> bool {
        if !tiles.iter().all(|t| self.hand.iter().any(|h| h.id() == t.id())) {
            return false;
        }
        self.hand.retain(|h| !tiles.iter().any(|t| t.id() == h.id()));
        if self.last_drawn.is_some_and(|d| tiles.iter().any(|t| t.id() == d.id())) {
            self.last_drawn = None;
        }
        true
    }

    pub fn add_meld(&mut self, meld: Meld) {
        self.melds.push(meld);
    }

    /// Upgrade the pon of `kind` to an added kan with `tile` from hand.
    pub fn upgrade_to_kakan(&mut self, tile: Tile) -> Option<&Meld> {
        let index = self
            .melds
            .iter()
            .position(|m| m.meld_type == MeldType::Pon && m.base_kind() == tile.kind())?;
        if !self.remove_tiles(&[tile]) {
            return None;
        }
        self.melds[index].upgrade_to_kakan(tile);
        Some(&self.melds[index])
    }

    /// Kinds in the concealed hand.
    pub fn hand_kinds(&self) -> impl Iterator<Item = TileKind> + '_ {
        self.hand.iter().map(|t| t.kind())
    }

    /// Concealed tiles of `kind`.
    #[must_use]
    pub fn tiles_of(&self, kind: TileKind) -> SmallVec<[Tile; 4]> {
        self.hand.iter().filter(|t| t.kind() == kind).copied().collect()
    }

    /// No open melds (closed kans keep the hand closed).
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.melds.iter().all(|m| !m.is_open())
    }

    #[must_use]
    pub fn kan_count(&self) -> usize {
        self.melds.iter().filter(|m| m.is_kan()).count()
    }

    /// Waits of the current 13-tile-equivalent hand.
    #[must_use]
    pub fn waits(&self) -> Vec<TileKind> {
        HandEvaluator::waits(&self.hand, self.melds.len())
    }

    /// Waits after removing one tile, for a 14-tile hand.
    #[must_use]
    pub fn waits_without(&self, tile: Tile) -> Vec<TileKind> {
        let rest: Vec<Tile> = self.hand.iter().filter(|t| t.id() != tile.id()).copied().collect();
        HandEvaluator::waits(&rest, self.melds.len())
    }

    #[must_use]
    pub fn is_tenpai(&self) -> bool {
        !self.waits().is_empty()
    }

    /// Has any discard of `kind`, including called ones.
    #[must_use]
    pub fn has_discarded(&self, kind: TileKind) -> bool {
        self.discards.iter().any(|d| d.tile.kind() == kind)
    }

    /// Discards still lying in the pile (not claimed).
    pub fn pond(&self) -> impl Iterator<Item = &Discard> {
        self.discards.iter().filter(|d| !d.called)
    }

    /// Tiles this seat accounts for: hand, pond and melds.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.hand.len() + self.pond().count() + self.melds.iter().map(|m| m.tiles.len()).sum::<usize>()
    }

    fn sort_hand(&mut self) {
        self.hand.sort_by_key(|t| t.sort_key());
    }

    /// Wire form of the hand.
    #[must_use]
    pub fn wire_hand(&self) -> Vec<String> {
        self.hand.iter().map(ToString::to_string).collect()
    }
}
