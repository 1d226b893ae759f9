//! The table: one wall and the seated players of a match.
//!
//! Players persist across kyoku (points, names); the wall and every
//! per-kyoku player field are replaced by [`Table::start_kyoku`].

mod player;

pub use player::{Discard, Furiten, PaoKind, Player};

use crate::core::{PlayerId, PlayerMap};
use crate::error::{EngineError, EngineResult};
use crate::rules::VariantRules;
use crate::tiles::{TileKind, Wall};

/// Tiles dealt to each seat before the dealer's first draw.
pub const HAND_SIZE: usize = 13;

#[derive(Clone, Debug)]
pub struct Table {
    pub wall: Wall,
    pub players: PlayerMap<Player>,
}

impl Table {
    #[must_use]
    pub fn new(players: PlayerMap<Player>, wall: Wall) -> Self {
        Self { wall, players }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Install a fresh wall, reset per-kyoku seat state and deal.
    ///
    /// Each seat receives 13 consecutive tiles, starting with the dealer.
    /// The initial dora indicator is revealed.
    pub fn start_kyoku(&mut self, wall: Wall, dealer: PlayerId) -> EngineResult<()> {
        self.wall = wall;
        let player_count = self.player_count();
        for (id, player) in self.players.iter_mut() {
            player.reset_kyoku_state(id == dealer);
        }
        let order: Vec<PlayerId> = std::iter::once(dealer)
            .chain(PlayerId::others_in_order(dealer, player_count))
            .collect();
        for seat in order {
            for _ in 0..HAND_SIZE {
                let tile = self.wall.draw().ok_or_else(|| EngineError::Setup {
                    message: "wall too small to deal".to_string(),
                })?;
                self.players[seat].deal(tile);
            }
        }
        self.wall.reveal_dora();
        Ok(())
    }

    /// Realized dora kinds, one per revealed indicator.
    #[must_use]
    pub fn dora_kinds(&self, rules: &dyn VariantRules) -> Vec<TileKind> {
        self.wall
            .dora_indicators()
            .iter()
            .map(|t| rules.dora_successor(t.kind()))
            .collect()
    }

    /// Realized uradora kinds.
    #[must_use]
    pub fn uradora_kinds(&self, rules: &dyn VariantRules) -> Vec<TileKind> {
        self.wall
            .uradora_indicators()
            .iter()
            .map(|t| rules.dora_successor(t.kind()))
            .collect()
    }

    /// Kans declared across all seats this kyoku.
    #[must_use]
    pub fn total_kans(&self) -> usize {
        self.players.values().map(Player::kan_count).sum()
    }

    /// Seats that declared at least one kan.
    #[must_use]
    pub fn kan_declarers(&self) -> usize {
        self.players.values().filter(|p| p.kan_count() > 0).count()
    }

    /// Every tile accounted for: wall, dead wall, hands, ponds, melds.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.wall.live_remaining()
            + self.wall.dead_wall_len()
            + self.players.values().map(Player::tile_count).sum::<usize>()
    }

    /// No seat has called or declared a kan yet.
    #[must_use]
    pub fn no_calls_yet(&self) -> bool {
        self.players.values().all(|p| p.melds().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameRng;
    use crate::rules::{FourPlayer, ThreePlayer};

    fn table(player_count: usize) -> Table {
        let players = PlayerMap::new(player_count, |id| Player::new(id, format!("p{}", id.0), 25_000));
        let three = player_count == 3;
        let mut rng = GameRng::new(11);
        Table::new(players, Wall::shuffled(three, true, &mut rng))
    }

    #[test]
    fn test_deal_and_conservation() {
        let mut t = table(4);
        let mut rng = GameRng::new(5);
        t.start_kyoku(Wall::shuffled(false, true, &mut rng), PlayerId::new(1)).unwrap();
        assert!(t.players.values().all(|p| p.hand().len() == 13));
        assert_eq!(t.wall.live_remaining(), 122 - 52);
        assert_eq!(t.wall.dora_indicators().len(), 1);
        assert_eq!(t.tile_count(), 136);
        assert!(t.players[PlayerId::new(1)].is_dealer);
        assert!(!t.players[PlayerId::new(0)].is_dealer);
    }

    #[test]
    fn test_three_player_deal() {
        let mut t = table(3);
        let mut rng = GameRng::new(5);
        t.start_kyoku(Wall::shuffled(true, true, &mut rng), PlayerId::new(0)).unwrap();
        assert_eq!(t.wall.live_remaining(), 94 - 39);
        assert_eq!(t.tile_count(), 108);
    }

    #[test]
    fn test_dora_kinds_three_player_wrap() {
        let set = Wall::tile_set(true, false);
        let one_man: TileKind = "1m".parse().unwrap();
        let filler: TileKind = "2p".parse().unwrap();
        let dead = [filler, filler, filler, filler, one_man];
        let wall = Wall::arranged(set, &[], &dead).unwrap();
        let players = PlayerMap::new(3, |id| Player::new(id, "p", 35_000));
        let mut t = Table::new(players, wall);
        t.wall.reveal_dora();
        assert_eq!(t.dora_kinds(&ThreePlayer), vec!["9m".parse().unwrap()]);
        assert_eq!(t.dora_kinds(&FourPlayer), vec!["2m".parse().unwrap()]);
    }
}
