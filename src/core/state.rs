//! Round-spanning state: wind, kyoku, honba, kyotaku and dealer.
//!
//! Persists for the whole match; everything per-kyoku lives on the
//! table and players instead.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::tiles::Wind;

/// Round counters owned by the round manager.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub round_wind: Wind,
    /// Kyoku index within the current wind (0-based).
    pub kyoku: usize,
    pub honba: u32,
    /// Riichi sticks on the table.
    pub kyotaku: u32,
    pub dealer: PlayerId,
    pub sudden_death: bool,
    /// Seat order frozen at match start, for tie-breaking.
    pub initial_order: Vec<PlayerId>,
}

impl RoundState {
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            round_wind: Wind::East,
            kyoku: 0,
            honba: 0,
            kyotaku: 0,
            dealer: PlayerId::new(0),
            sudden_death: false,
            initial_order: PlayerId::all(player_count).collect(),
        }
    }

    /// Seat wind of `player` given the current dealer.
    #[must_use]
    pub fn seat_wind(&self, player: PlayerId, player_count: usize) -> Wind {
        Wind::from_index(player.distance_from(self.dealer, player_count))
    }

    /// Rank of `player` in the frozen seat order; lower wins ties.
    #[must_use]
    pub fn seat_order_rank(&self, player: PlayerId) -> usize {
        self.initial_order
            .iter()
            .position(|&p| p == player)
            .unwrap_or(usize::MAX)
    }

    /// Label like "East 1, 0 honba".
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}, {} honba", self.round_wind, self.kyoku + 1, self.honba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_wind_follows_dealer() {
        let mut round = RoundState::new(4);
        assert_eq!(round.seat_wind(PlayerId::new(0), 4), Wind::East);
        assert_eq!(round.seat_wind(PlayerId::new(3), 4), Wind::North);

        round.dealer = PlayerId::new(2);
        assert_eq!(round.seat_wind(PlayerId::new(2), 4), Wind::East);
        assert_eq!(round.seat_wind(PlayerId::new(0), 4), Wind::West);
        assert_eq!(round.seat_wind(PlayerId::new(1), 4), Wind::North);
    }

    #[test]
    fn test_three_player_winds() {
        let mut round = RoundState::new(3);
        round.dealer = PlayerId::new(1);
        assert_eq!(round.seat_wind(PlayerId::new(0), 3), Wind::West);
        assert_eq!(round.initial_order.len(), 3);
        assert_eq!(round.label(), "East 1, 0 honba");
    }
}
