//! Fu, base points and payments.
//!
//! ## Limits
//!
//! | han        | base |
//! |------------|------|
//! | 5, or base over 2000 | 2000 (mangan) |
//! | 6-7        | 3000 (haneman) |
//! | 8-10       | 4000 (baiman) |
//! | 11-12      | 6000 (sanbaiman) |
//! | 13+        | 8000 (kazoe yakuman) |
//!
//! Yakuman pay 8000 base per multiplier.

use serde::Serialize;

use super::decompose::SetShape;
use super::yaku::Arrangement;
use super::WinContext;
use crate::core::{PlayerId, PlayerMap};

/// Fu of a regular reading, rounded up to the next 10.
#[must_use]
pub fn regular_fu(arr: &Arrangement, ctx: &WinContext, pinfu: bool) -> u32 {
    if pinfu {
        return if ctx.is_tsumo { 20 } else { 30 };
    }

    let mut fu = 20;
    if arr.closed && !ctx.is_tsumo {
        fu += 10;
    }
    if ctx.is_tsumo {
        fu += 2;
    }
    for set in &arr.sets {
        let base = match set.shape {
            SetShape::Run => continue,
            SetShape::Triplet => 2,
            SetShape::Quad => 8,
        };
        let terminal = if set.first.is_terminal_or_honor() { 2 } else { 1 };
        let concealed = if set.open { 1 } else { 2 };
        fu += base * terminal * concealed;
    }
    if arr.pair.is_dragon() {
        fu += 2;
    }
    if arr.pair == ctx.seat_wind.tile_kind() {
        fu += 2;
    }
    if arr.pair == ctx.round_wind.tile_kind() {
        fu += 2;
    }
    fu += arr.wait.fu();

    let fu = round_up(fu, 10);
    // open pinfu shape
    if fu == 20 && !ctx.is_tsumo {
        return 30;
    }
    fu.max(if arr.closed { 20 } else { 30 })
}

/// Seven pairs are always 25 fu.
pub const CHIITOI_FU: u32 = 25;

/// Base points before the dealer/non-dealer multipliers.
#[must_use]
pub fn base_points(han: u32, fu: u32, yakuman: u32) -> i32 {
    if yakuman > 0 {
        return 8000 * yakuman as i32;
    }
    match han {
        0 => 0,
        h if h >= 13 => 8000,
        11 | 12 => 6000,
        8..=10 => 4000,
        6 | 7 => 3000,
        5 => 2000,
        _ => (fu as i32 * (1 << (2 + han))).min(2000),
    }
}

/// Limit name for a base point value, if any.
#[must_use]
pub fn limit_name(han: u32, base: i32, yakuman: u32) -> Option<&'static str> {
    if yakuman > 0 || han >= 13 {
        return Some("Yakuman");
    }
    match base {
        6000 => Some("Sanbaiman"),
        4000 => Some("Baiman"),
        3000 => Some("Haneman"),
        2000 => Some("Mangan"),
        _ => None,
    }
}

fn round_up(value: u32, unit: u32) -> u32 {
    value.div_ceil(unit) * unit
}

fn round_up_points(value: i32) -> i32 {
    (value + 99) / 100 * 100
}

/// What each payer owes, before honba and kyotaku.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Payments {
    /// Paid by the discarder on ron.
    pub ron: i32,
    /// Paid by the dealer on a non-dealer tsumo.
    pub tsumo_dealer: i32,
    /// Paid by each non-dealer on tsumo.
    pub tsumo_non_dealer: i32,
}

impl Payments {
    #[must_use]
    pub fn from_base(base: i32, winner_is_dealer: bool) -> Self {
        if base == 0 {
            return Self {
                ron: 0,
                tsumo_dealer: 0,
                tsumo_non_dealer: 0,
            };
        }
        if winner_is_dealer {
            Self {
                ron: round_up_points(base * 6),
                tsumo_dealer: 0,
                tsumo_non_dealer: round_up_points(base * 2),
            }
        } else {
            Self {
                ron: round_up_points(base * 4),
                tsumo_dealer: round_up_points(base * 2),
                tsumo_non_dealer: round_up_points(base),
            }
        }
    }

    /// Per-seat point deltas for a win, without honba or kyotaku.
    ///
    /// Three-player tsumo uses tsumo-loss: the absent seat's share is
    /// simply not paid.
    #[must_use]
    pub fn table(
        &self,
        winner: PlayerId,
        dealer: PlayerId,
        discarder: Option<PlayerId>,
        player_count: usize,
    ) -> PlayerMap<i32> {
        let mut deltas = PlayerMap::with_value(player_count, 0);
        match discarder {
            Some(from) => {
                deltas[from] -= self.ron;
                deltas[winner] += self.ron;
            }
            None => {
                for payer in PlayerId::others_in_order(winner, player_count) {
                    let owed = if payer == dealer {
                        self.tsumo_dealer
                    } else {
                        self.tsumo_non_dealer
                    };
                    deltas[payer] -= owed;
                    deltas[winner] += owed;
                }
            }
        }
        deltas
    }

    /// Total the winner collects.
    #[must_use]
    pub fn total(&self, winner_is_dealer: bool, is_tsumo: bool, player_count: usize) -> i32 {
        if !is_tsumo {
            return self.ron;
        }
        let payers = player_count as i32 - 1;
        if winner_is_dealer {
            self.tsumo_non_dealer * payers
        } else {
            self.tsumo_dealer + self.tsumo_non_dealer * (payers - 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_points_limits() {
        assert_eq!(base_points(1, 30, 0), 240);
        assert_eq!(base_points(3, 30, 0), 960);
        assert_eq!(base_points(4, 40, 0), 2000);
        assert_eq!(base_points(3, 70, 0), 2000);
        assert_eq!(base_points(6, 30, 0), 3000);
        assert_eq!(base_points(9, 30, 0), 4000);
        assert_eq!(base_points(12, 30, 0), 6000);
        assert_eq!(base_points(13, 30, 0), 8000);
        assert_eq!(base_points(2, 30, 2), 16000);
    }

    #[test]
    fn test_payments_non_dealer() {
        let p = Payments::from_base(base_points(1, 30, 0), false);
        assert_eq!(p.ron, 1000);
        assert_eq!(p.tsumo_dealer, 500);
        assert_eq!(p.tsumo_non_dealer, 300);
    }

    #[test]
    fn test_payments_dealer_mangan() {
        let p = Payments::from_base(2000, true);
        assert_eq!(p.ron, 12000);
        assert_eq!(p.tsumo_non_dealer, 4000);
    }

    #[test]
    fn test_table_tsumo_is_zero_sum() {
        let p = Payments::from_base(2000, false);
        let table = p.table(PlayerId::new(1), PlayerId::new(0), None, 4);
        assert_eq!(table[PlayerId::new(1)], 8000);
        assert_eq!(table[PlayerId::new(0)], -4000);
        assert_eq!(table[PlayerId::new(2)], -2000);
        assert_eq!(table.values().sum::<i32>(), 0);
    }

    #[test]
    fn test_three_player_tsumo_loss() {
        let p = Payments::from_base(2000, false);
        let table = p.table(PlayerId::new(1), PlayerId::new(0), None, 3);
        assert_eq!(table[PlayerId::new(1)], 6000);
        assert_eq!(table.values().sum::<i32>(), 0);
        assert_eq!(p.total(false, true, 3), 6000);
        assert_eq!(p.total(false, true, 4), 8000);
    }

    #[test]
    fn test_ron_table() {
        let p = Payments::from_base(base_points(2, 40, 0), false);
        let table = p.table(PlayerId::new(2), PlayerId::new(0), Some(PlayerId::new(3)), 4);
        assert_eq!(table[PlayerId::new(2)], 2600);
        assert_eq!(table[PlayerId::new(3)], -2600);
    }
}
