//! Hand evaluation: shanten, waits, yaku and points.
//!
//! Everything here is pure. The round logic feeds a hand and a
//! [`WinContext`] in and gets a [`HandResult`] out.
//!
//! ## Evaluation
//!
//! A complete hand is read every possible way (seven pairs, thirteen
//! orphans and each set/pair decomposition with each wait the winning
//! tile could have filled). Each reading is scored and the highest
//! base points win, ties broken by han then fu.
//!
//! ```
//! use riichi_engine::hand::{HandEvaluator, WinContext};
//! use riichi_engine::tiles::{Tile, TileKind, Wind, parse_hand};
//!
//! let tiles: Vec<Tile> = parse_hand("234m56799p234678s")
//!     .unwrap()
//!     .into_iter()
//!     .enumerate()
//!     .map(|(i, (kind, red))| Tile::new(kind, red, i as u8))
//!     .collect();
//! let mut ctx = WinContext::new("4s".parse().unwrap(), true, Wind::East, Wind::South, 4);
//! ctx.riichi = true;
//! let result = HandEvaluator::evaluate(&tiles, &[], &ctx);
//! assert!(result.is_win);
//! assert_eq!(result.han, 3);
//! assert_eq!(result.fu, 20);
//! ```

pub mod decompose;
pub mod score;
pub mod shanten;
pub mod yaku;

use serde::Serialize;

use crate::core::{PlayerId, PlayerMap};
use crate::tiles::{kind_counts, Meld, Tile, TileKind, Wind};

pub use decompose::{Division, Set, SetShape};
pub use score::{base_points, Payments};
pub use shanten::Counts;
pub use yaku::{Wait, Yaku};

use yaku::Arrangement;

/// Situation of a win.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WinContext {
    pub win_tile: TileKind,
    pub is_tsumo: bool,
    pub round_wind: Wind,
    pub seat_wind: Wind,
    pub riichi: bool,
    pub double_riichi: bool,
    pub ippatsu: bool,
    /// Tsumo on the last live tile.
    pub haitei: bool,
    /// Ron on the last discard.
    pub houtei: bool,
    pub rinshan: bool,
    pub chankan: bool,
    /// First uninterrupted go-around (tenhou/chiihou).
    pub first_turn: bool,
    /// Realized dora kinds, one entry per indicator.
    pub dora: Vec<TileKind>,
    /// Realized uradora kinds; only counted with riichi.
    pub ura_dora: Vec<TileKind>,
    pub player_count: usize,
}

impl WinContext {
    #[must_use]
    pub fn new(win_tile: TileKind, is_tsumo: bool, round_wind: Wind, seat_wind: Wind, player_count: usize) -> Self {
        Self {
            win_tile,
            is_tsumo,
            round_wind,
            seat_wind,
            riichi: false,
            double_riichi: false,
            ippatsu: false,
            haitei: false,
            houtei: false,
            rinshan: false,
            chankan: false,
            first_turn: false,
            dora: Vec::new(),
            ura_dora: Vec::new(),
            player_count,
        }
    }

    #[must_use]
    pub fn is_dealer(&self) -> bool {
        self.seat_wind == Wind::East
    }
}

/// One scored yaku.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct YakuScore {
    pub yaku: Yaku,
    pub name: &'static str,
    /// Han, or the yakuman multiplier for yakuman.
    pub value: u8,
}

/// Outcome of evaluating a hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HandResult {
    pub is_win: bool,
    /// Total han including dora; 0 for yakuman hands.
    pub han: u32,
    pub fu: u32,
    pub base: i32,
    /// Points the winner collects, before honba and kyotaku.
    pub score: i32,
    pub yaku: Vec<YakuScore>,
    pub yakuman_count: u32,
    pub dora: u32,
    pub ura_dora: u32,
    pub red_dora: u32,
    pub payments: Payments,
    pub limit: Option<&'static str>,
}

impl HandResult {
    #[must_use]
    pub fn not_win() -> Self {
        Self {
            is_win: false,
            han: 0,
            fu: 0,
            base: 0,
            score: 0,
            yaku: Vec::new(),
            yakuman_count: 0,
            dora: 0,
            ura_dora: 0,
            red_dora: 0,
            payments: Payments::from_base(0, false),
            limit: None,
        }
    }

    #[must_use]
    pub fn yaku_names(&self) -> Vec<&'static str> {
        self.yaku.iter().map(|y| y.name).collect()
    }

    #[must_use]
    pub fn has_yaku(&self, yaku: Yaku) -> bool {
        self.yaku.iter().any(|y| y.yaku == yaku)
    }

    /// Per-seat deltas, without honba or kyotaku.
    #[must_use]
    pub fn payment_table(
        &self,
        winner: PlayerId,
        dealer: PlayerId,
        discarder: Option<PlayerId>,
        player_count: usize,
    ) -> PlayerMap<i32> {
        self.payments.table(winner, dealer, discarder, player_count)
    }
}

/// Pure hand evaluation entry points.
pub struct HandEvaluator;

impl HandEvaluator {
    /// Shanten of a concealed hand; `-1` complete, `0` tenpai.
    #[must_use]
    pub fn shanten(tiles: &[Tile], meld_count: usize) -> i8 {
        shanten::shanten(&kind_counts(tiles.iter().map(|t| t.kind())), meld_count)
    }

    /// Kinds that complete a 13-tile-equivalent concealed hand.
    #[must_use]
    pub fn waits(tiles: &[Tile], meld_count: usize) -> Vec<TileKind> {
        shanten::waits(&kind_counts(tiles.iter().map(|t| t.kind())), meld_count)
    }

    #[must_use]
    pub fn is_tenpai(tiles: &[Tile], meld_count: usize) -> bool {
        !Self::waits(tiles, meld_count).is_empty()
    }

    /// Evaluate a complete hand. `concealed` includes the winning tile.
    #[must_use]
    pub fn evaluate(concealed: &[Tile], melds: &[Meld], ctx: &WinContext) -> HandResult {
        let counts = kind_counts(concealed.iter().map(|t| t.kind()));
        if !shanten::is_complete(&counts, melds.len()) {
            return HandResult::not_win();
        }
        let closed = melds.iter().all(|m| !m.is_open());

        let mut all_counts = counts;
        for meld in melds {
            let set = Set::from_meld(meld);
            match set.shape {
                SetShape::Run => {
                    for kind in set.kinds() {
                        all_counts[kind.index()] += 1;
                    }
                }
                _ => all_counts[set.first.index()] += 3,
            }
        }

        let mut readings: Vec<(Vec<Yaku>, u32)> = Vec::new();
        if melds.is_empty() && shanten::is_kokushi(&counts) {
            readings.push((yaku::kokushi(ctx, &counts), 0));
        }
        if melds.is_empty() && shanten::is_chiitoi(&counts) {
            readings.push((yaku::chiitoi(ctx, &counts), score::CHIITOI_FU));
        }
        for division in decompose::divisions(&counts) {
            for arrangement in arrangements(&division, melds, closed, ctx) {
                let found = yaku::regular(&arrangement, ctx, &all_counts);
                let pinfu = found.contains(&Yaku::Pinfu);
                let fu = score::regular_fu(&arrangement, ctx, pinfu);
                readings.push((found, fu));
            }
        }

        let every_tile: Vec<Tile> = concealed
            .iter()
            .chain(melds.iter().flat_map(|m| m.tiles.iter()))
            .copied()
            .collect();

        readings
            .into_iter()
            .map(|(found, fu)| score_reading(found, fu, closed, &every_tile, ctx))
            .filter(|r| r.is_win)
            .max_by_key(|r| (r.base, r.han, r.fu))
            .unwrap_or_else(HandResult::not_win)
    }
}

fn arrangements(division: &Division, melds: &[Meld], closed: bool, ctx: &WinContext) -> Vec<Arrangement> {
    let meld_sets: Vec<Set> = melds.iter().map(Set::from_meld).collect();
    let win = ctx.win_tile;
    let build = |concealed: Vec<Set>, wait: Wait| Arrangement {
        pair: division.pair,
        sets: concealed.into_iter().chain(meld_sets.iter().copied()).collect(),
        wait,
        closed,
    };

    let mut out = Vec::new();
    if division.pair == win {
        out.push(build(division.sets.to_vec(), Wait::Tanki));
    }
    for (i, set) in division.sets.iter().enumerate() {
        if !set.contains(win) {
            continue;
        }
        let wait = match set.shape {
            SetShape::Run => match win.rank() - set.first.rank() {
                1 => Wait::Kanchan,
                0 if set.first.rank() == 7 => Wait::Penchan,
                2 if set.first.rank() == 1 => Wait::Penchan,
                _ => Wait::Ryanmen,
            },
            _ => Wait::Shanpon,
        };
        let mut sets = division.sets.to_vec();
        if wait == Wait::Shanpon && !ctx.is_tsumo {
            // completed by another player's discard
            sets[i].open = true;
        }
        out.push(build(sets, wait));
    }
    out
}

fn score_reading(found: Vec<Yaku>, fu: u32, closed: bool, every_tile: &[Tile], ctx: &WinContext) -> HandResult {
    let yakuman_count: u32 = found.iter().map(|y| u32::from(y.yakuman())).sum();
    let mut result = HandResult::not_win();

    if yakuman_count > 0 {
        result.yaku = found
            .iter()
            .filter(|y| y.yakuman() > 0)
            .map(|&y| YakuScore {
                yaku: y,
                name: y.name(),
                value: y.yakuman(),
            })
            .collect();
        result.yakuman_count = yakuman_count;
    } else {
        result.yaku = found
            .iter()
            .filter(|y| y.han(closed) > 0)
            .map(|&y| YakuScore {
                yaku: y,
                name: y.name(),
                value: y.han(closed),
            })
            .collect();
        let yaku_han: u32 = result.yaku.iter().map(|y| u32::from(y.value)).sum();
        if yaku_han == 0 {
            return HandResult::not_win();
        }
        let count_of = |kind: TileKind| every_tile.iter().filter(|t| t.kind() == kind).count() as u32;
        result.dora = ctx.dora.iter().map(|&k| count_of(k)).sum();
        if ctx.riichi || ctx.double_riichi {
            result.ura_dora = ctx.ura_dora.iter().map(|&k| count_of(k)).sum();
        }
        result.red_dora = every_tile.iter().filter(|t| t.is_red()).count() as u32;
        result.han = yaku_han + result.dora + result.ura_dora + result.red_dora;
        result.fu = fu;
    }

    result.is_win = true;
    result.base = base_points(result.han, result.fu, yakuman_count);
    result.limit = score::limit_name(result.han, result.base, yakuman_count);
    result.payments = Payments::from_base(result.base, ctx.is_dealer());
    result.score = result.payments.total(ctx.is_dealer(), ctx.is_tsumo, ctx.player_count);
    result
}
