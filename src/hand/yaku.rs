//! Yaku detection.
//!
//! ## Han values
//!
//! `Yaku::han(closed)` gives the value for a closed or open hand; `0`
//! means the yaku is not available open. Yakuman report their
//! multiplier through `Yaku::yakuman` instead.

use serde::Serialize;

use super::decompose::{Set, SetShape};
use super::shanten::Counts;
use super::WinContext;
use crate::tiles::{Suit, TileKind, Wind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Yaku {
    Riichi,
    DoubleRiichi,
    Ippatsu,
    MenzenTsumo,
    Pinfu,
    Tanyao,
    Iipeikou,
    Haku,
    Hatsu,
    Chun,
    SeatWind,
    RoundWind,
    Haitei,
    Houtei,
    Rinshan,
    Chankan,
    Chiitoitsu,
    SanshokuDoujun,
    Ittsu,
    Chanta,
    Toitoi,
    Sanankou,
    SanshokuDoukou,
    Sankantsu,
    Shousangen,
    Honroutou,
    Honitsu,
    Junchan,
    Ryanpeikou,
    Chinitsu,
    NagashiMangan,
    Kokushi,
    Kokushi13,
    Suuankou,
    SuuankouTanki,
    Daisangen,
    Shousuushii,
    Daisuushii,
    Tsuuiisou,
    Chinroutou,
    Ryuuiisou,
    Chuuren,
    JunseiChuuren,
    Suukantsu,
    Tenhou,
    Chiihou,
}

impl Yaku {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Yaku::Riichi => "Riichi",
            Yaku::DoubleRiichi => "Double Riichi",
            Yaku::Ippatsu => "Ippatsu",
            Yaku::MenzenTsumo => "Menzen Tsumo",
            Yaku::Pinfu => "Pinfu",
            Yaku::Tanyao => "Tanyao",
            Yaku::Iipeikou => "Iipeikou",
            Yaku::Haku => "Yakuhai (Haku)",
            Yaku::Hatsu => "Yakuhai (Hatsu)",
            Yaku::Chun => "Yakuhai (Chun)",
            Yaku::SeatWind => "Yakuhai (Seat Wind)",
            Yaku::RoundWind => "Yakuhai (Round Wind)",
            Yaku::Haitei => "Haitei Raoyue",
            Yaku::Houtei => "Houtei Raoyui",
            Yaku::Rinshan => "Rinshan Kaihou",
            Yaku::Chankan => "Chankan",
            Yaku::Chiitoitsu => "Chiitoitsu",
            Yaku::SanshokuDoujun => "Sanshoku Doujun",
            Yaku::Ittsu => "Ittsu",
            Yaku::Chanta => "Chanta",
            Yaku::Toitoi => "Toitoi",
            Yaku::Sanankou => "Sanankou",
            Yaku::SanshokuDoukou => "Sanshoku Doukou",
            Yaku::Sankantsu => "Sankantsu",
            Yaku::Shousangen => "Shousangen",
            Yaku::Honroutou => "Honroutou",
            Yaku::Honitsu => "Honitsu",
            Yaku::Junchan => "Junchan",
            Yaku::Ryanpeikou => "Ryanpeikou",
            Yaku::Chinitsu => "Chinitsu",
            Yaku::NagashiMangan => "Nagashi Mangan",
            Yaku::Kokushi => "Kokushi Musou",
            Yaku::Kokushi13 => "Kokushi Musou Juusanmen",
            Yaku::Suuankou => "Suuankou",
            Yaku::SuuankouTanki => "Suuankou Tanki",
            Yaku::Daisangen => "Daisangen",
            Yaku::Shousuushii => "Shousuushii",
            Yaku::Daisuushii => "Daisuushii",
            Yaku::Tsuuiisou => "Tsuuiisou",
            Yaku::Chinroutou => "Chinroutou",
            Yaku::Ryuuiisou => "Ryuuiisou",
            Yaku::Chuuren => "Chuuren Poutou",
            Yaku::JunseiChuuren => "Junsei Chuuren Poutou",
            Yaku::Suukantsu => "Suukantsu",
            Yaku::Tenhou => "Tenhou",
            Yaku::Chiihou => "Chiihou",
        }
    }

    /// Han for a closed (`true`) or open hand; 0 when unavailable.
    #[must_use]
    pub const fn han(self, closed: bool) -> u8 {
        match self {
            Yaku::Riichi | Yaku::Ippatsu | Yaku::MenzenTsumo | Yaku::Pinfu | Yaku::Iipeikou => {
                if closed {
                    1
                } else {
                    0
                }
            }
            Yaku::Tanyao
            | Yaku::Haku
            | Yaku::Hatsu
            | Yaku::Chun
            | Yaku::SeatWind
            | Yaku::RoundWind
            | Yaku::Haitei
            | Yaku::Houtei
            | Yaku::Rinshan
            | Yaku::Chankan => 1,
            Yaku::DoubleRiichi | Yaku::Chiitoitsu => {
                if closed {
                    2
                } else {
                    0
                }
            }
            Yaku::SanshokuDoujun | Yaku::Ittsu | Yaku::Chanta => {
                if closed {
                    2
                } else {
                    1
                }
            }
            Yaku::Toitoi
            | Yaku::Sanankou
            | Yaku::SanshokuDoukou
            | Yaku::Sankantsu
            | Yaku::Shousangen
            | Yaku::Honroutou => 2,
            Yaku::Honitsu | Yaku::Junchan => {
                if closed {
                    3
                } else {
                    2
                }
            }
            Yaku::Ryanpeikou => {
                if closed {
                    3
                } else {
                    0
                }
            }
            Yaku::Chinitsu => {
                if closed {
                    6
                } else {
                    5
                }
            }
            Yaku::NagashiMangan => 5,
            _ => 0,
        }
    }

    /// Yakuman multiplier; 0 for ordinary yaku.
    #[must_use]
    pub const fn yakuman(self) -> u8 {
        match self {
            Yaku::Kokushi13
            | Yaku::SuuankouTanki
            | Yaku::Daisuushii
            | Yaku::JunseiChuuren => 2,
            Yaku::Kokushi
            | Yaku::Suuankou
            | Yaku::Daisangen
            | Yaku::Shousuushii
            | Yaku::Tsuuiisou
            | Yaku::Chinroutou
            | Yaku::Ryuuiisou
            | Yaku::Chuuren
            | Yaku::Suukantsu
            | Yaku::Tenhou
            | Yaku::Chiihou => 1,
            _ => 0,
        }
    }
}

impl std::fmt::Display for Yaku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How the winning tile completed the hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Wait {
    Ryanmen,
    Kanchan,
    Penchan,
    Shanpon,
    Tanki,
}

impl Wait {
    /// Fu for the wait shape.
    #[must_use]
    pub const fn fu(self) -> u32 {
        match self {
            Wait::Kanchan | Wait::Penchan | Wait::Tanki => 2,
            Wait::Ryanmen | Wait::Shanpon => 0,
        }
    }
}

/// A full reading of a regular hand: four sets, a pair and the wait.
#[derive(Clone, Debug)]
pub struct Arrangement {
    pub pair: TileKind,
    pub sets: Vec<Set>,
    pub wait: Wait,
    /// No open melds.
    pub closed: bool,
}

const GREEN_TILES: [usize; 6] = [19, 20, 21, 23, 25, 32];

/// Yaku that depend only on the situation, not on the hand shape.
pub(crate) fn situational(ctx: &WinContext, closed: bool, out: &mut Vec<Yaku>) {
    if ctx.double_riichi {
        out.push(Yaku::DoubleRiichi);
    } else if ctx.riichi {
        out.push(Yaku::Riichi);
    }
    if ctx.ippatsu && (ctx.riichi || ctx.double_riichi) {
        out.push(Yaku::Ippatsu);
    }
    if ctx.is_tsumo && closed {
        out.push(Yaku::MenzenTsumo);
    }
    if ctx.rinshan && ctx.is_tsumo {
        out.push(Yaku::Rinshan);
    } else if ctx.haitei && ctx.is_tsumo {
        out.push(Yaku::Haitei);
    }
    if ctx.houtei && !ctx.is_tsumo {
        out.push(Yaku::Houtei);
    }
    if ctx.chankan && !ctx.is_tsumo {
        out.push(Yaku::Chankan);
    }
}

/// Yakuman that depend only on the situation.
pub(crate) fn situational_yakuman(ctx: &WinContext, out: &mut Vec<Yaku>) {
    if ctx.first_turn && ctx.is_tsumo {
        if ctx.seat_wind == Wind::East {
            out.push(Yaku::Tenhou);
        } else {
            out.push(Yaku::Chiihou);
        }
    }
}

/// Yaku for a regular four-sets-and-a-pair reading.
///
/// `all_counts` covers every tile of the hand, melds included, with
/// quads counted as three.
pub(crate) fn regular(arr: &Arrangement, ctx: &WinContext, all_counts: &Counts) -> Vec<Yaku> {
    let mut yakuman = Vec::new();
    situational_yakuman(ctx, &mut yakuman);

    let sets = &arr.sets;
    let pon_like: Vec<&Set> = sets.iter().filter(|s| s.is_pon_like()).collect();
    let runs: Vec<&Set> = sets.iter().filter(|s| s.is_run()).collect();
    let quads = sets.iter().filter(|s| s.shape == SetShape::Quad).count();
    let concealed_triplets = pon_like.iter().filter(|s| !s.open).count();
    let dragon_sets = pon_like.iter().filter(|s| s.first.is_dragon()).count();
    let wind_sets = pon_like.iter().filter(|s| s.first.is_wind()).count();
    let kinds_present: Vec<TileKind> = TileKind::all().filter(|k| all_counts[k.index()] > 0).collect();

    if concealed_triplets == 4 {
        yakuman.push(if arr.wait == Wait::Tanki {
            Yaku::SuuankouTanki
        } else {
            Yaku::Suuankou
        });
    }
    if dragon_sets == 3 {
        yakuman.push(Yaku::Daisangen);
    }
    if wind_sets == 4 {
        yakuman.push(Yaku::Daisuushii);
    } else if wind_sets == 3 && arr.pair.is_wind() {
        yakuman.push(Yaku::Shousuushii);
    }
    if kinds_present.iter().all(|k| k.is_honor()) {
        yakuman.push(Yaku::Tsuuiisou);
    }
    if kinds_present.iter().all(|k| k.is_terminal()) {
        yakuman.push(Yaku::Chinroutou);
    }
    if kinds_present.iter().all(|k| GREEN_TILES.contains(&k.index())) {
        yakuman.push(Yaku::Ryuuiisou);
    }
    if quads == 4 {
        yakuman.push(Yaku::Suukantsu);
    }
    if arr.closed && quads == 0 {
        if let Some(chuuren) = chuuren(all_counts, ctx.win_tile) {
            yakuman.push(chuuren);
        }
    }
    if !yakuman.is_empty() {
        return yakuman;
    }

    let mut out = Vec::new();
    situational(ctx, arr.closed, &mut out);

    let pair_is_valued = arr.pair.is_dragon()
        || arr.pair == ctx.seat_wind.tile_kind()
        || arr.pair == ctx.round_wind.tile_kind();
    if arr.closed && runs.len() == 4 && !pair_is_valued && arr.wait == Wait::Ryanmen {
        out.push(Yaku::Pinfu);
    }
    if kinds_present.iter().all(|k| k.is_simple()) {
        out.push(Yaku::Tanyao);
    }

    if arr.closed {
        let mut run_starts: Vec<TileKind> = runs.iter().map(|s| s.first).collect();
        run_starts.sort();
        let mut identical_pairs = 0;
        let mut i = 0;
        while i + 1 < run_starts.len() {
            if run_starts[i] == run_starts[i + 1] {
                identical_pairs += 1;
                i += 2;
            } else {
                i += 1;
            }
        }
        if identical_pairs == 2 {
            out.push(Yaku::Ryanpeikou);
        } else if identical_pairs == 1 {
            out.push(Yaku::Iipeikou);
        }
    }

    for set in &pon_like {
        match set.first {
            TileKind::WHITE => out.push(Yaku::Haku),
            TileKind::GREEN => out.push(Yaku::Hatsu),
            TileKind::RED => out.push(Yaku::Chun),
            _ => {}
        }
        if set.first == ctx.seat_wind.tile_kind() {
            out.push(Yaku::SeatWind);
        }
        if set.first == ctx.round_wind.tile_kind() {
            out.push(Yaku::RoundWind);
        }
    }

    if three_suits(&runs) {
        out.push(Yaku::SanshokuDoujun);
    }
    if straight(&runs) {
        out.push(Yaku::Ittsu);
    }

    let all_groups_outside = sets.iter().all(|s| s.has_terminal_or_honor()) && arr.pair.is_terminal_or_honor();
    let has_honor = kinds_present.iter().any(|k| k.is_honor());
    if all_groups_outside && !runs.is_empty() {
        let all_with_terminal = sets.iter().all(|s| s.has_terminal()) && arr.pair.is_terminal();
        if all_with_terminal && !has_honor {
            out.push(Yaku::Junchan);
        } else {
            out.push(Yaku::Chanta);
        }
    }

    if pon_like.len() == 4 {
        out.push(Yaku::Toitoi);
    }
    if concealed_triplets == 3 {
        out.push(Yaku::Sanankou);
    }
    if three_suit_triplets(&pon_like) {
        out.push(Yaku::SanshokuDoukou);
    }
    if quads == 3 {
        out.push(Yaku::Sankantsu);
    }
    if dragon_sets == 2 && arr.pair.is_dragon() {
        out.push(Yaku::Shousangen);
    }
    if kinds_present.iter().all(|k| k.is_terminal_or_honor()) {
        out.push(Yaku::Honroutou);
    }
    flush(&kinds_present, &mut out);
    out
}

/// Yaku for a seven-pairs hand.
pub(crate) fn chiitoi(ctx: &WinContext, counts: &Counts) -> Vec<Yaku> {
    let kinds: Vec<TileKind> = TileKind::all().filter(|k| counts[k.index()] > 0).collect();
    let mut yakuman = Vec::new();
    situational_yakuman(ctx, &mut yakuman);
    if kinds.iter().all(|k| k.is_honor()) {
        yakuman.push(Yaku::Tsuuiisou);
    }
    if !yakuman.is_empty() {
        return yakuman;
    }

    let mut out = Vec::new();
    situational(ctx, true, &mut out);
    out.push(Yaku::Chiitoitsu);
    if kinds.iter().all(|k| k.is_simple()) {
        out.push(Yaku::Tanyao);
    }
    if kinds.iter().all(|k| k.is_terminal_or_honor()) {
        out.push(Yaku::Honroutou);
    }
    flush(&kinds, &mut out);
    out
}

/// Yakuman for thirteen orphans.
pub(crate) fn kokushi(ctx: &WinContext, counts: &Counts) -> Vec<Yaku> {
    let mut out = Vec::new();
    situational_yakuman(ctx, &mut out);
    // thirteen-sided when the winning tile is the pair
    if counts[ctx.win_tile.index()] == 2 {
        out.push(Yaku::Kokushi13);
    } else {
        out.push(Yaku::Kokushi);
    }
    out
}

fn flush(kinds: &[TileKind], out: &mut Vec<Yaku>) {
    let number_suits: Vec<Suit> = {
        let mut suits: Vec<Suit> = kinds.iter().filter(|k| !k.is_honor()).map(|k| k.suit()).collect();
        suits.dedup();
        suits
    };
    if number_suits.len() != 1 {
        return;
    }
    if kinds.iter().any(|k| k.is_honor()) {
        out.push(Yaku::Honitsu);
    } else {
        out.push(Yaku::Chinitsu);
    }
}

fn three_suits(runs: &[&Set]) -> bool {
    runs.iter().any(|a| {
        a.first.suit() == Suit::Man
            && [Suit::Pin, Suit::Sou].iter().all(|&suit| {
                runs.iter()
                    .any(|b| b.first.suit() == suit && b.first.rank() == a.first.rank())
            })
    })
}

fn straight(runs: &[&Set]) -> bool {
    [Suit::Man, Suit::Pin, Suit::Sou].iter().any(|&suit| {
        [1, 4, 7]
            .iter()
            .all(|&rank| runs.iter().any(|r| r.first.suit() == suit && r.first.rank() == rank))
    })
}

fn three_suit_triplets(sets: &[&Set]) -> bool {
    sets.iter().any(|a| {
        a.first.suit() == Suit::Man
            && [Suit::Pin, Suit::Sou].iter().all(|&suit| {
                sets.iter()
                    .any(|b| b.first.suit() == suit && b.first.rank() == a.first.rank())
            })
    })
}

/// Nine gates: one suit shaped 1112345678999 plus one tile.
fn chuuren(counts: &Counts, win_tile: TileKind) -> Option<Yaku> {
    const BASE: [u8; 9] = [3, 1, 1, 1, 1, 1, 1, 1, 3];
    let suit = win_tile.suit();
    if suit == Suit::Honor {
        return None;
    }
    let offset = suit.offset() as usize;
    let total: u8 = counts.iter().sum();
    let in_suit: u8 = counts[offset..offset + 9].iter().sum();
    if total != 14 || in_suit != 14 {
        return None;
    }
    if (0..9).any(|r| counts[offset + r] < BASE[r]) {
        return None;
    }
    let before_win = counts[win_tile.index()] - 1;
    if before_win == BASE[win_tile.rank() as usize - 1] {
        Some(Yaku::JunseiChuuren)
    } else {
        Some(Yaku::Chuuren)
    }
}
