//! Settlement, dealer rotation and match end.
//!
//! ## Settlement
//!
//! - Ron: each winner collects the ron value from the discarder. Only
//!   the winner nearest the discarder takes the honba surcharge and the
//!   kyotaku pool. Under pao the liable seat pays half; the honba stays
//!   with the discarder's half.
//! - Tsumo: dealer/non-dealer rates plus honba per payer. Under pao the
//!   liable seat pays everything.
//! - Exhaustive draw: nagashi mangan if anyone qualifies, otherwise the
//!   noten pool moves from noten to tenpai seats.
//! - Abortive draw: no transfer.
//!
//! ## Rotation
//!
//! The dealer keeps the seat (renchan) on a dealer win, dealer tenpai or
//! an abortive draw. Honba grows on renchan and resets whenever the
//! dealer seat moves on.

use std::fmt;

use serde::Serialize;

use crate::core::{MatchLength, PlayerId, PlayerMap, RoundState, RuleConfig};
use crate::hand::HandResult;
use crate::rules::{VariantRules, RIICHI_COST};
use crate::table::{Player, Table};

/// Abortive draw triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortKind {
    KyuushuKyuuhai,
    SuuchaRiichi,
    SuufuuRenda,
    SuukanSettsu,
    TripleRon,
}

impl AbortKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            AbortKind::KyuushuKyuuhai => "kyuushu_kyuuhai",
            AbortKind::SuuchaRiichi => "suucha_riichi",
            AbortKind::SuufuuRenda => "suufuu_renda",
            AbortKind::SuukanSettsu => "suukan_settsu",
            AbortKind::TripleRon => "triple_ron",
        }
    }
}

impl fmt::Display for AbortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for AbortKind {
    type Err = crate::error::EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            AbortKind::KyuushuKyuuhai,
            AbortKind::SuuchaRiichi,
            AbortKind::SuufuuRenda,
            AbortKind::SuukanSettsu,
            AbortKind::TripleRon,
        ]
        .into_iter()
        .find(|k| k.name() == s)
        .ok_or_else(|| crate::error::EngineError::Parse {
            input: s.to_string(),
            message: "unknown abortive draw".to_string(),
        })
    }
}

/// One winner's hand and liability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WinRecord {
    pub player: PlayerId,
    pub hand: HandResult,
    /// Seat liable under pao for this win.
    pub liable: Option<PlayerId>,
}

/// How a kyoku ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoundResult {
    /// Winners ordered nearest-first from the discarder.
    Ron { discarder: PlayerId, wins: Vec<WinRecord> },
    Tsumo { win: WinRecord },
    ExhaustiveDraw { tenpai: Vec<PlayerId>, nagashi: Vec<PlayerId> },
    AbortiveDraw { kind: AbortKind },
}

impl RoundResult {
    #[must_use]
    pub fn winners(&self) -> Vec<PlayerId> {
        match self {
            RoundResult::Ron { wins, .. } => wins.iter().map(|w| w.player).collect(),
            RoundResult::Tsumo { win } => vec![win.player],
            _ => Vec::new(),
        }
    }
}

/// Settled kyoku.
#[derive(Clone, Debug, Serialize)]
pub struct Settlement {
    pub result: RoundResult,
    pub deltas: PlayerMap<i32>,
    /// Kyotaku sticks collected by the winner.
    pub kyotaku_claimed: u32,
    pub renchan: bool,
    pub match_over: bool,
}

/// Final placement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub rank: usize,
    pub player: PlayerId,
    pub name: String,
    pub points: i32,
}

#[derive(Clone, Debug)]
pub struct RoundManager {
    state: RoundState,
    target_points: i32,
    match_length: MatchLength,
    sudden_death_enabled: bool,
    kyoku_played: u32,
    match_over: bool,
}

impl RoundManager {
    #[must_use]
    pub fn new(config: &RuleConfig) -> Self {
        Self {
            state: RoundState::new(config.player_count()),
            target_points: config.target_points,
            match_length: config.match_length,
            sudden_death_enabled: config.sudden_death,
            kyoku_played: 0,
            match_over: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    #[must_use]
    pub fn dealer(&self) -> PlayerId {
        self.state.dealer
    }

    #[must_use]
    pub fn kyoku_played(&self) -> u32 {
        self.kyoku_played
    }

    #[must_use]
    pub fn is_match_over(&self) -> bool {
        self.match_over
    }

    /// Move a riichi deposit from the seat to the table.
    pub fn deposit_riichi(&mut self, player: &mut Player) {
        player.points -= RIICHI_COST;
        self.state.kyotaku += 1;
    }

    /// Apply a kyoku result: points, sticks, honba, match end, rotation.
    pub fn settle(&mut self, table: &mut Table, rules: &dyn VariantRules, result: RoundResult) -> Settlement {
        let dealer = self.state.dealer;
        let (deltas, kyotaku_claimed) = self.deltas(rules, table, &result);
        for (player, delta) in deltas.iter() {
            table.players[player].points += *delta;
        }
        self.state.kyotaku -= kyotaku_claimed;

        let (renchan, dealer_kept) = match &result {
            RoundResult::Ron { .. } | RoundResult::Tsumo { .. } => {
                let dealer_won = result.winners().contains(&dealer);
                (dealer_won, dealer_won)
            }
            RoundResult::ExhaustiveDraw { tenpai, .. } => {
                let dealer_tenpai = tenpai.contains(&dealer);
                (dealer_tenpai, dealer_tenpai)
            }
            RoundResult::AbortiveDraw { .. } => (true, false),
        };
        if renchan {
            self.state.honba += 1;
        } else {
            self.state.honba = 0;
        }

        let match_over = self.check_match_end(table, rules, renchan, dealer_kept);
        if !match_over && !renchan {
            self.rotate(rules);
        }
        self.kyoku_played += 1;
        self.match_over = match_over;

        log::info!(
            "Kyoku settled ({:?}), renchan: {}, next: {}{}",
            result.winners(),
            renchan,
            self.state.label(),
            if match_over { ", match over" } else { "" }
        );
        Settlement {
            result,
            deltas,
            kyotaku_claimed,
            renchan,
            match_over,
        }
    }

    fn deltas(&self, rules: &dyn VariantRules, table: &Table, result: &RoundResult) -> (PlayerMap<i32>, u32) {
        let player_count = table.player_count();
        let dealer = self.state.dealer;
        let honba = self.state.honba as i32;
        let pool = self.state.kyotaku as i32 * RIICHI_COST;
        let mut deltas = PlayerMap::with_value(player_count, 0);

        match result {
            RoundResult::Ron { discarder, wins } => {
                for (i, win) in wins.iter().enumerate() {
                    let nearest = i == 0;
                    let ron = win.hand.payments.ron;
                    let surcharge = if nearest { honba * rules.ron_honba() } else { 0 };
                    match win.liable.filter(|&seat| seat != *discarder) {
                        Some(liable) => {
                            let half = ron / 2;
                            deltas[liable] -= half;
                            deltas[*discarder] -= ron - half + surcharge;
                        }
                        None => deltas[*discarder] -= ron + surcharge,
                    }
                    deltas[win.player] += ron + surcharge;
                    if nearest {
                        deltas[win.player] += pool;
                    }
                }
                (deltas, if wins.is_empty() { 0 } else { self.state.kyotaku })
            }
            RoundResult::Tsumo { win } => {
                let winner = win.player;
                let per_payer = honba * rules.tsumo_honba_per_payer();
                match win.liable {
                    Some(liable) => {
                        let total = win.hand.score + per_payer * (player_count as i32 - 1);
                        deltas[liable] -= total;
                        deltas[winner] += total;
                    }
                    None => {
                        let owed = win.hand.payment_table(winner, dealer, None, player_count);
                        for (seat, amount) in owed.iter() {
                            deltas[seat] += *amount;
                        }
                        for payer in PlayerId::others_in_order(winner, player_count) {
                            deltas[payer] -= per_payer;
                            deltas[winner] += per_payer;
                        }
                    }
                }
                deltas[winner] += pool;
                (deltas, self.state.kyotaku)
            }
            RoundResult::ExhaustiveDraw { tenpai, nagashi } => {
                if nagashi.is_empty() {
                    let tenpai_count = tenpai.len();
                    if tenpai_count > 0 && tenpai_count < player_count {
                        let pool = rules.noten_pool();
                        let gain = pool / tenpai_count as i32;
                        let loss = pool / (player_count - tenpai_count) as i32;
                        for (seat, delta) in deltas.iter_mut() {
                            *delta = if tenpai.contains(&seat) { gain } else { -loss };
                        }
                    }
                } else {
                    for &winner in nagashi {
                        let payments = rules.nagashi_payments(winner == dealer);
                        for (seat, amount) in payments.table(winner, dealer, None, player_count).iter() {
                            deltas[seat] += *amount;
                        }
                    }
                }
                (deltas, 0)
            }
            RoundResult::AbortiveDraw { .. } => (deltas, 0),
        }
    }

    fn check_match_end(&mut self, table: &Table, rules: &dyn VariantRules, renchan: bool, dealer_kept: bool) -> bool {
        if table.players.values().any(|p| p.points < 0) {
            return true;
        }
        let reached = table.players.values().any(|p| p.points >= self.target_points);
        let final_wind = self.match_length.winds() - 1;
        let wind = self.state.round_wind.index();
        let last_kyoku = self.state.kyoku + 1 == rules.kyoku_per_wind();

        if self.state.sudden_death {
            // one extra wind at most
            return reached || (!renchan && last_kyoku && wind > final_wind);
        }
        if wind < final_wind || !last_kyoku {
            return false;
        }
        if renchan {
            let dealer = self.state.dealer;
            return dealer_kept
                && self.ranking(table).first() == Some(&dealer)
                && table.players[dealer].points >= self.target_points;
        }
        if reached || !self.sudden_death_enabled {
            return true;
        }
        self.state.sudden_death = true;
        false
    }

    fn rotate(&mut self, rules: &dyn VariantRules) {
        self.state.dealer = self.state.dealer.next(rules.player_count());
        self.state.kyoku += 1;
        if self.state.kyoku >= rules.kyoku_per_wind() {
            self.state.kyoku = 0;
            self.state.round_wind = self.state.round_wind.next();
        }
    }

    /// Seats by points, ties broken by the frozen initial seat order.
    #[must_use]
    pub fn ranking(&self, table: &Table) -> Vec<PlayerId> {
        let mut seats: Vec<PlayerId> = table.players.player_ids().collect();
        seats.sort_by_key(|&p| (std::cmp::Reverse(table.players[p].points), self.state.seat_order_rank(p)));
        seats
    }

    /// Close the match: leftover kyotaku go to first place.
    pub fn final_standings(&mut self, table: &mut Table) -> Vec<Standing> {
        let ranking = self.ranking(table);
        if let Some(&top) = ranking.first() {
            table.players[top].points += self.state.kyotaku as i32 * RIICHI_COST;
            self.state.kyotaku = 0;
        }
        self.match_over = true;
        ranking
            .into_iter()
            .enumerate()
            .map(|(i, player)| Standing {
                rank: i + 1,
                player,
                name: table.players[player].name.clone(),
                points: table.players[player].points,
            })
            .collect()
    }
}
