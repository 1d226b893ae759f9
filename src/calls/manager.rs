//! Call eligibility and meld execution.
//!
//! ## Responses to a discard
//!
//! - ron: the hand plus the tile evaluates as a win and no furiten applies
//! - pon / daiminkan: two / three matching tiles, red fives interchangeable
//! - chi: the discarder's next seat only, when the variant allows it
//!
//! Houtei and chankan windows offer ron only. A call that would leave
//! no legal discard under the kuikae restriction is not offered.
//!
//! ## Kans
//!
//! Every kan needs a replacement draw. A closed kan reveals its dora
//! indicator at once; open and added kans reveal after the next discard.

use smallvec::{smallvec, SmallVec};

use super::window::{CallWindow, WindowKind};
use crate::core::{ActionKind, CallOption, PlayerId, RoundState, SelfAction};
use crate::error::{EngineError, EngineResult};
use crate::hand::{HandEvaluator, HandResult, WinContext};
use crate::rules::{RuleEffectManager, VariantRules};
use crate::table::{Player, Table};
use crate::tiles::{Meld, MeldType, Tile, TileKind};

/// Most kans allowed in one kyoku.
pub const MAX_KANS: usize = 4;

/// Run shapes around a chi'd tile, as rank offsets of the two hand tiles.
const CHI_SHAPES: [(i8, i8); 3] = [(-2, -1), (-1, 1), (1, 2)];

/// When a kan's dora indicator is revealed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoraTiming {
    Immediate,
    AfterDiscard,
}

/// What executing a call or kan produced.
#[derive(Clone, Debug)]
pub struct MeldOutcome {
    pub meld: Meld,
    /// The caller draws from the dead wall next.
    pub replacement: bool,
    pub dora: Option<DoraTiming>,
}

/// Call and kan logic shared by both variants; variant differences come
/// from the [`VariantRules`] object.
pub struct ActionManager;

impl ActionManager {
    /// Win context for `player` with the table's dora and the seat's flags.
    #[must_use]
    pub fn win_context(
        table: &Table,
        rules: &dyn VariantRules,
        round: &RoundState,
        player: PlayerId,
        win_tile: TileKind,
        is_tsumo: bool,
    ) -> WinContext {
        let player_count = table.player_count();
        let seat = &table.players[player];
        let mut ctx = WinContext::new(
            win_tile,
            is_tsumo,
            round.round_wind,
            round.seat_wind(player, player_count),
            player_count,
        );
        ctx.riichi = seat.riichi;
        ctx.double_riichi = seat.double_riichi;
        ctx.ippatsu = seat.ippatsu;
        ctx.dora = table.dora_kinds(rules);
        if seat.riichi {
            ctx.ura_dora = table.uradora_kinds(rules);
        }
        ctx
    }

    /// Legal responses of every other seat to `tile`, nearest seat first.
    /// Seats without options are left out.
    #[must_use]
    pub fn get_possible_actions(
        table: &Table,
        rules: &dyn VariantRules,
        round: &RoundState,
        discarder: PlayerId,
        tile: Tile,
        kind: WindowKind,
    ) -> Vec<(PlayerId, Vec<CallOption>)> {
        let player_count = table.player_count();
        let houtei = table.wall.live_remaining() == 0;
        PlayerId::others_in_order(discarder, player_count)
            .map(|player| {
                let mut options = Vec::new();
                if Self::can_ron(table, rules, round, player, tile, kind) {
                    options.push(CallOption::new(ActionKind::Ron, tile, &[]));
                }
                if kind == WindowKind::Discard && !houtei {
                    options.extend(Self::pon_and_kan_options(table, player, tile));
                    if rules.allows_chi() && player == discarder.next(player_count) {
                        options.extend(Self::chi_options(&table.players[player], tile));
                    }
                }
                (player, options)
            })
            .filter(|(_, options)| !options.is_empty())
            .collect()
    }

    /// Evaluate `player`'s hand completed by another seat's tile.
    #[must_use]
    pub fn evaluate_ron(
        table: &Table,
        rules: &dyn VariantRules,
        round: &RoundState,
        player: PlayerId,
        tile: Tile,
        kind: WindowKind,
    ) -> HandResult {
        let seat = &table.players[player];
        let mut ctx = Self::win_context(table, rules, round, player, tile.kind(), false);
        ctx.houtei = kind == WindowKind::Discard && table.wall.live_remaining() == 0;
        ctx.chankan = kind == WindowKind::Chankan;
        let mut concealed = seat.hand().to_vec();
        concealed.push(tile);
        HandEvaluator::evaluate(&concealed, seat.melds(), &ctx)
    }

    /// Evaluate a self-drawn win on the seat's last drawn tile.
    #[must_use]
    pub fn evaluate_tsumo(
        table: &Table,
        rules: &dyn VariantRules,
        round: &RoundState,
        player: PlayerId,
        rinshan: bool,
        first_turn: bool,
    ) -> HandResult {
        let seat = &table.players[player];
        let Some(drawn) = seat.last_drawn() else {
            return HandResult::not_win();
        };
        let mut ctx = Self::win_context(table, rules, round, player, drawn.kind(), true);
        ctx.rinshan = rinshan;
        ctx.haitei = !rinshan && table.wall.live_remaining() == 0;
        ctx.first_turn = first_turn;
        HandEvaluator::evaluate(seat.hand(), seat.melds(), &ctx)
    }

    fn can_ron(
        table: &Table,
        rules: &dyn VariantRules,
        round: &RoundState,
        player: PlayerId,
        tile: Tile,
        kind: WindowKind,
    ) -> bool {
        !RuleEffectManager::is_furiten(&table.players[player])
            && Self::evaluate_ron(table, rules, round, player, tile, kind).is_win
    }

    fn pon_and_kan_options(table: &Table, player: PlayerId, tile: Tile) -> Vec<CallOption> {
        let seat = &table.players[player];
        if seat.riichi {
            return Vec::new();
        }
        let matching = seat.tiles_of(tile.kind());
        let mut options = Vec::new();
        let mut seen_reds: SmallVec<[usize; 3]> = SmallVec::new();
        for (i, a) in matching.iter().enumerate() {
            for b in &matching[i + 1..] {
                let reds = usize::from(a.is_red()) + usize::from(b.is_red());
                if seen_reds.contains(&reds) {
                    continue;
                }
                seen_reds.push(reds);
                let consumed = [*a, *b];
                let barred = Self::kuikae_kinds(tile, &consumed, ActionKind::Pon);
                if Self::leaves_discard(seat, &consumed, &barred) {
                    options.push(CallOption::new(ActionKind::Pon, tile, &consumed));
                }
            }
        }
        if matching.len() >= 3 && Self::kan_available(table) {
            options.push(CallOption::new(ActionKind::Daiminkan, tile, &matching[..3]));
        }
        options
    }

    fn chi_options(seat: &Player, tile: Tile) -> Vec<CallOption> {
        if seat.riichi || tile.kind().is_honor() {
            return Vec::new();
        }
        let mut options = Vec::new();
        for (da, db) in CHI_SHAPES {
            let (Some(low), Some(high)) = (tile.kind().offset_by(da), tile.kind().offset_by(db)) else {
                continue;
            };
            let mut seen: SmallVec<[(bool, bool); 4]> = SmallVec::new();
            for a in seat.tiles_of(low) {
                for b in seat.tiles_of(high) {
                    let key = (a.is_red(), b.is_red());
                    if seen.contains(&key) {
                        continue;
                    }
                    seen.push(key);
                    let consumed = [a, b];
                    let barred = Self::kuikae_kinds(tile, &consumed, ActionKind::Chi);
                    if Self::leaves_discard(seat, &consumed, &barred) {
                        options.push(CallOption::new(ActionKind::Chi, tile, &consumed));
                    }
                }
            }
        }
        options
    }

    /// Kinds the caller may not discard right after the call: the called
    /// kind, and for an end-of-run chi the kind at the run's other end.
    #[must_use]
    pub fn kuikae_kinds(called: Tile, consumed: &[Tile], kind: ActionKind) -> SmallVec<[TileKind; 2]> {
        let called_kind = called.kind();
        let mut barred: SmallVec<[TileKind; 2]> = smallvec![called_kind];
        if kind == ActionKind::Chi {
            let opposite = if consumed.iter().all(|t| t.kind() > called_kind) {
                called_kind.offset_by(3)
            } else if consumed.iter().all(|t| t.kind() < called_kind) {
                called_kind.offset_by(-3)
            } else {
                None
            };
            barred.extend(opposite);
        }
        barred
    }

    fn leaves_discard(seat: &Player, consumed: &[Tile], barred: &[TileKind]) -> bool {
        seat.hand()
            .iter()
            .filter(|t| !consumed.iter().any(|c| c.id() == t.id()))
            .any(|t| !barred.contains(&t.kind()))
    }

    fn kan_available(table: &Table) -> bool {
        table.total_kans() < MAX_KANS && table.wall.live_remaining() > 0
    }

    /// Execute a pon, chi or daiminkan on `discarder`'s tile.
    pub fn perform_call(
        table: &mut Table,
        caller: PlayerId,
        option: &CallOption,
        discarder: PlayerId,
    ) -> EngineResult<MeldOutcome> {
        let meld_type = match option.kind {
            ActionKind::Pon => MeldType::Pon,
            ActionKind::Chi => MeldType::Chi,
            ActionKind::Daiminkan => MeldType::Daiminkan,
            other => return Err(EngineError::illegal(caller, format!("{} is not a call", other))),
        };
        let seat = &mut table.players[caller];
        if !seat.remove_tiles(&option.consumed) {
            return Err(EngineError::illegal(caller, "called with tiles not in hand"));
        }

        let mut tiles: SmallVec<[Tile; 4]> = option.consumed.iter().copied().collect();
        tiles.push(option.tile);
        let meld = Meld::new(meld_type, &tiles, Some(option.tile), Some(discarder));
        seat.add_meld(meld.clone());
        if meld_type != MeldType::Daiminkan {
            seat.kuikae = Self::kuikae_kinds(option.tile, &option.consumed, option.kind);
        }
        if let Some(pao) = RuleEffectManager::pao_after_call(seat, discarder) {
            log::debug!("{} is liable for {:?} of {}", discarder, pao.0, caller);
            seat.pao = Some(pao);
        }
        table.players[discarder].mark_last_discard_called();
        Self::clear_ippatsu(table);

        log::debug!("{} calls {} on {} from {}", caller, option.kind, option.tile, discarder);
        let is_kan = meld_type.is_kan();
        Ok(MeldOutcome {
            meld,
            replacement: is_kan,
            dora: is_kan.then_some(DoraTiming::AfterDiscard),
        })
    }

    /// Closed kan legality. Under riichi only the drawn tile may complete
    /// it and the waits must be unchanged.
    #[must_use]
    pub fn can_ankan(table: &Table, player: PlayerId, kind: TileKind) -> bool {
        let seat = &table.players[player];
        let Some(drawn) = seat.last_drawn() else {
            return false;
        };
        if seat.tiles_of(kind).len() < 4 || !Self::kan_available(table) {
            return false;
        }
        if !seat.riichi {
            return true;
        }
        if drawn.kind() != kind {
            return false;
        }
        let before = seat.waits_without(drawn);
        let rest: Vec<Tile> = seat.hand().iter().filter(|t| t.kind() != kind).copied().collect();
        let after = HandEvaluator::waits(&rest, seat.melds().len() + 1);
        !before.is_empty() && before == after
    }

    /// Added kan legality: an own pon of `kind` and the fourth tile in hand.
    #[must_use]
    pub fn can_kakan(table: &Table, player: PlayerId, kind: TileKind) -> bool {
        let seat = &table.players[player];
        seat.last_drawn().is_some()
            && !seat.riichi
            && Self::kan_available(table)
            && !seat.tiles_of(kind).is_empty()
            && seat
                .melds()
                .iter()
                .any(|m| m.meld_type == MeldType::Pon && m.base_kind() == kind)
    }

    /// Kans the seat may declare on its own turn.
    #[must_use]
    pub fn self_kan_options(table: &Table, player: PlayerId) -> Vec<SelfAction> {
        let mut kinds: Vec<TileKind> = table.players[player].hand_kinds().collect();
        kinds.dedup();
        kinds
            .into_iter()
            .filter_map(|kind| {
                if Self::can_ankan(table, player, kind) {
                    Some(SelfAction::Ankan { tile: kind.to_string() })
                } else if Self::can_kakan(table, player, kind) {
                    Some(SelfAction::Kakan { tile: kind.to_string() })
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn declare_ankan(table: &mut Table, player: PlayerId, kind: TileKind) -> EngineResult<MeldOutcome> {
        if !Self::can_ankan(table, player, kind) {
            return Err(EngineError::illegal(player, format!("ankan of {} is not legal", kind)));
        }
        let seat = &mut table.players[player];
        let tiles = seat.tiles_of(kind);
        if !seat.remove_tiles(&tiles) {
            return Err(EngineError::illegal(player, "ankan tiles are not in hand"));
        }
        let meld = Meld::new(MeldType::Ankan, &tiles, None, None);
        seat.add_meld(meld.clone());
        Self::clear_ippatsu(table);
        log::debug!("{} declares ankan of {}", player, kind);
        Ok(MeldOutcome {
            meld,
            replacement: true,
            dora: Some(DoraTiming::Immediate),
        })
    }

    /// Upgrade a pon. Returns the added tile, which others may rob.
    pub fn declare_kakan(table: &mut Table, player: PlayerId, kind: TileKind) -> EngineResult<(Tile, MeldOutcome)> {
        if !Self::can_kakan(table, player, kind) {
            return Err(EngineError::illegal(player, format!("kakan of {} is not legal", kind)));
        }
        let seat = &mut table.players[player];
        let tile = seat
            .last_drawn()
            .filter(|t| t.kind() == kind)
            .or_else(|| seat.tiles_of(kind).first().copied())
            .ok_or_else(|| EngineError::illegal(player, format!("no {} in hand", kind)))?;
        let meld = seat
            .upgrade_to_kakan(tile)
            .cloned()
            .ok_or_else(|| EngineError::illegal(player, format!("no pon of {}", kind)))?;
        Self::clear_ippatsu(table);
        log::debug!("{} declares kakan of {}", player, kind);
        Ok((
            tile,
            MeldOutcome {
                meld,
                replacement: true,
                dora: Some(DoraTiming::AfterDiscard),
            },
        ))
    }

    /// A seat declines its call options.
    pub fn skip_action(table: &mut Table, window: &mut CallWindow, player: PlayerId) -> EngineResult<()> {
        window.skip(player)?;
        if window.can_ron(player) {
            RuleEffectManager::pass_ron(&mut table.players[player]);
        }
        Ok(())
    }

    /// Furiten for every seat that could have ronned the window's tile
    /// but did not take it.
    pub fn apply_passed_ron(table: &mut Table, window: &CallWindow) {
        for player in window.passed_ron() {
            RuleEffectManager::pass_ron(&mut table.players[player]);
        }
    }

    fn clear_ippatsu(table: &mut Table) {
        for (_, seat) in table.players.iter_mut() {
            seat.ippatsu = false;
        }
    }
}
