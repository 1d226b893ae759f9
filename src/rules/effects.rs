//! Situational rule checks: riichi, furiten, pao and abortive draws.
//!
//! All checks are read-only except the furiten recompute, which writes
//! the derived discard-furiten flag back to the seat.

use crate::core::PlayerId;
use crate::error::{EngineError, EngineResult};
use crate::table::{PaoKind, Player, Table};
use crate::tiles::{MeldType, Tile, TileKind};

/// Riichi deposit.
pub const RIICHI_COST: i32 = 1000;

/// Live tiles that must remain to declare riichi.
pub const RIICHI_MIN_WALL: usize = 4;

/// Distinct terminal/honor kinds needed for kyuushu kyuuhai.
const KYUUSHU_KINDS: usize = 9;

pub struct RuleEffectManager;

impl RuleEffectManager {
    /// Validate a riichi declaration discarding `tile`.
    pub fn check_riichi(player: &Player, tile: Tile, live_remaining: usize) -> EngineResult<()> {
        let id = player.id;
        if player.riichi {
            return Err(EngineError::riichi(id, "already in riichi"));
        }
        if !player.is_closed() {
            return Err(EngineError::riichi(id, "hand is open"));
        }
        if player.points < RIICHI_COST {
            return Err(EngineError::riichi(id, "fewer than 1000 points"));
        }
        if live_remaining < RIICHI_MIN_WALL {
            return Err(EngineError::InsufficientWall {
                player: id,
                remaining: live_remaining,
            });
        }
        if player.waits_without(tile).is_empty() {
            return Err(EngineError::riichi(id, format!("discarding {} is not tenpai", tile)));
        }
        Ok(())
    }

    /// Discards from a 14-tile hand that would make a legal riichi.
    #[must_use]
    pub fn riichi_discards(player: &Player, live_remaining: usize) -> Vec<Tile> {
        let mut seen: Vec<(TileKind, bool)> = Vec::new();
        player
            .hand()
            .iter()
            .filter(|t| {
                let key = (t.kind(), t.is_red());
                if seen.contains(&key) {
                    return false;
                }
                seen.push(key);
                Self::check_riichi(player, **t, live_remaining).is_ok()
            })
            .copied()
            .collect()
    }

    /// Recompute discard furiten from the current waits.
    pub fn update_furiten(player: &mut Player) {
        let waits = player.waits();
        player.furiten.discard = waits.iter().any(|&k| player.has_discarded(k));
    }

    /// Any furiten source blocks ron. Discard furiten is recomputed so
    /// a wait discarded since the last draw counts immediately.
    #[must_use]
    pub fn is_furiten(player: &Player) -> bool {
        player.furiten.temporary
            || player.furiten.riichi
            || player.waits().iter().any(|&k| player.has_discarded(k))
    }

    /// A ron was available and not taken.
    pub fn pass_ron(player: &mut Player) {
        player.furiten.temporary = true;
        if player.riichi {
            player.furiten.riichi = true;
        }
    }

    /// Kyuushu kyuuhai: nine or more distinct terminal/honor kinds.
    #[must_use]
    pub fn is_kyuushu(player: &Player) -> bool {
        TileKind::TERMINALS_AND_HONORS
            .iter()
            .filter(|&&k| player.hand_kinds().any(|h| h == k))
            .count()
            >= KYUUSHU_KINDS
    }

    /// Every seat is in riichi.
    #[must_use]
    pub fn is_suucha_riichi(table: &Table) -> bool {
        table.players.values().all(|p| p.riichi)
    }

    /// Four seats discarded the same wind as their first discards.
    #[must_use]
    pub fn is_suufuu_renda(first_discards: &[TileKind], player_count: usize) -> bool {
        first_discards.len() == player_count
            && player_count == 4
            && first_discards[0].is_wind()
            && first_discards.iter().all(|&k| k == first_discards[0])
    }

    /// Four kans declared by more than one seat.
    #[must_use]
    pub fn is_suukan_settsu(table: &Table) -> bool {
        table.total_kans() >= 4 && table.kan_declarers() > 1
    }

    /// Liability created by the call `player` just made from `from`.
    #[must_use]
    pub fn pao_after_call(player: &Player, from: PlayerId) -> Option<(PaoKind, PlayerId)> {
        let last = player.melds().last()?;
        if !matches!(last.meld_type, MeldType::Pon | MeldType::Daiminkan) {
            return None;
        }
        let called_kind = last.base_kind();
        let pon_like = |pred: fn(TileKind) -> bool| {
            player
                .melds()
                .iter()
                .filter(|m| m.meld_type != MeldType::Chi && pred(m.base_kind()))
                .count()
        };
        if called_kind.is_dragon() && pon_like(TileKind::is_dragon) == 3 {
            return Some((PaoKind::Daisangen, from));
        }
        if called_kind.is_wind() && pon_like(TileKind::is_wind) == 4 {
            return Some((PaoKind::Daisuushii, from));
        }
        None
    }
}
