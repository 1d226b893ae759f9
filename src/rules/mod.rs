//! Variant rules and situational rule checks.
//!
//! The four- and three-player variants differ in a handful of numbers
//! and switches. Those live behind the [`VariantRules`] trait; the call
//! and round managers are shared and consult the trait object chosen
//! once at match construction.
//!
//! ## Implementation Notes
//!
//! - `allows_chi`: three-player has no chi at all
//! - `noten_pool`: split among tenpai seats on an exhaustive draw
//! - `ron_honba`: ron adds `(player_count - 1) * 100` per honba

use std::fmt::Debug;

mod effects;

pub use effects::{RuleEffectManager, RIICHI_COST, RIICHI_MIN_WALL};

use crate::core::Variant;
use crate::hand::{base_points, Payments};
use crate::tiles::TileKind;

/// Variant capability contract.
pub trait VariantRules: Debug + Send + Sync {
    fn variant(&self) -> Variant;

    fn player_count(&self) -> usize {
        self.variant().player_count()
    }

    fn is_three_player(&self) -> bool {
        self.variant().is_three_player()
    }

    /// Chi is offered to the seat after the discarder.
    fn allows_chi(&self) -> bool;

    /// Kyoku in each wind before the round wind advances.
    fn kyoku_per_wind(&self) -> usize {
        self.player_count()
    }

    /// Points moved from noten to tenpai seats on exhaustive draw.
    fn noten_pool(&self) -> i32;

    /// Honba surcharge on a ron, per honba.
    fn ron_honba(&self) -> i32 {
        (self.player_count() as i32 - 1) * 100
    }

    /// Honba surcharge on a tsumo, per honba and payer.
    fn tsumo_honba_per_payer(&self) -> i32 {
        100
    }

    /// Four-winds and four-riichi abortive draws apply.
    fn four_seat_aborts(&self) -> bool;

    /// Nagashi mangan pays as a mangan tsumo.
    fn nagashi_payments(&self, winner_is_dealer: bool) -> Payments {
        Payments::from_base(base_points(5, 0, 0), winner_is_dealer)
    }

    fn dora_successor(&self, indicator: TileKind) -> TileKind {
        indicator.dora_successor(self.is_three_player())
    }
}

/// Standard four-player rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct FourPlayer;

impl VariantRules for FourPlayer {
    fn variant(&self) -> Variant {
        Variant::FourPlayer
    }

    fn allows_chi(&self) -> bool {
        true
    }

    fn noten_pool(&self) -> i32 {
        3000
    }

    fn four_seat_aborts(&self) -> bool {
        true
    }
}

/// Three-player (sanma) rules: no chi, man 2-8 removed, tsumo-loss.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreePlayer;

impl VariantRules for ThreePlayer {
    fn variant(&self) -> Variant {
        Variant::ThreePlayer
    }

    fn allows_chi(&self) -> bool {
        false
    }

    fn noten_pool(&self) -> i32 {
        2000
    }

    fn four_seat_aborts(&self) -> bool {
        false
    }
}

/// Pick the rules object for a variant.
#[must_use]
pub fn rules_for(variant: Variant) -> Box<dyn VariantRules> {
    match variant {
        Variant::FourPlayer => Box::new(FourPlayer),
        Variant::ThreePlayer => Box::new(ThreePlayer),
    }
}
