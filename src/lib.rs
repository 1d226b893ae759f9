//! # riichi-engine
//!
//! Rules engine and turn/round state machine for Japanese Mahjong, in
//! the four-player and three-player (sanma) variants.
//!
//! ## Design Principles
//!
//! 1. **No I/O**: every command returns a batch of [`Event`]s addressed to
//!    all seats or one seat. Transport, rooms and clocks live outside.
//!
//! 2. **Variant as a strategy object**: the differences between four and
//!    three players sit behind the [`VariantRules`] trait, chosen once
//!    when the match is built.
//!
//! 3. **Validate, then mutate**: a rejected command leaves the match
//!    exactly as it was and reports one seat-scoped error event.
//!
//! ## Modules
//!
//! - `core`: seat ids, configuration, RNG, action vocabulary, events
//! - `tiles`: tiles, melds, the wall and dora indicators
//! - `hand`: shanten, waits, yaku, fu and points
//! - `table`: per-seat kyoku state and the table
//! - `rules`: variant rules, riichi, furiten, pao and abortive draws
//! - `calls`: call eligibility, meld execution and the call window
//! - `round`: turn order, settlement and match end
//! - `game`: the [`Game`] orchestrator, projections and AI strategies

pub mod calls;
pub mod core;
pub mod error;
pub mod game;
pub mod hand;
pub mod round;
pub mod rules;
pub mod table;
pub mod tiles;

// Re-export commonly used types
pub use crate::core::{
    visible_to, ActionKind, ActionRecord, Audience, CallOption, Event, EventName, GameRng, GameRngState, MatchLength,
    PlayerId, PlayerMap, RoundState, RuleConfig, SelfAction, Variant,
};

pub use crate::error::{EngineError, EngineResult};

pub use crate::tiles::{parse_hand, Meld, MeldType, Suit, Tile, TileKind, Wall, Wind};

pub use crate::hand::{HandEvaluator, HandResult, Payments, WinContext, Yaku};

pub use crate::table::{Discard, Player, Table};

pub use crate::rules::{rules_for, FourPlayer, RuleEffectManager, ThreePlayer, VariantRules};

pub use crate::calls::{ActionManager, CallWindow, Resolution, WindowKind};

pub use crate::round::{AbortKind, RoundManager, RoundResult, Settlement, Standing, TurnManager, WinRecord};

pub use crate::game::{
    Game, GameStateView, Observation, Phase, SeatSpec, Strategy, TimerKind, TsumogiriStrategy, TurnDecision,
};
