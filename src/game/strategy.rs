//! Decision contract for AI seats.
//!
//! A strategy sees the same [`Observation`] a human client would and
//! answers two questions: what to do on its own turn, and whether to
//! take one of its call options. Errors are reported to the orchestrator
//! and surface as a seat-scoped `error` event.

use serde::{Deserialize, Serialize};

use super::view::Observation;
use crate::core::{ActionKind, CallOption, SelfAction};
use crate::tiles::Tile;

/// An own-turn decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnDecision {
    Discard { tile: String, riichi: bool },
    Tsumo,
    Ankan { tile: String },
    Kakan { tile: String },
    KyuushuKyuuhai,
}

/// A synchronous decision maker driven by [`Game::step_ai`].
///
/// Both calls block until they answer. A host whose strategies answer
/// asynchronously (a remote model, a worker pool) should not use
/// `step_ai`: it observes the seat with [`Game::get_observation_for`]
/// and submits the eventual answer through [`Game::discard_tile`],
/// [`Game::perform_action`] or [`Game::skip_action`], which accept
/// decisions for AI seats like any other. The call window and advance
/// timers keep running meanwhile.
///
/// [`Game::step_ai`]: super::Game::step_ai
/// [`Game::get_observation_for`]: super::Game::get_observation_for
/// [`Game::discard_tile`]: super::Game::discard_tile
/// [`Game::perform_action`]: super::Game::perform_action
/// [`Game::skip_action`]: super::Game::skip_action
pub trait Strategy: Send {
    /// Decide the own-turn action after a draw or a call.
    fn decide_discard(&mut self, observation: &Observation) -> anyhow::Result<TurnDecision>;

    /// Pick one of `legal` in response to `discarded`, or `None` to skip.
    fn decide_action(
        &mut self,
        observation: &Observation,
        discarded: Tile,
        legal: &[CallOption],
    ) -> anyhow::Result<Option<CallOption>>;
}

/// Wins whenever it can, otherwise discards what it drew and never calls.
#[derive(Clone, Copy, Debug, Default)]
pub struct TsumogiriStrategy;

impl Strategy for TsumogiriStrategy {
    fn decide_discard(&mut self, observation: &Observation) -> anyhow::Result<TurnDecision> {
        if observation.self_actions.contains(&SelfAction::Tsumo) {
            return Ok(TurnDecision::Tsumo);
        }
        let tile = observation
            .drawn
            .or_else(|| {
                observation
                    .hand
                    .iter()
                    .rev()
                    .find(|t| !observation.kuikae.contains(&t.kind()))
                    .copied()
            })
            .ok_or_else(|| anyhow::anyhow!("no discardable tile in hand"))?;
        Ok(TurnDecision::Discard {
            tile: tile.to_string(),
            riichi: false,
        })
    }

    fn decide_action(
        &mut self,
        _observation: &Observation,
        _discarded: Tile,
        legal: &[CallOption],
    ) -> anyhow::Result<Option<CallOption>> {
        Ok(legal.iter().find(|o| o.kind == ActionKind::Ron).cloned())
    }
}
