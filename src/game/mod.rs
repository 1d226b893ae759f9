//! The match orchestrator and its command surface.
//!
//! [`Game`] owns the table, the managers and the call window of one
//! match. Every mutation goes through one of its commands, and every
//! command returns the [`Event`](crate::core::Event)s it produced.
//!
//! ## Phases
//!
//! ```text
//! NotStarted -> Dealt -> AwaitingDiscard(p) -> CallWindow -> AwaitingProceed
//!                             ^                    |              |
//!                             +-------- call ------+---- draw ----+
//! any -> RoundOver -> Dealt ... -> MatchOver
//! ```

mod orchestrator;
mod strategy;
mod view;

use std::fmt;

use serde::Serialize;

use crate::core::PlayerId;

pub use orchestrator::{Game, SeatSpec, TimerKind, MAX_AI_STEPS};
pub use strategy::{Strategy, TsumogiriStrategy, TurnDecision};
pub use view::{GameStateView, Observation, PublicSeat, WindowView};

/// Where the match is in its command cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "player", rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    /// Hands dealt; the dealer has not drawn yet.
    Dealt,
    AwaitingDiscard(PlayerId),
    CallWindow,
    /// The discard stood; the next draw is scheduled.
    AwaitingProceed,
    RoundOver,
    MatchOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::NotStarted => f.write_str("not_started"),
            Phase::Dealt => f.write_str("dealt"),
            Phase::AwaitingDiscard(p) => write!(f, "awaiting_discard({})", p.0),
            Phase::CallWindow => f.write_str("call_window"),
            Phase::AwaitingProceed => f.write_str("awaiting_proceed"),
            Phase::RoundOver => f.write_str("round_over"),
            Phase::MatchOver => f.write_str("match_over"),
        }
    }
}
