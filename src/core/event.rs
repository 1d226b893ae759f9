//! State-change descriptors emitted by every command.
//!
//! The engine performs no I/O: each command returns a batch of
//! [`Event`]s and the host delivers them to the named audience.

use serde::Serialize;
use serde_json::{json, Value};

use super::player::PlayerId;
use crate::error::EngineError;

/// Who receives an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "to", content = "seat", rename_all = "snake_case")]
pub enum Audience {
    All,
    Seat(PlayerId),
}

impl Audience {
    /// Does `player` receive events sent to this audience?
    #[must_use]
    pub fn includes(self, player: PlayerId) -> bool {
        match self {
            Audience::All => true,
            Audience::Seat(seat) => seat == player,
        }
    }
}

/// Event names on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventName {
    GameStarted,
    KyokuStarted,
    HandDealt,
    TurnChanged,
    TileDrawn,
    TileDiscarded,
    RiichiAccepted,
    CallWindowOpened,
    ActionOptions,
    CallWindowClosed,
    MeldCalled,
    DoraRevealed,
    AdvanceScheduled,
    RoundEnded,
    MatchEnded,
    Error,
}

/// One state-change descriptor.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Event {
    pub name: EventName,
    pub payload: Value,
    pub audience: Audience,
}

impl Event {
    #[must_use]
    pub fn all(name: EventName, payload: Value) -> Self {
        Self {
            name,
            payload,
            audience: Audience::All,
        }
    }

    #[must_use]
    pub fn seat(player: PlayerId, name: EventName, payload: Value) -> Self {
        Self {
            name,
            payload,
            audience: Audience::Seat(player),
        }
    }

    /// Error event scoped to the seat that issued the failing command.
    ///
    /// Errors without a seat (phase or parse errors) go to `fallback`.
    #[must_use]
    pub fn error(err: &EngineError, fallback: PlayerId) -> Self {
        let player = err.player().unwrap_or(fallback);
        Self::seat(
            player,
            EventName::Error,
            json!({ "code": err.code(), "message": err.to_string() }),
        )
    }
}

/// Events visible to one seat, in emission order.
pub fn visible_to(events: &[Event], player: PlayerId) -> impl Iterator<Item = &Event> {
    events.iter().filter(move |e| e.audience.includes(player))
}
