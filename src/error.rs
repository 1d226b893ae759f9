//! Engine error type.
//!
//! Command errors are reported back to the acting seat as an `error`
//! event; `Setup` errors abort match construction.

use std::fmt;

use crate::core::PlayerId;

#[derive(Debug)]
pub enum EngineError {
    /// The seat acted out of turn.
    WrongTurn { player: PlayerId },
    /// The named tile is not in the seat's hand.
    TileNotInHand { player: PlayerId, tile: String },
    /// The action is not legal in the current state.
    IllegalAction { player: PlayerId, reason: String },
    /// A riichi precondition is not met.
    Riichi { player: PlayerId, reason: String },
    /// Not enough live tiles remain for the requested action.
    InsufficientWall { player: PlayerId, remaining: usize },
    /// A call window is open and the command must wait for it.
    CallWindowPending { player: PlayerId },
    /// The command does not apply to the current phase.
    InvalidPhase { command: &'static str, phase: String },
    /// No such seat at this table.
    UnknownPlayer { player: PlayerId },
    /// Tile or hand string could not be parsed.
    Parse { input: String, message: String },
    /// Match construction failed.
    Setup { message: String },
    /// An AI strategy failed to produce a decision.
    Strategy { player: PlayerId, message: String },
}

impl EngineError {
    /// The seat the error should be reported to, if any.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            EngineError::WrongTurn { player }
            | EngineError::TileNotInHand { player, .. }
            | EngineError::IllegalAction { player, .. }
            | EngineError::Riichi { player, .. }
            | EngineError::InsufficientWall { player, .. }
            | EngineError::CallWindowPending { player }
            | EngineError::UnknownPlayer { player }
            | EngineError::Strategy { player, .. } => Some(*player),
            EngineError::InvalidPhase { .. } | EngineError::Parse { .. } | EngineError::Setup { .. } => None,
        }
    }

    /// Stable machine-readable code for transport layers.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::WrongTurn { .. } => "wrong_turn",
            EngineError::TileNotInHand { .. } => "tile_not_in_hand",
            EngineError::IllegalAction { .. } => "illegal_action",
            EngineError::Riichi { .. } => "riichi_precondition",
            EngineError::InsufficientWall { .. } => "insufficient_wall",
            EngineError::CallWindowPending { .. } => "call_window_pending",
            EngineError::InvalidPhase { .. } => "invalid_phase",
            EngineError::UnknownPlayer { .. } => "unknown_player",
            EngineError::Parse { .. } => "parse",
            EngineError::Setup { .. } => "setup",
            EngineError::Strategy { .. } => "strategy",
        }
    }

    pub(crate) fn illegal(player: PlayerId, reason: impl Into<String>) -> Self {
        EngineError::IllegalAction {
            player,
            reason: reason.into(),
        }
    }

    pub(crate) fn riichi(player: PlayerId, reason: impl Into<String>) -> Self {
        EngineError::Riichi {
            player,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::WrongTurn { player } => write!(f, "{} acted out of turn", player),
            EngineError::TileNotInHand { player, tile } => {
                write!(f, "{} does not hold tile '{}'", player, tile)
            }
            EngineError::IllegalAction { player, reason } => {
                write!(f, "Illegal action by {}: {}", player, reason)
            }
            EngineError::Riichi { player, reason } => {
                write!(f, "{} cannot declare riichi: {}", player, reason)
            }
            EngineError::InsufficientWall { player, remaining } => {
                write!(f, "{}: only {} live tiles remain", player, remaining)
            }
            EngineError::CallWindowPending { player } => {
                write!(f, "{}: a call window is still open", player)
            }
            EngineError::InvalidPhase { command, phase } => {
                write!(f, "'{}' is not allowed during {}", command, phase)
            }
            EngineError::UnknownPlayer { player } => write!(f, "Unknown seat {}", player.0),
            EngineError::Parse { input, message } => {
                write!(f, "Parse error on '{}': {}", input, message)
            }
            EngineError::Setup { message } => write!(f, "Match setup failed: {}", message),
            EngineError::Strategy { player, message } => {
                write!(f, "Strategy for {} failed: {}", player, message)
            }
        }
    }
}

impl std::error::Error for EngineError {}

pub type EngineResult<T> = Result<T, EngineError>;
