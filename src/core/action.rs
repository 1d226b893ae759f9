//! Action vocabulary: call responses, own-turn actions and history records.
//!
//! Responses to a discard are an [`ActionKind`] plus the tiles the caller
//! consumes from hand. For example:
//! - "Skip" = kind only
//! - "Pon 5p with 5p 0p" = kind + the two hand tiles
//! - "Chi 3m with 4m 5m" = kind + the two run partners
//!
//! The orchestrator validates every action against the options computed
//! for the seat; callers never mutate state directly.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::PlayerId;
use crate::tiles::{Tile, TileKind};

/// Kind of a response or declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Ron,
    Tsumo,
    Pon,
    Chi,
    Daiminkan,
    Ankan,
    Kakan,
    Skip,
    /// Recorded in history only; discards go through their own command.
    Discard,
}

impl ActionKind {
    /// Wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ActionKind::Ron => "ron",
            ActionKind::Tsumo => "tsumo",
            ActionKind::Pon => "pon",
            ActionKind::Chi => "chi",
            ActionKind::Daiminkan => "daiminkan",
            ActionKind::Ankan => "ankan",
            ActionKind::Kakan => "kakan",
            ActionKind::Skip => "skip",
            ActionKind::Discard => "discard",
        }
    }

    /// Call priority on a discard: higher resolves first.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            ActionKind::Ron => 3,
            ActionKind::Pon | ActionKind::Daiminkan => 2,
            ActionKind::Chi => 1,
            _ => 0,
        }
    }

    #[must_use]
    pub const fn is_kan(self) -> bool {
        matches!(self, ActionKind::Daiminkan | ActionKind::Ankan | ActionKind::Kakan)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ActionKind {
    type Err = crate::error::EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "ron" => ActionKind::Ron,
            "tsumo" => ActionKind::Tsumo,
            "pon" => ActionKind::Pon,
            "chi" => ActionKind::Chi,
            "daiminkan" | "kan" | "minkan" => ActionKind::Daiminkan,
            "ankan" => ActionKind::Ankan,
            "kakan" => ActionKind::Kakan,
            "skip" | "pass" => ActionKind::Skip,
            "discard" => ActionKind::Discard,
            _ => {
                return Err(crate::error::EngineError::Parse {
                    input: s.to_string(),
                    message: "unknown action type".to_string(),
                })
            }
        })
    }
}

/// One legal response to a discard (or to an added kan).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOption {
    pub kind: ActionKind,
    /// The claimed tile.
    pub tile: Tile,
    /// Hand tiles used to form the meld; empty for ron and skip.
    pub consumed: SmallVec<[Tile; 3]>,
}

impl CallOption {
    #[must_use]
    pub fn new(kind: ActionKind, tile: Tile, consumed: &[Tile]) -> Self {
        Self {
            kind,
            tile,
            consumed: SmallVec::from_slice(consumed),
        }
    }

    /// Does a wire request (`consumed` tile strings) select this option?
    ///
    /// An empty request matches any option of the same kind.
    #[must_use]
    pub fn matches_request(&self, kind: ActionKind, consumed: &[(TileKind, bool)]) -> bool {
        if self.kind != kind {
            return false;
        }
        if consumed.is_empty() {
            return true;
        }
        if consumed.len() != self.consumed.len() {
            return false;
        }
        let mut wanted: Vec<(TileKind, bool)> = consumed.to_vec();
        let mut have: Vec<(TileKind, bool)> = self.consumed.iter().map(|t| (t.kind(), t.is_red())).collect();
        wanted.sort();
        have.sort();
        wanted == have
    }

    /// Wire form of the consumed tiles.
    #[must_use]
    pub fn wire_consumed(&self) -> Vec<String> {
        self.consumed.iter().map(ToString::to_string).collect()
    }
}

/// An action available on the acting player's own turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelfAction {
    Tsumo,
    /// Discards that keep tenpai and may declare riichi.
    Riichi { tiles: Vec<String> },
    Ankan { tile: String },
    Kakan { tile: String },
    KyuushuKyuuhai,
}

/// A recorded action for history and replays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: PlayerId,
    pub kind: ActionKind,
    pub tile: Option<Tile>,
    /// Turn counter when the action was taken.
    pub turn: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, kind: ActionKind, tile: Option<Tile>, turn: u32) -> Self {
        Self {
            player,
            kind,
            tile,
            turn,
        }
    }
}
