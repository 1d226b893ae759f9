//! Call window: collect responses to a discard, then resolve by priority.
//!
//! ## Lifecycle
//!
//! 1. A discard (or an added kan) opens the window with the legal
//!    options of every eligible seat
//! 2. Each eligible seat answers once: take one option or skip
//! 3. When nobody is pending, or the timer token fires, the window
//!    resolves:
//!    - every ron, ordered by seating distance from the discarder
//!    - otherwise the highest-priority call (pon/kan before chi)
//!    - otherwise nothing, and play moves on
//!
//! A window carries the timer token armed for it; a timeout with any
//! other token is stale and ignored by the orchestrator.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::core::{ActionKind, CallOption, PlayerId};
use crate::error::{EngineError, EngineResult};
use crate::tiles::{Tile, TileKind};

/// What the window was opened for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    Discard,
    /// Robbing an added kan: only ron is offered.
    Chankan,
}

/// A seat's answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    Skip,
    Take(CallOption),
}

/// Outcome of a resolved window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Winners ordered nearest-first from the discarder.
    Ron(Vec<PlayerId>),
    Call(PlayerId, CallOption),
    Nothing,
}

#[derive(Clone, Debug)]
pub struct CallWindow {
    pub discarder: PlayerId,
    pub tile: Tile,
    pub kind: WindowKind,
    pub token: u64,
    player_count: usize,
    options: FxHashMap<PlayerId, Vec<CallOption>>,
    responses: FxHashMap<PlayerId, Response>,
}

impl CallWindow {
    #[must_use]
    pub fn open(
        discarder: PlayerId,
        tile: Tile,
        kind: WindowKind,
        options: Vec<(PlayerId, Vec<CallOption>)>,
        token: u64,
        player_count: usize,
    ) -> Self {
        Self {
            discarder,
            tile,
            kind,
            token,
            player_count,
            options: options.into_iter().filter(|(_, o)| !o.is_empty()).collect(),
            responses: FxHashMap::default(),
        }
    }

    /// Seats with at least one option, nearest to the discarder first.
    #[must_use]
    pub fn responders(&self) -> Vec<PlayerId> {
        let mut seats: Vec<PlayerId> = self.options.keys().copied().collect();
        seats.sort_by_key(|p| p.distance_from(self.discarder, self.player_count));
        seats
    }

    #[must_use]
    pub fn pending(&self) -> Vec<PlayerId> {
        self.responders()
            .into_iter()
            .filter(|p| !self.responses.contains_key(p))
            .collect()
    }

    #[must_use]
    pub fn is_pending(&self, player: PlayerId) -> bool {
        self.options.contains_key(&player) && !self.responses.contains_key(&player)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pending().is_empty()
    }

    #[must_use]
    pub fn options_for(&self, player: PlayerId) -> &[CallOption] {
        self.options.get(&player).map(Vec::as_slice).unwrap_or(&[])
    }

    #[must_use]
    pub fn can_ron(&self, player: PlayerId) -> bool {
        self.options_for(player).iter().any(|o| o.kind == ActionKind::Ron)
    }

    #[must_use]
    pub fn response(&self, player: PlayerId) -> Option<&Response> {
        self.responses.get(&player)
    }

    /// Take one of the seat's options.
    pub fn respond(&mut self, player: PlayerId, kind: ActionKind, consumed: &[(TileKind, bool)]) -> EngineResult<CallOption> {
        if !self.is_pending(player) {
            return Err(EngineError::illegal(player, "no pending call decision"));
        }
        let option = self
            .options_for(player)
            .iter()
            .find(|o| o.matches_request(kind, consumed))
            .cloned()
            .ok_or_else(|| EngineError::illegal(player, format!("{} is not available on {}", kind, self.tile)))?;
        self.responses.insert(player, Response::Take(option.clone()));
        Ok(option)
    }

    pub fn skip(&mut self, player: PlayerId) -> EngineResult<()> {
        if !self.is_pending(player) {
            return Err(EngineError::illegal(player, "no pending call decision"));
        }
        self.responses.insert(player, Response::Skip);
        Ok(())
    }

    /// Default every pending seat to skip; returns those seats.
    pub fn skip_remaining(&mut self) -> Vec<PlayerId> {
        let pending = self.pending();
        for &player in &pending {
            self.responses.insert(player, Response::Skip);
        }
        pending
    }

    /// Seats that could ron but did not take it.
    #[must_use]
    pub fn passed_ron(&self) -> Vec<PlayerId> {
        self.responders()
            .into_iter()
            .filter(|&p| self.can_ron(p))
            .filter(|p| !matches!(self.responses.get(p), Some(Response::Take(o)) if o.kind == ActionKind::Ron))
            .collect()
    }

    /// Apply priority to the collected responses.
    #[must_use]
    pub fn resolve(&self) -> Resolution {
        let taken: Vec<(PlayerId, &CallOption)> = self
            .responders()
            .into_iter()
            .filter_map(|p| match self.responses.get(&p) {
                Some(Response::Take(option)) => Some((p, option)),
                _ => None,
            })
            .collect();

        let rons: Vec<PlayerId> = taken
            .iter()
            .filter(|(_, o)| o.kind == ActionKind::Ron)
            .map(|(p, _)| *p)
            .collect();
        if !rons.is_empty() {
            return Resolution::Ron(rons);
        }

        taken
            .iter()
            .max_by_key(|(p, o)| (o.kind.priority(), std::cmp::Reverse(p.distance_from(self.discarder, self.player_count))))
            .map_or(Resolution::Nothing, |(p, o)| Resolution::Call(*p, (*o).clone()))
    }
}
