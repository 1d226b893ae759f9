//! Read-only projections of a running match.
//!
//! [`GameStateView`] is what every seat may see. [`Observation`] adds
//! one seat's concealed hand and its legal decisions, and is what a
//! [`Strategy`](super::Strategy) receives.

use serde::Serialize;

use super::Phase;
use crate::calls::WindowKind;
use crate::core::{ActionRecord, CallOption, PlayerId, RoundState, SelfAction};
use crate::table::{Discard, Player};
use crate::tiles::{Meld, Tile, TileKind, Wind};

/// Public information about one seat.
#[derive(Clone, Debug, Serialize)]
pub struct PublicSeat {
    pub player: PlayerId,
    pub name: String,
    pub points: i32,
    pub is_dealer: bool,
    pub seat_wind: Wind,
    pub riichi: bool,
    pub hand_size: usize,
    pub discards: Vec<Discard>,
    pub melds: Vec<Meld>,
}

impl PublicSeat {
    pub(crate) fn of(player: &Player, seat_wind: Wind) -> Self {
        Self {
            player: player.id,
            name: player.name.clone(),
            points: player.points,
            is_dealer: player.is_dealer,
            seat_wind,
            riichi: player.riichi,
            hand_size: player.hand().len(),
            discards: player.discards().to_vec(),
            melds: player.melds().to_vec(),
        }
    }
}

/// Open call window as seen by everyone. Which seats hold options is
/// private to those seats and only shows in their [`Observation`].
#[derive(Clone, Debug, Serialize)]
pub struct WindowView {
    pub discarder: PlayerId,
    pub tile: Tile,
    pub kind: WindowKind,
    pub token: u64,
}

/// Everything public about the match.
#[derive(Clone, Debug, Serialize)]
pub struct GameStateView {
    pub phase: Phase,
    pub round: RoundState,
    pub current_player: PlayerId,
    pub turn: u32,
    pub wall_remaining: usize,
    pub dora_indicators: Vec<Tile>,
    pub seats: Vec<PublicSeat>,
    pub window: Option<WindowView>,
    pub history: im::Vector<ActionRecord>,
}

impl GameStateView {
    #[must_use]
    pub fn seat(&self, player: PlayerId) -> Option<&PublicSeat> {
        self.seats.iter().find(|s| s.player == player)
    }
}

/// One seat's view plus its private decisions.
#[derive(Clone, Debug, Serialize)]
pub struct Observation {
    pub player: PlayerId,
    pub state: GameStateView,
    pub hand: Vec<Tile>,
    pub drawn: Option<Tile>,
    pub waits: Vec<TileKind>,
    /// Own-turn actions besides a plain discard.
    pub self_actions: Vec<SelfAction>,
    /// Options in the open call window, if this seat is pending.
    pub call_options: Vec<CallOption>,
    pub furiten: bool,
    /// Kinds barred from the next discard.
    pub kuikae: Vec<TileKind>,
}

impl Observation {
    /// It is this seat's turn to discard.
    #[must_use]
    pub fn is_my_turn(&self) -> bool {
        self.state.phase == Phase::AwaitingDiscard(self.player)
    }
}
