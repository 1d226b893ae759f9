//! Turn sequencing: whose turn it is, the turn counter and draws.

use serde_json::json;

use crate::calls::ActionManager;
use crate::core::{Event, EventName, PlayerId};
use crate::rules::RuleEffectManager;
use crate::table::Table;
use crate::tiles::{Tile, TileKind};

/// Result of a draw attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn(Tile),
    /// The live wall is empty: exhaustive draw.
    Exhausted,
}

#[derive(Clone, Debug)]
pub struct TurnManager {
    current: PlayerId,
    /// Completed turns this kyoku.
    turn_counter: u32,
    /// First discard of each seat, while the first go-around is unbroken.
    first_discards: Option<Vec<TileKind>>,
    player_count: usize,
}

impl TurnManager {
    #[must_use]
    pub fn new(dealer: PlayerId, player_count: usize) -> Self {
        Self {
            current: dealer,
            turn_counter: 0,
            first_discards: Some(Vec::with_capacity(player_count)),
            player_count,
        }
    }

    #[must_use]
    pub fn current(&self) -> PlayerId {
        self.current
    }

    #[must_use]
    pub fn turn_counter(&self) -> u32 {
        self.turn_counter
    }

    /// Rotate to the next seat and count the finished turn.
    pub fn advance(&mut self) {
        self.current = self.current.next(self.player_count);
        self.turn_counter += 1;
    }

    /// Hand the turn to a caller; the first go-around is broken.
    pub fn jump_to(&mut self, player: PlayerId) {
        self.current = player;
        self.turn_counter += 1;
        self.interrupt();
    }

    /// A call or kan breaks the uninterrupted first go-around.
    pub fn interrupt(&mut self) {
        self.first_discards = None;
    }

    /// Still inside the uninterrupted first go-around.
    #[must_use]
    pub fn is_first_go_around(&self) -> bool {
        self.first_discards.is_some() && (self.turn_counter as usize) < self.player_count
    }

    /// Record a discard for the four-winds check.
    pub fn record_discard(&mut self, kind: TileKind) {
        let in_first = self.is_first_go_around();
        if let Some(first) = self.first_discards.as_mut() {
            if in_first {
                first.push(kind);
            }
        }
    }

    /// First discards recorded so far, if unbroken.
    #[must_use]
    pub fn first_discards(&self) -> &[TileKind] {
        self.first_discards.as_deref().unwrap_or(&[])
    }

    /// Draw for the current seat.
    ///
    /// Discard furiten is refreshed from the 13-tile hand first. The
    /// private draw event is only built for human seats.
    pub fn draw_tile(&mut self, table: &mut Table, is_human: bool) -> (DrawOutcome, Vec<Event>) {
        let player = self.current;
        let Some(tile) = table.wall.draw() else {
            return (DrawOutcome::Exhausted, Vec::new());
        };
        log::debug!("{} draws {} ({} left)", player, tile, table.wall.live_remaining());
        (DrawOutcome::Drawn(tile), self.take_tile(table, tile, false, is_human))
    }

    /// Draw a kan replacement tile for the current seat.
    pub fn draw_replacement(&mut self, table: &mut Table, is_human: bool) -> (DrawOutcome, Vec<Event>) {
        let player = self.current;
        let Some(tile) = table.wall.draw_replacement() else {
            return (DrawOutcome::Exhausted, Vec::new());
        };
        log::debug!("{} draws replacement {}", player, tile);
        (DrawOutcome::Drawn(tile), self.take_tile(table, tile, true, is_human))
    }

    fn take_tile(&self, table: &mut Table, tile: Tile, replacement: bool, is_human: bool) -> Vec<Event> {
        let player = self.current;
        let seat = &mut table.players[player];
        RuleEffectManager::update_furiten(seat);
        let waits: Vec<String> = seat.waits().iter().map(ToString::to_string).collect();
        seat.draw(tile);

        let mut events = vec![Event::all(
            EventName::TurnChanged,
            json!({
                "player": player,
                "turn": self.turn_counter,
                "wall_remaining": table.wall.live_remaining(),
            }),
        )];
        if is_human {
            let kan_options = ActionManager::self_kan_options(table, player);
            events.push(Event::seat(
                player,
                EventName::TileDrawn,
                json!({
                    "tile": tile.to_string(),
                    "replacement": replacement,
                    "kan_options": kan_options,
                    "waits": waits,
                }),
            ));
        }
        events
    }
}
