//! [`Game`]: one match, its managers and its command surface.
//!
//! ## Command pattern
//!
//! Each public command calls a private `try_*` twin returning
//! `EngineResult<Vec<Event>>`. The twin validates everything before its
//! first mutation, so a rejected command leaves the match untouched and
//! turns into a single seat-scoped `error` event.
//!
//! ## Timers
//!
//! The engine owns no clock. Opening a call window or scheduling the
//! next draw arms a token that travels in the emitted event; the host
//! calls [`Game::on_timeout`] with it when its timer fires. Any real
//! decision disarms the token first, so late timeouts are ignored.

use im::Vector;
use serde::Serialize;
use serde_json::{json, Value};

use super::strategy::{Strategy, TsumogiriStrategy, TurnDecision};
use super::view::{GameStateView, Observation, PublicSeat, WindowView};
use super::Phase;
use crate::calls::{ActionManager, CallWindow, DoraTiming, Resolution, WindowKind};
use crate::core::{
    ActionKind, ActionRecord, CallOption, Event, EventName, GameRng, PlayerId, PlayerMap, RoundState, RuleConfig,
    SelfAction,
};
use crate::error::{EngineError, EngineResult};
use crate::hand::{HandResult, Yaku};
use crate::round::{AbortKind, DrawOutcome, RoundManager, RoundResult, Settlement, Standing, TurnManager, WinRecord};
use crate::rules::{rules_for, RuleEffectManager, VariantRules};
use crate::table::{PaoKind, Player, Table, HAND_SIZE};
use crate::tiles::{Tile, TileKind, Wall};

/// Upper bound on AI decisions applied by one [`Game::step_ai`] call.
pub const MAX_AI_STEPS: usize = 1024;

/// What an armed timer token does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Skip every seat still deciding in the call window.
    CallWindow,
    /// Move on to the next draw.
    Advance,
}

/// One seat at match construction.
pub struct SeatSpec {
    pub name: String,
    pub ai: bool,
    pub strategy: Option<Box<dyn Strategy>>,
}

impl SeatSpec {
    #[must_use]
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ai: false,
            strategy: None,
        }
    }

    #[must_use]
    pub fn ai(name: impl Into<String>, strategy: impl Strategy + 'static) -> Self {
        Self {
            name: name.into(),
            ai: true,
            strategy: Some(Box::new(strategy)),
        }
    }
}

/// A riichi discard waiting for its call window to pass.
#[derive(Clone, Copy, Debug)]
struct PendingRiichi {
    player: PlayerId,
    double: bool,
}

pub struct Game {
    config: RuleConfig,
    rules: Box<dyn VariantRules>,
    rng: GameRng,
    table: Table,
    round: RoundManager,
    turns: TurnManager,
    strategies: PlayerMap<Option<Box<dyn Strategy>>>,
    phase: Phase,
    window: Option<CallWindow>,
    pending_riichi: Option<PendingRiichi>,
    /// Kan dora indicators to reveal after the next discard.
    pending_dora: usize,
    /// The current seat's last draw came from the dead wall.
    rinshan: bool,
    next_token: u64,
    armed: Option<(u64, TimerKind)>,
    history: Vector<ActionRecord>,
    last_settlement: Option<Settlement>,
    standings: Vec<Standing>,
}

impl Game {
    /// Build a match. Every AI seat must come with a strategy.
    pub fn new(config: RuleConfig, seats: Vec<SeatSpec>) -> EngineResult<Self> {
        let player_count = config.player_count();
        if seats.len() != player_count {
            return Err(EngineError::Setup {
                message: format!("{:?} needs {} seats, got {}", config.variant, player_count, seats.len()),
            });
        }

        let mut players = Vec::with_capacity(player_count);
        let mut strategies = Vec::with_capacity(player_count);
        for (index, seat) in seats.into_iter().enumerate() {
            let id = PlayerId::new(index as u8);
            if seat.ai && seat.strategy.is_none() {
                return Err(EngineError::Setup {
                    message: format!("AI seat {} ({}) has no strategy", index, seat.name),
                });
            }
            players.push(Player::new(id, seat.name, config.starting_points));
            strategies.push(if seat.ai { seat.strategy } else { None });
        }

        let rules = rules_for(config.variant);
        log::info!("new {:?} match, seed {}", config.variant, config.seed);
        Ok(Self {
            rng: GameRng::new(config.seed).for_context("wall"),
            table: Table::new(PlayerMap::from_vec(players), Wall::from_ordered(Vec::new())),
            round: RoundManager::new(&config),
            turns: TurnManager::new(PlayerId::new(0), player_count),
            strategies: PlayerMap::from_vec(strategies),
            phase: Phase::NotStarted,
            window: None,
            pending_riichi: None,
            pending_dora: 0,
            rinshan: false,
            next_token: 0,
            armed: None,
            history: Vector::new(),
            last_settlement: None,
            standings: Vec::new(),
            config,
            rules,
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    #[must_use]
    pub fn rules(&self) -> &dyn VariantRules {
        &*self.rules
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    #[must_use]
    pub fn round_state(&self) -> &RoundState {
        self.round.state()
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.turns.current()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.table.player_count()
    }

    #[must_use]
    pub fn is_ai(&self, player: PlayerId) -> bool {
        self.strategies.contains(player) && self.strategies[player].is_some()
    }

    #[must_use]
    pub fn window(&self) -> Option<&CallWindow> {
        self.window.as_ref()
    }

    /// The currently armed timer, if any.
    #[must_use]
    pub fn armed_timer(&self) -> Option<(u64, TimerKind)> {
        self.armed
    }

    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    #[must_use]
    pub fn last_settlement(&self) -> Option<&Settlement> {
        self.last_settlement.as_ref()
    }

    /// Final placement, filled once the match is over.
    #[must_use]
    pub fn standings(&self) -> &[Standing] {
        &self.standings
    }

    // === Commands ===

    /// Shuffle the first wall and deal.
    pub fn start_game(&mut self) -> Vec<Event> {
        let wall = self.shuffle_wall();
        self.start_game_with_wall(wall)
    }

    /// Deal the first kyoku from a prepared wall.
    pub fn start_game_with_wall(&mut self, wall: Wall) -> Vec<Event> {
        let result = self.try_start_game(wall);
        self.report(self.round.dealer(), result)
    }

    /// The dealer draws the first tile.
    pub fn start_first_turn(&mut self) -> Vec<Event> {
        let result = self.try_start_first_turn();
        self.report(self.turns.current(), result)
    }

    /// Discard `tile` (wire form), optionally declaring riichi.
    pub fn discard_tile(&mut self, player: PlayerId, tile: &str, riichi: bool) -> Vec<Event> {
        let result = self.try_discard(player, tile, riichi);
        self.report(player, result)
    }

    /// Take an action: a call response, a skip, tsumo or a kan.
    ///
    /// `tile` names the kan kind for ankan/kakan; `consumed` picks among
    /// call options that differ only in red fives.
    pub fn perform_action(
        &mut self,
        player: PlayerId,
        kind: ActionKind,
        tile: Option<&str>,
        consumed: &[&str],
    ) -> Vec<Event> {
        let result = self.try_perform_action(player, kind, tile, consumed);
        self.report(player, result)
    }

    /// Decline the seat's options in the open call window.
    pub fn skip_action(&mut self, player: PlayerId) -> Vec<Event> {
        let result = self.check_player(player).and_then(|()| self.try_skip(player));
        self.report(player, result)
    }

    /// Declare an abortive draw. Only kyuushu kyuuhai can be declared.
    pub fn declare_abortive_draw(&mut self, player: PlayerId, kind: AbortKind) -> Vec<Event> {
        let result = self.try_abortive_draw(player, kind);
        self.report(player, result)
    }

    /// Advance to the next seat's draw after a discard stood.
    pub fn proceed_to_next_turn(&mut self) -> Vec<Event> {
        let result = self.try_proceed();
        self.report(self.turns.current(), result)
    }

    /// Deal the next kyoku and draw the dealer's first tile.
    pub fn next_round(&mut self) -> Vec<Event> {
        let wall = self.shuffle_wall();
        self.next_round_with_wall(wall)
    }

    pub fn next_round_with_wall(&mut self, wall: Wall) -> Vec<Event> {
        let result = self.try_next_round(wall);
        self.report(self.round.dealer(), result)
    }

    /// Apply the default for an armed timer. Stale tokens do nothing.
    pub fn on_timeout(&mut self, token: u64) -> Vec<Event> {
        match self.armed {
            Some((armed, TimerKind::CallWindow)) if armed == token => {
                log::debug!("call window timer {} fired", token);
                let fallback = self.window.as_ref().map_or(self.turns.current(), |w| w.discarder);
                let result = self.resolve_window();
                self.report(fallback, result)
            }
            Some((armed, TimerKind::Advance)) if armed == token => {
                log::debug!("advance timer {} fired", token);
                self.proceed_to_next_turn()
            }
            _ => {
                log::debug!("ignoring stale timer token {}", token);
                Vec::new()
            }
        }
    }

    // === Projections ===

    /// Legal responses of every other seat to `tile` discarded by
    /// `discarder`, or to an added kan when `robbing_kan`.
    ///
    /// This is a read-only projection like [`Game::get_game_state`],
    /// not a command: it changes nothing and emits no events, so a bad
    /// seat or tile string comes back as the `Err` itself rather than
    /// as a seat-scoped `error` event.
    pub fn get_possible_actions(
        &self,
        discarder: PlayerId,
        tile: &str,
        robbing_kan: bool,
    ) -> EngineResult<Vec<(PlayerId, Vec<CallOption>)>> {
        self.check_player(discarder)?;
        let (kind, red) = TileKind::parse(tile)?;
        let window_kind = if robbing_kan {
            WindowKind::Chankan
        } else {
            WindowKind::Discard
        };
        Ok(ActionManager::get_possible_actions(
            &self.table,
            &*self.rules,
            self.round.state(),
            discarder,
            Tile::new(kind, red, u8::MAX),
            window_kind,
        ))
    }

    /// Everything public.
    #[must_use]
    pub fn get_game_state(&self) -> GameStateView {
        let player_count = self.player_count();
        let round = self.round.state();
        GameStateView {
            phase: self.phase,
            round: round.clone(),
            current_player: self.turns.current(),
            turn: self.turns.turn_counter(),
            wall_remaining: self.table.wall.live_remaining(),
            dora_indicators: self.table.wall.dora_indicators().to_vec(),
            seats: self
                .table
                .players
                .iter()
                .map(|(id, p)| PublicSeat::of(p, round.seat_wind(id, player_count)))
                .collect(),
            window: self.window.as_ref().map(|w| WindowView {
                discarder: w.discarder,
                tile: w.tile,
                kind: w.kind,
                token: w.token,
            }),
            history: self.history.clone(),
        }
    }

    /// The public state plus `player`'s hand and legal decisions.
    pub fn get_observation_for(&self, player: PlayerId) -> EngineResult<Observation> {
        self.check_player(player)?;
        let seat = &self.table.players[player];
        let waiting_hand = seat.hand().len() % 3 == 1;
        let my_turn = self.phase == Phase::AwaitingDiscard(player) && self.window.is_none();
        Ok(Observation {
            player,
            state: self.get_game_state(),
            hand: seat.hand().to_vec(),
            drawn: seat.last_drawn(),
            waits: if waiting_hand { seat.waits() } else { Vec::new() },
            self_actions: if my_turn { self.self_actions(player) } else { Vec::new() },
            call_options: self
                .window
                .as_ref()
                .filter(|w| w.is_pending(player))
                .map(|w| w.options_for(player).to_vec())
                .unwrap_or_default(),
            furiten: if waiting_hand {
                RuleEffectManager::is_furiten(seat)
            } else {
                seat.furiten.any()
            },
            kuikae: seat.kuikae.to_vec(),
        })
    }

    // === AI driver ===

    /// Let AI seats act until a human decision is needed or the round
    /// is over. Scheduled advances are taken without waiting.
    pub fn step_ai(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..MAX_AI_STEPS {
            let step = match self.phase {
                Phase::Dealt => self.start_first_turn(),
                Phase::AwaitingProceed => self.proceed_to_next_turn(),
                Phase::AwaitingDiscard(player) if self.window.is_none() && self.is_ai(player) => self.ai_turn(player),
                Phase::CallWindow => {
                    let next = self
                        .window
                        .as_ref()
                        .and_then(|w| w.pending().into_iter().find(|&p| self.is_ai(p)));
                    match next {
                        Some(player) => self.ai_response(player),
                        None => break,
                    }
                }
                _ => break,
            };
            events.extend(step);
        }
        events
    }

    // === Command bodies ===

    fn try_start_game(&mut self, wall: Wall) -> EngineResult<Vec<Event>> {
        if self.phase != Phase::NotStarted {
            return Err(self.invalid_phase("start_game"));
        }
        let mut events = vec![Event::all(
            EventName::GameStarted,
            json!({
                "variant": self.config.variant,
                "players": self.table.players.values().map(|p| p.name.clone()).collect::<Vec<_>>(),
                "starting_points": self.config.starting_points,
                "seed": self.config.seed,
            }),
        )];
        events.extend(self.deal(wall)?);
        Ok(events)
    }

    fn try_start_first_turn(&mut self) -> EngineResult<Vec<Event>> {
        if self.phase != Phase::Dealt {
            return Err(self.invalid_phase("start_first_turn"));
        }
        Ok(self.draw_for_current(false))
    }

    fn try_next_round(&mut self, wall: Wall) -> EngineResult<Vec<Event>> {
        if self.phase != Phase::RoundOver {
            return Err(self.invalid_phase("next_round"));
        }
        let mut events = self.deal(wall)?;
        events.extend(self.draw_for_current(false));
        Ok(events)
    }

    fn try_proceed(&mut self) -> EngineResult<Vec<Event>> {
        if self.phase != Phase::AwaitingProceed {
            return Err(self.invalid_phase("proceed_to_next_turn"));
        }
        self.disarm();
        self.turns.advance();
        Ok(self.draw_for_current(false))
    }

    fn try_discard(&mut self, player: PlayerId, tile: &str, riichi: bool) -> EngineResult<Vec<Event>> {
        self.ensure_own_turn(player, "discard_tile")?;
        let (kind, red) = TileKind::parse(tile)?;
        let seat = &self.table.players[player];
        let found = seat.find_tile(kind, red).ok_or_else(|| EngineError::TileNotInHand {
            player,
            tile: tile.to_string(),
        })?;
        if seat.kuikae.contains(&kind) {
            return Err(EngineError::illegal(player, format!("{} cannot be discarded right after the call", kind)));
        }
        if seat.riichi && seat.last_drawn().map(Tile::id) != Some(found.id()) {
            return Err(EngineError::illegal(player, "in riichi only the drawn tile may be discarded"));
        }
        if riichi {
            RuleEffectManager::check_riichi(seat, found, self.table.wall.live_remaining())?;
        }

        let double = riichi && self.turns.is_first_go_around() && self.table.no_calls_yet();
        let seat = &mut self.table.players[player];
        if seat.riichi {
            seat.ippatsu = false;
        }
        let discard = seat.discard_tile(found, riichi);
        RuleEffectManager::update_furiten(seat);
        if riichi {
            self.pending_riichi = Some(PendingRiichi { player, double });
        }
        self.turns.record_discard(kind);
        self.rinshan = false;
        self.history.push_back(ActionRecord::new(
            player,
            ActionKind::Discard,
            Some(found),
            self.turns.turn_counter(),
        ));
        log::debug!("{} discards {}{}", player, found, if riichi { " (riichi)" } else { "" });

        let mut events = vec![Event::all(
            EventName::TileDiscarded,
            json!({
                "player": player,
                "tile": found.to_string(),
                "tsumogiri": discard.tsumogiri,
                "riichi": riichi,
            }),
        )];
        events.extend(self.reveal_pending_dora());

        let options = ActionManager::get_possible_actions(
            &self.table,
            &*self.rules,
            self.round.state(),
            player,
            found,
            WindowKind::Discard,
        );
        if options.is_empty() {
            events.extend(self.after_discard_settled());
        } else {
            events.extend(self.open_window(player, found, WindowKind::Discard, options));
        }
        Ok(events)
    }

    fn try_perform_action(
        &mut self,
        player: PlayerId,
        kind: ActionKind,
        tile: Option<&str>,
        consumed: &[&str],
    ) -> EngineResult<Vec<Event>> {
        self.check_player(player)?;
        match kind {
            ActionKind::Skip => self.try_skip(player),
            ActionKind::Ron | ActionKind::Pon | ActionKind::Chi | ActionKind::Daiminkan => {
                let parsed = consumed
                    .iter()
                    .map(|s| TileKind::parse(s))
                    .collect::<EngineResult<Vec<_>>>()?;
                self.try_respond(player, kind, &parsed)
            }
            ActionKind::Tsumo => self.try_tsumo(player),
            ActionKind::Ankan | ActionKind::Kakan => {
                let tile = tile.ok_or_else(|| EngineError::illegal(player, format!("{} needs a tile", kind)))?;
                let (tile_kind, _) = TileKind::parse(tile)?;
                if kind == ActionKind::Ankan {
                    self.try_ankan(player, tile_kind)
                } else {
                    self.try_kakan(player, tile_kind)
                }
            }
            ActionKind::Discard => Err(EngineError::illegal(player, "use discard_tile to discard")),
        }
    }

    fn try_respond(
        &mut self,
        player: PlayerId,
        kind: ActionKind,
        consumed: &[(TileKind, bool)],
    ) -> EngineResult<Vec<Event>> {
        let window = self
            .window
            .as_mut()
            .ok_or_else(|| EngineError::illegal(player, "no call window is open"))?;
        let option = window.respond(player, kind, consumed)?;
        log::debug!("{} answers {} on {}", player, option.kind, option.tile);
        if window.is_complete() {
            self.resolve_window()
        } else {
            Ok(Vec::new())
        }
    }

    fn try_skip(&mut self, player: PlayerId) -> EngineResult<Vec<Event>> {
        let window = self
            .window
            .as_mut()
            .ok_or_else(|| EngineError::illegal(player, "no call window is open"))?;
        ActionManager::skip_action(&mut self.table, window, player)?;
        if window.is_complete() {
            self.resolve_window()
        } else {
            Ok(Vec::new())
        }
    }

    fn try_tsumo(&mut self, player: PlayerId) -> EngineResult<Vec<Event>> {
        self.ensure_own_turn(player, "tsumo")?;
        let hand = self.tsumo_hand(player);
        if !hand.is_win {
            return Err(EngineError::illegal(player, "hand is not a winning hand"));
        }
        let liable = self.liable_for(player, &hand);
        let drawn = self.table.players[player].last_drawn();
        self.record(player, ActionKind::Tsumo, drawn);
        log::debug!("{} wins by tsumo for {}", player, hand.score);
        Ok(self.end_round(RoundResult::Tsumo {
            win: WinRecord { player, hand, liable },
        }))
    }

    fn try_ankan(&mut self, player: PlayerId, kind: TileKind) -> EngineResult<Vec<Event>> {
        self.ensure_own_turn(player, "ankan")?;
        let outcome = ActionManager::declare_ankan(&mut self.table, player, kind)?;
        self.turns.interrupt();
        self.record(player, ActionKind::Ankan, outcome.meld.tiles.first().copied());

        let mut events = vec![self.meld_event(player, None, ActionKind::Ankan, &outcome.meld.wire_tiles())];
        events.extend(self.reveal_pending_dora());
        if outcome.dora == Some(DoraTiming::Immediate) {
            events.extend(self.reveal_dora());
        }
        events.extend(self.draw_for_current(true));
        Ok(events)
    }

    fn try_kakan(&mut self, player: PlayerId, kind: TileKind) -> EngineResult<Vec<Event>> {
        self.ensure_own_turn(player, "kakan")?;
        let (tile, outcome) = ActionManager::declare_kakan(&mut self.table, player, kind)?;
        self.turns.interrupt();
        self.record(player, ActionKind::Kakan, Some(tile));
        if outcome.dora == Some(DoraTiming::AfterDiscard) {
            self.pending_dora += 1;
        }

        let mut events = vec![self.meld_event(player, None, ActionKind::Kakan, &outcome.meld.wire_tiles())];
        let options = ActionManager::get_possible_actions(
            &self.table,
            &*self.rules,
            self.round.state(),
            player,
            tile,
            WindowKind::Chankan,
        );
        if options.is_empty() {
            events.extend(self.draw_for_current(true));
        } else {
            events.extend(self.open_window(player, tile, WindowKind::Chankan, options));
        }
        Ok(events)
    }

    fn try_abortive_draw(&mut self, player: PlayerId, kind: AbortKind) -> EngineResult<Vec<Event>> {
        self.ensure_own_turn(player, "declare_abortive_draw")?;
        if kind != AbortKind::KyuushuKyuuhai {
            return Err(EngineError::illegal(player, format!("{} cannot be declared", kind)));
        }
        if !self.config.kyuushu_allowed {
            return Err(EngineError::illegal(player, "kyuushu kyuuhai is disabled"));
        }
        if !self.kyuushu_available(player) {
            return Err(EngineError::illegal(player, "kyuushu kyuuhai conditions are not met"));
        }
        log::debug!("{} declares kyuushu kyuuhai", player);
        Ok(self.end_round(RoundResult::AbortiveDraw { kind }))
    }

    // === Flow ===

    fn deal(&mut self, wall: Wall) -> EngineResult<Vec<Event>> {
        let player_count = self.player_count();
        let expected = Wall::tile_set(self.rules.is_three_player(), self.config.red_fives).len();
        if wall.total_tiles() != expected {
            return Err(EngineError::Setup {
                message: format!("wall has {} tiles, this variant uses {}", wall.total_tiles(), expected),
            });
        }
        if wall.live_remaining() <= HAND_SIZE * player_count {
            return Err(EngineError::Setup {
                message: "wall too small to deal".to_string(),
            });
        }

        let dealer = self.round.dealer();
        self.table.start_kyoku(wall, dealer)?;
        self.turns = TurnManager::new(dealer, player_count);
        self.window = None;
        self.pending_riichi = None;
        self.pending_dora = 0;
        self.rinshan = false;
        self.armed = None;
        self.history = Vector::new();
        self.phase = Phase::Dealt;

        let round = self.round.state();
        log::info!("{} starts, dealer {}", round.label(), dealer);
        let mut events = vec![Event::all(
            EventName::KyokuStarted,
            json!({
                "round_wind": round.round_wind,
                "kyoku": round.kyoku,
                "honba": round.honba,
                "kyotaku": round.kyotaku,
                "dealer": dealer,
                "dora_indicators": wire(self.table.wall.dora_indicators()),
                "wall_remaining": self.table.wall.live_remaining(),
                "points": self.points(),
            }),
        )];
        for (id, seat) in self.table.players.iter() {
            events.push(Event::seat(
                id,
                EventName::HandDealt,
                json!({
                    "hand": seat.wire_hand(),
                    "seat_wind": round.seat_wind(id, player_count),
                }),
            ));
        }
        Ok(events)
    }

    fn draw_for_current(&mut self, replacement: bool) -> Vec<Event> {
        let player = self.turns.current();
        let human = !self.is_ai(player);
        let (outcome, mut events) = if replacement {
            self.turns.draw_replacement(&mut self.table, human)
        } else {
            self.turns.draw_tile(&mut self.table, human)
        };
        match outcome {
            DrawOutcome::Drawn(_) => {
                self.rinshan = replacement;
                self.phase = Phase::AwaitingDiscard(player);
            }
            DrawOutcome::Exhausted => events.extend(self.end_exhaustive()),
        }
        events
    }

    fn open_window(
        &mut self,
        discarder: PlayerId,
        tile: Tile,
        kind: WindowKind,
        options: Vec<(PlayerId, Vec<CallOption>)>,
    ) -> Vec<Event> {
        let token = self.arm(TimerKind::CallWindow);
        let window = CallWindow::open(discarder, tile, kind, options, token, self.player_count());
        let mut events = vec![Event::all(
            EventName::CallWindowOpened,
            json!({
                "discarder": discarder,
                "tile": tile.to_string(),
                "kind": kind,
                "token": token,
                "timeout_ms": self.config.call_timeout_ms,
            }),
        )];
        for player in window.responders() {
            let options: Vec<Value> = window
                .options_for(player)
                .iter()
                .map(|o| json!({ "type": o.kind, "tile": o.tile.to_string(), "consumed": o.wire_consumed() }))
                .collect();
            events.push(Event::seat(
                player,
                EventName::ActionOptions,
                json!({ "token": token, "options": options }),
            ));
        }
        log::debug!("call window {} open on {} from {}", token, tile, discarder);
        self.window = Some(window);
        self.phase = Phase::CallWindow;
        events
    }

    fn resolve_window(&mut self) -> EngineResult<Vec<Event>> {
        self.disarm();
        let Some(mut window) = self.window.take() else {
            return Err(self.invalid_phase("resolve_window"));
        };
        window.skip_remaining();
        ActionManager::apply_passed_ron(&mut self.table, &window);
        let resolution = window.resolve();
        log::debug!("call window {} resolved: {:?}", window.token, resolution);

        let mut events = vec![Event::all(EventName::CallWindowClosed, json!({ "token": window.token }))];
        match resolution {
            Resolution::Ron(winners) => events.extend(self.resolve_ron(&window, &winners)),
            Resolution::Call(caller, option) => events.extend(self.resolve_call(&window, caller, &option)?),
            Resolution::Nothing => match window.kind {
                WindowKind::Discard => events.extend(self.after_discard_settled()),
                WindowKind::Chankan => events.extend(self.draw_for_current(true)),
            },
        }
        Ok(events)
    }

    fn resolve_ron(&mut self, window: &CallWindow, winners: &[PlayerId]) -> Vec<Event> {
        // a ronned riichi discard never becomes a deposit
        self.pending_riichi = None;
        if winners.len() >= 3 && self.config.triple_ron_abort {
            log::debug!("triple ron on {} aborts the kyoku", window.tile);
            return self.end_round(RoundResult::AbortiveDraw {
                kind: AbortKind::TripleRon,
            });
        }
        let wins: Vec<WinRecord> = winners
            .iter()
            .map(|&player| {
                let hand = ActionManager::evaluate_ron(
                    &self.table,
                    &*self.rules,
                    self.round.state(),
                    player,
                    window.tile,
                    window.kind,
                );
                let liable = self.liable_for(player, &hand);
                WinRecord { player, hand, liable }
            })
            .collect();
        for win in &wins {
            self.record(win.player, ActionKind::Ron, Some(window.tile));
        }
        self.end_round(RoundResult::Ron {
            discarder: window.discarder,
            wins,
        })
    }

    fn resolve_call(&mut self, window: &CallWindow, caller: PlayerId, option: &CallOption) -> EngineResult<Vec<Event>> {
        let mut events = Vec::new();
        if let Some(pending) = self.pending_riichi.take() {
            events.push(self.accept_riichi(pending));
        }
        let outcome = ActionManager::perform_call(&mut self.table, caller, option, window.discarder)?;
        self.turns.jump_to(caller);
        self.record(caller, option.kind, Some(option.tile));
        events.push(self.meld_event(caller, Some(window.discarder), option.kind, &outcome.meld.wire_tiles()));
        if outcome.dora == Some(DoraTiming::AfterDiscard) {
            self.pending_dora += 1;
        }

        if outcome.replacement {
            events.extend(self.draw_for_current(true));
        } else {
            self.rinshan = false;
            self.phase = Phase::AwaitingDiscard(caller);
            events.push(Event::all(
                EventName::TurnChanged,
                json!({
                    "player": caller,
                    "turn": self.turns.turn_counter(),
                    "wall_remaining": self.table.wall.live_remaining(),
                }),
            ));
        }
        Ok(events)
    }

    /// The discard stood: accept a pending riichi, check aborts and the
    /// wall, then schedule the next draw.
    fn after_discard_settled(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(pending) = self.pending_riichi.take() {
            events.push(self.accept_riichi(pending));
        }
        if let Some(kind) = self.abort_after_discard() {
            log::debug!("abortive draw: {}", kind);
            events.extend(self.end_round(RoundResult::AbortiveDraw { kind }));
            return events;
        }
        if self.table.wall.live_remaining() == 0 {
            events.extend(self.end_exhaustive());
            return events;
        }
        let token = self.arm(TimerKind::Advance);
        self.phase = Phase::AwaitingProceed;
        events.push(Event::all(
            EventName::AdvanceScheduled,
            json!({
                "token": token,
                "next_player": self.turns.current().next(self.player_count()),
            }),
        ));
        events
    }

    fn accept_riichi(&mut self, pending: PendingRiichi) -> Event {
        let seat = &mut self.table.players[pending.player];
        seat.riichi = true;
        seat.double_riichi = pending.double;
        seat.ippatsu = true;
        self.round.deposit_riichi(seat);
        log::debug!("{} riichi accepted", pending.player);
        Event::all(
            EventName::RiichiAccepted,
            json!({
                "player": pending.player,
                "double": pending.double,
                "points": seat.points,
                "kyotaku": self.round.state().kyotaku,
            }),
        )
    }

    fn abort_after_discard(&self) -> Option<AbortKind> {
        let player_count = self.player_count();
        if self.rules.four_seat_aborts() {
            if RuleEffectManager::is_suufuu_renda(self.turns.first_discards(), player_count) {
                return Some(AbortKind::SuufuuRenda);
            }
            if RuleEffectManager::is_suucha_riichi(&self.table) {
                return Some(AbortKind::SuuchaRiichi);
            }
        }
        RuleEffectManager::is_suukan_settsu(&self.table).then_some(AbortKind::SuukanSettsu)
    }

    fn end_exhaustive(&mut self) -> Vec<Event> {
        let tenpai: Vec<PlayerId> = self
            .table
            .players
            .iter()
            .filter(|(_, p)| p.is_tenpai())
            .map(|(id, _)| id)
            .collect();
        let nagashi: Vec<PlayerId> = self
            .table
            .players
            .iter()
            .filter(|(_, p)| p.nagashi_eligible && !p.discards().is_empty())
            .map(|(id, _)| id)
            .collect();
        self.end_round(RoundResult::ExhaustiveDraw { tenpai, nagashi })
    }

    fn end_round(&mut self, result: RoundResult) -> Vec<Event> {
        self.disarm();
        self.window = None;
        self.pending_riichi = None;

        let riichi_winner = result.winners().iter().any(|&p| self.table.players[p].riichi);
        let uradora = if riichi_winner {
            wire(&self.table.wall.uradora_indicators())
        } else {
            Vec::new()
        };
        let settlement = self.round.settle(&mut self.table, &*self.rules, result);
        let mut events = vec![Event::all(
            EventName::RoundEnded,
            json!({
                "result": settlement.result,
                "deltas": settlement.deltas.values().copied().collect::<Vec<i32>>(),
                "points": self.points(),
                "kyotaku_claimed": settlement.kyotaku_claimed,
                "renchan": settlement.renchan,
                "uradora_indicators": uradora,
            }),
        )];
        self.phase = Phase::RoundOver;

        if settlement.match_over {
            self.standings = self.round.final_standings(&mut self.table);
            log::info!("match over after {} kyoku", self.round.kyoku_played());
            events.push(Event::all(EventName::MatchEnded, json!({ "standings": self.standings })));
            self.phase = Phase::MatchOver;
        }
        self.last_settlement = Some(settlement);
        events
    }

    // === AI seats ===

    fn ai_turn(&mut self, player: PlayerId) -> Vec<Event> {
        match self.try_ai_turn(player) {
            Ok(events) => events,
            Err(err) => {
                log::warn!("{}; falling back to tsumogiri", err);
                let mut events = vec![Event::error(&err, player)];
                let fallback = self
                    .get_observation_for(player)
                    .ok()
                    .and_then(|o| TsumogiriStrategy.decide_discard(&o).ok());
                if let Some(decision) = fallback {
                    let result = self.apply_turn_decision(player, decision);
                    events.extend(self.report(player, result));
                }
                events
            }
        }
    }

    fn try_ai_turn(&mut self, player: PlayerId) -> EngineResult<Vec<Event>> {
        let observation = self.get_observation_for(player)?;
        let decision = self
            .strategy_for(player)?
            .decide_discard(&observation)
            .map_err(|e| strategy_error(player, &e))?;
        self.apply_turn_decision(player, decision)
    }

    fn apply_turn_decision(&mut self, player: PlayerId, decision: TurnDecision) -> EngineResult<Vec<Event>> {
        match decision {
            TurnDecision::Discard { tile, riichi } => self.try_discard(player, &tile, riichi),
            TurnDecision::Tsumo => self.try_tsumo(player),
            TurnDecision::Ankan { tile } => self.try_ankan(player, TileKind::parse(&tile)?.0),
            TurnDecision::Kakan { tile } => self.try_kakan(player, TileKind::parse(&tile)?.0),
            TurnDecision::KyuushuKyuuhai => self.try_abortive_draw(player, AbortKind::KyuushuKyuuhai),
        }
    }

    fn ai_response(&mut self, player: PlayerId) -> Vec<Event> {
        match self.try_ai_response(player) {
            Ok(events) => events,
            Err(err) => {
                log::warn!("{}; skipping", err);
                let mut events = vec![Event::error(&err, player)];
                let result = self.try_skip(player);
                events.extend(self.report(player, result));
                events
            }
        }
    }

    fn try_ai_response(&mut self, player: PlayerId) -> EngineResult<Vec<Event>> {
        let observation = self.get_observation_for(player)?;
        let Some((tile, legal)) = self
            .window
            .as_ref()
            .map(|w| (w.tile, w.options_for(player).to_vec()))
        else {
            return Ok(Vec::new());
        };
        let choice = self
            .strategy_for(player)?
            .decide_action(&observation, tile, &legal)
            .map_err(|e| strategy_error(player, &e))?;
        match choice {
            Some(option) if legal.contains(&option) => {
                let consumed: Vec<(TileKind, bool)> = option.consumed.iter().map(|t| (t.kind(), t.is_red())).collect();
                self.try_respond(player, option.kind, &consumed)
            }
            Some(option) => Err(EngineError::illegal(player, format!("strategy chose unavailable {}", option.kind))),
            None => self.try_skip(player),
        }
    }

    fn strategy_for(&mut self, player: PlayerId) -> EngineResult<&mut Box<dyn Strategy>> {
        self.strategies[player]
            .as_mut()
            .ok_or_else(|| EngineError::illegal(player, "seat is not AI-controlled"))
    }

    // === Helpers ===

    fn report(&self, fallback: PlayerId, result: EngineResult<Vec<Event>>) -> Vec<Event> {
        match result {
            Ok(events) => events,
            Err(err) => {
                log::warn!("command rejected during {}: {}", self.phase, err);
                vec![Event::error(&err, fallback)]
            }
        }
    }

    fn check_player(&self, player: PlayerId) -> EngineResult<()> {
        if self.table.players.contains(player) {
            Ok(())
        } else {
            Err(EngineError::UnknownPlayer { player })
        }
    }

    fn ensure_own_turn(&self, player: PlayerId, command: &'static str) -> EngineResult<()> {
        self.check_player(player)?;
        if self.window.is_some() {
            return Err(EngineError::CallWindowPending { player });
        }
        match self.phase {
            Phase::AwaitingDiscard(current) if current == player => Ok(()),
            Phase::AwaitingDiscard(_) => Err(EngineError::WrongTurn { player }),
            _ => Err(self.invalid_phase(command)),
        }
    }

    fn invalid_phase(&self, command: &'static str) -> EngineError {
        EngineError::InvalidPhase {
            command,
            phase: self.phase.to_string(),
        }
    }

    fn arm(&mut self, kind: TimerKind) -> u64 {
        self.next_token += 1;
        self.armed = Some((self.next_token, kind));
        self.next_token
    }

    fn disarm(&mut self) {
        self.armed = None;
    }

    fn shuffle_wall(&mut self) -> Wall {
        let mut stream = self.rng.fork();
        Wall::shuffled(self.rules.is_three_player(), self.config.red_fives, &mut stream)
    }

    fn record(&mut self, player: PlayerId, kind: ActionKind, tile: Option<Tile>) {
        self.history
            .push_back(ActionRecord::new(player, kind, tile, self.turns.turn_counter()));
    }

    fn points(&self) -> Vec<i32> {
        self.table.players.values().map(|p| p.points).collect()
    }

    fn meld_event(&self, player: PlayerId, from: Option<PlayerId>, kind: ActionKind, tiles: &[String]) -> Event {
        Event::all(
            EventName::MeldCalled,
            json!({ "player": player, "from": from, "type": kind, "tiles": tiles }),
        )
    }

    fn reveal_dora(&mut self) -> Option<Event> {
        let indicator = self.table.wall.reveal_dora()?;
        log::debug!("kan dora indicator {}", indicator);
        Some(Event::all(
            EventName::DoraRevealed,
            json!({
                "indicator": indicator.to_string(),
                "dora": self.rules.dora_successor(indicator.kind()).to_string(),
            }),
        ))
    }

    fn reveal_pending_dora(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while self.pending_dora > 0 {
            self.pending_dora -= 1;
            events.extend(self.reveal_dora());
        }
        events
    }

    fn tsumo_hand(&self, player: PlayerId) -> HandResult {
        let first_turn = self.turns.is_first_go_around() && self.table.no_calls_yet();
        ActionManager::evaluate_tsumo(
            &self.table,
            &*self.rules,
            self.round.state(),
            player,
            self.rinshan,
            first_turn,
        )
    }

    /// The seat liable for `player`'s win, when the hand contains the
    /// yakuman the liability was recorded for.
    fn liable_for(&self, player: PlayerId, hand: &HandResult) -> Option<PlayerId> {
        let (kind, from) = self.table.players[player].pao?;
        let yaku = match kind {
            PaoKind::Daisangen => Yaku::Daisangen,
            PaoKind::Daisuushii => Yaku::Daisuushii,
        };
        hand.has_yaku(yaku).then_some(from)
    }

    fn kyuushu_available(&self, player: PlayerId) -> bool {
        let seat = &self.table.players[player];
        self.turns.is_first_go_around()
            && self.table.no_calls_yet()
            && seat.discards().is_empty()
            && seat.last_drawn().is_some()
            && RuleEffectManager::is_kyuushu(seat)
    }

    fn self_actions(&self, player: PlayerId) -> Vec<SelfAction> {
        let seat = &self.table.players[player];
        let mut actions = Vec::new();
        if self.tsumo_hand(player).is_win {
            actions.push(SelfAction::Tsumo);
        }
        if !seat.riichi && seat.last_drawn().is_some() {
            let tiles = RuleEffectManager::riichi_discards(seat, self.table.wall.live_remaining());
            if !tiles.is_empty() {
                actions.push(SelfAction::Riichi { tiles: wire(&tiles) });
            }
        }
        actions.extend(ActionManager::self_kan_options(&self.table, player));
        if self.config.kyuushu_allowed && self.kyuushu_available(player) {
            actions.push(SelfAction::KyuushuKyuuhai);
        }
        actions
    }
}

fn wire(tiles: &[Tile]) -> Vec<String> {
    tiles.iter().map(ToString::to_string).collect()
}

fn strategy_error(player: PlayerId, err: &anyhow::Error) -> EngineError {
    EngineError::Strategy {
        player,
        message: format!("{:#}", err),
    }
}
