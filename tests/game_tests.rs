//! Orchestrator scenarios on prearranged walls.
//!
//! Hands are dealt 13 tiles per seat starting with the dealer, so the
//! `hands` strings below are in dealing order and `draws` continue the
//! live wall from the dealer's first draw.

use riichi_engine::calls::WindowKind;
use riichi_engine::core::{ActionKind, Event, EventName, PlayerId, RuleConfig, SelfAction};
use riichi_engine::error::EngineError;
use riichi_engine::game::{Game, Phase, SeatSpec, TimerKind, TsumogiriStrategy};
use riichi_engine::hand::Yaku;
use riichi_engine::round::{AbortKind, RoundResult};
use riichi_engine::table::PaoKind;
use riichi_engine::tiles::{parse_kinds, MeldType, TileKind, Wall};

// ============================================================================
// Helpers
// ============================================================================

fn seat(n: u8) -> PlayerId {
    PlayerId::new(n)
}

fn config() -> RuleConfig {
    RuleConfig::four_player().with_red_fives(false)
}

fn humans(config: RuleConfig) -> Game {
    let seats = (0..config.player_count())
        .map(|i| SeatSpec::human(format!("p{}", i)))
        .collect();
    Game::new(config, seats).unwrap()
}

fn arranged(hands: &[&str], draws: &str, dead: &str) -> Wall {
    let mut live = Vec::new();
    for hand in hands {
        live.extend(parse_kinds(hand).unwrap());
    }
    live.extend(parse_kinds(draws).unwrap());
    Wall::arranged(Wall::tile_set(false, false), &live, &parse_kinds(dead).unwrap()).unwrap()
}

fn started(hands: &[&str], draws: &str) -> Game {
    let mut game = humans(config());
    game.start_game_with_wall(arranged(hands, draws, ""));
    game.start_first_turn();
    game
}

fn has(events: &[Event], name: EventName) -> bool {
    events.iter().any(|e| e.name == name)
}

fn error_code(events: &[Event]) -> Option<String> {
    events
        .iter()
        .find(|e| e.name == EventName::Error)
        .and_then(|e| e.payload["code"].as_str().map(str::to_string))
}

fn points(game: &Game) -> Vec<i32> {
    game.table().players.values().map(|p| p.points).collect()
}

/// Discard, then move on without waiting for the advance timer.
fn discard_and_proceed(game: &mut Game, player: PlayerId, tile: &str) {
    let events = game.discard_tile(player, tile, false);
    assert_eq!(error_code(&events), None, "discard {} by {}", tile, player);
    assert_eq!(game.phase(), Phase::AwaitingProceed);
    game.proceed_to_next_turn();
}

/// Dealer tenpai on 1z/2z; the others hold no pairs or runs to call with.
const RIICHI_DEAL: [&str; 4] = [
    "123m456p789s1122z",
    "147m258p369s1357z",
    "147p258s369m2467z",
    "258m369p147s4567z",
];

/// Seat 2 holds three red dragons; everyone else is scattered.
const PON_DEAL: [&str; 4] = [
    "147m258p369s1237z",
    "147m258p369s2356z",
    "147m258p369s4777z",
    "147m258p369s1456z",
];

/// Every seat opens with one East; the dealer is tenpai on 2z/5z after
/// discarding it.
const FOUR_WINDS_DEAL: [&str; 4] = [
    "123m456p789s1225z",
    "147m258p369s1367z",
    "147m258p369s1367z",
    "147m258p369s1367z",
];

/// Seats 1-3 each wait on 5p with tanyao.
const TRIPLE_RON_DEAL: [&str; 4] = [
    "1199m1199p1199s5z",
    "234m678m345s678s5p",
    "234m678m345s678s5p",
    "234m678m345s678s5p",
];

/// Every seat is tenpai on honors and riichis on its first discard.
const FOUR_RIICHI_DEAL: [&str; 4] = [
    "123m456m789m1122z",
    "123s456s789s3344z",
    "123m456p789s5566z",
    "234m567p345s678s7z",
];

/// Seats 0 and 1 each hold two quads.
const FOUR_KANS_DEAL: [&str; 4] = [
    "1111m2222m3456p9s",
    "1111s2222s3456m9p",
    "47m58p36s1234567z",
    "58m47p69s1234567z",
];

/// Seat 2 holds a pair of 5p; seat 3 waits on 5p with no yaku of its own.
const CHANKAN_DEAL: [&str; 4] = [
    "5p147m28s1234567z",
    "369m369s1234567z",
    "55p258m147s12345z",
    "123m789m123s46p99s",
];

/// Seat 1 holds pairs of all three dragons.
const DRAGONS_DEAL: [&str; 4] = [
    "258m258p258s1234z",
    "123m19p19s556677z",
    "369m369p369s1234z",
    "147m147p478s1234z",
];

// ============================================================================
// Scenario helpers
// ============================================================================

/// Skip every pending call option.
fn skip_all(game: &mut Game) {
    let pending = game.window().unwrap().pending();
    for player in pending {
        let events = game.skip_action(player);
        assert_eq!(error_code(&events), None);
    }
}

/// Play tsumogiri for every seat, declining all calls, until the kyoku ends.
fn play_out(game: &mut Game) {
    for _ in 0..1_000 {
        match game.phase() {
            Phase::AwaitingDiscard(player) => {
                let drawn = game.table().players[player].last_drawn().unwrap().to_string();
                let events = game.discard_tile(player, &drawn, false);
                assert_eq!(error_code(&events), None);
            }
            Phase::CallWindow => skip_all(game),
            Phase::AwaitingProceed => {
                game.proceed_to_next_turn();
            }
            _ => return,
        }
    }
    panic!("kyoku did not end");
}

/// Discard, answer the single pon option on it, then discard again.
fn pon_and_discard(game: &mut Game, discarder: PlayerId, tile: &str, caller: PlayerId, next: &str) {
    let events = game.discard_tile(discarder, tile, false);
    assert!(has(&events, EventName::CallWindowOpened), "no window on {}", tile);
    let events = game.perform_action(caller, ActionKind::Pon, None, &[]);
    assert!(has(&events, EventName::MeldCalled));
    let events = game.discard_tile(caller, next, false);
    assert_eq!(error_code(&events), None);
    assert_eq!(game.phase(), Phase::AwaitingProceed);
    game.proceed_to_next_turn();
}

fn round_kind(events: &[Event]) -> String {
    let ended = events.iter().find(|e| e.name == EventName::RoundEnded).unwrap();
    ended.payload["result"]["kind"].as_str().unwrap().to_string()
}

// ============================================================================
// Setup
// ============================================================================

/// An AI seat without a strategy aborts match construction.
#[test]
fn test_ai_seat_without_strategy_is_fatal() {
    let mut seats: Vec<SeatSpec> = (0..3).map(|i| SeatSpec::human(format!("p{}", i))).collect();
    seats.push(SeatSpec {
        name: "bot".to_string(),
        ai: true,
        strategy: None,
    });
    let err = Game::new(config(), seats).err().unwrap();
    assert!(matches!(err, EngineError::Setup { .. }));
    assert_eq!(err.code(), "setup");
}

/// The seat count must match the variant.
#[test]
fn test_seat_count_must_match_variant() {
    let seats = (0..4).map(|i| SeatSpec::human(format!("p{}", i))).collect();
    assert!(matches!(
        Game::new(RuleConfig::three_player(), seats),
        Err(EngineError::Setup { .. })
    ));
}

/// Starting deals 13 tiles per seat and waits for the first draw.
#[test]
fn test_start_game_deals() {
    let mut game = humans(config().with_seed(3));
    let events = game.start_game();
    assert_eq!(events[0].name, EventName::GameStarted);
    assert!(has(&events, EventName::KyokuStarted));
    assert_eq!(events.iter().filter(|e| e.name == EventName::HandDealt).count(), 4);
    assert_eq!(game.phase(), Phase::Dealt);
    assert!(game.table().players.values().all(|p| p.hand().len() == 13));
    assert_eq!(game.table().tile_count(), 136);

    game.start_first_turn();
    assert_eq!(game.phase(), Phase::AwaitingDiscard(seat(0)));
    assert_eq!(game.table().players[seat(0)].hand().len(), 14);

    // a second start is rejected
    let events = game.start_game();
    assert_eq!(error_code(&events).as_deref(), Some("invalid_phase"));
}

// ============================================================================
// Discards and riichi
// ============================================================================

/// Errors are scoped to the offending seat and leave state unchanged.
#[test]
fn test_rejected_discards_change_nothing() {
    let mut game = started(&RIICHI_DEAL, "9m");
    let before = game.table().players[seat(0)].hand().to_vec();

    let events = game.discard_tile(seat(1), "1m", false);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].audience, riichi_engine::Audience::Seat(seat(1)));
    assert_eq!(error_code(&events).as_deref(), Some("wrong_turn"));

    let events = game.discard_tile(seat(0), "5z", false);
    assert_eq!(error_code(&events).as_deref(), Some("tile_not_in_hand"));

    let events = game.discard_tile(seat(0), "xx", false);
    assert_eq!(error_code(&events).as_deref(), Some("parse"));

    let events = game.discard_tile(seat(9), "9m", false);
    assert_eq!(error_code(&events).as_deref(), Some("unknown_player"));

    // discarding 1z breaks tenpai
    let events = game.discard_tile(seat(0), "1z", true);
    assert_eq!(error_code(&events).as_deref(), Some("riichi_precondition"));

    assert_eq!(game.table().players[seat(0)].hand(), &before[..]);
    assert_eq!(game.phase(), Phase::AwaitingDiscard(seat(0)));
    assert!(game.history().is_empty());
}

/// The dealer waits on exactly the two honor pairs.
#[test]
fn test_dealer_waits() {
    let game = started(&RIICHI_DEAL, "9m");
    let observation = game.get_observation_for(seat(0)).unwrap();
    assert!(observation.is_my_turn());
    assert!(observation
        .self_actions
        .iter()
        .any(|a| matches!(a, SelfAction::Riichi { tiles } if tiles == &vec!["9m".to_string()])));

    let mut waits = game.table().players[seat(0)].waits_without(observation.drawn.unwrap());
    waits.sort();
    assert_eq!(waits, parse_kinds("12z").unwrap());
}

/// A riichi player may only discard the tile just drawn.
#[test]
fn test_riichi_locks_discards_to_drawn_tile() {
    let mut game = started(&RIICHI_DEAL, "9m9p9s1p8p");

    let events = game.discard_tile(seat(0), "9m", true);
    assert!(has(&events, EventName::RiichiAccepted));
    assert!(has(&events, EventName::AdvanceScheduled));
    {
        let dealer = &game.table().players[seat(0)];
        assert!(dealer.riichi && dealer.double_riichi && dealer.ippatsu);
        assert_eq!(dealer.points, 24_000);
    }
    assert_eq!(game.round_state().kyotaku, 1);

    game.proceed_to_next_turn();
    discard_and_proceed(&mut game, seat(1), "9p");
    discard_and_proceed(&mut game, seat(2), "9s");
    discard_and_proceed(&mut game, seat(3), "1p");
    assert_eq!(game.phase(), Phase::AwaitingDiscard(seat(0)));

    let events = game.discard_tile(seat(0), "1m", false);
    assert_eq!(error_code(&events).as_deref(), Some("illegal_action"));

    let events = game.discard_tile(seat(0), "8p", false);
    assert_eq!(error_code(&events), None);
    assert!(!game.table().players[seat(0)].ippatsu);
    assert_eq!(game.history().len(), 5);
}

/// Tsumo after riichi collects the riichi stick and keeps the dealer.
#[test]
fn test_riichi_tsumo_settles() {
    let mut game = started(&RIICHI_DEAL, "9m9p9s1p1z");
    game.discard_tile(seat(0), "9m", true);
    game.proceed_to_next_turn();
    discard_and_proceed(&mut game, seat(1), "9p");
    discard_and_proceed(&mut game, seat(2), "9s");
    discard_and_proceed(&mut game, seat(3), "1p");

    let observation = game.get_observation_for(seat(0)).unwrap();
    assert!(observation.self_actions.contains(&SelfAction::Tsumo));

    let events = game.perform_action(seat(0), ActionKind::Tsumo, None, &[]);
    assert!(has(&events, EventName::RoundEnded));
    assert_eq!(game.phase(), Phase::RoundOver);

    let settlement = game.last_settlement().unwrap();
    assert!(settlement.renchan);
    assert_eq!(settlement.kyotaku_claimed, 1);
    assert!(matches!(settlement.result, RoundResult::Tsumo { ref win } if win.player == seat(0)));
    assert_eq!(settlement.deltas.values().sum::<i32>(), 1000);
    assert!(settlement.deltas[seat(0)] > 0);

    assert_eq!(points(&game).iter().sum::<i32>(), 100_000);
    assert_eq!(game.round_state().kyotaku, 0);
    assert_eq!(game.round_state().honba, 1);
    assert_eq!(game.round_state().dealer, seat(0));
}

/// Tsumo without a winning hand is rejected.
#[test]
fn test_false_tsumo_rejected() {
    let mut game = started(&RIICHI_DEAL, "9m");
    let events = game.perform_action(seat(0), ActionKind::Tsumo, None, &[]);
    assert_eq!(error_code(&events).as_deref(), Some("illegal_action"));
    assert_eq!(game.phase(), Phase::AwaitingDiscard(seat(0)));
}

// ============================================================================
// Calls and timers
// ============================================================================

/// Pon moves the turn, skips the seat in between and applies kuikae.
#[test]
fn test_pon_and_kuikae() {
    let mut game = started(&PON_DEAL, "9m");

    let events = game.discard_tile(seat(0), "7z", false);
    assert!(has(&events, EventName::CallWindowOpened));
    let options: Vec<&Event> = events.iter().filter(|e| e.name == EventName::ActionOptions).collect();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].audience, riichi_engine::Audience::Seat(seat(2)));
    assert_eq!(game.phase(), Phase::CallWindow);

    let events = game.discard_tile(seat(1), "1m", false);
    assert_eq!(error_code(&events).as_deref(), Some("call_window_pending"));

    let events = game.perform_action(seat(2), ActionKind::Pon, None, &[]);
    assert!(has(&events, EventName::CallWindowClosed));
    assert!(has(&events, EventName::MeldCalled));
    assert_eq!(game.phase(), Phase::AwaitingDiscard(seat(2)));
    assert_eq!(game.table().players[seat(2)].melds().len(), 1);
    assert!(game.table().players[seat(0)].discards()[0].called);
    assert_eq!(game.table().tile_count(), 136);

    let events = game.discard_tile(seat(2), "7z", false);
    assert_eq!(error_code(&events).as_deref(), Some("illegal_action"));

    let events = game.discard_tile(seat(2), "4z", false);
    let scheduled = events.iter().find(|e| e.name == EventName::AdvanceScheduled).unwrap();
    assert_eq!(scheduled.payload["next_player"], 3);
}

/// Read-only call options match what the window offers.
#[test]
fn test_get_possible_actions() {
    let game = started(&PON_DEAL, "9m");
    let options = game.get_possible_actions(seat(0), "7z", false).unwrap();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].0, seat(2));
    let kinds: Vec<ActionKind> = options[0].1.iter().map(|o| o.kind).collect();
    assert_eq!(kinds, vec![ActionKind::Pon, ActionKind::Daiminkan]);

    assert!(game.get_possible_actions(seat(0), "7z", true).unwrap().is_empty());
    // a projection hands its error back instead of emitting an event
    assert!(matches!(
        game.get_possible_actions(seat(0), "7q", false),
        Err(EngineError::Parse { .. })
    ));
    assert!(matches!(
        game.get_possible_actions(seat(7), "7z", false),
        Err(EngineError::UnknownPlayer { .. })
    ));
    assert_eq!(game.phase(), Phase::AwaitingDiscard(seat(0)));
    assert!(game.history().is_empty());
}

/// The public view shows the open window but not who may answer it.
#[test]
fn test_window_eligibility_stays_private() {
    let mut game = started(&PON_DEAL, "9m");
    game.discard_tile(seat(0), "7z", false);

    let public = serde_json::to_value(game.get_game_state()).unwrap();
    let window = public["window"].as_object().unwrap();
    assert_eq!(window["discarder"], 0);
    assert_eq!(window["kind"], "discard");
    assert!(!window.contains_key("pending"));
    assert!(!public.to_string().contains("call_options"));

    let caller = game.get_observation_for(seat(2)).unwrap();
    assert_eq!(caller.call_options.len(), 2);
    for n in [1, 3] {
        assert!(game.get_observation_for(seat(n)).unwrap().call_options.is_empty());
    }
}

/// A timeout skips pending seats; a repeated or superseded token is ignored.
#[test]
fn test_stale_timeouts_are_ignored() {
    let mut game = started(&PON_DEAL, "9m");
    game.discard_tile(seat(0), "7z", false);
    let (window_token, kind) = game.armed_timer().unwrap();
    assert_eq!(kind, TimerKind::CallWindow);

    let events = game.on_timeout(window_token);
    assert!(has(&events, EventName::CallWindowClosed));
    assert_eq!(game.phase(), Phase::AwaitingProceed);
    let (advance_token, kind) = game.armed_timer().unwrap();
    assert_eq!(kind, TimerKind::Advance);

    assert!(game.on_timeout(window_token).is_empty());

    game.proceed_to_next_turn();
    assert_eq!(game.phase(), Phase::AwaitingDiscard(seat(1)));
    assert!(game.armed_timer().is_none());
    assert!(game.on_timeout(advance_token).is_empty());
    assert_eq!(game.phase(), Phase::AwaitingDiscard(seat(1)));
    assert_eq!(game.table().players[seat(1)].hand().len(), 14);
}

/// The advance timer draws for the next seat.
#[test]
fn test_advance_timeout_draws() {
    let mut game = started(&RIICHI_DEAL, "9m");
    game.discard_tile(seat(0), "9m", false);
    let (token, _) = game.armed_timer().unwrap();
    let events = game.on_timeout(token);
    assert!(has(&events, EventName::TurnChanged));
    assert_eq!(game.phase(), Phase::AwaitingDiscard(seat(1)));
}

// ============================================================================
// Kans, chankan and pao
// ============================================================================

/// A closed kan reveals a dora at once and keeps the dead wall at 14.
#[test]
fn test_ankan_replacement_and_dora() {
    let deal = [
        "111m456p789s2255z",
        "258m147p369s1367z",
        "369m258p147s3467z",
        "258m369p258s1467z",
    ];
    let mut game = started(&deal, "1m");
    let observation = game.get_observation_for(seat(0)).unwrap();
    assert!(observation.self_actions.contains(&SelfAction::Ankan { tile: "1m".to_string() }));
    let live_before = game.table().wall.live_remaining();

    let events = game.perform_action(seat(0), ActionKind::Ankan, Some("1m"), &[]);
    assert_eq!(error_code(&events), None);
    assert!(has(&events, EventName::MeldCalled));
    assert!(has(&events, EventName::DoraRevealed));
    assert!(has(&events, EventName::TileDrawn));

    let table = game.table();
    assert_eq!(table.wall.dead_wall_len(), 14);
    assert_eq!(table.wall.dora_indicators().len(), 2);
    assert_eq!(table.wall.live_remaining(), live_before - 1);
    assert_eq!(table.tile_count(), 136);
    assert_eq!(table.players[seat(0)].hand().len(), 11);
    assert_eq!(game.phase(), Phase::AwaitingDiscard(seat(0)));

    // no second kan of the same kind
    let events = game.perform_action(seat(0), ActionKind::Ankan, Some("1m"), &[]);
    assert_eq!(error_code(&events).as_deref(), Some("illegal_action"));
}

/// Seat 2 has ponned 5p and just drew the fourth copy.
fn kakan_ready() -> Game {
    let mut game = started(&CHANKAN_DEAL, "8m9p9p9p5p");
    pon_and_discard(&mut game, seat(0), "5p", seat(2), "1z");
    discard_and_proceed(&mut game, seat(3), "9p");
    discard_and_proceed(&mut game, seat(0), "9p");
    discard_and_proceed(&mut game, seat(1), "9p");
    assert_eq!(game.phase(), Phase::AwaitingDiscard(seat(2)));
    let observation = game.get_observation_for(seat(2)).unwrap();
    assert!(observation.self_actions.contains(&SelfAction::Kakan { tile: "5p".to_string() }));
    game
}

/// An added kan opens a ron-only window; robbing it scores chankan.
#[test]
fn test_chankan_ron() {
    let mut game = kakan_ready();
    let events = game.perform_action(seat(2), ActionKind::Kakan, Some("5p"), &[]);
    assert!(has(&events, EventName::MeldCalled));
    assert!(has(&events, EventName::CallWindowOpened));
    assert!(!has(&events, EventName::TileDrawn));
    assert!(!has(&events, EventName::DoraRevealed));

    let window = game.window().unwrap();
    assert_eq!(window.kind, WindowKind::Chankan);
    assert_eq!(window.pending(), vec![seat(3)]);
    let kinds: Vec<ActionKind> = window.options_for(seat(3)).iter().map(|o| o.kind).collect();
    assert_eq!(kinds, vec![ActionKind::Ron]);

    let events = game.perform_action(seat(3), ActionKind::Ron, None, &[]);
    assert!(has(&events, EventName::RoundEnded));
    let settlement = game.last_settlement().unwrap();
    match &settlement.result {
        RoundResult::Ron { discarder, wins } => {
            assert_eq!(*discarder, seat(2));
            assert_eq!(wins.len(), 1);
            assert_eq!(wins[0].player, seat(3));
            assert!(wins[0].hand.has_yaku(Yaku::Chankan));
        }
        other => panic!("expected a ron, got {:?}", other),
    }
    assert!(settlement.deltas[seat(3)] > 0);
    assert_eq!(settlement.deltas[seat(3)], -settlement.deltas[seat(2)]);
    assert_eq!(game.table().wall.dora_indicators().len(), 1);
}

/// Declining the robbed kan gives the replacement draw; the kan dora
/// waits for the following discard.
#[test]
fn test_chankan_skipped_defers_dora() {
    let mut game = kakan_ready();
    game.perform_action(seat(2), ActionKind::Kakan, Some("5p"), &[]);
    let live_before = game.table().wall.live_remaining();

    let events = game.skip_action(seat(3));
    assert!(has(&events, EventName::CallWindowClosed));
    assert!(has(&events, EventName::TileDrawn));
    assert!(!has(&events, EventName::DoraRevealed));
    assert_eq!(game.phase(), Phase::AwaitingDiscard(seat(2)));

    let table = game.table();
    assert_eq!(table.players[seat(2)].melds()[0].meld_type, MeldType::Kakan);
    assert_eq!(table.wall.dora_indicators().len(), 1);
    assert_eq!(table.wall.dead_wall_len(), 14);
    assert_eq!(table.wall.live_remaining(), live_before - 1);
    assert_eq!(table.tile_count(), 136);

    let events = game.discard_tile(seat(2), "2z", false);
    assert_eq!(error_code(&events), None);
    assert!(has(&events, EventName::DoraRevealed));
    assert_eq!(game.table().wall.dora_indicators().len(), 2);
    // the passed ron leaves seat 3 furiten
    assert!(game.get_observation_for(seat(3)).unwrap().furiten);
}

/// Ponning the third dragon makes the feeder liable for daisangen.
#[test]
fn test_pao_after_third_dragon_pon() {
    let mut game = started(&DRAGONS_DEAL, "5z6z7z9m9m9m9p");
    pon_and_discard(&mut game, seat(0), "5z", seat(1), "1p");
    pon_and_discard(&mut game, seat(2), "6z", seat(1), "9s");
    assert_eq!(game.table().players[seat(1)].pao, None);
    pon_and_discard(&mut game, seat(2), "7z", seat(1), "1s");
    assert_eq!(game.table().players[seat(1)].pao, Some((PaoKind::Daisangen, seat(2))));

    discard_and_proceed(&mut game, seat(2), "9m");
    discard_and_proceed(&mut game, seat(3), "9m");
    discard_and_proceed(&mut game, seat(0), "9m");
    assert_eq!(game.phase(), Phase::AwaitingDiscard(seat(1)));

    let events = game.perform_action(seat(1), ActionKind::Tsumo, None, &[]);
    assert!(has(&events, EventName::RoundEnded));
    let settlement = game.last_settlement().unwrap();
    match &settlement.result {
        RoundResult::Tsumo { win } => {
            assert_eq!(win.player, seat(1));
            assert_eq!(win.liable, Some(seat(2)));
            assert!(win.hand.has_yaku(Yaku::Daisangen));
        }
        other => panic!("expected a tsumo, got {:?}", other),
    }
    let deltas: Vec<i32> = settlement.deltas.values().copied().collect();
    assert_eq!(deltas, vec![0, 32_000, -32_000, 0]);
    // seat 2 is left below zero
    assert_eq!(game.phase(), Phase::MatchOver);
}

// ============================================================================
// Abortive draws and multiple ron
// ============================================================================

/// Four first discards of the same wind abort; a triple ron next kyoku
/// pays honba and the carried stick to the nearest winner only.
#[test]
fn test_suufuu_renda_then_triple_ron() {
    let mut game = started(&FOUR_WINDS_DEAL, "5z9m9m9m");

    let events = game.discard_tile(seat(0), "1z", true);
    assert!(has(&events, EventName::RiichiAccepted));
    game.proceed_to_next_turn();
    discard_and_proceed(&mut game, seat(1), "1z");
    discard_and_proceed(&mut game, seat(2), "1z");
    let events = game.discard_tile(seat(3), "1z", false);
    assert!(has(&events, EventName::RoundEnded));
    let ended = events.iter().find(|e| e.name == EventName::RoundEnded).unwrap();
    assert_eq!(ended.payload["result"]["kind"], AbortKind::SuufuuRenda.name());

    assert_eq!(game.phase(), Phase::RoundOver);
    assert_eq!(game.round_state().dealer, seat(0));
    assert_eq!(game.round_state().honba, 1);
    assert_eq!(game.round_state().kyotaku, 1);
    assert_eq!(points(&game), vec![24_000, 25_000, 25_000, 25_000]);

    game.next_round_with_wall(arranged(&TRIPLE_RON_DEAL, "5p", ""));
    assert_eq!(game.phase(), Phase::AwaitingDiscard(seat(0)));
    let events = game.discard_tile(seat(0), "5p", false);
    assert!(has(&events, EventName::CallWindowOpened));
    assert_eq!(game.window().unwrap().pending(), vec![seat(1), seat(2), seat(3)]);

    assert!(game.perform_action(seat(3), ActionKind::Ron, None, &[]).is_empty());
    assert!(game.perform_action(seat(1), ActionKind::Ron, None, &[]).is_empty());
    let events = game.perform_action(seat(2), ActionKind::Ron, None, &[]);
    assert!(has(&events, EventName::RoundEnded));

    let settlement = game.last_settlement().unwrap();
    assert_eq!(settlement.result.winners(), vec![seat(1), seat(2), seat(3)]);
    let deltas = &settlement.deltas;
    assert!(deltas[seat(2)] > 0);
    assert_eq!(deltas[seat(2)], deltas[seat(3)]);
    assert_eq!(deltas[seat(1)], deltas[seat(2)] + 300 + 1000);
    assert_eq!(deltas.values().sum::<i32>(), 1000);
    assert_eq!(settlement.kyotaku_claimed, 1);

    assert_eq!(game.round_state().kyotaku, 0);
    assert_eq!(game.round_state().honba, 0);
    assert_eq!(game.round_state().dealer, seat(1));
    assert_eq!(points(&game).iter().sum::<i32>(), 100_000);
}

/// Four accepted riichi abort the kyoku once the last discard stands.
#[test]
fn test_suucha_riichi_aborts() {
    let mut game = started(&FOUR_RIICHI_DEAL, "9p1p9p1p");
    for (n, tile) in [(0, "9p"), (1, "1p"), (2, "9p")] {
        let events = game.discard_tile(seat(n), tile, true);
        assert!(has(&events, EventName::RiichiAccepted));
        assert!(!has(&events, EventName::RoundEnded));
        game.proceed_to_next_turn();
    }
    let events = game.discard_tile(seat(3), "1p", true);
    assert!(has(&events, EventName::RiichiAccepted));
    assert_eq!(round_kind(&events), AbortKind::SuuchaRiichi.name());

    assert!(game.last_settlement().unwrap().renchan);
    assert_eq!(points(&game), vec![24_000; 4]);
    assert_eq!(game.round_state().kyotaku, 4);
    assert_eq!(game.round_state().honba, 1);
    assert_eq!(game.round_state().dealer, seat(0));
}

/// Four kans between two seats abort after the next discard stands.
#[test]
fn test_suukan_settsu_aborts_after_discard() {
    let mut game = started(&FOUR_KANS_DEAL, "9m9m");
    for tile in ["1m", "2m"] {
        let events = game.perform_action(seat(0), ActionKind::Ankan, Some(tile), &[]);
        assert_eq!(error_code(&events), None);
    }
    discard_and_proceed(&mut game, seat(0), "9s");
    for tile in ["1s", "2s"] {
        let events = game.perform_action(seat(1), ActionKind::Ankan, Some(tile), &[]);
        assert_eq!(error_code(&events), None);
    }
    assert_eq!(game.table().total_kans(), 4);
    assert_eq!(game.table().wall.dora_indicators().len(), 5);
    assert_eq!(game.phase(), Phase::AwaitingDiscard(seat(1)));

    let events = game.discard_tile(seat(1), "9p", false);
    assert_eq!(round_kind(&events), AbortKind::SuukanSettsu.name());
    assert_eq!(points(&game), vec![25_000; 4]);
    assert_eq!(game.round_state().honba, 1);
    assert_eq!(game.round_state().dealer, seat(0));
}

/// Seat 1 draws only terminals and honors; everyone else draws simples.
fn nagashi_wall() -> Wall {
    let set = Wall::tile_set(false, false);
    let (mut edge, simple): (Vec<TileKind>, Vec<TileKind>) = set
        .iter()
        .map(|t| t.kind())
        .partition(|k| k.is_terminal_or_honor());
    let mut seat_one = edge.split_off(edge.len() - 18).into_iter();
    let mut rest = edge.into_iter().chain(simple);

    let mut live: Vec<TileKind> = rest.by_ref().take(52).collect();
    for draw in 0..70 {
        let next = if draw % 4 == 1 { seat_one.next() } else { rest.next() };
        live.push(next.unwrap());
    }
    Wall::arranged(set, &live, &[]).unwrap()
}

/// An untouched all-terminal pond pays mangan at exhaustion.
#[test]
fn test_nagashi_mangan_on_exhaustion() {
    let mut game = humans(config());
    game.start_game_with_wall(nagashi_wall());
    game.start_first_turn();
    play_out(&mut game);
    assert_eq!(game.phase(), Phase::RoundOver);
    assert_eq!(game.table().wall.live_remaining(), 0);

    let pond = game.table().players[seat(1)].discards();
    assert_eq!(pond.len(), 18);
    assert!(pond.iter().all(|d| d.tile.kind().is_terminal_or_honor()));

    let settlement = game.last_settlement().unwrap();
    match &settlement.result {
        RoundResult::ExhaustiveDraw { nagashi, .. } => assert_eq!(nagashi, &vec![seat(1)]),
        other => panic!("expected an exhaustive draw, got {:?}", other),
    }
    let deltas: Vec<i32> = settlement.deltas.values().copied().collect();
    assert_eq!(deltas, vec![-4000, 8000, -2000, -2000]);
    assert_eq!(points(&game).iter().sum::<i32>(), 100_000);
}

/// With the abort switch on, three rons void the kyoku instead.
#[test]
fn test_triple_ron_abort_option() {
    let mut game = humans(config().with_triple_ron_abort(true));
    game.start_game_with_wall(arranged(&TRIPLE_RON_DEAL, "5p", ""));
    game.start_first_turn();
    game.discard_tile(seat(0), "5p", false);
    for n in 1..4 {
        game.perform_action(seat(n), ActionKind::Ron, None, &[]);
    }

    let settlement = game.last_settlement().unwrap();
    assert_eq!(
        settlement.result,
        RoundResult::AbortiveDraw {
            kind: AbortKind::TripleRon
        }
    );
    assert_eq!(points(&game), vec![25_000; 4]);
    assert_eq!(game.round_state().dealer, seat(0));
    assert_eq!(game.round_state().honba, 1);
}

/// Kyuushu kyuuhai on the first draw; other kinds cannot be declared.
#[test]
fn test_kyuushu_kyuuhai() {
    let deal = [
        "19m19p19s123z2345m",
        "2345678p234567s",
        "2345678p234567s",
        "2345678p234567s",
    ];
    let mut game = started(&deal, "6m");
    let observation = game.get_observation_for(seat(0)).unwrap();
    assert!(observation.self_actions.contains(&SelfAction::KyuushuKyuuhai));

    let events = game.declare_abortive_draw(seat(0), AbortKind::SuuchaRiichi);
    assert_eq!(error_code(&events).as_deref(), Some("illegal_action"));

    let events = game.declare_abortive_draw(seat(0), AbortKind::KyuushuKyuuhai);
    assert!(has(&events, EventName::RoundEnded));
    assert!(game.last_settlement().unwrap().renchan);

    let mut game = humans(config().with_kyuushu(false));
    game.start_game_with_wall(arranged(&deal, "6m", ""));
    game.start_first_turn();
    let events = game.declare_abortive_draw(seat(0), AbortKind::KyuushuKyuuhai);
    assert_eq!(error_code(&events).as_deref(), Some("illegal_action"));
}

// ============================================================================
// AI seats
// ============================================================================

fn bots(config: RuleConfig) -> Game {
    let seats = (0..config.player_count())
        .map(|i| SeatSpec::ai(format!("bot{}", i), TsumogiriStrategy))
        .collect();
    Game::new(config, seats).unwrap()
}

fn play_match(mut game: Game, total_tiles: usize) -> Game {
    game.start_game();
    for _ in 0..200 {
        game.step_ai();
        assert!(matches!(game.phase(), Phase::RoundOver | Phase::MatchOver));
        assert_eq!(game.table().tile_count(), total_tiles);
        if game.phase() == Phase::MatchOver {
            break;
        }
        game.next_round();
    }
    game
}

/// Four bots play a whole match to a final ranking.
#[test]
fn test_ai_match_four_player() {
    let game = play_match(bots(RuleConfig::four_player().with_seed(17)), 136);
    assert_eq!(game.phase(), Phase::MatchOver);
    let standings = game.standings();
    assert_eq!(standings.len(), 4);
    assert_eq!(standings.iter().map(|s| s.points).sum::<i32>(), 100_000);
    assert!(standings.windows(2).all(|w| w[0].points >= w[1].points));
    assert_eq!(standings[0].rank, 1);
}

/// Three bots with the sanma rules.
#[test]
fn test_ai_match_three_player() {
    let game = play_match(bots(RuleConfig::three_player().with_seed(5)), 108);
    assert_eq!(game.phase(), Phase::MatchOver);
    assert_eq!(game.standings().iter().map(|s| s.points).sum::<i32>(), 105_000);
}

/// A host with its own decision loop answers AI seats through the
/// ordinary commands.
#[test]
fn test_ai_seat_answered_through_commands() {
    let mut game = bots(config().with_seed(4));
    game.start_game();
    game.start_first_turn();
    let drawn = game.get_observation_for(seat(0)).unwrap().drawn.unwrap().to_string();

    let events = game.discard_tile(seat(0), &drawn, false);
    assert_eq!(error_code(&events), None);
    assert!(has(&events, EventName::TileDiscarded));
    assert_eq!(game.table().players[seat(0)].discards().len(), 1);
}

/// step_ai stops when a human has to decide.
#[test]
fn test_step_ai_waits_for_humans() {
    let seats = vec![
        SeatSpec::ai("bot0", TsumogiriStrategy),
        SeatSpec::human("p1"),
        SeatSpec::ai("bot2", TsumogiriStrategy),
        SeatSpec::ai("bot3", TsumogiriStrategy),
    ];
    let mut game = Game::new(config().with_seed(9), seats).unwrap();
    game.start_game();
    game.step_ai();
    match game.phase() {
        Phase::AwaitingDiscard(p) => assert_eq!(p, seat(1)),
        Phase::CallWindow => assert!(game.window().unwrap().is_pending(seat(1))),
        Phase::RoundOver => {}
        other => panic!("unexpected phase {}", other),
    }
}
