use std::time::Duration;

use goblin_hunt_core::{
    BoardError, BoardGeometry, CellIndex, Command, Cursor, EndIcon, EndMessage, Event, Outcome,
    SelectionColor, SessionState, Theme, HIT_GOAL, MISS_LIMIT,
};
use goblin_hunt_session::{SessionConfig, SessionController, SessionError};
use goblin_hunt_surface::{BoardSurface, CellEventKind, Container, HeadlessBoard, HeadlessModal};
use goblin_hunt_system_scheduler::Config as SchedulerConfig;

type Session = SessionController<HeadlessBoard, HeadlessModal>;

const SEED: u64 = 0x4d59_5df4_d0f3_3173;

fn bound_board(size: u32) -> HeadlessBoard {
    let geometry = BoardGeometry::new(size).expect("positive size");
    let mut board = HeadlessBoard::new(geometry);
    board
        .bind(Container::surface("game-container"))
        .expect("surface container binds");
    board
}

fn started_with(size: u32, config: SessionConfig) -> Session {
    let mut session = SessionController::new(config, bound_board(size), HeadlessModal::new());
    let mut events = Vec::new();
    session.init(&mut events).expect("bound board initialises");
    assert_eq!(events, vec![Event::SessionStarted { session: 1 }]);
    session
}

fn started(size: u32) -> Session {
    started_with(size, SessionConfig::default().with_seed(SEED))
}

fn advance(session: &mut Session, millis: u64) -> Vec<Event> {
    let mut events = Vec::new();
    session
        .apply(
            Command::Advance {
                dt: Duration::from_millis(millis),
            },
            &mut events,
        )
        .expect("advance never fails on a bound board");
    events
}

fn click(session: &mut Session, cell: CellIndex) -> Vec<Event> {
    let mut events = Vec::new();
    session
        .dispatch(CellEventKind::Click, cell, &mut events)
        .expect("click on board");
    events
}

fn click_target(session: &mut Session) -> Vec<Event> {
    let cell = session
        .board()
        .rendered_target()
        .expect("a target should be rendered");
    click(session, cell)
}

fn empty_cell(session: &Session) -> CellIndex {
    let cells = session.geometry().cell_count();
    let occupied = session.board().rendered_target().map_or(0, |cell| cell.get());
    CellIndex::new((occupied + 1) % cells)
}

#[test]
fn init_draws_every_cell_and_arms_scheduler() {
    for size in 1..=10 {
        let session = started(size);
        assert_eq!(session.board().cells().len(), (size * size) as usize);
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.scheduler().live_spawn_timers(), 1);
        assert_eq!(session.scheduler().live_safety_timeouts(), 1);
        assert_eq!(session.board().listener_count(CellEventKind::Click), 1);
        assert!(session.modal().has_restart_hook());
    }
}

#[test]
fn init_draws_the_configured_theme() {
    let session = started(4);
    assert_eq!(session.board().theme(), Some(Theme::Prairie));

    let config = SessionConfig::default()
        .with_seed(SEED)
        .with_theme(Theme::Arctic);
    let session = started_with(4, config);
    assert_eq!(session.board().theme(), Some(Theme::Arctic));
}

#[test]
fn first_tick_places_a_target() {
    let mut session = started(8);
    assert!(advance(&mut session, 999).is_empty());

    let events = advance(&mut session, 1);
    let target = session.target().expect("target stored after first tick");
    assert_eq!(events, vec![Event::TargetSpawned { cell: target }]);
    assert_eq!(session.board().rendered_target(), Some(target));
}

#[test]
fn ten_claims_win_the_session() {
    let mut session = started(8);
    let _ = advance(&mut session, 1_000);

    for expected in 1..HIT_GOAL {
        let events = click_target(&mut session);
        assert!(
            matches!(
                events.as_slice(),
                [Event::TargetClaimed { hits, .. }, Event::TargetSpawned { .. }]
                    if *hits == expected
            ),
            "unexpected events for claim {expected}: {events:?}",
        );
        assert_eq!(session.hits(), expected);
    }

    let events = click_target(&mut session);
    assert!(
        matches!(
            events.as_slice(),
            [
                Event::TargetClaimed { hits: 10, .. },
                Event::TargetSpawned { .. },
                Event::SessionEnded {
                    outcome: Outcome::Won,
                    hits: 10,
                    misses: 0,
                },
                Event::SessionStarted { session: 2 },
            ]
        ),
        "unexpected events for winning claim: {events:?}",
    );

    let shown = session.modal().shown().last().expect("win announced");
    assert_eq!(shown.text(), "You win! Your points are 10");
    assert_eq!(shown.icon(), EndIcon::Celebration);
}

#[test]
fn five_expired_targets_lose_the_session() {
    let mut session = started(8);
    let events = advance(&mut session, 6_000);

    let expiries: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            Event::TargetExpired { misses, .. } => Some(*misses),
            _ => None,
        })
        .collect();
    assert_eq!(expiries, vec![1, 2, 3, 4, 5]);
    assert!(events.contains(&Event::SessionEnded {
        outcome: Outcome::Lost,
        hits: 0,
        misses: MISS_LIMIT,
    }));
    assert_eq!(events.last(), Some(&Event::SessionStarted { session: 2 }));

    let shown = session.modal().visible().expect("loss announced");
    assert_eq!(shown, &EndMessage::for_outcome(Outcome::Lost, 0));
}

#[test]
fn five_failed_clicks_lose_the_session() {
    let mut session = started(8);
    let _ = advance(&mut session, 1_000);

    let mut misses = Vec::new();
    let mut ended = Vec::new();
    for _ in 0..MISS_LIMIT {
        let cell = empty_cell(&session);
        for event in click(&mut session, cell) {
            match event {
                Event::ClickMissed { misses: count, .. } => misses.push(count),
                Event::SessionEnded { outcome, .. } => ended.push(outcome),
                _ => {}
            }
        }
    }

    assert_eq!(misses, vec![1, 2, 3, 4, 5]);
    assert_eq!(ended, vec![Outcome::Lost]);
}

#[test]
fn conclusion_resets_everything_and_spawning_resumes() {
    let mut session = started(8);
    let _ = advance(&mut session, 6_000);

    assert_eq!(session.state(), SessionState::Active);
    assert_eq!((session.hits(), session.misses()), (0, 0));
    assert_eq!(session.target(), None);
    assert_eq!(session.board().rendered_target(), None);
    assert_eq!(session.session(), 2);
    assert_eq!(session.scheduler().live_spawn_timers(), 1);

    let events = advance(&mut session, 1_000);
    let target = session.target().expect("spawning resumed");
    assert_eq!(events, vec![Event::TargetSpawned { cell: target }]);
}

#[test]
fn misses_before_the_goal_still_allow_a_win() {
    let mut session = started(8);
    let _ = advance(&mut session, 1_000);

    for _ in 0..MISS_LIMIT - 1 {
        let cell = empty_cell(&session);
        let _ = click(&mut session, cell);
    }
    let mut ended = Vec::new();
    for _ in 0..HIT_GOAL {
        ended.extend(
            click_target(&mut session)
                .into_iter()
                .filter(|event| matches!(event, Event::SessionEnded { .. })),
        );
    }

    assert_eq!(
        ended,
        vec![Event::SessionEnded {
            outcome: Outcome::Won,
            hits: HIT_GOAL,
            misses: MISS_LIMIT - 1,
        }]
    );
}

#[test]
fn click_before_first_spawn_is_a_miss() {
    let mut session = started(4);
    let events = click(&mut session, CellIndex::new(0));
    assert_eq!(
        events,
        vec![Event::ClickMissed {
            cell: CellIndex::new(0),
            misses: 1,
        }]
    );
}

#[test]
fn claim_restarts_the_spawn_interval() {
    let mut session = started(8);
    let _ = advance(&mut session, 1_000);
    let _ = advance(&mut session, 500);

    let _ = click_target(&mut session);
    assert_eq!(
        session.scheduler().next_tick_at(),
        Some(Duration::from_millis(2_500))
    );
    assert_eq!(session.scheduler().live_spawn_timers(), 1);

    assert!(advance(&mut session, 999).is_empty());
    let events = advance(&mut session, 1);
    assert!(
        matches!(
            events.as_slice(),
            [Event::TargetExpired { misses: 1, .. }, Event::TargetSpawned { .. }]
        ),
        "unexpected events: {events:?}",
    );
}

#[test]
fn hit_detection_follows_the_rendered_marker() {
    let mut session = started(8);
    let _ = advance(&mut session, 1_000);
    let stored = session.target().expect("target stored");
    let rendered = CellIndex::new((stored.get() + 1) % 64);
    session
        .board_mut()
        .redraw_positions(Some(rendered))
        .expect("on board");

    let events = click(&mut session, stored);
    assert_eq!(
        events,
        vec![Event::ClickMissed {
            cell: stored,
            misses: 1,
        }]
    );

    let events = click(&mut session, rendered);
    assert!(matches!(
        events.first(),
        Some(Event::TargetClaimed { hits: 1, cell }) if *cell == rendered
    ));
}

#[test]
fn single_cell_board_is_always_claimable() {
    let mut session = started(1);
    let _ = advance(&mut session, 1_000);
    assert_eq!(session.target(), Some(CellIndex::new(0)));

    let mut outcomes = Vec::new();
    for _ in 0..HIT_GOAL {
        for event in click(&mut session, CellIndex::new(0)) {
            if let Event::SessionEnded { outcome, .. } = event {
                outcomes.push(outcome);
            }
        }
    }
    assert_eq!(outcomes, vec![Outcome::Won]);
}

#[test]
fn hover_is_presentational_only() {
    let mut session = started(4);
    let mut events = Vec::new();

    session
        .dispatch(CellEventKind::Enter, CellIndex::new(3), &mut events)
        .expect("on board");
    assert_eq!(session.board().cursor(), Cursor::Hammer);
    assert_eq!(session.board().selected_cells(), vec![CellIndex::new(3)]);

    session
        .dispatch(CellEventKind::Enter, CellIndex::new(5), &mut events)
        .expect("on board");
    assert_eq!(session.board().selected_cells(), vec![CellIndex::new(5)]);
    assert_eq!(session.highlighted(), Some(CellIndex::new(5)));
    let view = session.board().cell(CellIndex::new(5)).expect("on board");
    assert_eq!(view.selection(), Some(SelectionColor::Yellow));

    session
        .board_mut()
        .show_cell_tooltip(CellIndex::new(5), "goblin burrow")
        .expect("on board");
    session
        .dispatch(CellEventKind::Leave, CellIndex::new(5), &mut events)
        .expect("on board");
    assert_eq!(session.board().cursor(), Cursor::Pointer);
    let view = session.board().cell(CellIndex::new(5)).expect("on board");
    assert_eq!(view.tooltip(), None);

    assert!(events.is_empty());
    assert_eq!((session.hits(), session.misses()), (0, 0));
    assert_eq!(session.target(), None);
}

#[test]
fn clicks_outside_board_fail_fast() {
    let mut session = started(8);
    let _ = advance(&mut session, 1_000);
    let mut events = Vec::new();

    let error = session
        .dispatch(CellEventKind::Click, CellIndex::new(64), &mut events)
        .expect_err("index 64 is off an 8x8 board");
    assert_eq!(
        error.board_error(),
        Some(&BoardError::CellOutOfRange {
            cell: 64,
            cell_count: 64,
        })
    );

    let error = session
        .apply(
            Command::ClickCell {
                cell: CellIndex::new(100),
            },
            &mut events,
        )
        .expect_err("index 100 is off an 8x8 board");
    assert!(matches!(
        error,
        SessionError::Board {
            operation: "cell_click",
            ..
        }
    ));

    assert!(events.is_empty());
    assert_eq!((session.hits(), session.misses()), (0, 0));
}

#[test]
fn unbound_board_aborts_init() {
    let geometry = BoardGeometry::new(4).expect("positive size");
    let mut session = SessionController::new(
        SessionConfig::default(),
        HeadlessBoard::new(geometry),
        HeadlessModal::new(),
    );
    let mut events = Vec::new();

    let error = session.init(&mut events).expect_err("unbound board");
    assert_eq!(
        error,
        SessionError::Board {
            operation: "draw_ui",
            source: BoardError::Unbound,
        }
    );
    assert!(!session.is_initialised());
    assert!(events.is_empty());
    assert_eq!(session.scheduler().live_spawn_timers(), 0);

    let error = session
        .apply(Command::Restart, &mut events)
        .expect_err("not initialised");
    assert_eq!(error, SessionError::NotInitialised);
}

#[test]
fn init_runs_once() {
    let mut session = started(4);
    let mut events = Vec::new();
    assert_eq!(
        session.init(&mut events),
        Err(SessionError::AlreadyInitialised)
    );
    assert_eq!(session.board().listener_count(CellEventKind::Click), 1);
}

#[test]
fn dialog_confirmation_starts_a_new_session() {
    let mut session = started(8);
    let _ = advance(&mut session, 6_000);
    assert!(session.modal().visible().is_some());

    let mut events = Vec::new();
    session
        .confirm_restart(&mut events)
        .expect("restart confirmed");
    assert_eq!(events, vec![Event::SessionStarted { session: 3 }]);
    assert!(session.modal().visible().is_none());
    assert_eq!(session.scheduler().live_spawn_timers(), 1);
}

#[test]
fn dismissing_dialog_keeps_session_running() {
    let mut session = started(8);
    let _ = advance(&mut session, 6_000);
    session.dismiss_dialog();

    assert!(session.modal().visible().is_none());
    assert_eq!(session.session(), 2);
    assert!(session.scheduler().is_running());
}

#[test]
fn restart_mid_interval_spawns_within_one_tick() {
    let mut session = started(8);
    let _ = advance(&mut session, 1_000);
    let _ = click_target(&mut session);
    let _ = advance(&mut session, 500);

    let mut events = Vec::new();
    session
        .apply(Command::Restart, &mut events)
        .expect("restart");
    assert_eq!(events, vec![Event::SessionStarted { session: 2 }]);
    assert_eq!((session.hits(), session.misses()), (0, 0));
    assert_eq!(session.target(), None);
    assert_eq!(session.board().rendered_target(), None);

    assert!(advance(&mut session, 999).is_empty());
    let events = advance(&mut session, 1);
    assert!(matches!(events.as_slice(), [Event::TargetSpawned { .. }]));
}

#[test]
fn safety_timeout_halts_spawning_until_next_claim() {
    let timing = SchedulerConfig::new(Duration::from_millis(1_000), Duration::from_millis(3_500))
        .expect("valid timings");
    let mut session = started_with(8, SessionConfig::new(timing).with_seed(SEED));

    let _ = advance(&mut session, 1_000);
    let _ = advance(&mut session, 2_000);
    assert_eq!(session.misses(), 2);

    let events = advance(&mut session, 60_000);
    assert_eq!(events, vec![Event::SafetyTimeoutElapsed]);
    assert!(!session.scheduler().is_running());
    assert_eq!(session.misses(), 2);
    assert_eq!(session.state(), SessionState::Active);

    let events = click_target(&mut session);
    assert!(matches!(events.first(), Some(Event::TargetClaimed { hits: 1, .. })));
    assert!(session.scheduler().is_running());
    assert_eq!(session.scheduler().live_safety_timeouts(), 1);

    let events = advance(&mut session, 1_000);
    assert!(matches!(events.first(), Some(Event::TargetExpired { misses: 3, .. })));
}

#[test]
fn repeated_resets_keep_a_single_timer_pair() {
    let mut session = started(8);
    for _ in 0..25 {
        let mut events = Vec::new();
        session
            .apply(Command::Restart, &mut events)
            .expect("restart");
        let _ = advance(&mut session, 300);
    }
    assert_eq!(session.scheduler().live_spawn_timers(), 1);
    assert_eq!(session.scheduler().live_safety_timeouts(), 1);
}

#[test]
fn tallies_never_decrease_between_resets() {
    let mut session = started(8);
    let mut previous = (0, 0);
    let mut conclusions = 0;

    for step in 0..400_u32 {
        let events = match step % 5 {
            0 | 3 => advance(&mut session, 700),
            1 if session.board().rendered_target().is_some() => click_target(&mut session),
            2 => click(&mut session, CellIndex::new(step % 64)),
            _ => advance(&mut session, 450),
        };

        for event in &events {
            if let Event::SessionEnded {
                outcome,
                hits,
                misses,
            } = event
            {
                conclusions += 1;
                match outcome {
                    Outcome::Won => assert!(*hits == HIT_GOAL && *misses < MISS_LIMIT),
                    Outcome::Lost => assert!(*misses == MISS_LIMIT && *hits < HIT_GOAL),
                }
            }
        }

        let current = (session.hits(), session.misses());
        let was_reset = events
            .iter()
            .any(|event| matches!(event, Event::SessionStarted { .. }));
        if was_reset {
            assert!(current.0 <= HIT_GOAL && current.1 <= MISS_LIMIT);
        } else {
            assert!(
                current.0 >= previous.0 && current.1 >= previous.1,
                "tally went backwards at step {step}: {previous:?} -> {current:?}",
            );
        }
        previous = current;
    }

    assert!(conclusions > 0, "script should conclude at least one session");
}
