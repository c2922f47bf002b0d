//! Session tests - end-to-end play through the public API

use std::sync::{Arc, Mutex};

use tris::core::{
    GameSession, LeaderboardEntry, LockDelay, Motion, Phase, RandomizerPolicy, SessionConfig,
    SessionEvent,
};
use tris::types::{BoardCell, GameAction, PieceIdentity, PieceKind};

fn config() -> SessionConfig {
    SessionConfig {
        start_level: 9,
        animate_clears: false,
        ..Default::default()
    }
}

fn start(config: SessionConfig, kinds: &[PieceKind]) -> GameSession {
    let mut session = GameSession::new(config).unwrap();
    session
        .bag_mut()
        .extend(kinds.iter().copied().map(PieceIdentity::from));
    session.toggle_play();
    session
}

/// Tick until the active piece changes or `limit` ticks pass
fn run_until_next_piece(session: &mut GameSession, limit: u32) -> u32 {
    let seen = session.pieces_seen();
    for tick in 1..=limit {
        session.update().unwrap();
        if session.pieces_seen() != seen || session.is_ended() {
            return tick;
        }
    }
    panic!("piece did not lock within {} ticks", limit);
}

/// Fill field row `y` except columns `3..=6`, where an I can land
fn fill_around_i(session: &mut GameSession, y: i32) {
    for x in [0, 1, 2, 7, 8, 9] {
        session.board_mut().set(x, y, BoardCell::Occupied(PieceKind::L));
    }
}

#[test]
fn test_gravity_drops_o_to_the_floor() {
    let mut session = start(config(), &[PieceKind::O, PieceKind::T]);
    session.drain_events();

    run_until_next_piece(&mut session, 1000);

    let board = session.board();
    for (x, y) in [(4, 20), (5, 20), (4, 21), (5, 21)] {
        assert_eq!(board.get(x, y), Some(BoardCell::Occupied(PieceKind::O)), "({}, {})", x, y);
    }
    assert_eq!(board.occupied_count(), 4);

    let next = session.piece().unwrap();
    assert_eq!(next.kind(), PieceKind::T);
    assert!(!board.will_intersect(next));

    let events = session.drain_events();
    assert_eq!(
        events[0],
        SessionEvent::Locked {
            kind: PieceKind::O,
            soft_dropped: 0,
            hard_dropped: 0,
        }
    );
    assert!(matches!(events[1], SessionEvent::Spawned { identity, .. }
        if identity == PieceIdentity::from(PieceKind::T)));
    // Nothing cleared, nothing scored
    assert_eq!(session.score().total(), 0);
}

#[test]
fn test_hard_drop_clears_a_row() {
    let mut session = start(config(), &[PieceKind::I, PieceKind::O]);
    fill_around_i(&mut session, 21);
    session.board_mut().set(0, 20, BoardCell::Occupied(PieceKind::S));
    session.drain_events();

    session.queue_action(GameAction::HardDrop);
    session.update().unwrap();

    // 40 * (9 + 1) for the single plus 2 per hard-dropped row
    assert_eq!(session.score().rows(), 1);
    assert_eq!(session.score().total(), 400 + 2 * 20);
    // The row above moved down
    assert_eq!(session.board().get(0, 21), Some(BoardCell::Occupied(PieceKind::S)));
    assert_eq!(session.board().occupied_count(), 1);

    let events = session.drain_events();
    assert!(events.iter().any(|e| matches!(e,
        SessionEvent::RowsCleared { rows } if rows.as_slice() == [21])));
    assert!(events.contains(&SessionEvent::ScoreChanged {
        total: 440,
        rows: 1,
        level: 9,
    }));
    assert!(!events.iter().any(|e| matches!(e, SessionEvent::LevelUp { .. })));
    assert_eq!(session.piece().unwrap().kind(), PieceKind::O);
}

#[test]
fn test_two_row_clear_with_vertical_i() {
    let mut session = start(config(), &[PieceKind::I, PieceKind::O]);
    for y in [20, 21] {
        for x in 0..9 {
            session.board_mut().set(x, y, BoardCell::Occupied(PieceKind::J));
        }
    }
    // East I lives in box column 2; x = 7 puts it in board column 9
    session.queue_action(GameAction::RotateCw);
    for _ in 0..4 {
        session.queue_action(GameAction::MoveRight);
    }
    session.queue_action(GameAction::HardDrop);
    session.update().unwrap();

    assert_eq!(session.score().rows(), 2);
    // Two cells of the I remain, now on the floor rows
    assert!(session.board().is_occupied(9, 21));
    assert!(session.board().is_occupied(9, 20));
    assert_eq!(session.board().occupied_count(), 2);
}

#[test]
fn test_blocked_spawn_ends_the_game() {
    let mut session = GameSession::new(config()).unwrap();
    session
        .bag_mut()
        .extend([PieceIdentity::from(PieceKind::I)]);
    for y in 0..3 {
        for x in 3..7 {
            session.board_mut().set(x, y, BoardCell::Occupied(PieceKind::Z));
        }
    }

    session.toggle_play();

    assert_eq!(session.phase(), Phase::Ended);
    assert!(session.piece().is_none());
    let events = session.drain_events();
    assert!(events.contains(&SessionEvent::OutOfBounds));
    assert_eq!(
        events.last(),
        Some(&SessionEvent::GameOver {
            entry: LeaderboardEntry { total: 0, level: 9 },
        })
    );

    // Terminal until reset
    session.toggle_play();
    assert!(!session.queue_action(GameAction::MoveLeft));
    assert_eq!(session.phase(), Phase::Ended);

    session.reset().unwrap();
    assert_eq!(session.phase(), Phase::Initial);
    assert_eq!(session.board().occupied_count(), 0);
    assert_eq!(session.pieces_seen(), 0);
    session.toggle_play();
    assert!(session.is_playing());
}

#[test]
fn test_spawn_blocked_by_one_row_reports_out_of_bounds() {
    let mut session = GameSession::new(config()).unwrap();
    session
        .bag_mut()
        .extend([PieceIdentity::from(PieceKind::I)]);
    // Only the I's spawn row is taken; one row of lift would already fit
    for x in 3..7 {
        session.board_mut().set(x, 1, BoardCell::Occupied(PieceKind::Z));
    }

    session.toggle_play();

    assert_eq!(session.phase(), Phase::Ended);
    let events = session.drain_events();
    assert!(events.contains(&SessionEvent::OutOfBounds), "{:?}", events);
    assert!(matches!(
        events.last(),
        Some(SessionEvent::GameOver { .. })
    ));

    // The piece ends above the field; nothing lands in the hidden rows
    for x in 3..7 {
        assert_eq!(session.board().get(x, 0), Some(BoardCell::Empty));
    }
    assert_eq!(session.board().occupied_count(), 4);
}

#[test]
fn test_stack_to_the_top_ends_the_game() {
    let mut session = start(config(), &[]);
    let mut locks = 0;
    while !session.is_ended() {
        session.queue_action(GameAction::HardDrop);
        session.update().unwrap();
        locks += 1;
        assert!(locks < 100, "a center stack must top out");
    }
    let events = session.drain_events();
    assert!(matches!(events.last(), Some(SessionEvent::GameOver { .. })));
}

#[test]
fn test_zero_row_lock_keeps_score() {
    let mut session = start(config(), &[PieceKind::O]);
    session.queue_action(GameAction::HardDrop);
    session.update().unwrap();
    assert_eq!(session.score().total(), 0);
    assert_eq!(session.score().rows(), 0);
    assert!(session.drain_events().contains(&SessionEvent::Locked {
        kind: PieceKind::O,
        soft_dropped: 0,
        hard_dropped: 19,
    }));
}

#[test]
fn test_soft_drop_rows_count_toward_score() {
    let mut session = start(config(), &[PieceKind::I]);
    fill_around_i(&mut session, 21);
    session.drain_events();
    for _ in 0..3 {
        session.queue_action(GameAction::SoftDrop);
    }
    session.queue_action(GameAction::HardDrop);
    session.update().unwrap();

    assert_eq!(session.score().total(), 400 + 3 + 2 * 17);
}

#[test]
fn test_lock_delay_countdown_while_moving() {
    let config = SessionConfig {
        lock_delay: LockDelay::LevelLinear { base: 5, floor: 5 },
        ..config()
    };
    let mut session = start(config, &[PieceKind::O, PieceKind::T]);
    let mut ticks = 0;
    while session.motion() != Motion::Sliding {
        session.queue_action(GameAction::SoftDrop);
        session.update().unwrap();
        ticks += 1;
        assert!(ticks < 100);
    }

    // Keep moving so the motionless rule never fires
    let moves = [GameAction::MoveLeft, GameAction::MoveRight];
    let mut waited = 0;
    while session.pieces_seen() == 1 {
        session.queue_action(moves[waited % 2]);
        session.update().unwrap();
        waited += 1;
        assert!(waited < 50);
    }
    assert_eq!(waited, 4);
}

#[test]
fn test_sliding_off_a_ledge_resumes_descent() {
    let mut session = start(config(), &[PieceKind::O]);
    // A one-cell ledge under the O's left column
    session.board_mut().set(4, 10, BoardCell::Occupied(PieceKind::I));
    let mut ticks = 0;
    while session.motion() != Motion::Sliding {
        session.update().unwrap();
        ticks += 1;
        assert!(ticks < 200);
    }
    assert!(session.is_grounded());

    // Two steps right clears the ledge
    session.queue_action(GameAction::MoveRight);
    session.queue_action(GameAction::MoveRight);
    session.update().unwrap();
    assert_eq!(session.motion(), Motion::Descending);
    assert!(!session.is_grounded());
}

#[test]
fn test_wildcard_spawns_with_resolved_faces() {
    let config = SessionConfig {
        use_wildcard: true,
        bag_size: 8,
        ..config()
    };
    let mut session = GameSession::new(config).unwrap();
    session.bag_mut().extend([PieceIdentity::Wildcard]);
    session.toggle_play();

    let piece = *session.piece().unwrap();
    assert!(piece.identity().is_wildcard());
    let events = session.drain_events();
    assert!(events.iter().any(|e| matches!(e,
        SessionEvent::Spawned { identity: PieceIdentity::Wildcard, .. })));

    session.queue_action(GameAction::HardDrop);
    session.update().unwrap();
    // Locked cells carry the face shown when it locked
    let locked = session.drain_events().into_iter().find_map(|e| match e {
        SessionEvent::Locked { kind, .. } => Some(kind),
        _ => None,
    });
    assert_eq!(locked, Some(piece.kind()));
    assert!(session
        .board()
        .cells()
        .iter()
        .filter_map(|c| c.kind())
        .all(|k| k == piece.kind()));
}

#[test]
fn test_clear_animation_suspends_until_finished() {
    let config = SessionConfig {
        animate_clears: true,
        ..config()
    };
    let mut session = start(config, &[PieceKind::I, PieceKind::O]);
    fill_around_i(&mut session, 21);
    session.drain_events();

    session.queue_action(GameAction::HardDrop);
    session.update().unwrap();

    assert!(session.is_suspended());
    assert!(session.piece().is_none());
    assert_eq!(session.pieces_seen(), 1);
    let events = session.drain_events();
    assert!(events.iter().any(|e| matches!(e,
        SessionEvent::Animating { rows } if rows.as_slice() == [21])));

    let snap = session.snapshot();
    assert!(snap.suspended);
    assert_eq!(snap.flashing, vec![19]);
    assert!(!snap.playable());

    // Input and ticks are ignored while suspended
    assert!(!session.queue_action(GameAction::MoveLeft));
    for _ in 0..50 {
        session.update().unwrap();
    }
    assert!(session.piece().is_none());

    session.finish_animation();
    assert!(!session.is_suspended());
    assert_eq!(session.piece().unwrap().kind(), PieceKind::O);
    assert!(session.snapshot().flashing.is_empty());
}

#[test]
fn test_entropy_drives_the_first_batch() {
    let run = |seed| {
        let config = SessionConfig {
            use_entropy: true,
            seed,
            ..config()
        };
        let mut session = GameSession::new(config).unwrap();
        for _ in 0..13 {
            session.feed_entropy(0);
        }
        session.toggle_play();
        (session.piece().unwrap().kind(), session.preview().to_vec())
    };
    let (first, preview) = run(1);
    assert_eq!((first, preview.clone()), run(4242));
    assert_eq!(first, PieceKind::I);
    assert_eq!(
        preview,
        [PieceKind::L, PieceKind::J, PieceKind::Z].map(PieceIdentity::from)
    );
}

#[test]
fn test_uniform_sessions_are_reproducible() {
    let config = SessionConfig {
        randomizer: RandomizerPolicy::Uniform,
        seed: 31337,
        ..config()
    };
    let play = |config: SessionConfig| {
        let mut session = GameSession::new(config).unwrap();
        session.toggle_play();
        let mut kinds = Vec::new();
        for _ in 0..12 {
            kinds.push(session.piece().map(|p| p.kind()));
            session.queue_action(GameAction::MoveLeft);
            session.queue_action(GameAction::HardDrop);
            session.update().unwrap();
        }
        (kinds, session.board().clone(), session.score().total())
    };
    assert_eq!(play(config.clone()), play(config));
}

#[test]
fn test_next_listener_sees_spawns() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut session = GameSession::new(config()).unwrap();
    session.set_next_listener(Box::new(move |id| sink.lock().unwrap().push(id)));
    session.toggle_play();
    session.queue_action(GameAction::HardDrop);
    session.update().unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(Some(seen[1]), session.piece().map(|p| p.identity()));
}

#[test]
fn test_pause_keeps_piece_in_place() {
    let mut session = start(config(), &[PieceKind::T]);
    session.update().unwrap();
    session.toggle_play();
    assert_eq!(session.phase(), Phase::Paused);
    let before = *session.piece().unwrap();
    for _ in 0..100 {
        session.update().unwrap();
    }
    assert_eq!(*session.piece().unwrap(), before);

    session.toggle_play();
    assert!(session.is_playing());
    let events = session.drain_events();
    assert!(events.contains(&SessionEvent::PlayingChanged { playing: false }));
    assert_eq!(
        events.last(),
        Some(&SessionEvent::PlayingChanged { playing: true })
    );
}
