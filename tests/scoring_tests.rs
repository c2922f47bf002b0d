//! Scoring tests - points, level progression, gravity and the leaderboard

use tris::core::{gravity_frames, Leaderboard, LeaderboardEntry, Score, ScoringTable};

#[test]
fn test_points_scale_with_level() {
    let mut score = Score::new(0, None, ScoringTable::default());
    assert_eq!(score.set(1, 0, 0).points, 40);
    assert_eq!(score.set(4, 0, 0).points, 800);

    let mut high = Score::new(5, None, ScoringTable::default());
    assert_eq!(high.set(2, 0, 0).points, 600);
    assert_eq!(high.set(3, 0, 0).points, 1800);
}

#[test]
fn test_drop_bonus_only_with_a_clear() {
    let mut score = Score::new(0, None, ScoringTable::default());
    let update = score.set(0, 5, 18);
    assert_eq!(update.points, 0);
    assert_eq!(score.total(), 0);
    assert_eq!(score.rows(), 0);

    let update = score.set(1, 3, 10);
    assert_eq!(update.points, 40 + 3 + 20);
    assert_eq!(score.total(), 63);
}

#[test]
fn test_level_up_every_ten_rows() {
    let mut score = Score::new(0, None, ScoringTable::default());
    for _ in 0..9 {
        assert!(!score.set(1, 0, 0).leveled_up);
    }
    assert_eq!(score.level(), 0);
    assert!(score.set(1, 0, 0).leveled_up);
    assert_eq!(score.level(), 1);
    assert_eq!(score.rows(), 10);

    // Level 1 needs 20 rows in total
    for _ in 0..2 {
        score.set(4, 0, 0);
    }
    assert_eq!(score.level(), 1);
    score.set(2, 0, 0);
    assert_eq!(score.level(), 2);
}

#[test]
fn test_level_from_a_high_start() {
    // Starting at 5 the first level-up needs 60 rows
    let mut score = Score::new(5, None, ScoringTable::default());
    for _ in 0..14 {
        score.set(4, 0, 0);
    }
    assert_eq!(score.rows(), 56);
    assert_eq!(score.level(), 5);
    assert!(score.set(4, 0, 0).leveled_up);
    assert_eq!(score.level(), 6);
}

#[test]
fn test_level_cap() {
    let mut score = Score::new(0, Some(2), ScoringTable::default());
    for _ in 0..50 {
        score.set(4, 0, 0);
    }
    assert_eq!(score.level(), 2);
    assert_eq!(score.max_level(), Some(2));

    let clamped = Score::new(8, Some(3), ScoringTable::default());
    assert_eq!(clamped.level(), 3);
}

#[test]
fn test_reset_restores_start() {
    let mut score = Score::new(4, None, ScoringTable::default());
    for _ in 0..20 {
        score.set(4, 0, 0);
    }
    assert!(score.level() > 4);
    score.reset();
    assert_eq!((score.level(), score.rows(), score.total()), (4, 0, 0));
}

#[test]
fn test_custom_table() {
    let table = ScoringTable {
        line_multipliers: vec![10, 20],
        soft_drop: 0,
        hard_drop: 5,
    };
    assert_eq!(table.line_points(1), 10);
    assert_eq!(table.line_points(4), 20);
    let mut score = Score::new(1, None, table);
    assert_eq!(score.set(3, 9, 2).points, 20 * 2 + 10);
}

#[test]
fn test_gravity_frames() {
    assert_eq!(gravity_frames(0, 5), 116);
    assert_eq!(gravity_frames(5, 5), 81);
    assert_eq!(gravity_frames(8, 5), 35);
    assert_eq!(gravity_frames(9, 5), 5);
    assert_eq!(gravity_frames(25, 5), 5);
    // The floor wins when it is slower than the curve
    assert_eq!(gravity_frames(8, 40), 40);
    for level in 0..9 {
        assert!(gravity_frames(level, 1) > gravity_frames(level + 1, 1));
    }
}

#[test]
fn test_leaderboard_orders_and_caps() {
    let mut board = Leaderboard::new(3);
    let entry = |total, level| LeaderboardEntry { total, level };

    assert_eq!(board.record(entry(100, 2)), Some(0));
    assert_eq!(board.record(entry(300, 1)), Some(0));
    assert_eq!(board.record(entry(100, 4)), Some(1));
    assert_eq!(board.record(entry(50, 9)), None);
    assert_eq!(board.record(entry(100, 4)), None, "duplicates are dropped");
    assert_eq!(board.record(entry(200, 0)), Some(1));

    assert_eq!(
        board.entries(),
        &[entry(300, 1), entry(200, 0), entry(100, 4)]
    );
    assert!(board.qualifies(entry(150, 0)));
    assert!(!board.qualifies(entry(100, 3)));
}

#[test]
fn test_leaderboard_json() {
    let mut board = Leaderboard::default();
    board.record(LeaderboardEntry { total: 440, level: 9 });
    let text = serde_json::to_string(&board).unwrap();
    let back: Leaderboard = serde_json::from_str(&text).unwrap();
    assert_eq!(back, board);
    assert_eq!(back.capacity(), 10);
}
