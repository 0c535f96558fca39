//! Level session tests - move budget and win/lose transitions

use candy_cascade::core::{
    Board, Engine, EngineConfig, EngineError, Level, LevelConfig, LevelStatus, SimpleRng,
};
use candy_cascade::types::Pos;

const PLANTED: [&str; 8] = [
    "RRBRYBRY", "OGROGPOG", "YBRYBRYB", "GPOGPOGP", "BRYBRYBR", "POGPOGPO", "RYBRYBRP",
    "OGPOGPPG",
];

fn level(moves: u32, target_score: u32) -> Level {
    let board = Board::parse(6, &PLANTED).unwrap();
    let engine = Engine::from_board(board, SimpleRng::new(8)).unwrap();
    Level::new(engine, LevelConfig { moves, target_score })
}

#[test]
fn test_from_config() {
    let config = EngineConfig {
        seed: Some(3),
        moves: 7,
        target_score: 900,
        ..EngineConfig::default()
    };
    let level = Level::from_config(&config).unwrap();
    assert_eq!(level.moves_left(), 7);
    assert_eq!(level.config().target_score, 900);
    assert_eq!(level.status(), LevelStatus::Playing);
    assert_eq!(level.engine().seed(), Some(3));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = EngineConfig {
        size: 2,
        ..EngineConfig::default()
    };
    assert!(matches!(
        Level::from_config(&config),
        Err(EngineError::InvalidConfig(_))
    ));
}

#[test]
fn test_rejected_swaps_are_free() {
    let mut level = level(2, u32::MAX);
    for _ in 0..5 {
        let out = level.propose_swap(Pos::new(3, 3), Pos::new(3, 4)).unwrap();
        assert!(!out.accepted);
    }
    assert_eq!(level.moves_left(), 2);
    assert!(level.is_playing());
}

#[test]
fn test_budget_runs_out() {
    let mut level = level(1, u32::MAX);
    let out = level.propose_swap(Pos::new(0, 2), Pos::new(1, 2)).unwrap();
    assert!(out.accepted);
    assert_eq!(level.moves_left(), 0);
    assert_eq!(level.status(), LevelStatus::OutOfMoves);
    assert_eq!(level.run_automatic_moves(1), Err(EngineError::LevelOver));
}

#[test]
fn test_target_reached_wins() {
    let mut level = level(10, 400);
    level.propose_swap(Pos::new(0, 2), Pos::new(1, 2)).unwrap();
    assert_eq!(level.status(), LevelStatus::Won);
    assert!(level.score() >= 400);
}

#[test]
fn test_color_bomb_can_win_without_moves() {
    let mut level = level(3, 2000);
    let out = level.trigger_color_bomb(None).unwrap();
    assert!(out.bonus_score >= 2000);
    assert_eq!(level.moves_left(), 3);
    assert_eq!(level.status(), LevelStatus::Won);
}
