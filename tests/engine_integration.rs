//! Integration tests for full engine sessions.
//!
//! These drive the public API the way an RL host would: reset, step,
//! read observations and rewards.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::cast_precision_loss)]

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Write;

use tilemerge::engine::HISTOGRAM_BINS;
use tilemerge::game::{MAX_EXPONENT, SPAWN_TWO_PROBABILITY, evaluate, spawn_tile};
use tilemerge::rollout::{GreedyPolicy, RandomPolicy, run_episode};
use tilemerge::{
    Board, ConfigError, Direction, Engine, EngineConfig, HeuristicWeights, InvalidMovePolicy,
    ObservationMode, Termination,
};

fn engine(seed: u64) -> Engine {
    Engine::new(EngineConfig {
        seed: Some(seed),
        ..EngineConfig::default()
    })
    .unwrap()
}

/// Board on which `Up` never changes anything.
fn top_row_board() -> Board {
    Board::from_rows(&[[1, 2, 1, 2], [0; 4], [0; 4], [0; 4]]).unwrap()
}

// =============================================================================
// Invalid-move policy
// =============================================================================

#[test]
fn test_seventeen_straight_invalid_moves_end_episode() {
    let mut engine = engine(1);
    engine.reset();
    engine.set_board(top_row_board()).unwrap();

    for step in 1..=16 {
        let result = engine.step(Direction::Up);
        assert!(!result.outcome.changed);
        assert!(!result.done, "ended early at step {step}");
        assert!((result.reward - -512.0).abs() < f64::EPSILON);
        assert_eq!(engine.board(), &top_row_board());
    }

    let result = engine.step(Direction::Up);
    assert!(result.done);
    assert_eq!(result.termination, Some(Termination::InvalidMoves));
    assert_eq!(engine.state().invalid_count, 17);
    assert_eq!(engine.state().total_count, 17);
}

#[test]
fn test_invalid_ratio_below_threshold_continues() {
    let policy = InvalidMovePolicy::default();
    assert!(!policy.should_terminate(16, 200));
    assert!(!policy.should_terminate(17, 200));
    assert!(policy.should_terminate(21, 200));
}

#[test]
fn test_custom_penalty_applies() {
    let mut engine = Engine::new(EngineConfig {
        seed: Some(4),
        invalid_move: InvalidMovePolicy {
            penalty: -3.5,
            ..InvalidMovePolicy::default()
        },
        ..EngineConfig::default()
    })
    .unwrap();
    engine.set_board(top_row_board()).unwrap();
    let result = engine.step(Direction::Up);
    assert!((result.reward - -3.5).abs() < f64::EPSILON);
    assert_eq!(result.info.score, 0);
}

// =============================================================================
// Accepted moves
// =============================================================================

#[test]
fn test_accepted_move_spawns_one_tile() {
    let mut engine = engine(8);
    engine.set_board(top_row_board()).unwrap();
    let result = engine.step(Direction::Down);

    assert!(result.outcome.changed);
    assert_eq!(result.outcome.score, 0);
    assert_eq!(engine.board().count_occupied(), 5);
    assert_eq!(engine.board().row(3), &[1, 2, 1, 2]);
    assert_eq!(engine.state().last_action, Some(Direction::Down));
}

#[test]
fn test_merge_score_accumulates() {
    let mut engine = engine(12);
    engine
        .set_board(Board::from_rows(&[[1, 1, 2, 2], [0; 4], [0; 4], [0; 4]]).unwrap())
        .unwrap();
    let result = engine.step(Direction::Left);

    assert_eq!(result.outcome.score, 2 + 3);
    assert!((result.reward - 5.0).abs() < f64::EPSILON);
    assert_eq!(result.info.score, 5);
    assert_eq!(engine.state().last_action_score, 5);
    assert_eq!(&engine.board().row(0)[..2], &[2, 3]);
}

#[test]
fn test_full_board_without_merges_is_done() {
    // Sliding Right merges the 3s; the spawn then fills the gap.
    let mut small = Engine::new(EngineConfig {
        size: 2,
        seed: Some(5),
        ..EngineConfig::default()
    })
    .unwrap();
    small
        .set_board(Board::from_rows(&[[1, 2], [3, 3]]).unwrap())
        .unwrap();
    let result = small.step(Direction::Right);

    assert!(result.outcome.changed);
    assert_eq!(small.board().row(1)[1], 4);
    assert_eq!(small.board().count_empty(), 0);
    // [1,2] over [x,4] with x in {1,2}: x=1 merges with the 1 above.
    let x = small.board().row(1)[0];
    assert_eq!(result.done, x != 1);
    if result.done {
        assert_eq!(result.termination, Some(Termination::NoMovesLeft));
    }
}

// =============================================================================
// Spawn
// =============================================================================

#[test]
fn test_spawn_ratio_close_to_nine_to_one() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut twos = 0u32;
    let trials = 20_000u32;
    for _ in 0..trials {
        let mut board = Board::new(4).unwrap();
        spawn_tile(&mut board, &mut rng).unwrap();
        if board.max_exponent() == 1 {
            twos += 1;
        }
    }
    let ratio = f64::from(twos) / f64::from(trials);
    assert!(
        (ratio - SPAWN_TWO_PROBABILITY).abs() < 0.01,
        "ratio {ratio}"
    );
}

#[test]
fn test_spawn_on_full_board_does_nothing() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut board = Board::from_rows(&[[1, 2], [3, 4]]).unwrap();
    assert_eq!(spawn_tile(&mut board, &mut rng), None);
    assert_eq!(board, Board::from_rows(&[[1, 2], [3, 4]]).unwrap());
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_same_seed_same_trajectory() {
    let mut a = engine(99);
    let mut b = engine(99);
    let mut actions = RandomPolicy::new(7);
    let mut board_seen = Board::new(4).unwrap();

    for _ in 0..500 {
        let direction = tilemerge::rollout::Policy::choose(&mut actions, &board_seen);
        let ra = a.step(direction);
        let rb = b.step(direction);
        assert_eq!(ra, rb);
        assert_eq!(a.board(), b.board());
        board_seen = a.board().clone();
        if ra.done {
            break;
        }
    }
    assert_eq!(a.state(), b.state());
}

#[test]
fn test_episode_results_reproducible() {
    let first = run_episode(&mut engine(31), &mut GreedyPolicy, 10_000);
    let second = run_episode(&mut engine(31), &mut GreedyPolicy, 10_000);
    assert_eq!(first, second);
}

#[test]
fn test_histogram_counts_played_episodes() {
    let mut engine = engine(17);
    for _ in 0..3 {
        run_episode(&mut engine, &mut GreedyPolicy, 50);
    }
    // The third episode is recorded on the next reset.
    engine.reset();
    let recorded: u64 = engine.histogram().iter().sum();
    assert_eq!(recorded, 3);
    assert_eq!(engine.histogram().len(), HISTOGRAM_BINS);
    assert_eq!(HISTOGRAM_BINS, usize::from(MAX_EXPONENT) + 1);
}

// =============================================================================
// Observations
// =============================================================================

#[test]
fn test_one_hot_observation_matches_board() {
    let mut engine = engine(3);
    engine
        .set_board(Board::from_rows(&[[0, 1, 0, 0], [0, 0, 11, 0], [0; 4], [0; 4]]).unwrap())
        .unwrap();
    let obs = engine.observation();
    assert_eq!(obs.shape, [4, 4, 16]);
    assert_eq!(obs.get(0, 1, 1), Some(1));
    assert_eq!(obs.get(0, 1, 0), Some(0));
    assert_eq!(obs.get(1, 2, 11), Some(1));
    assert_eq!(obs.get(3, 3, 0), Some(1));
    assert_eq!(obs.data.iter().map(|&v| u32::from(v)).sum::<u32>(), 16);
}

#[test]
fn test_raw_observation_is_exponents() {
    let mut engine = Engine::new(EngineConfig {
        size: 3,
        seed: Some(2),
        observation: ObservationMode::Raw,
        ..EngineConfig::default()
    })
    .unwrap();
    let board = Board::from_rows(&[[1, 0, 3], [0, 5, 0], [0, 0, 9]]).unwrap();
    engine.set_board(board.clone()).unwrap();
    let obs = engine.observation();
    assert_eq!(obs.shape, [3, 3, 1]);
    assert_eq!(obs.data, board.cells());
}

// =============================================================================
// Heuristic reward
// =============================================================================

#[test]
fn test_heuristic_reward_adds_board_value() {
    let weights = HeuristicWeights {
        empty: 1.0,
        sum: 0.5,
        sum_exp: 2.0,
        ..HeuristicWeights::default()
    };
    let mut engine = Engine::new(EngineConfig {
        seed: Some(6),
        heuristic: Some(weights),
        ..EngineConfig::default()
    })
    .unwrap();
    engine
        .set_board(Board::from_rows(&[[1, 1, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap())
        .unwrap();
    let result = engine.step(Direction::Left);

    let expected = f64::from(result.outcome.score)
        + evaluate(engine.board(), result.outcome.moved_cells, &weights);
    assert_eq!(result.outcome.score, 2);
    assert!((result.reward - expected).abs() < 1e-9);
    // 14 empty cells plus 0.5 * (2^2 + spawn^2) on top of the merge.
    assert!(result.reward > 2.0 + 14.0);
}

#[test]
fn test_heuristic_rejected_move_still_penalised() {
    let mut engine = Engine::new(EngineConfig {
        seed: Some(6),
        heuristic: Some(HeuristicWeights {
            empty: 100.0,
            ..HeuristicWeights::default()
        }),
        ..EngineConfig::default()
    })
    .unwrap();
    engine.set_board(top_row_board()).unwrap();
    let result = engine.step(Direction::Up);
    assert!((result.reward - -512.0).abs() < f64::EPSILON);
}

// =============================================================================
// Configuration files
// =============================================================================

#[test]
fn test_config_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "size": 5,
            "seed": 9,
            "observation": "raw",
            "invalid_move": {{ "penalty": -10.0 }},
            "heuristic": {{ "empty": 2.0 }}
        }}"#
    )
    .unwrap();

    let config = EngineConfig::load(file.path()).unwrap();
    assert_eq!(config.size, 5);
    assert_eq!(config.seed, Some(9));
    assert_eq!(config.observation, ObservationMode::Raw);
    assert!((config.invalid_move.penalty - -10.0).abs() < f64::EPSILON);
    assert_eq!(config.invalid_move.warmup, 16);
    let weights = config.heuristic.unwrap();
    assert!((weights.empty - 2.0).abs() < f64::EPSILON);
    assert!((weights.sum_exp - 1.0).abs() < f64::EPSILON);

    let engine = Engine::new(config).unwrap();
    assert_eq!(engine.observation_shape(), [5, 5, 1]);
    assert_eq!(engine.seed_used(), 9);
}

#[test]
fn test_config_file_errors() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("missing.json");
    assert!(matches!(
        EngineConfig::load(&missing),
        Err(ConfigError::Io { .. })
    ));

    let garbled = dir.path().join("garbled.json");
    std::fs::write(&garbled, "{ size: ").unwrap();
    assert!(matches!(
        EngineConfig::load(&garbled),
        Err(ConfigError::Parse(_))
    ));

    let too_big = dir.path().join("too_big.json");
    std::fs::write(&too_big, r#"{ "size": 64 }"#).unwrap();
    assert!(matches!(
        EngineConfig::load(&too_big),
        Err(ConfigError::Invalid(_))
    ));
}
