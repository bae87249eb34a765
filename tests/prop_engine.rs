//! Property-based tests for board transitions and engine sessions.
//!
//! These tests verify conservation and determinism properties of moves.
//! Run with: cargo test --release prop_engine

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use tilemerge::game::{
    HeuristicWeights, apply_move, check_invariants, compress, evaluate, preview,
};
use tilemerge::{Board, Direction, Engine, EngineConfig, Observation, ObservationMode};

/// Boards of size 2..=6 with exponents up to 12.
fn board_strategy() -> impl Strategy<Value = Board> {
    (2usize..=6).prop_flat_map(|size| {
        prop::collection::vec(0u8..=12, size * size).prop_map(move |cells| {
            let rows: Vec<&[u8]> = cells.chunks(size).collect();
            Board::from_rows(&rows).unwrap()
        })
    })
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

/// Sum of tile values on the board.
fn tile_mass(board: &Board) -> u64 {
    board
        .cells()
        .iter()
        .filter(|&&v| v > 0)
        .map(|&v| 1u64 << v)
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Four quarter turns bring the board back.
    #[test]
    fn prop_rotation_round_trip(board in board_strategy(), turns in 0u8..4) {
        let back = board.rotated(turns).rotated((4 - turns) % 4);
        prop_assert_eq!(&back, &board);
        prop_assert_eq!(&board.rotated(4), &board);
    }

    /// Merging conserves the total tile value.
    #[test]
    fn prop_move_conserves_mass(board in board_strategy(), direction in direction_strategy()) {
        let mut moved = board.clone();
        apply_move(&mut moved, direction);
        prop_assert_eq!(tile_mass(&moved), tile_mass(&board));
    }

    /// A move never adds tiles; each merge removes exactly one.
    #[test]
    fn prop_move_never_adds_tiles(board in board_strategy(), direction in direction_strategy()) {
        let mut moved = board.clone();
        let outcome = apply_move(&mut moved, direction);
        prop_assert!(moved.count_occupied() <= board.count_occupied());
        if outcome.score == 0 {
            prop_assert_eq!(moved.count_occupied(), board.count_occupied());
        }
    }

    /// Rejected moves leave the board exactly as it was.
    #[test]
    fn prop_rejected_move_is_noop(board in board_strategy(), direction in direction_strategy()) {
        let mut moved = board.clone();
        let outcome = apply_move(&mut moved, direction);
        if !outcome.changed {
            prop_assert_eq!(&moved, &board);
            prop_assert_eq!(outcome.score, 0);
        } else {
            prop_assert!(moved != board || outcome.score > 0);
        }
    }

    /// Compressing a compressed board changes nothing.
    #[test]
    fn prop_compress_idempotent(board in board_strategy()) {
        let mut once = board.clone();
        compress(&mut once);
        let mut twice = once.clone();
        let second = compress(&mut twice);
        prop_assert!(!second.changed);
        prop_assert_eq!(second.moved_cells, 0);
        prop_assert_eq!(&twice, &once);
    }

    /// Previewing matches applying, without touching the input.
    #[test]
    fn prop_preview_matches_apply(board in board_strategy(), direction in direction_strategy()) {
        let (previewed, preview_outcome) = preview(&board, direction);
        let mut applied = board.clone();
        let outcome = apply_move(&mut applied, direction);
        prop_assert_eq!(&previewed, &applied);
        prop_assert_eq!(preview_outcome, outcome);
    }

    /// A non-empty board is terminal exactly when no move changes it.
    #[test]
    fn prop_terminal_iff_no_move(board in board_strategy()) {
        prop_assume!(board.count_occupied() > 0);
        let stuck = Direction::ALL
            .iter()
            .all(|&d| !preview(&board, d).1.changed);
        prop_assert_eq!(board.is_terminal(), stuck);
    }

    /// Evaluation is pure and zero weights give zero.
    #[test]
    fn prop_evaluate_pure(board in board_strategy(), moved in 0u32..64, w in -10.0f64..10.0) {
        let weights = HeuristicWeights {
            merge: w,
            empty: w * 0.5,
            monotonicity: -w,
            sum: w * 0.25,
            shift: w,
            ..HeuristicWeights::default()
        };
        let first = evaluate(&board, moved, &weights);
        let second = evaluate(&board, moved, &weights);
        prop_assert!(first.to_bits() == second.to_bits());

        let zero = evaluate(&board, moved, &HeuristicWeights::default());
        prop_assert!(zero.abs() < f64::EPSILON);
    }

    /// One-hot observations set exactly one channel per cell.
    #[test]
    fn prop_one_hot_single_channel(board in board_strategy()) {
        let obs = Observation::encode(&board, ObservationMode::OneHot);
        let n = board.size();
        for r in 0..n {
            for c in 0..n {
                let hot: u32 = (0..16).map(|ch| u32::from(obs.get(r, c, ch).unwrap())).sum();
                prop_assert_eq!(hot, 1);
                let exponent = usize::from(board.row(r)[c]);
                prop_assert_eq!(obs.get(r, c, exponent), Some(1));
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Same seed and actions give identical sessions.
    #[test]
    fn prop_engine_deterministic(
        seed in any::<u64>(),
        size in 2usize..=5,
        actions in prop::collection::vec(0u8..4, 1..200)
    ) {
        let config = EngineConfig { size, seed: Some(seed), ..EngineConfig::default() };
        let mut a = Engine::new(config).unwrap();
        let mut b = Engine::new(config).unwrap();
        prop_assert_eq!(a.board(), b.board());

        for action in actions {
            let ra = a.step_index(action).unwrap();
            let rb = b.step_index(action).unwrap();
            prop_assert_eq!(&ra, &rb);
            if ra.done {
                break;
            }
        }
        prop_assert_eq!(a.state(), b.state());
    }

    /// Every step keeps the board valid and the counters consistent.
    #[test]
    fn prop_engine_invariants(
        seed in any::<u64>(),
        actions in prop::collection::vec(0u8..4, 1..300)
    ) {
        let mut engine = Engine::new(EngineConfig { seed: Some(seed), ..EngineConfig::default() }).unwrap();
        let mut last_score = 0;

        for action in actions {
            let occupied = engine.board().count_occupied();
            let result = engine.step_index(action).unwrap();
            prop_assert!(check_invariants(engine.board()).is_empty());
            prop_assert!(engine.state().score >= last_score);
            prop_assert!(engine.state().invalid_count <= engine.state().total_count);
            if result.outcome.changed {
                // One spawn at most offsets the merges.
                prop_assert!(engine.board().count_occupied() <= occupied + 1);
            } else {
                prop_assert_eq!(engine.board(), engine.previous_board());
            }
            last_score = engine.state().score;
            if result.done {
                break;
            }
        }
    }
}
