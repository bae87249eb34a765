#![no_main]

//! Move fuzzer.
//!
//! Builds an arbitrary board (exponents may reach the cap) and applies a
//! sequence of raw moves, checking that tile value is conserved and the
//! board stays valid.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tilemerge::game::{MAX_BOARD_SIZE, MAX_EXPONENT, MIN_BOARD_SIZE, apply_move, check_invariants};
use tilemerge::{Board, Direction};

#[derive(Arbitrary, Debug)]
struct MovesInput {
    size: u8,
    cells: Vec<u8>,
    moves: Vec<u8>,
}

fn tile_mass(board: &Board) -> u128 {
    board
        .cells()
        .iter()
        .filter(|&&v| v > 0)
        .map(|&v| 1u128 << v)
        .sum()
}

fuzz_target!(|input: MovesInput| {
    let span = (MAX_BOARD_SIZE - MIN_BOARD_SIZE + 1) as u8;
    let size = MIN_BOARD_SIZE + usize::from(input.size % span);

    let mut cells: Vec<u8> = input
        .cells
        .iter()
        .map(|&v| v % (MAX_EXPONENT + 1))
        .collect();
    cells.resize(size * size, 0);
    let rows: Vec<&[u8]> = cells.chunks(size).collect();
    let Ok(mut board) = Board::from_rows(&rows) else {
        return;
    };

    for &raw in input.moves.iter().take(64) {
        let Ok(direction) = Direction::try_from(raw % 4) else {
            return;
        };
        let before = board.clone();
        let outcome = apply_move(&mut board, direction);

        assert_eq!(tile_mass(&board), tile_mass(&before), "mass changed");
        if !outcome.changed {
            assert_eq!(board, before, "rejected move changed the board");
        }
        let violations = check_invariants(&board);
        assert!(violations.is_empty(), "invariants violated: {violations:?}");
    }
});
