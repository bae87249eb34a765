//! Board, coordinates and move directions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Largest tile exponent the board accepts (tile value `2^20`).
pub const MAX_EXPONENT: u8 = 20;

/// Smallest supported board edge length.
pub const MIN_BOARD_SIZE: usize = 2;

/// Largest supported board edge length.
pub const MAX_BOARD_SIZE: usize = 16;

/// Whether two cells holding `a` and `b` combine when pushed together.
///
/// Tiles at [`MAX_EXPONENT`] never merge, keeping every cell within bounds.
#[must_use]
#[inline]
pub const fn mergeable(a: u8, b: u8) -> bool {
    a == b && a != 0 && a < MAX_EXPONENT
}

/// A cell position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Row index (0 is the top row).
    pub row: usize,
    /// Column index (0 is the leftmost column).
    pub col: usize,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Get orthogonally adjacent coordinates (up, down, left, right).
    ///
    /// Returns a fixed-size array and count to avoid heap allocation.
    /// The array contains valid coordinates in indices 0..count.
    #[must_use]
    #[inline]
    pub fn adjacent(&self, size: usize) -> ([Coord; 4], u8) {
        let mut result = [Coord::new(0, 0); 4];
        let mut count = 0u8;

        if self.row > 0 {
            result[count as usize] = Coord::new(self.row - 1, self.col); // up
            count += 1;
        }
        if self.row + 1 < size {
            result[count as usize] = Coord::new(self.row + 1, self.col); // down
            count += 1;
        }
        if self.col > 0 {
            result[count as usize] = Coord::new(self.row, self.col - 1); // left
            count += 1;
        }
        if self.col + 1 < size {
            result[count as usize] = Coord::new(self.row, self.col + 1); // right
            count += 1;
        }

        (result, count)
    }
}

/// A move direction.
///
/// The discriminant is the action index hosts use, and also the number of
/// counter-clockwise quarter turns that bring the direction to the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Slide toward row 0.
    Up = 0,
    /// Slide toward the last column.
    Right = 1,
    /// Slide toward the last row.
    Down = 2,
    /// Slide toward column 0.
    Left = 3,
}

impl Direction {
    /// All directions in action-index order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Action index of this direction.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Right => "Right",
            Direction::Down => "Down",
            Direction::Left => "Left",
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Direction::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(EngineError::InvalidDirection(value))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A square grid of tile exponents.
///
/// A cell holding `v` displays as `2^v`; `0` is an empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Edge length.
    size: usize,
    /// Exponents stored in row-major order.
    cells: Vec<u8>,
}

impl Board {
    /// Create an empty board.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if `size` is outside
    /// `MIN_BOARD_SIZE..=MAX_BOARD_SIZE`.
    pub fn new(size: usize) -> Result<Self, EngineError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(EngineError::InvalidConfig(format!(
                "board size {size} outside {MIN_BOARD_SIZE}..={MAX_BOARD_SIZE}"
            )));
        }
        Ok(Self {
            size,
            cells: vec![0; size * size],
        })
    }

    /// Build a board from rows of exponents.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if the rows are not square, the
    /// size is unsupported, or any exponent exceeds [`MAX_EXPONENT`].
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, EngineError> {
        let mut board = Self::new(rows.len())?;
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != board.size {
                return Err(EngineError::InvalidConfig(format!(
                    "row {row} has {} cells, expected {}",
                    values.len(),
                    board.size
                )));
            }
            if let Some(&bad) = values.iter().find(|&&v| v > MAX_EXPONENT) {
                return Err(EngineError::InvalidConfig(format!(
                    "exponent {bad} exceeds {MAX_EXPONENT}"
                )));
            }
            let start = row * board.size;
            board.cells[start..start + board.size].copy_from_slice(values);
        }
        Ok(board)
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Edge length of the board.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Exponents in row-major order.
    #[must_use]
    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Get the exponent at `coord`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<u8> {
        self.index(coord).map(|idx| self.cells[idx])
    }

    /// Set the exponent at `coord`.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set(&mut self, coord: Coord, value: u8) -> bool {
        if let Some(idx) = self.index(coord) {
            self.cells[idx] = value;
            true
        } else {
            false
        }
    }

    #[inline]
    pub(crate) fn at(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.size + col]
    }

    #[inline]
    pub(crate) fn at_mut(&mut self, row: usize, col: usize) -> &mut u8 {
        &mut self.cells[row * self.size + col]
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        (coord.row < self.size && coord.col < self.size)
            .then(|| coord.row * self.size + coord.col)
    }

    /// Iterate over all coordinates and exponents in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, u8)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, &v)| (Coord::new(idx / size, idx % size), v))
    }

    /// Row `row` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= size`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[u8] {
        let start = row * self.size;
        &self.cells[start..start + self.size]
    }

    /// Column `col` as an owned line, top to bottom.
    #[must_use]
    pub fn column(&self, col: usize) -> Vec<u8> {
        (0..self.size).map(|row| self.at(row, col)).collect()
    }

    /// Coordinates of every empty cell in row-major order.
    #[must_use]
    pub fn empty_coords(&self) -> Vec<Coord> {
        self.iter()
            .filter(|&(_, v)| v == 0)
            .map(|(coord, _)| coord)
            .collect()
    }

    /// Number of empty cells.
    #[must_use]
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn count_occupied(&self) -> usize {
        self.cells.len() - self.count_empty()
    }

    /// Largest exponent on the board (0 for an empty board).
    #[must_use]
    pub fn max_exponent(&self) -> u8 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Copy of this board rotated counter-clockwise by `quarter_turns`.
    ///
    /// One turn maps the right column onto the top row:
    /// `new[r][c] = old[c][n - 1 - r]`.
    #[must_use]
    pub fn rotated(&self, quarter_turns: u8) -> Self {
        let n = self.size;
        let mut current = self.clone();
        for _ in 0..quarter_turns % 4 {
            let mut next = current.clone();
            for r in 0..n {
                for c in 0..n {
                    *next.at_mut(r, c) = current.at(c, n - 1 - r);
                }
            }
            current = next;
        }
        current
    }

    /// Check whether the game is over: no empty cell and no orthogonal
    /// neighbours with equal exponents.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        for (coord, value) in self.iter() {
            if value == 0 {
                return false;
            }
            let (adjacent, count) = coord.adjacent(self.size);
            if adjacent[..count as usize]
                .iter()
                .any(|&adj| self.get(adj).is_some_and(|other| mergeable(value, other)))
            {
                return false;
            }
        }
        true
    }
}
