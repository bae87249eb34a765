//! Observation tensors handed to the host.

use serde::{Deserialize, Serialize};

use crate::game::Board;

/// Number of channels in the one-hot encoding (exponents 0..=15).
pub const ONE_HOT_CHANNELS: usize = 16;

/// How the board is projected into an observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationMode {
    /// `size × size × 16`, one channel per exponent.
    #[default]
    OneHot,
    /// `size × size × 1` raw exponents.
    Raw,
}

impl ObservationMode {
    /// Tensor shape for a board of edge `size`.
    #[must_use]
    pub const fn shape(self, size: usize) -> [usize; 3] {
        match self {
            ObservationMode::OneHot => [size, size, ONE_HOT_CHANNELS],
            ObservationMode::Raw => [size, size, 1],
        }
    }
}

/// A dense row-major `rows × cols × channels` tensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Tensor dimensions.
    pub shape: [usize; 3],
    /// Values, channel index varying fastest.
    pub data: Vec<u8>,
}

impl Observation {
    /// Encode `board` with `mode`.
    ///
    /// In one-hot mode exponents above 15 saturate into the last channel.
    #[must_use]
    pub fn encode(board: &Board, mode: ObservationMode) -> Self {
        let shape = mode.shape(board.size());
        let data = match mode {
            ObservationMode::Raw => board.cells().to_vec(),
            ObservationMode::OneHot => {
                let mut data = vec![0u8; board.cells().len() * ONE_HOT_CHANNELS];
                for (cell, &value) in board.cells().iter().enumerate() {
                    let channel = usize::from(value).min(ONE_HOT_CHANNELS - 1);
                    data[cell * ONE_HOT_CHANNELS + channel] = 1;
                }
                data
            }
        };
        Self { shape, data }
    }

    /// Value at `(row, col, channel)`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize, channel: usize) -> Option<u8> {
        let [rows, cols, channels] = self.shape;
        if row >= rows || col >= cols || channel >= channels {
            return None;
        }
        self.data.get((row * cols + col) * channels + channel).copied()
    }
}
