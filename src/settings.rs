//! Game facing maze parameters: defaults, clamping and entrance placement around the generator.

use rand::Rng;

use crate::errors::*;
use crate::generators::{clamp_unit, MazeGenerator};
use crate::grid::MazeGrid;
use crate::units::{ColumnsCount, RowsCount};

pub const MIN_SIDE: usize = 5;
pub const MAX_SIDE: usize = 26;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MazeSettings {
    pub rows: usize,
    pub cols: usize,
    pub inner_rows: usize,
    pub inner_cols: usize,
    /// Zero gives exactly one route between any two cells.
    pub drop_probability: f32,
    pub ratio: f32,
    /// Open the top wall of the first cell and the bottom wall of the last cell.
    pub entrances: bool,
}

impl Default for MazeSettings {
    fn default() -> Self {
        MazeSettings {
            rows: 15,
            cols: 15,
            inner_rows: 5,
            inner_cols: 5,
            drop_probability: 0.02,
            ratio: 0.75,
            entrances: true,
        }
    }
}

impl MazeSettings {
    /// Force every value into its playable range.
    ///
    /// Sides go into `[MIN_SIDE, MAX_SIDE]`, the room into the maze and both probabilities into
    /// `[0, 1]`.
    pub fn clamped(&self) -> MazeSettings {
        let rows = clamp(self.rows, MIN_SIDE, MAX_SIDE);
        let cols = clamp(self.cols, MIN_SIDE, MAX_SIDE);
        MazeSettings {
            rows,
            cols,
            inner_rows: self.inner_rows.min(rows),
            inner_cols: self.inner_cols.min(cols),
            drop_probability: clamp_unit(self.drop_probability),
            ratio: clamp_unit(self.ratio),
            entrances: self.entrances,
        }
    }

    pub fn generator(&self) -> MazeGenerator {
        MazeGenerator::with_ratio(self.ratio)
    }

    /// Generate a maze from these settings as given. Call `clamped` first to sanitise user input.
    pub fn build_maze<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<MazeGrid> {
        let mut grid = self.generator()
            .generate_with_room_and_rng(RowsCount(self.rows),
                                        ColumnsCount(self.cols),
                                        RowsCount(self.inner_rows),
                                        ColumnsCount(self.inner_cols),
                                        self.drop_probability,
                                        rng)?;
        if self.entrances {
            let _ = grid.open_default_entrances();
        }
        Ok(grid)
    }
}

fn clamp(value: usize, low: usize, high: usize) -> usize {
    value.max(low).min(high)
}
