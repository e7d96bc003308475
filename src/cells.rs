use std::fmt;

use crate::units::{ColumnIndex, ColumnsCount, RowIndex, RowsCount};

/// A logical maze cell, as opposed to a position in the wall grid.
///
/// Cell `(row, col)` lives at grid position `(2 * row + 1, 2 * col + 1)`.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct LogicalCell {
    pub row: usize,
    pub col: usize,
}

impl LogicalCell {
    pub fn new(row: usize, col: usize) -> LogicalCell {
        LogicalCell { row, col }
    }

    #[inline]
    pub fn from_indices(row_index: RowIndex, col_index: ColumnIndex) -> LogicalCell {
        let (RowIndex(row), ColumnIndex(col)) = (row_index, col_index);
        LogicalCell::new(row, col)
    }

    /// Decode a row major `row * columns + col` index.
    #[inline]
    pub fn from_row_major_index(index: usize, columns: ColumnsCount) -> LogicalCell {
        LogicalCell::new(index / columns.0, index % columns.0)
    }

    #[inline]
    pub fn row_major_index(&self, columns: ColumnsCount) -> usize {
        self.row * columns.0 + self.col
    }

    /// Position of this cell in the wall grid as `(row, col)`.
    #[inline]
    pub fn grid_position(&self) -> (usize, usize) {
        (2 * self.row + 1, 2 * self.col + 1)
    }

    #[inline]
    pub fn is_within(&self, rows: RowsCount, columns: ColumnsCount) -> bool {
        self.row < rows.0 && self.col < columns.0
    }

    /// The adjacent cell in the given direction, if it lies within `rows` x `columns`.
    pub fn offset(&self,
                  direction: Direction,
                  rows: RowsCount,
                  columns: ColumnsCount)
                  -> Option<LogicalCell> {
        let (row, col) = (self.row, self.col);
        let neighbour = match direction {
            Direction::Up => {
                if row > 0 {
                    Some(LogicalCell::new(row - 1, col))
                } else {
                    None
                }
            }
            Direction::Right => Some(LogicalCell::new(row, col + 1)),
            Direction::Down => Some(LogicalCell::new(row + 1, col)),
            Direction::Left => {
                if col > 0 {
                    Some(LogicalCell::new(row, col - 1))
                } else {
                    None
                }
            }
        };
        neighbour.filter(|cell| cell.is_within(rows, columns))
    }

    /// Grid position of the wall separating this cell from its neighbour in `direction`.
    ///
    /// The position may lie on the outer boundary of the grid.
    #[inline]
    pub fn wall_position(&self, direction: Direction) -> (usize, usize) {
        let (grid_row, grid_col) = self.grid_position();
        match direction {
            Direction::Up => (grid_row - 1, grid_col),
            Direction::Right => (grid_row, grid_col + 1),
            Direction::Down => (grid_row + 1, grid_col),
            Direction::Left => (grid_row, grid_col - 1),
        }
    }
}

impl fmt::Display for LogicalCell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for LogicalCell {
    fn from(row_col_pair: (usize, usize)) -> LogicalCell {
        LogicalCell::new(row_col_pair.0, row_col_pair.1)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

pub const DIRECTIONS: [Direction; 4] = [Direction::Up,
                                        Direction::Right,
                                        Direction::Down,
                                        Direction::Left];

impl Direction {
    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

const U: Direction = Direction::Up;
const R: Direction = Direction::Right;
const D: Direction = Direction::Down;
const L: Direction = Direction::Left;

/// Every ordering of the four directions, lexicographic by `Up < Right < Down < Left`.
///
/// The carver draws one row per step and takes the first open move in that row's order.
pub const DIRECTION_ORDERS: [[Direction; 4]; 24] = [[U, R, D, L],
                                                    [U, R, L, D],
                                                    [U, D, R, L],
                                                    [U, D, L, R],
                                                    [U, L, R, D],
                                                    [U, L, D, R],
                                                    [R, U, D, L],
                                                    [R, U, L, D],
                                                    [R, D, U, L],
                                                    [R, D, L, U],
                                                    [R, L, U, D],
                                                    [R, L, D, U],
                                                    [D, U, R, L],
                                                    [D, U, L, R],
                                                    [D, R, U, L],
                                                    [D, R, L, U],
                                                    [D, L, U, R],
                                                    [D, L, R, U],
                                                    [L, U, R, D],
                                                    [L, U, D, R],
                                                    [L, R, U, D],
                                                    [L, R, D, U],
                                                    [L, D, U, R],
                                                    [L, D, R, U]];
