//! Newtypes separating logical maze dimensions from the extent of the wall grid.

/// Number of logical cell rows in a maze.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Hash)]
pub struct RowsCount(pub usize);
/// Number of logical cell columns in a maze.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Hash)]
pub struct ColumnsCount(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Hash)]
pub struct RowIndex(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Hash)]
pub struct ColumnIndex(pub usize);

/// Extent of the wall grid, `2 * columns + 1`.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Width(pub usize);
/// Extent of the wall grid, `2 * rows + 1`.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Height(pub usize);

impl RowsCount {
    #[inline]
    pub fn grid_height(self) -> Height {
        Height(2 * self.0 + 1)
    }
}

impl ColumnsCount {
    #[inline]
    pub fn grid_width(self) -> Width {
        Width(2 * self.0 + 1)
    }
}
