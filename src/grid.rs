use std::fmt;
use std::ops::Index;
use std::slice;

use error_chain::bail;
use petgraph::graph::{NodeIndex, UnGraph};
use smallvec::SmallVec;

use crate::cells::{Direction, LogicalCell, DIRECTIONS};
use crate::errors::*;
use crate::units::{ColumnsCount, Height, RowsCount, Width};

/// Tile value of a passage.
pub const OPEN: u8 = 0;
/// Tile value of a wall or pillar.
pub const WALL: u8 = 1;

pub const OPEN_GLYPH: char = '.';
pub const WALL_GLYPH: char = '#';

pub type LinkSmallVec = SmallVec<[LogicalCell; 4]>;

/// Dense wall/passage grid of a `rows` x `columns` maze.
///
/// Stored row major with extent `(2 * rows + 1) x (2 * columns + 1)`. Positions with two odd
/// coordinates are logical cells, two even coordinates are pillars and the rest are the walls
/// between neighbouring cells (or between a boundary cell and the outside).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MazeGrid {
    tiles: Vec<u8>,
    rows: RowsCount,
    columns: ColumnsCount,
}

impl fmt::Debug for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MazeGrid :: rows: {:?}, columns: {:?}, passages: {}",
               self.rows, self.columns, self.passages_count())
    }
}

impl MazeGrid {
    /// A grid where every logical cell is open and every wall is closed.
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> Result<MazeGrid> {
        if rows.0 == 0 || columns.0 == 0 {
            bail!(ErrorKind::InvalidDimensions(rows.0, columns.0));
        }
        let tiles_count = rows.0
            .checked_mul(2)
            .and_then(|h| h.checked_add(1))
            .and_then(|h| columns.0.checked_mul(2).and_then(|w| w.checked_add(1)).map(|w| (h, w)))
            .and_then(|(h, w)| h.checked_mul(w))
            .ok_or_else(|| ErrorKind::InvalidDimensions(rows.0, columns.0))?;

        let Width(width) = columns.grid_width();
        let tiles = (0..tiles_count)
            .map(|i| {
                let (row, col) = (i / width, i % width);
                if row % 2 == 1 && col % 2 == 1 { OPEN } else { WALL }
            })
            .collect();

        Ok(MazeGrid { tiles, rows, columns })
    }

    /// Parse the text produced by `to_debug_string`.
    pub fn from_debug_str(text: &str) -> Result<MazeGrid> {
        let lines = text.lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();

        let height = lines.len();
        let width = lines.first().map_or(0, |line| line.chars().count());
        if height < 3 || width < 3 || height % 2 == 0 || width % 2 == 0 {
            bail!(ErrorKind::MalformedGrid(format!("extent {} x {} is not odd and at least 3 x 3",
                                                   height, width)));
        }

        let mut tiles = Vec::with_capacity(height * width);
        for (row, line) in lines.iter().enumerate() {
            if line.chars().count() != width {
                bail!(ErrorKind::MalformedGrid(format!("row {} has {} tiles, expected {}",
                                                       row, line.chars().count(), width)));
            }
            for (col, glyph) in line.chars().enumerate() {
                let tile = match glyph {
                    OPEN_GLYPH => OPEN,
                    WALL_GLYPH => WALL,
                    other => {
                        bail!(ErrorKind::MalformedGrid(format!("unknown glyph {:?} at ({}, {})",
                                                               other, row, col)))
                    }
                };
                tiles.push(tile);
            }
        }

        Ok(MazeGrid {
            tiles,
            rows: RowsCount(height / 2),
            columns: ColumnsCount(width / 2),
        })
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.rows.grid_height()
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.columns.grid_width()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.rows.0 * self.columns.0
    }

    #[inline]
    fn tile_index(&self, row: usize, col: usize) -> Option<usize> {
        let (Height(height), Width(width)) = (self.height(), self.width());
        if row < height && col < width {
            Some(row * width + col)
        } else {
            None
        }
    }

    /// Tile at a grid position, None when out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.tile_index(row, col).map(|i| self.tiles[i])
    }

    #[inline]
    pub fn is_open(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == Some(OPEN)
    }

    #[inline]
    pub fn is_wall(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == Some(WALL)
    }

    /// Open a grid position. Returns false if it is out of bounds.
    pub fn set_open(&mut self, row: usize, col: usize) -> bool {
        self.set(row, col, OPEN)
    }

    /// Close a grid position. Returns false if it is out of bounds.
    pub fn set_wall(&mut self, row: usize, col: usize) -> bool {
        self.set(row, col, WALL)
    }

    fn set(&mut self, row: usize, col: usize, tile: u8) -> bool {
        if let Some(i) = self.tile_index(row, col) {
            self.tiles[i] = tile;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn is_valid_cell(&self, cell: LogicalCell) -> bool {
        cell.is_within(self.rows, self.columns)
    }

    #[inline]
    pub fn cell_position(&self, cell: LogicalCell) -> Option<(usize, usize)> {
        if self.is_valid_cell(cell) {
            Some(cell.grid_position())
        } else {
            None
        }
    }

    #[inline]
    pub fn neighbour_at_direction(&self, cell: LogicalCell, dir: Direction) -> Option<LogicalCell> {
        cell.offset(dir, self.rows, self.columns)
    }

    /// Is there an open wall between `cell` and its neighbour in `dir`?
    pub fn is_neighbour_linked(&self, cell: LogicalCell, dir: Direction) -> bool {
        if self.neighbour_at_direction(cell, dir).is_none() || !self.is_valid_cell(cell) {
            return false;
        }
        let (row, col) = cell.wall_position(dir);
        self.is_open(row, col)
    }

    /// Are two cells adjacent with an open wall between them?
    pub fn is_linked(&self, a: LogicalCell, b: LogicalCell) -> bool {
        DIRECTIONS.iter()
            .any(|&dir| self.neighbour_at_direction(a, dir) == Some(b) &&
                        self.is_neighbour_linked(a, dir))
    }

    /// Cells reachable from `cell` in one step through an open wall.
    pub fn links(&self, cell: LogicalCell) -> LinkSmallVec {
        DIRECTIONS.iter()
            .filter(|&&dir| self.is_neighbour_linked(cell, dir))
            .filter_map(|&dir| self.neighbour_at_direction(cell, dir))
            .collect()
    }

    /// Number of open walls between pairs of logical cells. Boundary openings are not counted.
    pub fn passages_count(&self) -> usize {
        self.iter_cells()
            .map(|cell| {
                [Direction::Right, Direction::Down]
                    .iter()
                    .filter(|&&dir| self.is_neighbour_linked(cell, dir))
                    .count()
            })
            .sum()
    }

    /// All logical cells, row major.
    pub fn iter_cells(&self) -> impl Iterator<Item = LogicalCell> {
        let columns = self.columns.0;
        (0..self.rows.0).flat_map(move |row| (0..columns).map(move |col| LogicalCell::new(row, col)))
    }

    /// Rows of raw tiles.
    pub fn iter_rows(&self) -> slice::Chunks<u8> {
        self.tiles.chunks(self.width().0)
    }

    /// Open a wall on the outer boundary, e.g. a maze entrance or exit.
    ///
    /// Only boundary positions with exactly one odd coordinate are accepted, pillars stay intact.
    pub fn open_boundary(&mut self, row: usize, col: usize) -> Result<()> {
        let (Height(height), Width(width)) = (self.height(), self.width());
        let in_bounds = row < height && col < width;
        let on_boundary = row == 0 || col == 0 || row == height - 1 || col == width - 1;
        let between_pillars = (row % 2 == 1) != (col % 2 == 1);

        if !(in_bounds && on_boundary && between_pillars) {
            bail!(ErrorKind::InvalidBoundaryOpening(row, col));
        }
        self.set_open(row, col);
        Ok(())
    }

    /// Opens the top wall of the first cell and the bottom wall of the last cell.
    ///
    /// Returns the two opened grid positions, entrance first.
    pub fn open_default_entrances(&mut self) -> ((usize, usize), (usize, usize)) {
        let entrance = LogicalCell::new(0, 0).wall_position(Direction::Up);
        let exit = LogicalCell::new(self.rows.0 - 1, self.columns.0 - 1).wall_position(Direction::Down);
        self.set_open(entrance.0, entrance.1);
        self.set_open(exit.0, exit.1);
        (entrance, exit)
    }

    /// `.` for open and `#` for wall, one newline terminated line per grid row.
    pub fn to_debug_string(&self) -> String {
        let Width(width) = self.width();
        let mut text = String::with_capacity(self.tiles.len() + self.height().0);
        for (i, tile) in self.tiles.iter().enumerate() {
            text.push(if *tile == OPEN { OPEN_GLYPH } else { WALL_GLYPH });
            if (i + 1) % width == 0 {
                text.push('\n');
            }
        }
        text
    }

    /// Graph view with one node per logical cell (row major node indices) and one edge per
    /// open passage.
    pub fn to_graph(&self) -> UnGraph<LogicalCell, ()> {
        let mut graph = UnGraph::with_capacity(self.size(), self.size());
        for cell in self.iter_cells() {
            let _ = graph.add_node(cell);
        }
        for cell in self.iter_cells() {
            let a = NodeIndex::new(cell.row_major_index(self.columns));
            for &dir in &[Direction::Right, Direction::Down] {
                if self.is_neighbour_linked(cell, dir) {
                    if let Some(neighbour) = self.neighbour_at_direction(cell, dir) {
                        let b = NodeIndex::new(neighbour.row_major_index(self.columns));
                        let _ = graph.add_edge(a, b, ());
                    }
                }
            }
        }
        graph
    }
}

impl Index<(usize, usize)> for MazeGrid {
    type Output = u8;

    /// Panics when the position is out of bounds.
    fn index(&self, (row, col): (usize, usize)) -> &u8 {
        let i = self.tile_index(row, col).expect("grid position out of bounds");
        &self.tiles[i]
    }
}

impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_debug_string())
    }
}
