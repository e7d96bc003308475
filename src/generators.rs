use bit_set::BitSet;
use error_chain::bail;
use log::{debug, trace};
use rand::{self, Rng};

use crate::cells::{Direction, LogicalCell, DIRECTION_ORDERS};
use crate::errors::*;
use crate::grid::MazeGrid;
use crate::units::{ColumnsCount, Height, RowsCount, Width};

/// Straightness ratio used when none is set.
pub const DEFAULT_RATIO: f32 = 0.5;

/// Growing tree maze generator.
///
/// The carver keeps a frontier of visited cells. Each step it picks one frontier cell, either the
/// most recently stored one (with probability `ratio`) or a uniformly random one, and tries to
/// carve into an unvisited neighbour. A cell with no unvisited neighbours leaves the frontier.
///
/// A `ratio` of 1 behaves like the recursive backtracker and gives long winding corridors, a
/// `ratio` of 0 behaves like Prim's algorithm and gives short branchy ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MazeGenerator {
    ratio: f32,
}

impl Default for MazeGenerator {
    fn default() -> Self {
        MazeGenerator { ratio: DEFAULT_RATIO }
    }
}

impl MazeGenerator {
    pub fn new() -> MazeGenerator {
        MazeGenerator::default()
    }

    pub fn with_ratio(ratio: f32) -> MazeGenerator {
        let mut generator = MazeGenerator::default();
        generator.set_ratio(ratio);
        generator
    }

    /// Set the straightness ratio, clamped into `[0, 1]`. NaN is treated as 0.
    pub fn set_ratio(&mut self, ratio: f32) {
        self.ratio = clamp_unit(ratio);
    }

    #[inline]
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    /// Generate a `rows` x `columns` maze with the thread local random number generator.
    ///
    /// With a `drop_probability` of zero the result is a perfect maze: every cell is reachable and
    /// there are no loops. A positive probability opens each remaining interior wall independently.
    pub fn generate(&self,
                    rows: RowsCount,
                    columns: ColumnsCount,
                    drop_probability: f32)
                    -> Result<MazeGrid> {
        self.generate_with_rng(rows, columns, drop_probability, &mut rand::thread_rng())
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(&self,
                                              rows: RowsCount,
                                              columns: ColumnsCount,
                                              drop_probability: f32,
                                              rng: &mut R)
                                              -> Result<MazeGrid> {
        check_dimensions(rows, columns)?;
        check_probability(drop_probability)?;

        let mut grid = MazeGrid::new(rows, columns)?;
        let mut visited = BitSet::with_capacity(grid.size());
        let mut frontier = Vec::with_capacity(grid.size());

        let start = LogicalCell::new(rng.gen_range(0..rows.0), rng.gen_range(0..columns.0));
        let start_index = start.row_major_index(columns);
        visited.insert(start_index);
        frontier.push(start_index);

        let carved = self.grow_tree(&mut grid, &mut visited, &mut frontier, rng);
        let dropped = drop_walls(&mut grid, drop_probability, rng);

        debug!("Generated {}x{} maze from {}: ratio {}, carved {} passages, dropped {} walls",
               rows.0, columns.0, start, self.ratio, carved, dropped);
        Ok(grid)
    }

    /// Generate a maze around a centred, fully open `inner_rows` x `inner_columns` room.
    ///
    /// The room is offset by `(rows - inner_rows) / 2` and `(columns - inner_columns) / 2`, so it
    /// leans towards the top left when the difference is odd. A zero room dimension falls back to
    /// `generate`.
    pub fn generate_with_room(&self,
                              rows: RowsCount,
                              columns: ColumnsCount,
                              inner_rows: RowsCount,
                              inner_columns: ColumnsCount,
                              drop_probability: f32)
                              -> Result<MazeGrid> {
        self.generate_with_room_and_rng(rows,
                                        columns,
                                        inner_rows,
                                        inner_columns,
                                        drop_probability,
                                        &mut rand::thread_rng())
    }

    pub fn generate_with_room_and_rng<R: Rng + ?Sized>(&self,
                                                       rows: RowsCount,
                                                       columns: ColumnsCount,
                                                       inner_rows: RowsCount,
                                                       inner_columns: ColumnsCount,
                                                       drop_probability: f32,
                                                       rng: &mut R)
                                                       -> Result<MazeGrid> {
        check_dimensions(rows, columns)?;
        if inner_rows > rows || inner_columns > columns {
            bail!(ErrorKind::InvalidInnerRoom(inner_rows.0, inner_columns.0, rows.0, columns.0));
        }
        if inner_rows.0 == 0 || inner_columns.0 == 0 {
            return self.generate_with_rng(rows, columns, drop_probability, rng);
        }
        check_probability(drop_probability)?;

        let mut grid = MazeGrid::new(rows, columns)?;
        let mut visited = BitSet::with_capacity(grid.size());
        let mut frontier = Vec::with_capacity(grid.size());

        let top = (rows.0 - inner_rows.0) / 2;
        let left = (columns.0 - inner_columns.0) / 2;
        for row in top..top + inner_rows.0 {
            for col in left..left + inner_columns.0 {
                let cell = LogicalCell::new(row, col);
                let index = cell.row_major_index(columns);
                visited.insert(index);
                frontier.push(index);

                if row > top {
                    let (r, c) = cell.wall_position(Direction::Up);
                    grid.set_open(r, c);
                }
                if col > left {
                    let (r, c) = cell.wall_position(Direction::Left);
                    grid.set_open(r, c);
                }
            }
        }

        let carved = self.grow_tree(&mut grid, &mut visited, &mut frontier, rng);
        let dropped = drop_walls(&mut grid, drop_probability, rng);

        debug!("Generated {}x{} maze around a {}x{} room at ({}, {}): ratio {}, carved {} \
                passages, dropped {} walls",
               rows.0, columns.0, inner_rows.0, inner_columns.0, top, left, self.ratio, carved,
               dropped);
        Ok(grid)
    }

    /// Carve passages until the frontier is exhausted. Returns the number of passages carved.
    ///
    /// The frontier holds row major cell indices. Exhausted cells are swap removed, which moves the
    /// last stored cell into the freed slot.
    fn grow_tree<R: Rng + ?Sized>(&self,
                                  grid: &mut MazeGrid,
                                  visited: &mut BitSet,
                                  frontier: &mut Vec<usize>,
                                  rng: &mut R)
                                  -> usize {
        let (rows, columns) = (grid.rows(), grid.columns());
        let mut carved = 0;

        while !frontier.is_empty() {
            let directions = DIRECTION_ORDERS[rng.gen_range(0..DIRECTION_ORDERS.len())];
            let frontier_index = if rng.gen::<f32>() < self.ratio {
                frontier.len() - 1
            } else {
                rng.gen_range(0..frontier.len())
            };
            let cell = LogicalCell::from_row_major_index(frontier[frontier_index], columns);

            // First unvisited neighbour in permutation order wins.
            let next = directions.iter()
                .filter_map(|&dir| cell.offset(dir, rows, columns).map(|n| (dir, n)))
                .find(|&(_, n)| !visited.contains(n.row_major_index(columns)));

            match next {
                Some((dir, neighbour)) => {
                    let neighbour_index = neighbour.row_major_index(columns);
                    visited.insert(neighbour_index);
                    frontier.push(neighbour_index);
                    let (r, c) = cell.wall_position(dir);
                    grid.set_open(r, c);
                    carved += 1;
                }
                None => {
                    let _ = frontier.swap_remove(frontier_index);
                }
            }
        }

        carved
    }
}

/// Open each interior wall between two cells with probability `drop_probability`.
///
/// Horizontal walls are visited first, then vertical walls, both row major. One uniform draw is
/// taken per wall, open or not, so the number of draws only depends on the grid size.
/// Returns the number of walls that went from closed to open.
fn drop_walls<R: Rng + ?Sized>(grid: &mut MazeGrid, drop_probability: f32, rng: &mut R) -> usize {
    if drop_probability <= 0.0 {
        return 0;
    }
    let (Height(height), Width(width)) = (grid.height(), grid.width());
    let horizontal_walls = (2..height - 1)
        .step_by(2)
        .flat_map(|row| (1..width - 1).step_by(2).map(move |col| (row, col)));
    let vertical_walls = (1..height - 1)
        .step_by(2)
        .flat_map(|row| (2..width - 1).step_by(2).map(move |col| (row, col)));

    let mut dropped = 0;
    for (row, col) in horizontal_walls.chain(vertical_walls) {
        if rng.gen::<f32>() < drop_probability && grid.is_wall(row, col) {
            grid.set_open(row, col);
            dropped += 1;
        }
    }
    trace!("Dropped {} walls with probability {}", dropped, drop_probability);
    dropped
}

fn check_dimensions(rows: RowsCount, columns: ColumnsCount) -> Result<()> {
    if rows.0 == 0 || columns.0 == 0 {
        bail!(ErrorKind::InvalidDimensions(rows.0, columns.0));
    }
    Ok(())
}

fn check_probability(p: f32) -> Result<()> {
    if p.is_nan() || p < 0.0 || p > 1.0 {
        bail!(ErrorKind::InvalidProbability(p));
    }
    Ok(())
}

pub(crate) fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0).min(1.0)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::analysis::MazeStats;
    use crate::grid::OPEN;
    use quickcheck::{quickcheck, TestResult};
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn seeded(seed: u64) -> XorShiftRng {
        XorShiftRng::seed_from_u64(seed)
    }

    fn plain(generator: &MazeGenerator, rows: usize, cols: usize, p: f32, seed: u64) -> MazeGrid {
        generator.generate_with_rng(RowsCount(rows), ColumnsCount(cols), p, &mut seeded(seed))
            .expect("generation failed")
    }

    fn with_room(generator: &MazeGenerator,
                 (rows, cols): (usize, usize),
                 (inner_rows, inner_cols): (usize, usize),
                 p: f32,
                 seed: u64)
                 -> MazeGrid {
        generator.generate_with_room_and_rng(RowsCount(rows),
                                             ColumnsCount(cols),
                                             RowsCount(inner_rows),
                                             ColumnsCount(inner_cols),
                                             p,
                                             &mut seeded(seed))
            .expect("generation failed")
    }

    fn pillars_intact(grid: &MazeGrid) -> bool {
        (0..grid.height().0)
            .step_by(2)
            .all(|row| (0..grid.width().0).step_by(2).all(|col| grid.is_wall(row, col)))
    }

    fn open_positions(grid: &MazeGrid) -> Vec<(usize, usize)> {
        (0..grid.height().0)
            .flat_map(|row| (0..grid.width().0).map(move |col| (row, col)))
            .filter(|&(row, col)| grid.is_open(row, col))
            .collect()
    }

    #[test]
    fn ratio_defaults_and_clamps() {
        let mut generator = MazeGenerator::new();
        assert_eq!(generator.ratio(), DEFAULT_RATIO);
        generator.set_ratio(0.75);
        assert_eq!(generator.ratio(), 0.75);
        generator.set_ratio(3.0);
        assert_eq!(generator.ratio(), 1.0);
        generator.set_ratio(-1.0);
        assert_eq!(generator.ratio(), 0.0);
        generator.set_ratio(::std::f32::NAN);
        assert_eq!(generator.ratio(), 0.0);
        assert_eq!(MazeGenerator::with_ratio(0.25).ratio(), 0.25);
    }

    #[test]
    fn two_by_two_spanning_tree() {
        let generator = MazeGenerator::new();
        for seed in 0..50 {
            let g = plain(&generator, 2, 2, 0.0, seed);
            assert_eq!((g.height().0, g.width().0), (5, 5));
            for &(row, col) in &[(0, 0), (0, 2), (0, 4), (2, 0), (2, 2), (2, 4), (4, 0), (4, 2), (4, 4)] {
                assert_eq!(g[(row, col)], 1);
            }
            for &(row, col) in &[(1, 1), (1, 3), (3, 1), (3, 3)] {
                assert_eq!(g[(row, col)], 0);
            }
            let open_walls = [(1, 2), (3, 2), (2, 1), (2, 3)]
                .iter()
                .filter(|&&(row, col)| g[(row, col)] == OPEN)
                .count();
            assert_eq!(open_walls, 3);
        }
    }

    #[test]
    fn perfect_mazes_across_ratios_and_shapes() {
        for &ratio in &[0.0, 0.3, 0.5, 1.0] {
            let generator = MazeGenerator::with_ratio(ratio);
            for &(rows, cols) in &[(1, 1), (1, 9), (9, 1), (3, 7), (12, 12), (25, 17)] {
                for seed in 0..5 {
                    let g = plain(&generator, rows, cols, 0.0, seed);
                    let stats = MazeStats::of(&g);
                    assert_eq!(stats.passages, rows * cols - 1);
                    assert_eq!(stats.connected_components, 1);
                    assert!(!stats.has_cycles);
                    assert!(pillars_intact(&g));
                }
            }
        }
    }

    #[test]
    fn outer_boundary_is_never_carved() {
        let g = plain(&MazeGenerator::new(), 10, 10, 1.0, 9);
        for i in 0..21 {
            assert!(g.is_wall(0, i));
            assert!(g.is_wall(20, i));
            assert!(g.is_wall(i, 0));
            assert!(g.is_wall(i, 20));
        }
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let generator = MazeGenerator::with_ratio(0.6);
        assert_eq!(plain(&generator, 15, 11, 0.1, 42), plain(&generator, 15, 11, 0.1, 42));
        assert_eq!(with_room(&generator, (15, 15), (5, 5), 0.02, 7),
                   with_room(&generator, (15, 15), (5, 5), 0.02, 7));
    }

    #[test]
    fn braiding_only_adds_passages() {
        let generator = MazeGenerator::new();
        for seed in 0..10 {
            let perfect = plain(&generator, 12, 9, 0.0, seed);
            let braided = plain(&generator, 12, 9, 0.35, seed);
            for (row, col) in open_positions(&perfect) {
                assert!(braided.is_open(row, col));
            }
            assert!(braided.passages_count() >= perfect.passages_count());
            assert!(pillars_intact(&braided));

            let perfect_room = with_room(&generator, (12, 9), (4, 3), 0.0, seed);
            let braided_room = with_room(&generator, (12, 9), (4, 3), 0.35, seed);
            for (row, col) in open_positions(&perfect_room) {
                assert!(braided_room.is_open(row, col));
            }
        }
    }

    #[test]
    fn braiding_creates_loops() {
        let g = plain(&MazeGenerator::new(), 20, 20, 0.3, 3);
        let stats = MazeStats::of(&g);
        assert!(stats.has_cycles);
        assert_eq!(stats.connected_components, 1);
        assert!(stats.passages > 20 * 20 - 1);
    }

    #[test]
    fn certain_drop_opens_every_interior_wall() {
        let (rows, cols) = (6, 8);
        let g = plain(&MazeGenerator::new(), rows, cols, 1.0, 1);
        assert_eq!(g.passages_count(), rows * (cols - 1) + cols * (rows - 1));
        assert!(pillars_intact(&g));
    }

    #[test]
    fn centred_room_in_five_by_five() {
        let generator = MazeGenerator::new();
        let room = [LogicalCell::new(1, 1),
                    LogicalCell::new(1, 2),
                    LogicalCell::new(2, 1),
                    LogicalCell::new(2, 2)];
        for seed in 0..20 {
            let g = with_room(&generator, (5, 5), (2, 2), 0.0, seed);
            assert!(g.is_linked(room[0], room[1]));
            assert!(g.is_linked(room[0], room[2]));
            assert!(g.is_linked(room[1], room[3]));
            assert!(g.is_linked(room[2], room[3]));
            assert!(g.is_wall(4, 4));
            assert!(pillars_intact(&g));
        }
    }

    #[test]
    fn room_offsets_lean_to_lower_indices() {
        // 6 - 3 = 3 rows to spare: one above the room, two below.
        let g = with_room(&MazeGenerator::new(), (6, 7), (3, 3), 0.0, 5);
        for row in 1..4 {
            for col in 2..5 {
                let cell = LogicalCell::new(row, col);
                if row < 3 {
                    assert!(g.is_linked(cell, LogicalCell::new(row + 1, col)));
                }
                if col < 4 {
                    assert!(g.is_linked(cell, LogicalCell::new(row, col + 1)));
                }
            }
        }
    }

    #[test]
    fn room_maze_is_connected_with_room_cycles_only() {
        for seed in 0..10 {
            let (rows, cols, inner_rows, inner_cols) = (15, 13, 5, 4);
            let g = with_room(&MazeGenerator::with_ratio(0.75), (rows, cols), (inner_rows, inner_cols), 0.0, seed);
            let stats = MazeStats::of(&g);
            let room_edges = inner_rows * (inner_cols - 1) + inner_cols * (inner_rows - 1);
            let outside_cells = rows * cols - inner_rows * inner_cols;
            assert_eq!(stats.connected_components, 1);
            assert_eq!(stats.passages, outside_cells + room_edges);
        }
    }

    #[test]
    fn room_covering_the_maze_opens_everything() {
        let g = with_room(&MazeGenerator::new(), (4, 6), (4, 6), 0.0, 2);
        assert_eq!(g.passages_count(), 4 * 5 + 6 * 3);
        assert!(pillars_intact(&g));
    }

    #[test]
    fn empty_room_falls_back_to_plain_maze() {
        let generator = MazeGenerator::with_ratio(0.4);
        for seed in 0..5 {
            let expected = plain(&generator, 9, 11, 0.1, seed);
            assert_eq!(with_room(&generator, (9, 11), (0, 4), 0.1, seed), expected);
            assert_eq!(with_room(&generator, (9, 11), (3, 0), 0.1, seed), expected);
        }
    }

    #[test]
    fn preconditions_fail_fast() {
        let generator = MazeGenerator::new();
        let mut rng = seeded(0);

        match generator.generate_with_rng(RowsCount(0), ColumnsCount(4), 0.0, &mut rng) {
            Err(Error(ErrorKind::InvalidDimensions(0, 4), _)) => {}
            other => panic!("unexpected {:?}", other),
        }
        match generator.generate_with_room_and_rng(RowsCount(4), ColumnsCount(0), RowsCount(0),
                                                   ColumnsCount(0), 0.0, &mut rng) {
            Err(Error(ErrorKind::InvalidDimensions(4, 0), _)) => {}
            other => panic!("unexpected {:?}", other),
        }
        match generator.generate_with_room_and_rng(RowsCount(4), ColumnsCount(4), RowsCount(5),
                                                   ColumnsCount(2), 0.0, &mut rng) {
            Err(Error(ErrorKind::InvalidInnerRoom(5, 2, 4, 4), _)) => {}
            other => panic!("unexpected {:?}", other),
        }
        match generator.generate_with_room_and_rng(RowsCount(4), ColumnsCount(4), RowsCount(0),
                                                   ColumnsCount(9), 0.0, &mut rng) {
            Err(Error(ErrorKind::InvalidInnerRoom(0, 9, 4, 4), _)) => {}
            other => panic!("unexpected {:?}", other),
        }
        for &p in &[-0.1, 1.5, ::std::f32::NAN] {
            match generator.generate_with_rng(RowsCount(3), ColumnsCount(3), p, &mut rng) {
                Err(Error(ErrorKind::InvalidProbability(_), _)) => {}
                other => panic!("unexpected {:?}", other),
            }
            match generator.generate_with_room_and_rng(RowsCount(3), ColumnsCount(3), RowsCount(1),
                                                       ColumnsCount(1), p, &mut rng) {
                Err(Error(ErrorKind::InvalidProbability(_), _)) => {}
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn thread_rng_generation_is_valid() {
        let generator = MazeGenerator::new();
        let g = generator.generate(RowsCount(8), ColumnsCount(5), 0.0).expect("generation failed");
        assert_eq!(g.passages_count(), 39);
        let g = generator.generate_with_room(RowsCount(8), ColumnsCount(5), RowsCount(2),
                                             ColumnsCount(2), 0.0)
            .expect("generation failed");
        assert_eq!(MazeStats::of(&g).connected_components, 1);
    }

    #[test]
    fn high_ratio_gives_longer_corridors() {
        let trials = 20;
        let mean_over_trials = |ratio: f32| {
            let generator = MazeGenerator::with_ratio(ratio);
            let total: f64 = (0..trials)
                .map(|seed| MazeStats::of(&plain(&generator, 20, 20, 0.0, seed)).mean_corridor_length())
                .sum();
            total / trials as f64
        };
        let dead_ends_over_trials = |ratio: f32| {
            let generator = MazeGenerator::with_ratio(ratio);
            (0..trials)
                .map(|seed| MazeStats::of(&plain(&generator, 20, 20, 0.0, seed)).dead_ends)
                .sum::<usize>()
        };

        let depth_first = mean_over_trials(1.0);
        let prim_like = mean_over_trials(0.0);
        assert!(depth_first > 1.5 * prim_like,
                "ratio 1 mean corridor {} vs ratio 0 mean corridor {}", depth_first, prim_like);
        assert!(dead_ends_over_trials(1.0) < dead_ends_over_trials(0.0));
    }

    #[test]
    fn quickcheck_generated_mazes_are_perfect() {
        fn prop(rows: u8, cols: u8, seed: u64, ratio_percent: u8) -> TestResult {
            let (rows, cols) = (rows as usize % 16 + 1, cols as usize % 16 + 1);
            let generator = MazeGenerator::with_ratio((ratio_percent % 101) as f32 / 100.0);
            let g = plain(&generator, rows, cols, 0.0, seed);
            let stats = MazeStats::of(&g);
            TestResult::from_bool(stats.is_perfect() && pillars_intact(&g))
        }
        quickcheck(prop as fn(u8, u8, u64, u8) -> TestResult);
    }

    #[test]
    fn quickcheck_room_mazes_keep_pillars_and_connectivity() {
        fn prop(rows: u8, cols: u8, inner_rows: u8, inner_cols: u8, seed: u64) -> bool {
            let (rows, cols) = (rows as usize % 14 + 1, cols as usize % 14 + 1);
            let (inner_rows, inner_cols) = (inner_rows as usize % (rows + 1), inner_cols as usize % (cols + 1));
            let g = with_room(&MazeGenerator::new(), (rows, cols), (inner_rows, inner_cols), 0.15, seed);
            pillars_intact(&g) && MazeStats::of(&g).connected_components == 1
        }
        quickcheck(prop as fn(u8, u8, u8, u8, u64) -> bool);
    }
}
